use cgmath::{InnerSpace, Vector3};

use thatch::{
    gfx::geometry::{face_normal, generate_roof_fill},
    house::{build_house, HouseError, STRAW_MATERIAL, WALL_MATERIAL},
    SceneConfig,
};

#[test]
fn reference_house_has_eight_objects() {
    let scene = build_house(&SceneConfig::default()).unwrap();
    let stats = scene.get_statistics();

    assert_eq!(stats.object_count, 8);
    // ground, walls and straw plus the default fallback
    assert_eq!(stats.material_count, 4);
    // plane 2 + 4 boxes × 12 + 2 planes × 2 + prism 8
    assert_eq!(stats.total_triangles, 2 + 48 + 4 + 8);
}

#[test]
fn roof_fill_shares_the_wall_material() {
    let scene = build_house(&SceneConfig::default()).unwrap();

    let fill = scene.get_object_by_name("roof_fill").unwrap();
    assert_eq!(scene.get_material_for_object(fill).name, WALL_MATERIAL);

    for name in ["roof_back", "roof_front"] {
        let roof = scene.get_object_by_name(name).unwrap();
        assert_eq!(scene.get_material_for_object(roof).name, STRAW_MATERIAL);
    }
}

#[test]
fn front_peak_matches_house_dimensions() {
    let scene = build_house(&SceneConfig::default()).unwrap();
    let fill = scene.get_object_by_name("roof_fill").unwrap();
    let mesh = &fill.meshes[0];

    assert_eq!(mesh.vertex_count, 10);
    assert_eq!(mesh.index_count, 24);
    assert_eq!(mesh.vertices()[2].position, [0.0, 12.7, -10.0]);
    assert!(mesh.indices().iter().all(|&i| i < 10));
}

#[test]
fn roof_fill_is_closed_and_outward_facing() {
    let fill = generate_roof_fill(40.0, 20.0, 10.0, 2.7).unwrap();
    let centroid = fill
        .vertices
        .iter()
        .fold(Vector3::new(0.0, 0.0, 0.0), |acc, v| acc + Vector3::from(*v))
        / fill.vertex_count() as f32;

    for [a, b, c] in fill.triangles() {
        let (a, b, c) = (
            fill.vertices[a as usize],
            fill.vertices[b as usize],
            fill.vertices[c as usize],
        );
        let normal = face_normal(a, b, c);
        assert!(normal.magnitude() > 0.0);

        let center = (Vector3::from(a) + Vector3::from(b) + Vector3::from(c)) / 3.0;
        assert!(normal.dot(center - centroid) > 0.0);
    }

    for n in &fill.normals {
        assert!((Vector3::from(*n).magnitude() - 1.0).abs() < 1e-5);
    }
}

#[test]
fn invalid_dimensions_are_rejected() {
    let mut config = SceneConfig::default();
    config.house.width = 0.0;
    assert!(matches!(build_house(&config), Err(HouseError::Config(_))));

    assert!(generate_roof_fill(0.0, 20.0, 10.0, 2.7).is_err());
    assert!(generate_roof_fill(40.0, 20.0, 10.0, 0.0).is_err());
}

#[test]
fn missing_textures_do_not_block_scene_assembly() {
    let config = SceneConfig::default().with_asset_directory("/nonexistent/thatch/assets");
    let scene = build_house(&config).unwrap();
    let walls = scene.material_manager.get_material(WALL_MATERIAL).unwrap();
    assert!(!walls.is_textured());
}
