//! Assembly of the thatched house scene
//!
//! [`build_house`] turns a [`SceneConfig`] into a [`Scene`]: a ground plane,
//! four thin box walls, two slanted straw roof planes and the prism that
//! closes the gable between them. Nothing here touches the GPU.

use std::f32::consts::PI;

use cgmath::Rad;
use thiserror::Error;

use crate::{
    config::{hex_to_rgb, srgb_to_linear, ConfigError, SceneConfig},
    gfx::{
        camera::CameraManager,
        geometry::{generate_box, generate_plane, generate_roof_fill, GeometryError},
        resources::Material,
        scene::{Object, Scene},
    },
};

pub const GROUND_MATERIAL: &str = "ground";
pub const WALL_MATERIAL: &str = "walls";
pub const STRAW_MATERIAL: &str = "straw";

const GROUND_COLOR: u32 = 0xa0a0a0;
const WALL_THICKNESS: f32 = 0.1;
const TEXTURE_REPEAT: f32 = 4.0;

/// Share of the house depth covered by each roof plane
const ROOF_DEPTH_RATIO: f32 = 3.8 / 5.0;
/// Roof planes are tilted by π divided by this
const ROOF_SLANT_DIVISOR: f32 = 2.7;
/// Roof planes sit at ±roof_depth divided by this along Z
const ROOF_OFFSET_DIVISOR: f32 = 2.2;

#[derive(Debug, Error, PartialEq)]
pub enum HouseError {
    #[error("invalid scene configuration")]
    Config(#[from] ConfigError),

    #[error("invalid house geometry")]
    Geometry(#[from] GeometryError),
}

/// Builds the complete house scene described by `config`
pub fn build_house(config: &SceneConfig) -> Result<Scene, HouseError> {
    config.validate()?;

    let mut scene = Scene::new(CameraManager::from_config(config))
        .with_lighting(config.lighting)
        .with_background(config.background);

    for material in house_materials(config) {
        scene.add_material(material);
    }

    add_ground(&mut scene, config);
    add_walls(&mut scene, config);
    add_roof(&mut scene, config)?;

    let stats = scene.get_statistics();
    log::info!(
        "Built house {}x{}: {} objects, {} triangles",
        config.house.width,
        config.house.depth,
        stats.object_count,
        stats.total_triangles
    );

    Ok(scene)
}

/// Ground, wall and straw materials
pub fn house_materials(config: &SceneConfig) -> Vec<Material> {
    let [r, g, b] = hex_to_rgb(GROUND_COLOR).map(srgb_to_linear);

    vec![
        Material::new(GROUND_MATERIAL, [1.0; 4], 0.0, 1.0)
            .with_color(r, g, b)
            .with_double_sided(true),
        Material::new(WALL_MATERIAL, [1.0; 4], 0.0, 0.8)
            .with_texture(config.assets.wall_texture_path())
            .with_repeat(TEXTURE_REPEAT, TEXTURE_REPEAT)
            .with_double_sided(true),
        Material::new(STRAW_MATERIAL, [1.0; 4], 0.1, 0.8)
            .with_texture(config.assets.straw_texture_path())
            .with_repeat(TEXTURE_REPEAT, TEXTURE_REPEAT)
            .with_double_sided(true),
    ]
}

fn add_ground(scene: &mut Scene, config: &SceneConfig) {
    let house = &config.house;
    scene.add_object(
        Object::from_geometry("ground", &generate_plane(house.width, house.depth, 1, 1))
            .with_rotation_x(Rad(-PI / 2.0))
            .with_material(GROUND_MATERIAL),
    );
}

fn add_walls(scene: &mut Scene, config: &SceneConfig) {
    let house = &config.house;
    let (w, d, h) = (house.width, house.depth, house.wall_height);

    let long_wall = generate_box(w, h, WALL_THICKNESS);
    let short_wall = generate_box(WALL_THICKNESS, h, d);

    let walls = [
        ("front_wall", &long_wall, (0.0, -d / 2.0)),
        ("back_wall", &long_wall, (0.0, d / 2.0)),
        ("left_wall", &short_wall, (-w / 2.0, 0.0)),
        ("right_wall", &short_wall, (w / 2.0, 0.0)),
    ];

    for (name, geometry, (x, z)) in walls {
        scene.add_object(
            Object::from_geometry(name, geometry)
                .with_position(x, h / 2.0, z)
                .with_material(WALL_MATERIAL),
        );
    }
}

fn add_roof(scene: &mut Scene, config: &SceneConfig) -> Result<(), GeometryError> {
    let house = &config.house;
    let roof_depth = house.depth * ROOF_DEPTH_RATIO;
    let roof_plane = generate_plane(house.width, roof_depth, 1, 1);
    let slant = PI / ROOF_SLANT_DIVISOR;
    let y = house.wall_height + house.roof_height / 2.0;
    let z = roof_depth / ROOF_OFFSET_DIVISOR;

    scene.add_object(
        Object::from_geometry("roof_back", &roof_plane)
            .with_rotation_x(Rad(slant))
            .with_position(0.0, y, -z)
            .with_material(STRAW_MATERIAL),
    );
    scene.add_object(
        Object::from_geometry("roof_front", &roof_plane)
            .with_rotation_x(Rad(-slant))
            .with_position(0.0, y, z)
            .with_material(STRAW_MATERIAL),
    );

    let fill = generate_roof_fill(
        house.width,
        house.depth,
        house.wall_height,
        house.roof_height,
    )?;
    scene.add_object(Object::from_geometry("roof_fill", &fill).with_material(WALL_MATERIAL));

    Ok(())
}
