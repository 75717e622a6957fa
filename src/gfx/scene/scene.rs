use wgpu::Device;

use crate::{
    config::LightingConfig,
    gfx::{
        camera::camera_utils::CameraManager,
        resources::material::{Material, MaterialManager},
    },
    wgpu_utils::BindGroupLayoutWithDesc,
};

use super::object::Object;

/// Main scene containing objects, materials, lights and camera
pub struct Scene {
    pub camera_manager: CameraManager,
    pub objects: Vec<Object>,
    pub material_manager: MaterialManager,
    pub lighting: LightingConfig,
    /// Clear color, sRGB
    pub background: [f32; 3],
}

impl Scene {
    /// Creates an empty scene with default lights and a black background
    pub fn new(camera_manager: CameraManager) -> Self {
        Self {
            camera_manager,
            objects: Vec::new(),
            material_manager: MaterialManager::new(),
            lighting: LightingConfig::default(),
            background: [0.0, 0.0, 0.0],
        }
    }

    pub fn with_lighting(mut self, lighting: LightingConfig) -> Self {
        self.lighting = lighting;
        self
    }

    pub fn with_background(mut self, background: [f32; 3]) -> Self {
        self.background = background;
        self
    }

    /// Per-frame update: controls first, then camera matrices
    pub fn update(&mut self) {
        self.camera_manager.update();
    }

    pub fn add_object(&mut self, object: Object) {
        self.objects.push(object);
    }

    pub fn add_material(&mut self, material: Material) {
        self.material_manager.add_material(material);
    }

    /// Uploads meshes and transforms, then loads textures and material uniforms
    ///
    /// Must be called after the GPU context is available and before rendering.
    pub fn init_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        transform_layout: &wgpu::BindGroupLayout,
        material_layout: &BindGroupLayoutWithDesc,
    ) {
        for object in self.objects.iter_mut() {
            object.init_gpu_resources(device, transform_layout);
        }

        self.material_manager
            .update_all_gpu_resources(device, queue, material_layout);
    }

    /// Material assigned to the object, or the default one
    pub fn get_material_for_object(&self, object: &Object) -> &Material {
        self.material_manager
            .get_material_for_object(object.get_material_id())
    }

    pub fn get_object_by_name(&self, name: &str) -> Option<&Object> {
        self.objects.iter().find(|obj| obj.name == name)
    }

    pub fn get_object_names(&self) -> Vec<String> {
        self.objects.iter().map(|obj| obj.name.clone()).collect()
    }

    pub fn get_statistics(&self) -> SceneStatistics {
        let total_triangles: u32 = self
            .objects
            .iter()
            .map(|obj| obj.meshes.iter().map(|m| m.index_count / 3).sum::<u32>())
            .sum();

        let total_vertices: u32 = self
            .objects
            .iter()
            .map(|obj| obj.meshes.iter().map(|m| m.vertex_count).sum::<u32>())
            .sum();

        SceneStatistics {
            object_count: self.objects.len(),
            material_count: self.material_manager.len(),
            total_triangles,
            total_vertices,
        }
    }
}

/// Scene statistics for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneStatistics {
    pub object_count: usize,
    pub material_count: usize,
    pub total_triangles: u32,
    pub total_vertices: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::SceneConfig,
        gfx::geometry::{generate_box, generate_plane},
    };

    fn scene() -> Scene {
        Scene::new(CameraManager::from_config(&SceneConfig::default()))
    }

    #[test]
    fn test_statistics_count_meshes() {
        let mut scene = scene();
        scene.add_object(Object::from_geometry("box", &generate_box(1.0, 1.0, 1.0)));
        scene.add_object(Object::from_geometry("plane", &generate_plane(1.0, 1.0, 1, 1)));

        let stats = scene.get_statistics();
        assert_eq!(stats.object_count, 2);
        assert_eq!(stats.material_count, 1);
        assert_eq!(stats.total_triangles, 12 + 2);
        assert_eq!(stats.total_vertices, 24 + 4);
    }

    #[test]
    fn test_object_material_lookup() {
        let mut scene = scene();
        scene.add_material(Material::new("red", [1.0, 0.0, 0.0, 1.0], 0.0, 0.5));
        scene.add_object(
            Object::from_geometry("box", &generate_box(1.0, 1.0, 1.0)).with_material("red"),
        );
        scene.add_object(Object::from_geometry("bare", &generate_box(1.0, 1.0, 1.0)));

        let boxed = scene.get_object_by_name("box").unwrap();
        assert_eq!(scene.get_material_for_object(boxed).name, "red");
        let bare = scene.get_object_by_name("bare").unwrap();
        assert_eq!(scene.get_material_for_object(bare).name, "default");
        assert_eq!(scene.get_object_names(), vec!["box", "bare"]);
    }
}
