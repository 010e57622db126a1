use std::path::Path;

use glam::Mat4;

use crate::camera::Camera;
use crate::error::AssetError;
use crate::geometry::generate_sphere;
use crate::model::{Mesh, ObjModel};
use crate::render_queue::{DrawCall, RenderQueue};
use crate::texture::Texture;

/// Renderable payload held by a scene node.
pub trait Object {
    fn name(&self) -> &str;

    /// Called during the update pass with the node's freshly computed world
    /// matrix and the projection and camera forwarded by the driver.
    fn update(&mut self, _world: &Mat4, _projection: &Mat4, _camera: &Camera) {}

    fn draw(&self, world: &Mat4, queue: &mut RenderQueue);

    fn load_texture(&mut self, path: &Path) -> Result<(), AssetError>;
}

/// A mesh with an optional texture, drawn as a single call.
pub struct MeshObject {
    name: String,
    mesh: Mesh,
    texture: Option<Texture>,
    base_color: [u8; 3],
    view_projection: Mat4,
}

impl MeshObject {
    pub fn new(name: impl Into<String>, mesh: Mesh) -> Self {
        Self {
            name: name.into(),
            mesh,
            texture: None,
            base_color: [255, 255, 255],
            view_projection: Mat4::IDENTITY,
        }
    }

    pub fn sphere(name: impl Into<String>, segments: u32) -> Self {
        let geometry = generate_sphere(segments, segments / 2);
        Self::new(name, Mesh::from_geometry(&geometry))
    }

    /// Loads an OBJ model and, when its material names a diffuse map, that
    /// texture. A texture that fails to load is logged and skipped.
    pub fn from_obj(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let model = ObjModel::load(path)?;
        let mut object = Self::new(model.name.clone(), model.mesh.clone());

        if let Some(material) = model.material() {
            object.base_color = material.diffuse_rgb();

            if let Some(texture_path) = &material.diffuse_texture {
                if let Err(err) = object.load_texture(texture_path) {
                    log::warn!("{}: {}", object.name, err);
                }
            }
        }

        Ok(object)
    }

    pub fn with_color(mut self, color: [u8; 3]) -> Self {
        self.base_color = color;
        self
    }

    pub fn set_texture(&mut self, texture: Texture) {
        self.texture = Some(texture);
    }

    pub fn texture(&self) -> Option<&Texture> {
        self.texture.as_ref()
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Texture average when textured, otherwise the base color.
    pub fn color(&self) -> [u8; 3] {
        self.texture
            .as_ref()
            .map(Texture::average_color)
            .unwrap_or(self.base_color)
    }
}

impl Object for MeshObject {
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, _world: &Mat4, projection: &Mat4, camera: &Camera) {
        self.view_projection = *projection * camera.view_matrix();
    }

    fn draw(&self, world: &Mat4, queue: &mut RenderQueue) {
        queue.submit(DrawCall {
            label: self.name.clone(),
            model: *world,
            model_view_projection: self.view_projection * *world,
            color: self.color(),
            index_count: self.mesh.index_count(),
        });
    }

    fn load_texture(&mut self, path: &Path) -> Result<(), AssetError> {
        self.texture = Some(Texture::load_ppm(path)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::camera::Projection;

    #[test]
    fn draw_uses_world_and_forwarded_view_projection() {
        let mut sphere = MeshObject::sphere("moon", 8).with_color([10, 20, 30]);
        let world = Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0));
        let projection = Projection {
            fov_y_degrees: 45.0,
            aspect: 1.0,
            near: 0.1,
            far: 100.0,
        }
        .matrix();
        let camera = Camera::new(Vec3::new(0.0, 0.0, 10.0));

        sphere.update(&world, &projection, &camera);
        let mut queue = RenderQueue::new();
        sphere.draw(&world, &mut queue);

        let call = &queue.calls()[0];
        assert_eq!(call.label, "moon");
        assert_eq!(call.model, world);
        assert_eq!(call.color, [10, 20, 30]);
        assert_eq!(call.index_count, sphere.mesh().index_count());
        assert!(call
            .model_view_projection
            .abs_diff_eq(projection * camera.view_matrix() * world, 1e-6));
    }

    #[test]
    fn texture_overrides_base_color() {
        let mut sphere = MeshObject::sphere("sun", 8);
        let mut texture = Texture::new(2, 1);
        texture.fill([200, 100, 0]);
        sphere.set_texture(texture);

        assert_eq!(sphere.color(), [200, 100, 0]);
    }

    #[test]
    fn from_obj_applies_material_and_texture() {
        let dir = std::env::temp_dir().join(format!("orrery-obj-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("tri.obj"),
            "mtllib tri.mtl\nv 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl green\nf 1 2 3\n",
        )
        .unwrap();
        std::fs::write(dir.join("tri.mtl"), "newmtl green\nKd 0 1 0\nmap_Kd tri.ppm\n").unwrap();
        std::fs::write(dir.join("tri.ppm"), "P3\n1 1\n255\n9 8 7\n").unwrap();

        let object = MeshObject::from_obj(dir.join("tri.obj")).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();

        assert_eq!(object.name(), "tri");
        assert_eq!(object.mesh().index_count(), 3);
        assert_eq!(object.base_color, [0, 255, 0]);
        assert_eq!(object.color(), [9, 8, 7]);
    }

    #[test]
    fn missing_texture_file_is_an_error() {
        let mut sphere = MeshObject::sphere("earth", 8);
        let err = sphere
            .load_texture(Path::new("definitely/missing/earth.ppm"))
            .unwrap_err();

        assert!(matches!(err, AssetError::Io { .. }));
        assert!(sphere.texture().is_none());
    }
}
