use std::io::BufRead;
use std::path::{Path, PathBuf};

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use itertools::izip;

use crate::error::AssetError;
use crate::geometry::GeometryData;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub tex_coords: Vec2,
}

#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn from_geometry(geometry: &GeometryData) -> Self {
        let vertices = izip!(
            &geometry.positions,
            &geometry.normals,
            &geometry.tex_coords
        )
        .map(|(position, normal, tex_coords)| Vertex {
            position: Vec3::from(*position),
            normal: Vec3::from(*normal),
            tex_coords: Vec2::from(*tex_coords),
        })
        .collect();

        Self {
            vertices,
            indices: geometry.indices.clone(),
        }
    }

    /// Vertex data as raw bytes, ready for a vertex buffer.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Appends a tobj mesh, offsetting its indices past the current vertices.
    fn append_tobj(&mut self, mesh: &tobj::Mesh) {
        let base = self.vertices.len() as u32;
        let vertex_count = mesh.positions.len() / 3;

        for i in 0..vertex_count {
            let position = Vec3::from_slice(&mesh.positions[i * 3..i * 3 + 3]);
            let normal = mesh
                .normals
                .get(i * 3..i * 3 + 3)
                .map(Vec3::from_slice)
                .unwrap_or(Vec3::ZERO);
            let tex_coords = mesh
                .texcoords
                .get(i * 2..i * 2 + 2)
                .map(Vec2::from_slice)
                .unwrap_or(Vec2::ZERO);

            self.vertices.push(Vertex {
                position,
                normal,
                tex_coords,
            });
        }

        self.indices
            .extend(mesh.indices.iter().map(|index| base + index));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub diffuse: Vec3,
    pub shininess: f32,
    pub dissolve: f32,
    pub diffuse_texture: Option<PathBuf>,
}

impl Material {
    fn from_tobj(material: &tobj::Material, base_dir: &Path) -> Self {
        Self {
            name: material.name.clone(),
            diffuse: material.diffuse.map(Vec3::from).unwrap_or(Vec3::splat(0.8)),
            shininess: material.shininess.unwrap_or(32.0),
            dissolve: material.dissolve.unwrap_or(1.0),
            diffuse_texture: material
                .diffuse_texture
                .as_ref()
                .map(|texture| base_dir.join(texture)),
        }
    }

    pub fn diffuse_rgb(&self) -> [u8; 3] {
        let rgb = (self.diffuse.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round();
        [rgb.x as u8, rgb.y as u8, rgb.z as u8]
    }
}

/// All meshes of an OBJ file merged into one, plus its MTL materials.
#[derive(Debug, Clone)]
pub struct ObjModel {
    pub name: String,
    pub mesh: Mesh,
    pub materials: Vec<Material>,
    /// Material of the first mesh that references one
    pub active_material: Option<usize>,
}

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    }
}

impl ObjModel {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let (models, materials) =
            tobj::load_obj(path, &load_options()).map_err(|source| AssetError::Obj {
                path: path.to_path_buf(),
                source,
            })?;

        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Unnamed".to_string());
        let base_dir = path.parent().unwrap_or(Path::new(""));

        Ok(Self::assemble(name, &models, materials, base_dir))
    }

    /// Loads from an in-memory OBJ source. `material_loader` resolves
    /// `mtllib` statements; relative texture paths are kept as written.
    pub fn load_from_reader<R, F>(
        name: impl Into<String>,
        reader: &mut R,
        material_loader: F,
    ) -> Result<Self, AssetError>
    where
        R: BufRead,
        F: Fn(&Path) -> tobj::MTLLoadResult,
    {
        let name = name.into();
        let (models, materials) = tobj::load_obj_buf(reader, &load_options(), material_loader)
            .map_err(|source| AssetError::Obj {
                path: PathBuf::from(&name),
                source,
            })?;

        Ok(Self::assemble(name, &models, materials, Path::new("")))
    }

    fn assemble(
        name: String,
        models: &[tobj::Model],
        materials: Result<Vec<tobj::Material>, tobj::LoadError>,
        base_dir: &Path,
    ) -> Self {
        let materials = materials.unwrap_or_else(|err| {
            log::warn!("No materials for {name}: {err}");
            Vec::new()
        });
        let materials: Vec<Material> = materials
            .iter()
            .map(|material| Material::from_tobj(material, base_dir))
            .collect();

        let mut mesh = Mesh::default();
        for model in models {
            mesh.append_tobj(&model.mesh);
        }

        let active_material = models
            .iter()
            .find_map(|model| model.mesh.material_id)
            .filter(|&id| id < materials.len());

        log::debug!(
            "Loaded model {} ({} vertices, {} materials)",
            name,
            mesh.vertices.len(),
            materials.len()
        );

        Self {
            name,
            mesh,
            materials,
            active_material,
        }
    }

    pub fn material(&self) -> Option<&Material> {
        self.active_material.map(|id| &self.materials[id])
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::geometry::generate_sphere;

    const QUAD_OBJ: &str = "\
mtllib quad.mtl
o quad
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 1.0 1.0
vt 0.0 1.0
vn 0.0 0.0 1.0
usemtl red
f 1/1/1 2/2/1 3/3/1 4/4/1
";

    const QUAD_MTL: &str = "\
newmtl red
Ns 10.0
Kd 1.0 0.0 0.0
d 0.5
map_Kd red.ppm
";

    #[test]
    fn loads_obj_with_material() {
        let model = ObjModel::load_from_reader("quad", &mut Cursor::new(QUAD_OBJ), |_| {
            tobj::load_mtl_buf(&mut Cursor::new(QUAD_MTL))
        })
        .unwrap();

        assert_eq!(model.mesh.vertices.len(), 4);
        assert_eq!(model.mesh.indices.len(), 6);
        assert!(model.mesh.vertices[2]
            .position
            .abs_diff_eq(Vec3::new(1.0, 1.0, 0.0), 1e-6));
        assert!(model.mesh.vertices[0].normal.abs_diff_eq(Vec3::Z, 1e-6));

        let material = model.material().unwrap();
        assert_eq!(material.name, "red");
        assert_eq!(material.diffuse_rgb(), [255, 0, 0]);
        assert_eq!(material.shininess, 10.0);
        assert_eq!(material.dissolve, 0.5);
        assert_eq!(material.diffuse_texture, Some(PathBuf::from("red.ppm")));
    }

    #[test]
    fn missing_materials_are_not_fatal() {
        let model = ObjModel::load_from_reader("quad", &mut Cursor::new(QUAD_OBJ), |_| {
            Err(tobj::LoadError::OpenFileFailed)
        })
        .unwrap();

        assert_eq!(model.mesh.vertices.len(), 4);
        assert!(model.material().is_none());
    }

    #[test]
    fn mesh_from_geometry_keeps_indices() {
        let geometry = generate_sphere(8, 4);
        let mesh = Mesh::from_geometry(&geometry);

        assert_eq!(mesh.vertices.len(), geometry.vertex_count());
        assert_eq!(mesh.indices, geometry.indices);
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
        assert_eq!(mesh.vertex_bytes().len(), mesh.vertices.len() * 32);
    }
}
