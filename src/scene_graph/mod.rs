pub mod object;
pub mod scene;
pub mod scene_node;
pub mod transform;

pub use object::{MeshObject, Object};
pub use scene::SceneGraph;
pub use scene_node::{NodeId, SceneNode};
pub use transform::Transform;
