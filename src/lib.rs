//! A small scene graph with hierarchical transforms, plus the pieces needed
//! to drive it headlessly: PPM textures, OBJ/MTL models, a camera and an
//! orbiting-body demo.

pub mod camera;
pub mod config;
pub mod demo;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod model;
pub mod orbit;
pub mod render_queue;
pub mod scene_graph;
pub mod snapshot;
pub mod texture;

pub use error::{AssetError, ConfigError, SceneGraphError};
pub use scene_graph::{MeshObject, NodeId, Object, SceneGraph, Transform};
