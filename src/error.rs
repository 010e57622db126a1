//! Error types for the scene graph, asset loading and configuration.

use std::path::PathBuf;

use thiserror::Error;

use crate::scene_graph::NodeId;

/// Structural misuse of a [`SceneGraph`](crate::scene_graph::SceneGraph).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneGraphError {
    /// The id was never allocated by this graph or its node has been destroyed
    #[error("scene node {0:?} does not exist")]
    NodeNotFound(NodeId),

    /// A node can only have one parent at a time
    #[error("scene node {child:?} is already a child of {parent:?}")]
    AlreadyParented { child: NodeId, parent: NodeId },

    /// Attaching would make a node its own ancestor
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    CycleDetected { child: NodeId, parent: NodeId },
}

/// Failures while reading or writing textures and models.
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("OBJ error on {path}: {source}")]
    Obj {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("pixel ({x}, {y}) is outside a {width}x{height} image")]
    PixelOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
}

/// Failures while loading the driver configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
