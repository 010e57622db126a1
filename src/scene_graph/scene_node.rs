use id_arena::Id;

use crate::scene_graph::object::Object;
use crate::scene_graph::scene::SceneGraph;
use crate::scene_graph::transform::Transform;

pub type NodeId = Id<SceneNode>;

pub struct SceneNode {
    pub name: String,
    pub(crate) local_transform: Transform,
    pub(crate) world_transform: Transform,
    pub(crate) object: Option<Box<dyn Object>>,
    pub(crate) parent_id: Option<NodeId>,
    pub(crate) child_ids: Vec<NodeId>,
    pub(crate) alive: bool,
}

impl SceneNode {
    pub(crate) fn new(name: String, object: Option<Box<dyn Object>>) -> Self {
        Self {
            name,
            local_transform: Transform::IDENTITY,
            world_transform: Transform::IDENTITY,
            object,
            parent_id: None,
            child_ids: Vec::new(),
            alive: true,
        }
    }

    pub fn local_transform(&self) -> &Transform {
        &self.local_transform
    }

    pub fn world_transform(&self) -> &Transform {
        &self.world_transform
    }

    pub fn object(&self) -> Option<&dyn Object> {
        self.object.as_deref()
    }

    pub fn parent_id(&self) -> Option<NodeId> {
        self.parent_id
    }

    pub fn child_ids(&self) -> &[NodeId] {
        &self.child_ids
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn parent<'a>(&self, graph: &'a SceneGraph) -> Option<&'a SceneNode> {
        self.parent_id.and_then(|id| graph.get_node(id))
    }

    pub fn children<'a, 'b>(&'a self, graph: &'b SceneGraph) -> impl Iterator<Item = &'b SceneNode> + 'b
    where
        'a: 'b,
    {
        self.child_ids
            .iter()
            .filter_map(move |id| graph.get_node(*id))
    }

    /// Drops the payload and forgets the hierarchy. The arena slot stays
    /// allocated but is no longer reachable through the graph.
    pub(crate) fn release(&mut self) -> Vec<NodeId> {
        self.alive = false;
        self.object = None;
        self.parent_id = None;
        std::mem::take(&mut self.child_ids)
    }
}
