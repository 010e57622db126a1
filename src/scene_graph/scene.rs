use glam::Mat4;
use id_arena::Arena;

use crate::camera::Camera;
use crate::error::SceneGraphError;
use crate::render_queue::RenderQueue;
use crate::scene_graph::object::Object;
use crate::scene_graph::scene_node::{NodeId, SceneNode};
use crate::scene_graph::transform::Transform;

/// Owns every node of one or more scene trees.
///
/// Parents reference children by id and children keep a non-owning
/// `parent_id`. Payloads live exactly as long as their node: until
/// [`SceneGraph::destroy`] reaches the node or the graph is dropped.
pub struct SceneGraph {
    nodes: Arena<SceneNode>,
    live_nodes: usize,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            nodes: Arena::new(),
            live_nodes: 0,
        }
    }

    pub fn create_node(
        &mut self,
        name: impl Into<String>,
        object: Option<Box<dyn Object>>,
    ) -> NodeId {
        self.live_nodes += 1;
        self.nodes.alloc(SceneNode::new(name.into(), object))
    }

    pub fn get_node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id).filter(|node| node.alive)
    }

    fn node(&self, id: NodeId) -> Result<&SceneNode, SceneGraphError> {
        self.get_node(id).ok_or(SceneGraphError::NodeNotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut SceneNode, SceneGraphError> {
        self.nodes
            .get_mut(id)
            .filter(|node| node.alive)
            .ok_or(SceneGraphError::NodeNotFound(id))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get_node(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.live_nodes
    }

    pub fn is_empty(&self) -> bool {
        self.live_nodes == 0
    }

    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, node)| node.alive && node.name == name)
            .map(|(id, _)| id)
    }

    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>, SceneGraphError> {
        Ok(self.node(id)?.parent_id)
    }

    pub fn children(&self, id: NodeId) -> Result<&[NodeId], SceneGraphError> {
        Ok(&self.node(id)?.child_ids)
    }

    pub fn object(&self, id: NodeId) -> Result<Option<&dyn Object>, SceneGraphError> {
        Ok(self.node(id)?.object())
    }

    pub fn object_mut(&mut self, id: NodeId) -> Result<Option<&mut (dyn Object + 'static)>, SceneGraphError> {
        Ok(self.node_mut(id)?.object.as_deref_mut())
    }

    pub fn local_transform(&self, id: NodeId) -> Result<&Transform, SceneGraphError> {
        Ok(&self.node(id)?.local_transform)
    }

    /// The local transform is how a driver animates a node between updates.
    pub fn local_transform_mut(&mut self, id: NodeId) -> Result<&mut Transform, SceneGraphError> {
        Ok(&mut self.node_mut(id)?.local_transform)
    }

    /// World transform as of the most recent [`SceneGraph::update`] that
    /// reached this node; identity before the first one.
    pub fn world_transform(&self, id: NodeId) -> Result<&Transform, SceneGraphError> {
        Ok(&self.node(id)?.world_transform)
    }

    /// Appends `child` to `parent`'s children. The child must be a root and
    /// must not be `parent` or one of its ancestors.
    pub fn add_child(&mut self, parent_id: NodeId, child_id: NodeId) -> Result<(), SceneGraphError> {
        self.node(parent_id)?;
        let child = self.node(child_id)?;

        if let Some(current_parent) = child.parent_id {
            return Err(SceneGraphError::AlreadyParented {
                child: child_id,
                parent: current_parent,
            });
        }

        let mut ancestor = Some(parent_id);
        while let Some(id) = ancestor {
            if id == child_id {
                return Err(SceneGraphError::CycleDetected {
                    child: child_id,
                    parent: parent_id,
                });
            }
            ancestor = self.nodes[id].parent_id;
        }

        self.nodes[child_id].parent_id = Some(parent_id);
        self.nodes[parent_id].child_ids.push(child_id);

        log::debug!(
            "Attached '{}' under '{}'",
            self.nodes[child_id].name,
            self.nodes[parent_id].name
        );

        Ok(())
    }

    /// Removes a node from its parent's children, making it a root. The
    /// node keeps its subtree and its last world transform.
    pub fn detach(&mut self, child_id: NodeId) -> Result<(), SceneGraphError> {
        let Some(parent_id) = self.node_mut(child_id)?.parent_id.take() else {
            return Ok(());
        };

        self.nodes[parent_id]
            .child_ids
            .retain(|&id| id != child_id);

        log::debug!(
            "Detached '{}' from '{}'",
            self.nodes[child_id].name,
            self.nodes[parent_id].name
        );

        Ok(())
    }

    /// Destroys a node and its whole subtree, dropping every payload once.
    /// Returns the number of nodes destroyed.
    pub fn destroy(&mut self, id: NodeId) -> Result<usize, SceneGraphError> {
        self.detach(id)?;

        let mut pending = vec![id];
        let mut destroyed = 0;
        while let Some(id) = pending.pop() {
            pending.extend(self.nodes[id].release());
            destroyed += 1;
        }

        self.live_nodes -= destroyed;
        log::debug!("Destroyed {} scene nodes", destroyed);

        Ok(destroyed)
    }

    /// Recomputes world transforms top-down from `id`, forwarding the
    /// projection and camera to every payload on the way.
    ///
    /// A non-root starting node composes onto its parent's cached world
    /// transform.
    pub fn update(
        &mut self,
        id: NodeId,
        projection: &Mat4,
        camera: &Camera,
    ) -> Result<(), SceneGraphError> {
        let parent_world = self
            .node(id)?
            .parent_id
            .map(|parent_id| self.nodes[parent_id].world_transform.matrix());

        self.update_recursive(id, parent_world, projection, camera);

        Ok(())
    }

    fn update_recursive(
        &mut self,
        id: NodeId,
        parent_world: Option<Mat4>,
        projection: &Mat4,
        camera: &Camera,
    ) {
        let node = &mut self.nodes[id];
        let local = node.local_transform.matrix();
        let world = match parent_world {
            Some(parent_world) => parent_world * local,
            None => local,
        };
        node.world_transform = Transform::from_matrix(world);

        if let Some(object) = node.object.as_mut() {
            object.update(&world, projection, camera);
        }

        for index in 0..self.nodes[id].child_ids.len() {
            let child_id = self.nodes[id].child_ids[index];
            self.update_recursive(child_id, Some(world), projection, camera);
        }
    }

    /// Submits draws for `id` and its descendants in child insertion order.
    pub fn draw(&self, id: NodeId, queue: &mut RenderQueue) -> Result<(), SceneGraphError> {
        self.draw_recursive(self.node(id)?, queue);
        Ok(())
    }

    fn draw_recursive(&self, node: &SceneNode, queue: &mut RenderQueue) {
        if let Some(object) = &node.object {
            object.draw(&node.world_transform.matrix(), queue);
        }

        for child in node.children(self) {
            self.draw_recursive(child, queue);
        }
    }

    /// Depth-first listing of `id`'s subtree in traversal order.
    pub fn descendants(&self, id: NodeId) -> Result<Vec<NodeId>, SceneGraphError> {
        self.node(id)?;

        let mut order = Vec::new();
        let mut pending = vec![id];
        while let Some(id) = pending.pop() {
            order.push(id);
            pending.extend(self.nodes[id].child_ids.iter().rev());
        }

        Ok(order)
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::path::Path;
    use std::rc::Rc;

    use glam::Vec3;

    use super::*;
    use crate::error::AssetError;
    use crate::render_queue::DrawCall;

    type Log = Rc<RefCell<Vec<String>>>;

    /// Records updates and drops into a shared log.
    struct Probe {
        name: String,
        log: Log,
    }

    impl Probe {
        fn boxed(name: &str, log: &Log) -> Option<Box<dyn Object>> {
            Some(Box::new(Probe {
                name: name.to_string(),
                log: Rc::clone(log),
            }))
        }
    }

    impl Object for Probe {
        fn name(&self) -> &str {
            &self.name
        }

        fn update(&mut self, _world: &Mat4, _projection: &Mat4, _camera: &Camera) {
            self.log.borrow_mut().push(format!("update {}", self.name));
        }

        fn draw(&self, world: &Mat4, queue: &mut RenderQueue) {
            queue.submit(DrawCall {
                label: self.name.clone(),
                model: *world,
                model_view_projection: *world,
                color: [255, 255, 255],
                index_count: 0,
            });
        }

        fn load_texture(&mut self, _path: &Path) -> Result<(), AssetError> {
            Ok(())
        }
    }

    impl Drop for Probe {
        fn drop(&mut self) {
            self.log.borrow_mut().push(format!("drop {}", self.name));
        }
    }

    fn new_log() -> Log {
        Rc::new(RefCell::new(Vec::new()))
    }

    fn update(graph: &mut SceneGraph, id: NodeId) {
        graph
            .update(id, &Mat4::IDENTITY, &Camera::default())
            .unwrap();
    }

    fn world_origin(graph: &SceneGraph, id: NodeId) -> Vec3 {
        graph.world_transform(id).unwrap().transform_point(Vec3::ZERO)
    }

    #[test]
    fn root_world_equals_local() {
        let mut graph = SceneGraph::new();
        let root = graph.create_node("root", None);

        let local = graph.local_transform_mut(root).unwrap();
        local.scale(2.0, 2.0, 2.0);
        local.rotate(0.4, 1.0, 1.0, 0.0);
        local.translate(3.0, -1.0, 0.5);
        update(&mut graph, root);

        assert_eq!(
            graph.world_transform(root).unwrap(),
            graph.local_transform(root).unwrap()
        );
    }

    #[test]
    fn world_composes_through_every_level() {
        let mut graph = SceneGraph::new();
        let root = graph.create_node("root", None);
        let a = graph.create_node("a", None);
        let b = graph.create_node("b", None);
        graph.add_child(root, a).unwrap();
        graph.add_child(a, b).unwrap();

        graph.local_transform_mut(root).unwrap().rotate(0.5, 0.0, 1.0, 0.0);
        graph.local_transform_mut(a).unwrap().translate(4.0, 0.0, 0.0);
        graph.local_transform_mut(a).unwrap().scale(0.5, 0.5, 0.5);
        graph.local_transform_mut(b).unwrap().translate(0.0, 2.0, 1.0);
        update(&mut graph, root);

        let root_world = graph.world_transform(root).unwrap().matrix();
        let a_world = graph.world_transform(a).unwrap().matrix();
        let b_world = graph.world_transform(b).unwrap().matrix();
        let a_local = graph.local_transform(a).unwrap().matrix();
        let b_local = graph.local_transform(b).unwrap().matrix();

        assert!(a_world.abs_diff_eq(root_world * a_local, 1e-6));
        assert!(b_world.abs_diff_eq(a_world * b_local, 1e-6));
    }

    #[test]
    fn sibling_order_changes_draw_order_only() {
        let log = new_log();
        let build = |first: &str, second: &str| {
            let mut graph = SceneGraph::new();
            let root = graph.create_node("root", None);
            for name in [first, second] {
                let child = graph.create_node(name, Probe::boxed(name, &log));
                let x = if name == "left" { -1.0 } else { 1.0 };
                graph.local_transform_mut(child).unwrap().translate(x, 0.0, 0.0);
                graph.add_child(root, child).unwrap();
            }
            graph.local_transform_mut(root).unwrap().translate(0.0, 5.0, 0.0);
            update(&mut graph, root);
            let mut queue = RenderQueue::new();
            graph.draw(root, &mut queue).unwrap();
            queue
        };

        let forward = build("left", "right");
        let backward = build("right", "left");

        assert_eq!(forward.labels().collect::<Vec<_>>(), ["left", "right"]);
        assert_eq!(backward.labels().collect::<Vec<_>>(), ["right", "left"]);
        assert_eq!(forward.calls()[0].model, backward.calls()[1].model);
        assert_eq!(forward.calls()[1].model, backward.calls()[0].model);
    }

    #[test]
    fn update_visits_parents_before_children() {
        let log = new_log();
        let mut graph = SceneGraph::new();
        let sun = graph.create_node("sun", Probe::boxed("sun", &log));
        let earth = graph.create_node("earth", Probe::boxed("earth", &log));
        let moon = graph.create_node("moon", Probe::boxed("moon", &log));
        let mars = graph.create_node("mars", Probe::boxed("mars", &log));
        graph.add_child(sun, earth).unwrap();
        graph.add_child(earth, moon).unwrap();
        graph.add_child(sun, mars).unwrap();

        update(&mut graph, sun);

        assert_eq!(
            *log.borrow(),
            ["update sun", "update earth", "update moon", "update mars"]
        );
        assert_eq!(graph.descendants(sun).unwrap(), [sun, earth, moon, mars]);
    }

    #[test]
    fn draw_before_update_uses_identity() {
        let log = new_log();
        let mut graph = SceneGraph::new();
        let node = graph.create_node("probe", Probe::boxed("probe", &log));
        graph.local_transform_mut(node).unwrap().translate(1.0, 1.0, 1.0);

        let mut queue = RenderQueue::new();
        graph.draw(node, &mut queue).unwrap();

        assert_eq!(queue.calls()[0].model, Mat4::IDENTITY);
    }

    #[test]
    fn empty_node_draw_is_a_no_op() {
        let mut graph = SceneGraph::new();
        let node = graph.create_node("empty", None);
        update(&mut graph, node);

        let mut queue = RenderQueue::new();
        graph.draw(node, &mut queue).unwrap();

        assert!(queue.is_empty());
    }

    #[test]
    fn add_child_rejects_second_parent() {
        let mut graph = SceneGraph::new();
        let a = graph.create_node("a", None);
        let b = graph.create_node("b", None);
        let child = graph.create_node("child", None);
        graph.add_child(a, child).unwrap();

        assert_eq!(
            graph.add_child(b, child),
            Err(SceneGraphError::AlreadyParented { child, parent: a })
        );
        assert_eq!(graph.children(b).unwrap(), &[] as &[NodeId]);
    }

    #[test]
    fn add_child_rejects_cycles() {
        let mut graph = SceneGraph::new();
        let a = graph.create_node("a", None);
        let b = graph.create_node("b", None);
        let c = graph.create_node("c", None);
        graph.add_child(a, b).unwrap();
        graph.add_child(b, c).unwrap();

        assert_eq!(
            graph.add_child(a, a),
            Err(SceneGraphError::CycleDetected { child: a, parent: a })
        );
        assert_eq!(
            graph.add_child(c, a),
            Err(SceneGraphError::CycleDetected { child: a, parent: c })
        );
    }

    #[test]
    fn detach_then_reattach() {
        let mut graph = SceneGraph::new();
        let a = graph.create_node("a", None);
        let b = graph.create_node("b", None);
        let child = graph.create_node("child", None);
        graph.add_child(a, child).unwrap();

        graph.detach(child).unwrap();
        assert_eq!(graph.parent(child).unwrap(), None);
        assert!(graph.children(a).unwrap().is_empty());

        graph.add_child(b, child).unwrap();
        assert_eq!(graph.parent(child).unwrap(), Some(b));

        // Detaching a root does nothing.
        graph.detach(a).unwrap();
        assert_eq!(graph.parent(a).unwrap(), None);
    }

    #[test]
    fn destroy_drops_each_payload_once() {
        let log = new_log();
        let mut graph = SceneGraph::new();
        let root = graph.create_node("root", Probe::boxed("root", &log));
        let earth = graph.create_node("earth", Probe::boxed("earth", &log));
        let moon = graph.create_node("moon", Probe::boxed("moon", &log));
        let moon2 = graph.create_node("moon2", Probe::boxed("moon2", &log));
        graph.add_child(root, earth).unwrap();
        graph.add_child(earth, moon).unwrap();
        graph.add_child(earth, moon2).unwrap();

        assert_eq!(graph.destroy(earth), Ok(3));

        let mut dropped = log.borrow().clone();
        dropped.sort();
        assert_eq!(dropped, ["drop earth", "drop moon", "drop moon2"]);
        assert!(graph.children(root).unwrap().is_empty());
        assert_eq!(graph.len(), 1);

        assert_eq!(
            graph.world_transform(moon),
            Err(SceneGraphError::NodeNotFound(moon))
        );
        assert_eq!(
            graph.add_child(root, moon),
            Err(SceneGraphError::NodeNotFound(moon))
        );
        assert_eq!(graph.destroy(earth), Err(SceneGraphError::NodeNotFound(earth)));

        drop(graph);
        assert_eq!(log.borrow().len(), 4);
        assert_eq!(log.borrow().last().unwrap(), "drop root");
    }

    #[test]
    fn find_by_name_skips_destroyed_nodes() {
        let mut graph = SceneGraph::new();
        let sun = graph.create_node("sun", None);
        assert_eq!(graph.find_by_name("sun"), Some(sun));

        graph.destroy(sun).unwrap();
        assert_eq!(graph.find_by_name("sun"), None);
        assert!(graph.is_empty());
    }

    #[test]
    fn updating_a_subtree_uses_cached_parent_world() {
        let mut graph = SceneGraph::new();
        let root = graph.create_node("root", None);
        let child = graph.create_node("child", None);
        graph.add_child(root, child).unwrap();
        graph.local_transform_mut(root).unwrap().translate(1.0, 0.0, 0.0);
        update(&mut graph, root);

        graph.local_transform_mut(child).unwrap().translate(0.0, 1.0, 0.0);
        update(&mut graph, child);

        assert!(world_origin(&graph, child).abs_diff_eq(Vec3::new(1.0, 1.0, 0.0), 1e-6));
    }
}
