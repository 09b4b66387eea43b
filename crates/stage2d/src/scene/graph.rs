//! Arena-backed scene tree with deferred structural edits

use log::warn;
use slotmap::SlotMap;

use crate::foundation::math::Vec2;
use crate::scene::node::{Node, Renderer};
use crate::scene::{NodeKey, SceneError, Viewport};

/// Context handed to behavior update hooks.
///
/// Structural calls made through `graph` while the traversal is running
/// are queued and applied at the end of the frame, so a behavior may
/// remove its own node (or add siblings) without corrupting the walk.
pub struct UpdateContext<'a> {
    /// Frame delta time in seconds
    pub dt: f32,
    /// Key of the node owning the behavior being updated
    pub key: NodeKey,
    /// The graph, for node access and (deferred) structural edits
    pub graph: &'a mut SceneGraph,
}

enum PendingOp {
    Add {
        parent: NodeKey,
        child: NodeKey,
        index: Option<usize>,
    },
    Remove {
        parent: NodeKey,
        child: NodeKey,
    },
    Despawn {
        key: NodeKey,
    },
}

/// The scene tree. Owns every node in a slotmap arena; the tree
/// structure is expressed through parent/child key links.
pub struct SceneGraph {
    nodes: SlotMap<NodeKey, Node>,
    root: NodeKey,
    traversing: bool,
    pending: Vec<PendingOp>,
    next_seq: u64,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Create a graph holding only the root grouping node
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::group().with_name("root"));
        Self {
            nodes,
            root,
            traversing: false,
            pending: Vec::new(),
            next_seq: 1,
        }
    }

    /// Key of the root node
    pub fn root(&self) -> NodeKey {
        self.root
    }

    /// Put a node into the arena, unattached. Attach it with
    /// `add_child`.
    pub fn spawn(&mut self, node: Node) -> NodeKey {
        self.nodes.insert(node)
    }

    /// True when the key refers to a live node
    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    /// Borrow a node
    pub fn node(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    /// Mutably borrow a node
    pub fn node_mut(&mut self, key: NodeKey) -> Option<&mut Node> {
        self.nodes.get_mut(key)
    }

    /// Number of live nodes, including the root
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Iterate over all live nodes
    pub fn iter(&self) -> impl Iterator<Item = (NodeKey, &Node)> {
        self.nodes.iter()
    }

    /// Absolute position of a node: its position composed with every
    /// ancestor's up to the root, or up to the nearest floating
    /// ancestor (floating positions are already screen-absolute).
    pub fn absolute_pos(&self, key: NodeKey) -> Vec2 {
        let mut pos = Vec2::zeros();
        let mut current = Some(key);
        while let Some(k) = current {
            let Some(node) = self.nodes.get(k) else { break };
            pos += node.pos;
            if node.floating {
                break;
            }
            current = node.parent;
        }
        pos
    }

    /// Attach a child to a parent, keeping siblings ordered by
    /// (z, insertion sequence). Reparents if the child is already
    /// attached elsewhere. Deferred while a traversal is running.
    pub fn add_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<(), SceneError> {
        self.check_node(parent)?;
        self.check_node(child)?;
        if self.traversing {
            self.pending.push(PendingOp::Add {
                parent,
                child,
                index: None,
            });
            return Ok(());
        }
        self.attach(parent, child, None)
    }

    /// Attach a child at an explicit index, overriding z ordering until
    /// the next `sort`
    pub fn add_child_at(
        &mut self,
        parent: NodeKey,
        child: NodeKey,
        index: usize,
    ) -> Result<(), SceneError> {
        self.check_node(parent)?;
        self.check_node(child)?;
        let len = self.child_count(parent);
        if index > len {
            return Err(SceneError::IndexOutOfRange { index, len });
        }
        if self.traversing {
            self.pending.push(PendingOp::Add {
                parent,
                child,
                index: Some(index),
            });
            return Ok(());
        }
        self.attach(parent, child, Some(index))
    }

    /// Detach a child from its parent. The child (and its whole
    /// subtree) stays alive in the arena and can be re-attached; use
    /// `despawn` to destroy it. Deferred while a traversal is running.
    pub fn remove_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<(), SceneError> {
        self.check_node(parent)?;
        self.check_node(child)?;
        if self.node(child).and_then(Node::parent) != Some(parent) {
            return Err(SceneError::NotAChild { child, parent });
        }
        if self.traversing {
            self.pending.push(PendingOp::Remove { parent, child });
            return Ok(());
        }
        self.detach(parent, child);
        Ok(())
    }

    /// Destroy a node and its entire subtree. Deferred while a
    /// traversal is running.
    pub fn despawn(&mut self, key: NodeKey) -> Result<(), SceneError> {
        self.check_node(key)?;
        if key == self.root {
            warn!("ignoring despawn of the root node");
            return Ok(());
        }
        if self.traversing {
            self.pending.push(PendingOp::Despawn { key });
            return Ok(());
        }
        self.despawn_now(key);
        Ok(())
    }

    /// Child key at the given position
    pub fn get_child_at(&self, parent: NodeKey, index: usize) -> Result<NodeKey, SceneError> {
        let node = self.nodes.get(parent).ok_or(SceneError::NoSuchNode(parent))?;
        node.children
            .get(index)
            .copied()
            .ok_or(SceneError::IndexOutOfRange {
                index,
                len: node.children.len(),
            })
    }

    /// Position of a child in its parent's list, if it is one
    pub fn child_index(&self, parent: NodeKey, child: NodeKey) -> Option<usize> {
        self.nodes
            .get(parent)?
            .children
            .iter()
            .position(|k| *k == child)
    }

    /// True when `child` is a direct child of `parent`
    pub fn has_child(&self, parent: NodeKey, child: NodeKey) -> bool {
        self.child_index(parent, child).is_some()
    }

    /// Number of direct children
    pub fn child_count(&self, parent: NodeKey) -> usize {
        self.nodes.get(parent).map_or(0, |n| n.children.len())
    }

    /// Swap a node with the sibling drawn just above it
    pub fn move_up(&mut self, child: NodeKey) -> Result<(), SceneError> {
        let parent = self.parent_of(child)?;
        if let Some(index) = self.child_index(parent, child) {
            if index + 1 < self.child_count(parent) {
                self.swap_at(parent, index, index + 1);
            }
        }
        Ok(())
    }

    /// Swap a node with the sibling drawn just below it
    pub fn move_down(&mut self, child: NodeKey) -> Result<(), SceneError> {
        let parent = self.parent_of(child)?;
        if let Some(index) = self.child_index(parent, child) {
            if index > 0 {
                self.swap_at(parent, index, index - 1);
            }
        }
        Ok(())
    }

    /// Swap the draw order of two children of the same parent
    pub fn swap_children(
        &mut self,
        parent: NodeKey,
        a: NodeKey,
        b: NodeKey,
    ) -> Result<(), SceneError> {
        let ia = self
            .child_index(parent, a)
            .ok_or(SceneError::NotAChild { child: a, parent })?;
        let ib = self
            .child_index(parent, b)
            .ok_or(SceneError::NotAChild { child: b, parent })?;
        self.swap_at(parent, ia, ib);
        Ok(())
    }

    /// Re-sort a parent's children by (z, insertion sequence). Stable
    /// and idempotent: equal-z siblings keep their insertion order
    /// across repeated sorts.
    pub fn sort(&mut self, parent: NodeKey) {
        let Some(node) = self.nodes.get(parent) else { return };
        let mut children = node.children.clone();
        children.sort_by(|a, b| {
            let (za, sa) = self.sort_key(*a);
            let (zb, sb) = self.sort_key(*b);
            za.partial_cmp(&zb)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(sa.cmp(&sb))
        });
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children = children;
        }
    }

    /// Walk the tree once: recompute visibility against the viewport,
    /// run behaviors (topmost siblings first), and OR together their
    /// dirty flags. Nodes outside the viewport are skipped along with
    /// their subtrees unless floating, grouping or `always_update`.
    /// Structural edits queued during the walk are applied before
    /// returning.
    pub fn update(&mut self, dt: f32, viewport: &Viewport) -> bool {
        self.traversing = true;
        let dirty = self.update_subtree(self.root, dt, viewport);
        self.traversing = false;
        self.flush_pending();
        dirty
    }

    /// Draw the tree in z order, bottom first. Each node's subtree is
    /// wrapped in a save/translate/restore establishing its local
    /// frame, so behaviors draw in local coordinates; the pair is
    /// balanced on every path. Floating subtrees get an extra camera
    /// offset so their coordinates land in screen space.
    pub fn draw(&self, renderer: &mut dyn Renderer, viewport: &Viewport) {
        self.draw_subtree(self.root, renderer, viewport);
    }

    fn update_subtree(&mut self, key: NodeKey, dt: f32, viewport: &Viewport) -> bool {
        let abs = self.absolute_pos(key);
        let Some(node) = self.nodes.get_mut(key) else {
            return false;
        };
        let visible =
            node.floating || node.is_group() || viewport.is_visible(&node.bounds_at(abs));
        node.in_viewport = visible;
        if !visible && !node.always_update {
            return false;
        }
        let mut dirty = false;
        if let Some(mut behavior) = node.behavior.take() {
            let mut ctx = UpdateContext {
                dt,
                key,
                graph: self,
            };
            dirty |= behavior.update(&mut ctx);
            if let Some(node) = self.nodes.get_mut(key) {
                node.behavior = Some(behavior);
            }
        }
        // snapshot so mid-walk edits cannot skip or repeat a sibling
        let children = self
            .nodes
            .get(key)
            .map(|n| n.children.clone())
            .unwrap_or_default();
        for child in children.iter().rev() {
            dirty |= self.update_subtree(*child, dt, viewport);
        }
        dirty
    }

    fn draw_subtree(&self, key: NodeKey, renderer: &mut dyn Renderer, viewport: &Viewport) {
        let Some(node) = self.nodes.get(key) else {
            return;
        };
        renderer.save();
        if node.floating {
            // floating nodes ignore the camera: re-apply its offset so
            // their coordinates land in screen space
            renderer.translate(viewport.pos().x, viewport.pos().y);
        }
        renderer.translate(node.pos.x, node.pos.y);
        if node.in_viewport || node.floating {
            if let Some(behavior) = &node.behavior {
                behavior.draw(renderer, viewport);
            }
        }
        for child in &node.children {
            self.draw_subtree(*child, renderer, viewport);
        }
        renderer.restore();
    }

    fn check_node(&self, key: NodeKey) -> Result<(), SceneError> {
        if self.nodes.contains_key(key) {
            Ok(())
        } else {
            Err(SceneError::NoSuchNode(key))
        }
    }

    fn parent_of(&self, child: NodeKey) -> Result<NodeKey, SceneError> {
        self.nodes
            .get(child)
            .ok_or(SceneError::NoSuchNode(child))?
            .parent
            .ok_or(SceneError::NotAChild {
                child,
                parent: self.root,
            })
    }

    fn sort_key(&self, key: NodeKey) -> (f32, u64) {
        self.nodes.get(key).map_or((0.0, 0), |n| (n.z, n.seq))
    }

    fn attach(
        &mut self,
        parent: NodeKey,
        child: NodeKey,
        index: Option<usize>,
    ) -> Result<(), SceneError> {
        self.check_node(parent)?;
        self.check_node(child)?;
        if let Some(old_parent) = self.nodes[child].parent {
            self.detach(old_parent, child);
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        let child_z = {
            let node = &mut self.nodes[child];
            node.parent = Some(parent);
            node.seq = seq;
            node.z
        };
        match index {
            Some(i) => {
                let len = self.nodes[parent].children.len();
                self.nodes[parent].children.insert(i.min(len), child);
            }
            None => {
                // new nodes carry the highest sequence, so they slot in
                // after every sibling with the same or lower z
                let insert_at = self.nodes[parent]
                    .children
                    .iter()
                    .position(|k| self.nodes.get(*k).map_or(0.0, |n| n.z) > child_z)
                    .unwrap_or(self.nodes[parent].children.len());
                self.nodes[parent].children.insert(insert_at, child);
            }
        }
        Ok(())
    }

    fn detach(&mut self, parent: NodeKey, child: NodeKey) {
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.retain(|k| *k != child);
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = None;
        }
    }

    fn despawn_now(&mut self, key: NodeKey) {
        if let Some(parent) = self.nodes.get(key).and_then(Node::parent) {
            self.detach(parent, key);
        }
        let mut stack = vec![key];
        while let Some(k) = stack.pop() {
            if let Some(node) = self.nodes.remove(k) {
                stack.extend(node.children);
            }
        }
    }

    fn flush_pending(&mut self) {
        let ops = std::mem::take(&mut self.pending);
        for op in ops {
            let result = match op {
                PendingOp::Add {
                    parent,
                    child,
                    index,
                } => self.attach(parent, child, index),
                PendingOp::Remove { parent, child } => {
                    if self.node(child).and_then(Node::parent) == Some(parent) {
                        self.detach(parent, child);
                    }
                    Ok(())
                }
                PendingOp::Despawn { key } => {
                    if self.nodes.contains_key(key) {
                        self.despawn_now(key);
                    }
                    Ok(())
                }
            };
            if let Err(err) = result {
                warn!("deferred scene edit dropped: {err}");
            }
        }
    }

    fn swap_at(&mut self, parent: NodeKey, ia: usize, ib: usize) {
        let (a, b) = {
            let children = &self.nodes[parent].children;
            (children[ia], children[ib])
        };
        // swap ordering keys too so a later sort() preserves the swap
        let (za, sa) = self.sort_key(a);
        let (zb, sb) = self.sort_key(b);
        if let Some(node) = self.nodes.get_mut(a) {
            node.z = zb;
            node.seq = sb;
        }
        if let Some(node) = self.nodes.get_mut(b) {
            node.z = za;
            node.seq = sa;
        }
        self.nodes[parent].children.swap(ia, ib);
    }
}
