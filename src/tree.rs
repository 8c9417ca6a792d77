//! Arena-based component storage.
//!
//! Components live in a dense vector addressed through a sparse map of
//! generational indices. The parent relation is a plain [`ComponentId`]
//! field: the arena owns every node, a parent only lists its children.
//!
//! ## Key Features
//!
//! - **Generational Indices**: a `ComponentId` carries index + generation, so
//!   a stale id never resolves to a component created later in the same slot.
//! - **Swap-Remove**: destroying a component is O(1) per node and leaves no
//!   holes in dense storage.
//! - **Extraction**: widgets and layouts are moved out of their node while a
//!   hook runs, so the hook can receive the tree mutably.

use crate::component::{ComponentState, Widget};
use crate::error::{Error, Result};
use crate::geometry::{Point, Rect};
use crate::layout::Layout;

/// Stable handle to a component in a [`ComponentTree`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ComponentId {
    index: u32,
    generation: u32,
}

impl ComponentId {
    fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Combines generation (high bits) with index (low bits).
    pub fn as_u64(self) -> u64 {
        ((self.generation as u64) << 32) | (self.index as u64)
    }
}

struct SparseEntry {
    dense_index: usize,
    generation: u32,
}

/// Stands in for a widget while it is extracted from its node.
struct Detached;

impl Widget for Detached {}

struct Node {
    widget: Box<dyn Widget>,
    state: ComponentState,
    parent: Option<ComponentId>,
    children: Vec<ComponentId>,
    /// `Some` for containers. Taken out temporarily while a layout hook runs.
    layout: Option<Box<dyn Layout>>,
    is_container: bool,
    sparse_index: u32,
}

/// Owner of every component of a desktop.
pub struct ComponentTree {
    dense: Vec<Node>,
    sparse: Vec<Option<SparseEntry>>,
    free_indices: Vec<u32>,
    /// Last generation handed out per sparse slot, kept across removals.
    generations: Vec<u32>,
}

impl ComponentTree {
    pub fn new() -> Self {
        Self {
            dense: Vec::new(),
            sparse: Vec::new(),
            free_indices: Vec::new(),
            generations: Vec::new(),
        }
    }

    /// Insert a detached leaf component.
    pub fn insert(&mut self, widget: impl Widget + 'static) -> ComponentId {
        self.insert_node(Box::new(widget), None)
    }

    /// Insert a detached container governed by `layout`.
    pub fn insert_container(
        &mut self,
        widget: impl Widget + 'static,
        layout: impl Layout + 'static,
    ) -> ComponentId {
        self.insert_node(Box::new(widget), Some(Box::new(layout)))
    }

    pub(crate) fn insert_boxed(
        &mut self,
        widget: Box<dyn Widget>,
        layout: Option<Box<dyn Layout>>,
    ) -> ComponentId {
        self.insert_node(widget, layout)
    }

    fn insert_node(
        &mut self,
        widget: Box<dyn Widget>,
        layout: Option<Box<dyn Layout>>,
    ) -> ComponentId {
        let (sparse_index, generation) = if let Some(idx) = self.free_indices.pop() {
            let generation = self.generations[idx as usize].wrapping_add(1);
            self.generations[idx as usize] = generation;
            (idx, generation)
        } else {
            let idx = self.sparse.len() as u32;
            self.sparse.push(None);
            self.generations.push(0);
            (idx, 0)
        };

        let dense_index = self.dense.len();
        let state = ComponentState::new(widget.capabilities());
        let is_container = layout.is_some();
        self.dense.push(Node {
            widget,
            state,
            parent: None,
            children: Vec::new(),
            layout,
            is_container,
            sparse_index,
        });
        self.sparse[sparse_index as usize] = Some(SparseEntry {
            dense_index,
            generation,
        });

        ComponentId::new(sparse_index, generation)
    }

    fn dense_index(&self, id: ComponentId) -> Option<usize> {
        self.sparse
            .get(id.index as usize)
            .and_then(|e| e.as_ref())
            .filter(|e| e.generation == id.generation)
            .map(|e| e.dense_index)
    }

    fn node(&self, id: ComponentId) -> Option<&Node> {
        self.dense_index(id).map(|idx| &self.dense[idx])
    }

    fn node_mut(&mut self, id: ComponentId) -> Option<&mut Node> {
        self.dense_index(id).map(move |idx| &mut self.dense[idx])
    }

    pub(crate) fn require(&self, id: ComponentId) -> Result<()> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(Error::StaleComponent(id))
        }
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.dense_index(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.dense.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    pub fn state(&self, id: ComponentId) -> Option<&ComponentState> {
        self.node(id).map(|n| &n.state)
    }

    pub(crate) fn state_mut(&mut self, id: ComponentId) -> Option<&mut ComponentState> {
        self.node_mut(id).map(|n| &mut n.state)
    }

    pub fn parent(&self, id: ComponentId) -> Option<ComponentId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: ComponentId) -> &[ComponentId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn is_container(&self, id: ComponentId) -> bool {
        self.node(id).map(|n| n.is_container).unwrap_or(false)
    }

    /// Bounds relative to the parent; empty for unknown ids.
    pub fn bounds(&self, id: ComponentId) -> Rect {
        self.state(id).map(|s| s.bounds).unwrap_or_default()
    }

    /// Walk up the parent chain to the detached root.
    pub fn root_of(&self, id: ComponentId) -> ComponentId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    /// True when `ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: ComponentId, id: ComponentId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self.parent(c);
        }
        false
    }

    /// Ancestors of `id`, nearest first, excluding `id`.
    pub fn ancestors(&self, id: ComponentId) -> Vec<ComponentId> {
        let mut out = Vec::new();
        let mut current = self.parent(id);
        while let Some(c) = current {
            out.push(c);
            current = self.parent(c);
        }
        out
    }

    /// Offset of the component's origin from its root's origin.
    pub fn absolute_origin(&self, id: ComponentId) -> Point {
        let mut point = Point::default();
        let mut current = Some(id);
        while let Some(c) = current {
            // The root's own location is the desktop origin.
            if self.parent(c).is_none() {
                break;
            }
            let b = self.bounds(c);
            point.x += b.x;
            point.y += b.y;
            current = self.parent(c);
        }
        point
    }

    /// Bounds in root coordinates.
    pub fn absolute_bounds(&self, id: ComponentId) -> Rect {
        let origin = self.absolute_origin(id);
        let size = self.bounds(id).size();
        Rect::new(origin.x, origin.y, size.width, size.height)
    }

    /// Visible here and in every ancestor.
    pub fn is_showing(&self, id: ComponentId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            match self.state(c) {
                Some(state) if state.is_visible() => current = self.parent(c),
                _ => return false,
            }
        }
        true
    }

    /// Effective enabled state: self-enabled and every ancestor enabled.
    pub fn is_enabled(&self, id: ComponentId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            match self.state(c) {
                Some(state) if state.is_self_enabled() => current = self.parent(c),
                _ => return false,
            }
        }
        true
    }

    /// Pre-order list of `id` and its descendants.
    pub fn subtree(&self, id: ComponentId) -> Vec<ComponentId> {
        let mut out = Vec::new();
        if !self.contains(id) {
            return out;
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            for &child in self.children(current).iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    /// Access a widget via a closure.
    pub fn with_widget<R>(&self, id: ComponentId, f: impl FnOnce(&dyn Widget) -> R) -> Option<R> {
        self.node(id).map(|n| f(&*n.widget))
    }

    /// Mutate a widget via a closure that also receives the tree.
    ///
    /// The widget is extracted from its node while the closure runs.
    pub fn with_widget_mut<R>(
        &mut self,
        id: ComponentId,
        f: impl FnOnce(&mut dyn Widget, &mut ComponentTree) -> R,
    ) -> Option<R> {
        let dense_index = self.dense_index(id)?;
        let mut widget = std::mem::replace(&mut self.dense[dense_index].widget, Box::new(Detached));

        let result = f(&mut *widget, self);

        if let Some(idx) = self.dense_index(id) {
            self.dense[idx].widget = widget;
        }
        Some(result)
    }

    /// Shared access to a container's layout.
    pub fn with_layout<R>(&self, id: ComponentId, f: impl FnOnce(&dyn Layout) -> R) -> Option<R> {
        self.node(id)
            .and_then(|n| n.layout.as_deref())
            .map(f)
    }

    /// Run a closure with a container's layout extracted from its node.
    pub fn with_layout_mut<R>(
        &mut self,
        id: ComponentId,
        f: impl FnOnce(&mut dyn Layout, &mut ComponentTree) -> R,
    ) -> Option<R> {
        let dense_index = self.dense_index(id)?;
        let mut layout = self.dense[dense_index].layout.take()?;

        let result = f(&mut *layout, self);

        if let Some(idx) = self.dense_index(id) {
            self.dense[idx].layout = Some(layout);
        }
        Some(result)
    }

    /// Swap a container's layout, returning the previous one.
    ///
    /// The new layout is told about every existing child, in order, with no
    /// constraint.
    pub fn set_layout(
        &mut self,
        id: ComponentId,
        mut layout: Box<dyn Layout>,
    ) -> Result<Box<dyn Layout>> {
        self.require(id)?;
        if !self.is_container(id) {
            return Err(Error::NotAContainer(id));
        }
        let children = self.children(id).to_vec();
        for (index, &child) in children.iter().enumerate() {
            layout.component_added(None, child, index)?;
        }
        let previous = self
            .node_mut(id)
            .and_then(|n| n.layout.replace(layout))
            .ok_or(Error::NotAContainer(id))?;
        self.invalidate(id);
        Ok(previous)
    }

    pub(crate) fn attach(&mut self, parent: ComponentId, child: ComponentId, index: usize) {
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.node_mut(parent) {
            let index = index.min(node.children.len());
            node.children.insert(index, child);
        }
    }

    pub(crate) fn detach(&mut self, child: ComponentId) -> Option<usize> {
        let parent = self.parent(child)?;
        if let Some(node) = self.node_mut(child) {
            node.parent = None;
        }
        let node = self.node_mut(parent)?;
        let index = node.children.iter().position(|&c| c == child)?;
        node.children.remove(index);
        Some(index)
    }

    /// Move a child to the end of its parent's child list, so it paints last
    /// and is hit-tested first.
    pub(crate) fn raise(&mut self, child: ComponentId) {
        let Some(parent) = self.parent(child) else {
            return;
        };
        if let Some(node) = self.node_mut(parent) {
            if let Some(index) = node.children.iter().position(|&c| c == child) {
                let id = node.children.remove(index);
                node.children.push(id);
            }
        }
    }

    /// Free a component and its whole subtree. Returns the freed ids.
    ///
    /// The component is detached from its parent first, without notifying
    /// the parent's layout; use [`ComponentTree::remove`] for that.
    pub fn destroy(&mut self, id: ComponentId) -> Vec<ComponentId> {
        let ids = self.subtree(id);
        self.detach(id);
        for &victim in &ids {
            self.free(victim);
        }
        ids
    }

    fn free(&mut self, id: ComponentId) {
        let Some(dense_index) = self.dense_index(id) else {
            return;
        };
        let last = self.dense.len() - 1;
        let removed = self.dense.swap_remove(dense_index);

        if dense_index != last {
            let moved = self.dense[dense_index].sparse_index;
            if let Some(ref mut entry) = self.sparse[moved as usize] {
                entry.dense_index = dense_index;
            }
        }

        self.sparse[id.index as usize] = None;
        self.free_indices.push(id.index);
        drop(removed);
    }
}

impl Default for ComponentTree {
    fn default() -> Self {
        Self::new()
    }
}
