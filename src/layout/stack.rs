//! Stack layout that places every child over the whole content area.

use super::Layout;
use crate::geometry::Size;
use crate::tree::{ComponentId, ComponentTree};

/// Places all visible children at the same position, each filling the
/// container's content rect. Later children paint on top.
///
/// The preferred size is that of the largest child.
#[derive(Debug, Default, Clone, Copy)]
pub struct StackLayout;

impl StackLayout {
    pub fn new() -> Self {
        Self
    }
}

impl Layout for StackLayout {
    fn calc_preferred_size(&self, tree: &ComponentTree, container: ComponentId) -> Size {
        tree.visible_children(container)
            .into_iter()
            .fold(Size::zero(), |acc, child| acc.max(tree.preferred_size(child)))
    }

    fn layout(&mut self, tree: &mut ComponentTree, container: ComponentId) {
        let area = tree.content_rect(container);
        for child in tree.visible_children(container) {
            tree.place(child, area);
        }
    }

    fn is_contained(&self) -> bool {
        true
    }
}
