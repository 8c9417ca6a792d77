pub mod border;
pub mod grid;
pub mod stack;

pub use border::BorderLayout;
pub use grid::GridLayout;
pub use stack::StackLayout;

use crate::error::{Error, Result};
use crate::geometry::Size;
use crate::tree::{ComponentId, ComponentTree};

/// Strategy that measures and arranges a container's children.
///
/// A layout keeps no reference to the tree; it only holds constraint
/// bookkeeping keyed by child id. Invisible children contribute nothing to
/// the preferred size and are skipped during arrangement.
pub trait Layout {
    /// Preferred size of the container's content, excluding its insets.
    fn calc_preferred_size(&self, tree: &ComponentTree, container: ComponentId) -> Size;

    /// Assign bounds to the visible children, inside
    /// [`ComponentTree::content_rect`] of `container`.
    fn layout(&mut self, tree: &mut ComponentTree, container: ComponentId);

    /// Called before `child` is attached at `index`. Rejecting the
    /// constraint aborts the insertion.
    fn component_added(
        &mut self,
        constraint: Option<&str>,
        child: ComponentId,
        index: usize,
    ) -> Result<()> {
        let _ = (child, index);
        match constraint {
            None => Ok(()),
            Some(token) => Err(Error::UnsupportedConstraint(token.to_string())),
        }
    }

    fn component_removed(&mut self, child: ComponentId, index: usize) {
        let _ = (child, index);
    }

    /// Whether arranged children always stay inside the content rect.
    fn is_contained(&self) -> bool {
        false
    }
}

/// Absolute positioning: children keep the bounds they were given.
///
/// The preferred size is the extent of the visible children.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLayout;

impl Layout for NullLayout {
    fn calc_preferred_size(&self, tree: &ComponentTree, container: ComponentId) -> Size {
        let mut extent = Size::zero();
        for child in tree.visible_children(container) {
            let b = tree.bounds(child);
            extent = extent.max(Size::new(b.right(), b.bottom()));
        }
        extent
    }

    fn layout(&mut self, _tree: &mut ComponentTree, _container: ComponentId) {}
}

/// Split `available` into cells proportional to `wanted`.
///
/// Extra space is shared out evenly (remainder to the leading cells); a
/// shortfall scales every cell down so the sum never exceeds `available`.
pub(crate) fn fit_cells(wanted: &[i32], available: i32) -> Vec<i32> {
    let available = available.max(0);
    let total: i32 = wanted.iter().sum();
    if wanted.is_empty() || total == available {
        return wanted.to_vec();
    }
    if total < available {
        let n = wanted.len() as i32;
        let extra = available - total;
        let share = extra / n;
        let remainder = extra % n;
        return wanted
            .iter()
            .enumerate()
            .map(|(i, &w)| w + share + i32::from((i as i32) < remainder))
            .collect();
    }
    wanted
        .iter()
        .map(|&w| ((w as i64 * available as i64) / total as i64) as i32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Widget;
    use crate::geometry::Rect;

    struct Leaf;
    impl Widget for Leaf {}

    #[test]
    fn test_fit_cells_grows_evenly() {
        assert_eq!(fit_cells(&[10, 10, 10], 35), vec![12, 12, 11]);
        assert_eq!(fit_cells(&[10, 20], 30), vec![10, 20]);
    }

    #[test]
    fn test_fit_cells_shrinks_within_available() {
        let cells = fit_cells(&[20, 20, 20], 50);
        assert!(cells.iter().sum::<i32>() <= 50);
        assert_eq!(cells, vec![16, 16, 16]);
        assert_eq!(fit_cells(&[5, 5], -3), vec![0, 0]);
    }

    #[test]
    fn test_null_layout_preferred_is_extent() {
        let mut tree = ComponentTree::new();
        let root = tree.insert_container(Leaf, NullLayout);
        let a = tree.insert(Leaf);
        let b = tree.insert(Leaf);
        tree.add(root, a, None).unwrap();
        tree.add(root, b, None).unwrap();
        tree.place(a, Rect::new(10, 10, 10, 10));
        tree.place(b, Rect::new(0, 25, 5, 5));

        assert_eq!(tree.preferred_size(root), Size::new(20, 30));
    }

    #[test]
    fn test_default_layout_rejects_constraints() {
        let mut tree = ComponentTree::new();
        let root = tree.insert_container(Leaf, NullLayout);
        let a = tree.insert(Leaf);
        assert_eq!(
            tree.add(root, a, Some("center")),
            Err(Error::UnsupportedConstraint("center".into()))
        );
    }
}
