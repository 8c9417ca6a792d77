//! The invalidate/validate contract.
//!
//! Invalidation flows child to root; validation flows root to leaves.
//! Preferred sizes are measured bottom-up and cached while a component is
//! valid; bounds are assigned top-down by each container's layout.

use crate::component::ComponentFlags;
use crate::geometry::{Insets, Rect, Size};
use crate::tree::{ComponentId, ComponentTree};

impl ComponentTree {
    /// Mark `id` and every ancestor invalid. Children are untouched.
    pub fn invalidate(&mut self, id: ComponentId) {
        let mut current = Some(id);
        while let Some(c) = current {
            match self.state_mut(c) {
                Some(state) => state.flags.remove(ComponentFlags::VALID),
                None => return,
            }
            current = self.parent(c);
        }
    }

    /// Lay out `id` and its visible descendants if anything is invalid.
    pub fn validate(&mut self, id: ComponentId) {
        let Some(state) = self.state(id) else {
            return;
        };
        if state.is_valid() || !state.is_visible() {
            return;
        }

        self.with_widget_mut(id, |widget, tree| {
            if let Some(state) = tree.state(id) {
                widget.recalc(state);
            }
        });

        let preferred = self.measure(id);
        if let Some(state) = self.state_mut(id) {
            state.preferred_cache = Some(preferred);
        }

        if self.is_container(id) {
            self.with_layout_mut(id, |layout, tree| layout.layout(tree, id));
            let children = self.children(id).to_vec();
            for child in children {
                if self.state(child).map(|s| s.is_visible()).unwrap_or(false) {
                    self.validate(child);
                }
            }
        }

        if let Some(state) = self.state_mut(id) {
            state.flags.insert(ComponentFlags::VALID);
        }
    }

    /// Preferred size including insets. Zero for invisible components.
    pub fn preferred_size(&self, id: ComponentId) -> Size {
        let Some(state) = self.state(id) else {
            return Size::zero();
        };
        if !state.is_visible() {
            return Size::zero();
        }
        if state.is_valid() {
            if let Some(cached) = state.preferred_cache {
                return cached;
            }
        }
        self.measure(id)
    }

    fn measure(&self, id: ComponentId) -> Size {
        let Some(state) = self.state(id) else {
            return Size::zero();
        };
        if let Some(fixed) = state.fixed_size {
            return fixed;
        }
        let insets = state.insets();
        if self.is_container(id) {
            let content = self
                .with_layout(id, |layout| layout.calc_preferred_size(self, id))
                .unwrap_or_default();
            content.expand(insets)
        } else {
            let pure = self
                .with_widget(id, |widget| widget.calc_preferred_size(state))
                .unwrap_or_default();
            let size = pure.expand(insets);
            match &state.skin {
                Some(skin) => size.max(skin.preferred_size()),
                None => size,
            }
        }
    }

    /// Effective insets of a component.
    pub fn insets(&self, id: ComponentId) -> Insets {
        self.state(id).map(|s| s.insets()).unwrap_or_default()
    }

    /// Content area of a container in its own coordinates.
    pub fn content_rect(&self, id: ComponentId) -> Rect {
        self.state(id).map(|s| s.content_rect()).unwrap_or_default()
    }

    /// Assign bounds from inside a layout pass.
    ///
    /// A size change invalidates only the placed component; its parent is
    /// the one being laid out and will validate it next.
    pub fn place(&mut self, id: ComponentId, bounds: Rect) {
        let bounds = Rect::new(
            bounds.x,
            bounds.y,
            bounds.width.max(0),
            bounds.height.max(0),
        );
        if let Some(state) = self.state_mut(id) {
            if state.bounds.size() != bounds.size() {
                state.flags.remove(ComponentFlags::VALID);
            }
            state.bounds = bounds;
        }
    }

    /// Visible children, in order.
    pub fn visible_children(&self, id: ComponentId) -> Vec<ComponentId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|&c| self.state(c).map(|s| s.is_visible()).unwrap_or(false))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::component::{ComponentState, Widget};
    use crate::layout::{NullLayout, StackLayout};
    use crate::surface::Color;
    use crate::view::{Skin, View};

    struct Fixed(Size);
    impl Widget for Fixed {
        fn calc_preferred_size(&self, _: &ComponentState) -> Size {
            self.0
        }
    }

    struct Counting(Rc<Cell<u32>>);
    impl Widget for Counting {
        fn recalc(&mut self, _: &ComponentState) {
            self.0.set(self.0.get() + 1);
        }
    }

    fn chain(tree: &mut ComponentTree) -> (ComponentId, ComponentId, ComponentId) {
        let root = tree.insert_container(Fixed(Size::zero()), NullLayout);
        let mid = tree.insert_container(Fixed(Size::zero()), NullLayout);
        let leaf = tree.insert(Fixed(Size::new(5, 5)));
        tree.add(root, mid, None).unwrap();
        tree.add(mid, leaf, None).unwrap();
        (root, mid, leaf)
    }

    #[test]
    fn test_invalidate_reaches_every_ancestor() {
        let mut tree = ComponentTree::new();
        let (root, mid, leaf) = chain(&mut tree);
        tree.validate(root);
        assert!(tree.state(root).unwrap().is_valid());
        assert!(tree.state(leaf).unwrap().is_valid());

        tree.invalidate(leaf);
        assert!(!tree.state(leaf).unwrap().is_valid());
        assert!(!tree.state(mid).unwrap().is_valid());
        assert!(!tree.state(root).unwrap().is_valid());

        tree.validate(root);
        for id in tree.subtree(root) {
            assert!(tree.state(id).unwrap().is_valid());
        }
    }

    #[test]
    fn test_invalidate_does_not_touch_children() {
        let mut tree = ComponentTree::new();
        let (root, mid, leaf) = chain(&mut tree);
        tree.validate(root);

        tree.invalidate(mid);
        assert!(tree.state(leaf).unwrap().is_valid());
        assert!(!tree.state(root).unwrap().is_valid());
    }

    #[test]
    fn test_validate_skips_valid_and_hidden() {
        let calls = Rc::new(Cell::new(0));
        let mut tree = ComponentTree::new();
        let root = tree.insert_container(Counting(Rc::clone(&calls)), NullLayout);
        let hidden = tree.insert(Counting(Rc::clone(&calls)));
        tree.add(root, hidden, None).unwrap();
        tree.state_mut(hidden)
            .unwrap()
            .flags
            .remove(ComponentFlags::VISIBLE);

        tree.validate(root);
        assert_eq!(calls.get(), 1);
        assert!(!tree.state(hidden).unwrap().is_valid());

        // Already valid: no recalc.
        tree.validate(root);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_leaf_preferred_size_with_insets_and_skin() {
        let mut tree = ComponentTree::new();
        let leaf = tree.insert(Fixed(Size::new(10, 4)));
        tree.state_mut(leaf).unwrap().insets = Insets::all(1);
        assert_eq!(tree.preferred_size(leaf), Size::new(12, 6));

        let skin = Skin::new().face(View::fill(Color::WHITE).with_preferred_size(Size::new(20, 2)));
        tree.state_mut(leaf).unwrap().skin = Some(skin);
        assert_eq!(tree.preferred_size(leaf), Size::new(20, 6));
    }

    #[test]
    fn test_fixed_size_pins_preferred() {
        let mut tree = ComponentTree::new();
        let leaf = tree.insert(Fixed(Size::new(10, 4)));
        tree.state_mut(leaf).unwrap().fixed_size = Some(Size::new(3, 3));
        assert_eq!(tree.preferred_size(leaf), Size::new(3, 3));
    }

    #[test]
    fn test_container_preferred_size_adds_insets() {
        let mut tree = ComponentTree::new();
        let root = tree.insert_container(Fixed(Size::zero()), StackLayout);
        let a = tree.insert(Fixed(Size::new(10, 20)));
        let b = tree.insert(Fixed(Size::new(30, 5)));
        tree.add(root, a, None).unwrap();
        tree.add(root, b, None).unwrap();
        tree.state_mut(root).unwrap().insets = Insets::new(1, 2, 3, 4);

        assert_eq!(tree.preferred_size(root), Size::new(36, 24));

        tree.state_mut(b).unwrap().flags.remove(ComponentFlags::VISIBLE);
        assert_eq!(tree.preferred_size(root), Size::new(16, 24));
    }

    #[test]
    fn test_empty_container_prefers_zero() {
        let mut tree = ComponentTree::new();
        let root = tree.insert_container(Fixed(Size::zero()), StackLayout);
        assert_eq!(tree.preferred_size(root), Size::zero());
    }

    #[test]
    fn test_place_invalidates_on_resize_only() {
        let mut tree = ComponentTree::new();
        let leaf = tree.insert(Fixed(Size::zero()));
        tree.place(leaf, Rect::new(0, 0, 10, 10));
        tree.validate(leaf);

        tree.place(leaf, Rect::new(5, 5, 10, 10));
        assert!(tree.state(leaf).unwrap().is_valid());

        tree.place(leaf, Rect::new(5, 5, 11, 10));
        assert!(!tree.state(leaf).unwrap().is_valid());
    }
}
