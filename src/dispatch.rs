//! Pointer hit-testing and pointer ownership slots.

use crate::component::Capabilities;
use crate::event::Buttons;
use crate::geometry::Point;
use crate::tree::{ComponentId, ComponentTree};

/// Deepest visible component of `root`'s subtree under (x, y).
///
/// Coordinates are relative to `root`'s own origin. Children are searched in
/// reverse paint order, so the topmost one wins. A point outside an
/// ancestor's bounds never hits its descendants.
pub fn deepest_at(tree: &ComponentTree, root: ComponentId, x: i32, y: i32) -> Option<ComponentId> {
    let state = tree.state(root)?;
    if !state.is_visible() || !state.local_rect().contains(x, y) {
        return None;
    }
    for &child in tree.children(root).iter().rev() {
        let b = tree.bounds(child);
        if let Some(hit) = deepest_at(tree, child, x - b.x, y - b.y) {
            return Some(hit);
        }
    }
    Some(root)
}

/// Apply input-catcher vetoes: the outermost catching ancestor of `target`
/// that claims its input receives it instead.
pub fn retarget(tree: &ComponentTree, target: ComponentId) -> ComponentId {
    let mut result = target;
    for ancestor in tree.ancestors(target) {
        let catcher = tree
            .state(ancestor)
            .map(|s| s.capabilities().contains(Capabilities::INPUT_CATCHER))
            .unwrap_or(false);
        if catcher
            && tree
                .with_widget(ancestor, |w| w.catches_input(target))
                .unwrap_or(false)
        {
            result = ancestor;
        }
    }
    result
}

/// Hit-test a stack of roots ordered bottom to top.
///
/// Roots themselves are transparent: a point that only hits a root falls
/// through to the roots below it. Returns the root that was hit along with
/// the retargeted component.
pub fn hit_test(
    tree: &ComponentTree,
    roots: &[ComponentId],
    x: i32,
    y: i32,
) -> Option<(ComponentId, ComponentId)> {
    roots.iter().rev().find_map(|&root| {
        deepest_at(tree, root, x, y)
            .filter(|&hit| hit != root)
            .map(|hit| (root, retarget(tree, hit)))
    })
}

/// The three pointer ownership slots of a desktop plus the last position.
#[derive(Debug, Default, Clone)]
pub struct PointerTracker {
    /// Component under the pointer; receives enter and exit.
    pub(crate) move_owner: Option<ComponentId>,
    /// Component that received the last press.
    pub(crate) press_owner: Option<ComponentId>,
    /// Component owning the drag in progress.
    pub(crate) drag_owner: Option<ComponentId>,
    pub(crate) last: Point,
    pub(crate) buttons: Buttons,
    /// Where the tracked press went down; a drag starts once the pointer
    /// leaves it.
    pub(crate) press_point: Point,
    /// Click count of the press being tracked.
    pub(crate) clicks: u32,
    pub(crate) inside: bool,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_owner(&self) -> Option<ComponentId> {
        self.move_owner
    }

    pub fn press_owner(&self) -> Option<ComponentId> {
        self.press_owner
    }

    pub fn drag_owner(&self) -> Option<ComponentId> {
        self.drag_owner
    }

    pub fn position(&self) -> Point {
        self.last
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_owner.is_some()
    }

    /// Forget the press and any drag it started.
    pub(crate) fn clear_press(&mut self) {
        self.press_owner = None;
        self.drag_owner = None;
    }

    /// Clear every slot holding a component for which `keep` is false.
    pub(crate) fn retain(&mut self, keep: impl Fn(ComponentId) -> bool) {
        for slot in [
            &mut self.move_owner,
            &mut self.press_owner,
            &mut self.drag_owner,
        ] {
            if let Some(id) = *slot {
                if !keep(id) {
                    *slot = None;
                }
            }
        }
    }
}
