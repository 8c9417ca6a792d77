//! Keyboard focus tracking and traversal.
//!
//! Only one component per desktop owns the focus. The manager only records
//! who that is; the desktop delivers the focus events and repaints.

use std::rc::Rc;

use crate::component::Capabilities;
use crate::event::{ListenerId, Listeners};
use crate::tree::{ComponentId, ComponentTree};

/// Payload of focus listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusChange {
    pub previous: Option<ComponentId>,
    pub current: Option<ComponentId>,
}

#[derive(Debug, Default)]
pub struct FocusManager {
    owner: Option<ComponentId>,
    /// Owner remembered while the host window lacks keyboard focus.
    suspended: Option<ComponentId>,
    listeners: Listeners<FocusChange>,
}

impl FocusManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn owner(&self) -> Option<ComponentId> {
        self.owner
    }

    pub fn has_focus(&self, id: ComponentId) -> bool {
        self.owner == Some(id)
    }

    /// Replace the owner, returning the previous one.
    pub(crate) fn set_owner(&mut self, owner: Option<ComponentId>) -> Option<ComponentId> {
        std::mem::replace(&mut self.owner, owner)
    }

    pub(crate) fn suspend(&mut self) -> Option<ComponentId> {
        let owner = self.owner.take();
        if owner.is_some() {
            self.suspended = owner;
        }
        owner
    }

    pub(crate) fn take_suspended(&mut self) -> Option<ComponentId> {
        self.suspended.take()
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended.is_some()
    }

    /// Drop any reference to components that no longer qualify.
    pub(crate) fn forget_suspended_unless(&mut self, keep: impl Fn(ComponentId) -> bool) {
        if let Some(id) = self.suspended {
            if !keep(id) {
                self.suspended = None;
            }
        }
    }

    pub fn add_listener(&mut self, listener: Rc<dyn Fn(&FocusChange)>) -> ListenerId {
        self.listeners.add(listener)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    pub(crate) fn notify(&self, change: FocusChange) {
        self.listeners.notify(&change);
    }
}

/// Attached to a live tree, showing, effectively enabled and accepting focus.
pub fn is_focusable(tree: &ComponentTree, id: ComponentId) -> bool {
    tree.state(id)
        .map(|s| s.capabilities().contains(Capabilities::ACCEPTS_FOCUS))
        .unwrap_or(false)
        && tree.is_showing(id)
        && tree.is_enabled(id)
}

/// Whether an input-catching ancestor of `id` keeps input meant for it.
pub fn is_caught(tree: &ComponentTree, id: ComponentId) -> bool {
    tree.ancestors(id).into_iter().any(|ancestor| {
        let catcher = tree
            .state(ancestor)
            .map(|s| s.capabilities().contains(Capabilities::INPUT_CATCHER))
            .unwrap_or(false);
        catcher && tree.with_widget(ancestor, |w| w.catches_input(id)).unwrap_or(false)
    })
}

/// Focusable components under `root` in traversal (pre-order) order.
///
/// Hidden or disabled subtrees are skipped whole; components an input
/// catcher keeps input from are skipped individually.
pub fn focus_order(tree: &ComponentTree, root: ComponentId) -> Vec<ComponentId> {
    let mut out = Vec::new();
    if !tree.is_showing(root) || !tree.is_enabled(root) {
        return out;
    }
    let mut stack = vec![root];
    while let Some(current) = stack.pop() {
        let usable = tree
            .state(current)
            .map(|s| s.is_visible() && s.is_self_enabled())
            .unwrap_or(false);
        if !usable {
            continue;
        }
        let accepts = tree
            .state(current)
            .map(|s| s.capabilities().contains(Capabilities::ACCEPTS_FOCUS))
            .unwrap_or(false);
        if accepts && !is_caught(tree, current) {
            out.push(current);
        }
        for &child in tree.children(current).iter().rev() {
            stack.push(child);
        }
    }
    out
}

/// First focusable component in a pre-order walk from `start`.
pub fn find_focusable(tree: &ComponentTree, start: ComponentId) -> Option<ComponentId> {
    focus_order(tree, start).into_iter().next()
}

/// The focusable component after (or before) `current` within `root`,
/// wrapping around. Without a usable `current` the walk starts at the
/// first (or last) candidate.
pub fn traverse(
    tree: &ComponentTree,
    root: ComponentId,
    current: Option<ComponentId>,
    forward: bool,
) -> Option<ComponentId> {
    let order = focus_order(tree, root);
    if order.is_empty() {
        return None;
    }
    let len = order.len();
    let position = current.and_then(|c| order.iter().position(|&o| o == c));
    let index = match (position, forward) {
        (Some(i), true) => (i + 1) % len,
        (Some(i), false) => (i + len - 1) % len,
        (None, true) => 0,
        (None, false) => len - 1,
    };
    Some(order[index])
}
