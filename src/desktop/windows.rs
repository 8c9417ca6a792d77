//! Window management on window layers.
//!
//! A window is a child of a window layer registered with a [`WindowKind`].
//! At most one window on the desktop is active. The most recently opened
//! modal window blocks activation of every window opened before it and of
//! every window on lower layers.

use crate::error::{Error, Result};
use crate::event::{ComponentEvent, ListenerId};
use crate::focus;
use crate::geometry::Rect;
use crate::layer::{WindowEntry, WindowEvent, WindowKind, WindowListener, WindowOptions};
use crate::tree::ComponentId;

use super::Desktop;

impl Desktop {
    /// Add `window` to the window layer `layer` and register it.
    ///
    /// A window without a size gets its preferred size. Every kind except
    /// [`WindowKind::Info`] is activated right away when the modal rule
    /// allows it.
    pub fn open_window(
        &mut self,
        layer: ComponentId,
        window: ComponentId,
        options: WindowOptions,
    ) -> Result<()> {
        let layer_index = self.layer_index(layer).ok_or(Error::NotAWindowLayer(layer))?;
        if self.layers[layer_index].windows().is_none() {
            return Err(Error::NotAWindowLayer(layer));
        }
        self.tree.require(window)?;
        if self.locate_window(window).is_some() {
            return Err(Error::WindowAlreadyOpen(window));
        }
        if self.tree.parent(window).is_some() {
            return Err(Error::AlreadyHasParent(window));
        }

        if self.tree.bounds(window).size().is_empty() {
            let preferred = self.tree.preferred_size(window);
            let location = self.tree.bounds(window).origin();
            if let Some(state) = self.tree.state_mut(window) {
                state.bounds =
                    Rect::new(location.x, location.y, preferred.width, preferred.height);
            }
        }

        let index = self.tree.children(layer).len();
        self.insert(layer, index, window, None)?;

        let kind = options.kind;
        if let Some(windows) = self.layers[layer_index].windows_mut() {
            windows.push(WindowEntry {
                window,
                kind,
                owner: options.owner,
                listener: options.listener,
            });
            windows.notify(window, WindowEvent::Opened);
        }
        log::debug!("window {:?} opened as {:?}", window, kind);

        if kind != WindowKind::Info {
            if let Err(err) = self.activate_window(window) {
                log::debug!("window {:?} opened inactive: {}", window, err);
            }
        }
        Ok(())
    }

    /// Make `window` the active window and bring it to the front.
    ///
    /// Fails for windows that are not open, info windows, and windows
    /// blocked by a modal window.
    pub fn activate_window(&mut self, window: ComponentId) -> Result<()> {
        self.activate_window_inner(window, true)
    }

    pub(crate) fn activate_window_inner(&mut self, window: ComponentId, move_focus: bool) -> Result<()> {
        let (layer_index, _) = self
            .locate_window(window)
            .ok_or(Error::WindowNotOpened(window))?;
        if self.window_kind(window) == Some(WindowKind::Info) {
            return Err(Error::NotActivatable(window));
        }
        if let Some(modal) = self.blocking_modal(window) {
            log::debug!("activation of {:?} blocked by modal {:?}", window, modal);
            return Err(Error::ActivationBlocked { window, modal });
        }
        if self.active_window() == Some(window) {
            return Ok(());
        }

        for index in 0..self.layers.len() {
            let previous = self.layers[index].windows().and_then(|w| w.active());
            if let Some(previous) = previous {
                self.deactivate_inner(index, previous);
            }
        }

        self.tree.raise(window);
        self.repaint(window);
        if let Some(windows) = self.layers[layer_index].windows_mut() {
            windows.set_active(Some(window));
            windows.notify(window, WindowEvent::Activated);
        }
        log::debug!("window {:?} activated", window);

        if move_focus {
            let inside = self
                .focus_owner()
                .map(|owner| self.tree.is_ancestor_or_self(window, owner))
                .unwrap_or(false);
            if !inside {
                let target = focus::find_focusable(&self.tree, window);
                self.set_focus(target);
            }
        }
        Ok(())
    }

    /// Deactivate `window` if it is active. Modal windows only lose
    /// activation by closing.
    pub fn deactivate_window(&mut self, window: ComponentId) -> Result<()> {
        let (layer_index, _) = self
            .locate_window(window)
            .ok_or(Error::WindowNotOpened(window))?;
        if self.window_kind(window) == Some(WindowKind::Modal) {
            return Err(Error::ModalDeactivation(window));
        }
        if self.active_window() == Some(window) {
            self.deactivate_inner(layer_index, window);
        }
        Ok(())
    }

    fn deactivate_inner(&mut self, layer_index: usize, window: ComponentId) {
        if let Some(windows) = self.layers[layer_index].windows_mut() {
            windows.set_active(None);
            windows.notify(window, WindowEvent::Deactivated);
        }
        if let Some(owner) = self.focus_owner() {
            if self.tree.is_ancestor_or_self(window, owner) {
                self.set_focus(None);
            }
        }
        self.repaint(window);
        log::debug!("window {:?} deactivated", window);
    }

    /// Close an open window: focus inside it is cleared and it is
    /// deactivated before it is detached. Activation falls back to the
    /// topmost remaining window that may be activated.
    pub fn close_window(&mut self, window: ComponentId) -> Result<()> {
        let (layer_index, _) = self
            .locate_window(window)
            .ok_or(Error::WindowNotOpened(window))?;
        let layer = self.layers[layer_index].root;

        if let Some(owner) = self.focus_owner() {
            if self.tree.is_ancestor_or_self(window, owner) {
                self.set_focus(None);
            }
        }
        let was_active = self.active_window() == Some(window);
        if was_active {
            self.deactivate_inner(layer_index, window);
        }

        self.damage_component(window);
        self.release_subtree(window);
        let entry = self.layers[layer_index]
            .windows_mut()
            .and_then(|w| w.take(window));
        self.tree.remove(layer, window)?;
        self.deliver(window, &ComponentEvent::Removed);
        self.update_move_owner();
        if let (Some(entry), Some(windows)) = (entry, self.layers[layer_index].windows()) {
            windows.notify_closed(&entry);
        }
        log::debug!("window {:?} closed", window);

        if self.active_window().is_none() {
            if let Some(next) = self.fallback_window() {
                self.activate_window(next)?;
            }
        }
        Ok(())
    }

    /// The active window of the desktop.
    pub fn active_window(&self) -> Option<ComponentId> {
        self.layers
            .iter()
            .rev()
            .find_map(|l| l.windows().and_then(|w| w.active()))
    }

    pub fn window_kind(&self, window: ComponentId) -> Option<WindowKind> {
        self.layers
            .iter()
            .find_map(|l| l.windows().and_then(|w| w.kind(window)))
    }

    /// Component a window was opened for.
    pub fn window_owner(&self, window: ComponentId) -> Option<ComponentId> {
        self.layers
            .iter()
            .find_map(|l| l.windows().and_then(|w| w.owner(window)))
    }

    pub fn is_window_open(&self, window: ComponentId) -> bool {
        self.locate_window(window).is_some()
    }

    pub fn add_window_listener(
        &mut self,
        layer: ComponentId,
        listener: WindowListener,
    ) -> Result<ListenerId> {
        self.layer_index(layer)
            .and_then(|index| self.layers[index].windows_mut())
            .map(|windows| windows.add_listener(listener))
            .ok_or(Error::NotAWindowLayer(layer))
    }

    pub fn remove_window_listener(&mut self, layer: ComponentId, id: ListenerId) -> bool {
        self.layer_index(layer)
            .and_then(|index| self.layers[index].windows_mut())
            .map(|windows| windows.remove_listener(id))
            .unwrap_or(false)
    }

    /// Activate the next (or previous) window of the topmost window layer
    /// that has candidates, in opening order. Info windows and windows
    /// blocked by a modal are skipped.
    pub fn cycle_windows(&mut self, forward: bool) -> bool {
        for index in (0..self.layers.len()).rev() {
            let Some(windows) = self.layers[index].windows() else {
                continue;
            };
            let candidates: Vec<ComponentId> = windows
                .windows()
                .into_iter()
                .filter(|&w| windows.kind(w) != Some(WindowKind::Info))
                .filter(|&w| self.tree.is_showing(w))
                .collect();
            let candidates: Vec<ComponentId> = candidates
                .into_iter()
                .filter(|&w| self.blocking_modal(w).is_none())
                .collect();
            if candidates.is_empty() {
                continue;
            }

            let len = candidates.len();
            let current = windows
                .active()
                .and_then(|a| candidates.iter().position(|&c| c == a));
            let next = match (current, forward) {
                (Some(i), true) => (i + 1) % len,
                (Some(i), false) => (i + len - 1) % len,
                (None, true) => 0,
                (None, false) => len - 1,
            };
            return self.activate_window(candidates[next]).is_ok();
        }
        false
    }

    /// Layer index and stack index of an open window.
    pub(crate) fn locate_window(&self, window: ComponentId) -> Option<(usize, usize)> {
        self.layers.iter().enumerate().find_map(|(index, layer)| {
            layer
                .windows()
                .and_then(|w| w.position(window))
                .map(|position| (index, position))
        })
    }

    /// The open window containing `id` (or `id` itself), with its layer
    /// index.
    pub(crate) fn window_of(&self, id: ComponentId) -> Option<(usize, ComponentId)> {
        let mut current = Some(id);
        while let Some(c) = current {
            if let Some((layer, _)) = self.locate_window(c) {
                return Some((layer, c));
            }
            current = self.tree.parent(c);
        }
        None
    }

    /// Topmost modal window of the desktop, with its layer index.
    pub(crate) fn top_modal(&self) -> Option<(usize, ComponentId)> {
        self.layers
            .iter()
            .enumerate()
            .rev()
            .find_map(|(index, l)| {
                l.windows()
                    .and_then(|w| w.top_modal())
                    .map(|(_, modal)| (index, modal))
            })
    }

    /// Modal window keeping `window` from activation.
    pub(crate) fn blocking_modal(&self, window: ComponentId) -> Option<ComponentId> {
        let (modal_layer, modal) = self.top_modal()?;
        let (layer, _) = self.locate_window(window)?;
        if layer < modal_layer {
            return Some(modal);
        }
        if layer > modal_layer {
            return None;
        }
        self.layers[layer]
            .windows()
            .and_then(|w| w.blocking_modal(window))
    }

    /// Whether pointer input aimed at `target` is swallowed by an open
    /// modal window.
    pub(crate) fn is_blocked_by_modal(&self, target: ComponentId) -> bool {
        let Some((modal_layer, _)) = self.top_modal() else {
            return false;
        };
        let Some(target_layer) = self.layer_index(self.tree.root_of(target)) else {
            return true;
        };
        if target_layer != modal_layer {
            return target_layer < modal_layer;
        }
        match self.window_of(target) {
            Some((_, window)) => self.blocking_modal(window).is_some(),
            None => true,
        }
    }

    /// Topmost open, showing, non-info window in paint order that may be
    /// activated.
    fn fallback_window(&self) -> Option<ComponentId> {
        self.layers.iter().rev().find_map(|layer| {
            let windows = layer.windows()?;
            self.tree
                .children(layer.root)
                .iter()
                .rev()
                .copied()
                .find(|&w| {
                    windows.is_open(w)
                        && windows.kind(w) != Some(WindowKind::Info)
                        && self.tree.is_showing(w)
                        && self.blocking_modal(w).is_none()
                })
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::component::{Capabilities, Widget};
    use crate::desktop::{Desktop, DesktopConfig};
    use crate::error::Error;
    use crate::geometry::{Rect, Size};
    use crate::layer::{WindowEvent, WindowKind, WindowNotice, WindowOptions};
    use crate::layout::StackLayout;

    struct Frame;
    impl Widget for Frame {}

    struct Field;
    impl Widget for Field {
        fn capabilities(&self) -> Capabilities {
            Capabilities::ACCEPTS_FOCUS
        }
    }

    fn desktop() -> Desktop {
        Desktop::new(DesktopConfig::new().width(200).height(200))
    }

    fn window(desktop: &mut Desktop) -> crate::tree::ComponentId {
        let w = desktop.create_container(Frame, StackLayout);
        desktop.set_bounds(w, Rect::new(10, 10, 50, 50)).unwrap();
        w
    }

    #[test]
    fn test_open_activates_and_raises() {
        let mut desktop = desktop();
        let layer = desktop.window_layer().unwrap();
        let a = window(&mut desktop);
        let b = window(&mut desktop);
        desktop.open_window(layer, a, WindowOptions::floating()).unwrap();
        desktop.open_window(layer, b, WindowOptions::floating()).unwrap();
        assert_eq!(desktop.active_window(), Some(b));

        desktop.activate_window(a).unwrap();
        assert_eq!(desktop.active_window(), Some(a));
        assert_eq!(desktop.tree().children(layer), &[b, a]);
    }

    #[test]
    fn test_open_errors() {
        let mut desktop = desktop();
        let layer = desktop.window_layer().unwrap();
        let base = desktop.base_layer();
        let a = window(&mut desktop);

        assert_eq!(
            desktop.open_window(base, a, WindowOptions::floating()),
            Err(Error::NotAWindowLayer(base))
        );
        assert_eq!(desktop.activate_window(a), Err(Error::WindowNotOpened(a)));
        desktop.open_window(layer, a, WindowOptions::floating()).unwrap();
        assert_eq!(
            desktop.open_window(layer, a, WindowOptions::floating()),
            Err(Error::WindowAlreadyOpen(a))
        );

        let attached = window(&mut desktop);
        desktop.add(base, attached, None).unwrap();
        assert_eq!(
            desktop.open_window(layer, attached, WindowOptions::floating()),
            Err(Error::AlreadyHasParent(attached))
        );
    }

    #[test]
    fn test_zero_sized_window_gets_preferred_size() {
        let mut desktop = desktop();
        let layer = desktop.window_layer().unwrap();
        let w = desktop.create_container(Frame, StackLayout);
        desktop.set_fixed_size(w, Some(Size::new(30, 20))).unwrap();
        desktop.open_window(layer, w, WindowOptions::floating()).unwrap();
        assert_eq!(desktop.tree().bounds(w).size(), Size::new(30, 20));
    }

    #[test]
    fn test_info_windows_never_activate() {
        let mut desktop = desktop();
        let layer = desktop.window_layer().unwrap();
        let tip = window(&mut desktop);
        desktop.open_window(layer, tip, WindowOptions::info()).unwrap();
        assert_eq!(desktop.active_window(), None);
        assert_eq!(desktop.activate_window(tip), Err(Error::NotActivatable(tip)));
    }

    #[test]
    fn test_modal_exclusivity_and_fallback() {
        let mut desktop = desktop();
        let layer = desktop.window_layer().unwrap();
        let a = window(&mut desktop);
        let b = window(&mut desktop);
        let modal = window(&mut desktop);
        desktop.open_window(layer, a, WindowOptions::floating()).unwrap();
        desktop.open_window(layer, b, WindowOptions::floating()).unwrap();
        desktop.open_window(layer, modal, WindowOptions::modal()).unwrap();
        assert_eq!(desktop.active_window(), Some(modal));

        assert_eq!(
            desktop.activate_window(a),
            Err(Error::ActivationBlocked { window: a, modal })
        );
        assert_eq!(desktop.deactivate_window(modal), Err(Error::ModalDeactivation(modal)));
        assert_eq!(desktop.active_window(), Some(modal));

        desktop.close_window(modal).unwrap();
        assert_eq!(desktop.active_window(), Some(b));
        desktop.activate_window(a).unwrap();
    }

    #[test]
    fn test_windows_opened_over_a_modal_may_activate() {
        let mut desktop = desktop();
        let layer = desktop.window_layer().unwrap();
        let modal = window(&mut desktop);
        let child = window(&mut desktop);
        desktop.open_window(layer, modal, WindowOptions::modal()).unwrap();
        desktop.open_window(layer, child, WindowOptions::floating()).unwrap();
        assert_eq!(desktop.active_window(), Some(child));
        desktop.activate_window(modal).unwrap();
        desktop.activate_window(child).unwrap();
    }

    #[test]
    fn test_activation_focuses_first_focusable() {
        let mut desktop = desktop();
        let layer = desktop.window_layer().unwrap();
        let a = window(&mut desktop);
        let field = desktop.create(Field);
        desktop.add(a, field, None).unwrap();
        desktop.open_window(layer, a, WindowOptions::floating()).unwrap();
        assert_eq!(desktop.focus_owner(), Some(field));

        desktop.close_window(a).unwrap();
        assert_eq!(desktop.focus_owner(), None);
        assert!(!desktop.is_window_open(a));
        assert_eq!(desktop.tree().parent(a), None);
    }

    #[test]
    fn test_focus_request_activates_window() {
        let mut desktop = desktop();
        let layer = desktop.window_layer().unwrap();
        let a = window(&mut desktop);
        let b = window(&mut desktop);
        let field = desktop.create(Field);
        desktop.add(a, field, None).unwrap();
        desktop.open_window(layer, a, WindowOptions::floating()).unwrap();
        desktop.open_window(layer, b, WindowOptions::floating()).unwrap();
        assert_eq!(desktop.focus_owner(), None);

        assert!(desktop.request_focus(field));
        assert_eq!(desktop.active_window(), Some(a));

        let modal = window(&mut desktop);
        desktop.open_window(layer, modal, WindowOptions::modal()).unwrap();
        assert!(!desktop.request_focus(field));
    }

    #[test]
    fn test_window_listeners_see_lifecycle() {
        let mut desktop = desktop();
        let layer = desktop.window_layer().unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = Rc::clone(&log);
        desktop
            .add_window_listener(layer, Rc::new(move |n: &WindowNotice| l.borrow_mut().push((n.window, n.event))))
            .unwrap();

        let a = window(&mut desktop);
        let b = window(&mut desktop);
        desktop.open_window(layer, a, WindowOptions::floating()).unwrap();
        desktop.open_window(layer, b, WindowOptions::floating()).unwrap();
        desktop.close_window(b).unwrap();

        assert_eq!(
            *log.borrow(),
            vec![
                (a, WindowEvent::Opened),
                (a, WindowEvent::Activated),
                (b, WindowEvent::Opened),
                (a, WindowEvent::Deactivated),
                (b, WindowEvent::Activated),
                (b, WindowEvent::Deactivated),
                (b, WindowEvent::Closed),
                (a, WindowEvent::Activated),
            ]
        );
    }

    #[test]
    fn test_cycle_skips_info_windows() {
        let mut desktop = desktop();
        let layer = desktop.window_layer().unwrap();
        let a = window(&mut desktop);
        let tip = window(&mut desktop);
        let b = window(&mut desktop);
        desktop.open_window(layer, a, WindowOptions::floating()).unwrap();
        desktop.open_window(layer, tip, WindowOptions::info()).unwrap();
        desktop.open_window(layer, b, WindowOptions::floating()).unwrap();
        assert_eq!(desktop.window_kind(tip), Some(WindowKind::Info));

        assert!(desktop.cycle_windows(true));
        assert_eq!(desktop.active_window(), Some(a));
        assert!(desktop.cycle_windows(true));
        assert_eq!(desktop.active_window(), Some(b));
        assert!(desktop.cycle_windows(false));
        assert_eq!(desktop.active_window(), Some(a));
    }

    #[test]
    fn test_remove_of_open_window_closes_it() {
        let mut desktop = desktop();
        let layer = desktop.window_layer().unwrap();
        let a = window(&mut desktop);
        desktop.open_window(layer, a, WindowOptions::floating()).unwrap();
        assert_eq!(desktop.remove(layer, a), Ok(0));
        assert!(!desktop.is_window_open(a));
        assert_eq!(desktop.active_window(), None);
    }
}
