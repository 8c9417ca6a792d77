//! The desktop: bridge between the host and the component tree.
//!
//! A [`Desktop`] owns the tree, the layer stack, the focus and paint
//! managers and the pointer slots. Every mutation goes through it so that
//! focus, pointer ownership and damage stay consistent with the tree.
//!
//! Host entry points ([`Desktop::handle_pointer`], [`Desktop::handle_key`],
//! [`Desktop::resize`], ...) validate the tree and flush damage to the
//! [`Host`] before returning. Application-side mutations only queue damage;
//! call [`Desktop::flush_damage`] (or let the next host event do it).

mod input;
mod windows;

use std::rc::Rc;

use crate::component::{ComponentFlags, ComponentState, Cursor, Widget};
use crate::dispatch::PointerTracker;
use crate::error::{Error, Result};
use crate::event::{ComponentEvent, EventCx, EventResponse, ListenerId, Request};
use crate::focus::{self, FocusChange, FocusManager};
use crate::geometry::{Insets, Rect, Size};
use crate::layer::{Layer, LayerKind, LayerWidget, WinLayer};
use crate::layout::{Layout, NullLayout, StackLayout};
use crate::paint::PaintManager;
use crate::surface::{Color, Surface};
use crate::tree::{ComponentId, ComponentTree};
use crate::view::{ResourceLookup, Skin, ViewManager};

/// What the desktop needs from the host window.
pub trait Host {
    /// Repaint this rect, in desktop coordinates, by calling
    /// [`Desktop::paint`] with a surface clipped to it.
    fn request_repaint(&mut self, rect: Rect);

    fn set_cursor(&mut self, cursor: Cursor) {
        let _ = cursor;
    }
}

/// Host that ignores every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHost;

impl Host for NullHost {
    fn request_repaint(&mut self, _rect: Rect) {}
}

#[derive(Debug, Clone)]
pub struct DesktopConfig {
    pub width: i32,
    pub height: i32,
    /// Fill behind every layer, also used by the base layer.
    pub background: Color,
    pub double_buffered: bool,
    /// Largest buffered paint; `None` means the desktop size.
    pub buffer_limit: Option<Size>,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            background: Color::rgb(0.1, 0.1, 0.15),
            double_buffered: true,
            buffer_limit: None,
        }
    }
}

impl DesktopConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn width(mut self, width: i32) -> Self {
        self.width = width.max(0);
        self
    }

    pub fn height(mut self, height: i32) -> Self {
        self.height = height.max(0);
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    pub fn double_buffered(mut self, enabled: bool) -> Self {
        self.double_buffered = enabled;
        self
    }

    pub fn buffer_limit(mut self, limit: Size) -> Self {
        self.buffer_limit = Some(limit);
        self
    }

    fn effective_buffer_limit(&self) -> Option<Size> {
        self.double_buffered
            .then(|| self.buffer_limit.unwrap_or(Size::new(self.width, self.height)))
    }
}

pub struct Desktop {
    config: DesktopConfig,
    tree: ComponentTree,
    /// Bottom to top. Index 0 is the permanent base layer.
    layers: Vec<Layer>,
    focus: FocusManager,
    paint: PaintManager,
    pointer: PointerTracker,
    host: Box<dyn Host>,
    resources: Box<dyn ResourceLookup>,
    requests: Vec<Request>,
    processing: bool,
    shown: bool,
    cursor: Cursor,
}

impl Desktop {
    /// A desktop with a [`NullHost`].
    pub fn new(config: DesktopConfig) -> Self {
        Self::with_host(config, NullHost)
    }

    /// A desktop with a base layer and one window layer on top of it.
    pub fn with_host(config: DesktopConfig, host: impl Host + 'static) -> Self {
        let mut desktop = Self {
            paint: PaintManager::new(config.effective_buffer_limit()),
            config,
            tree: ComponentTree::new(),
            layers: Vec::new(),
            focus: FocusManager::new(),
            pointer: PointerTracker::new(),
            host: Box::new(host),
            resources: Box::new(ViewManager::new()),
            requests: Vec::new(),
            processing: false,
            shown: true,
            cursor: Cursor::Default,
        };

        let base = desktop.new_layer_root(Box::new(StackLayout));
        if let Some(state) = desktop.tree.state_mut(base) {
            state.flags.insert(ComponentFlags::OPAQUE);
            state.background = Some(desktop.config.background);
        }
        desktop.layers.push(Layer {
            root: base,
            name: "base".to_string(),
            permanent: true,
            kind: LayerKind::Plain,
        });
        desktop.add_layer("windows", true);

        log::debug!(
            "desktop created ({}x{}, double buffered: {})",
            desktop.config.width,
            desktop.config.height,
            desktop.config.double_buffered
        );
        desktop
    }

    pub fn config(&self) -> &DesktopConfig {
        &self.config
    }

    pub fn tree(&self) -> &ComponentTree {
        &self.tree
    }

    /// Desktop rect in desktop coordinates.
    pub fn screen(&self) -> Rect {
        Rect::new(0, 0, self.config.width, self.config.height)
    }

    /// Replace the named skin source used by [`Desktop::apply_skin`].
    pub fn set_resources(&mut self, resources: impl ResourceLookup + 'static) {
        self.resources = Box::new(resources);
    }

    // Layers

    fn new_layer_root(&mut self, layout: Box<dyn Layout>) -> ComponentId {
        let screen = self.screen();
        let root = self.tree.insert_boxed(Box::new(LayerWidget), Some(layout));
        if let Some(state) = self.tree.state_mut(root) {
            state.bounds = screen;
        }
        root
    }

    /// Push a new layer on top of the stack and return its root.
    pub fn add_layer(&mut self, name: &str, windows: bool) -> ComponentId {
        let root = self.new_layer_root(Box::new(NullLayout));
        let kind = if windows {
            LayerKind::Windows(WinLayer::new())
        } else {
            LayerKind::Plain
        };
        self.layers.push(Layer {
            root,
            name: name.to_string(),
            permanent: false,
            kind,
        });
        log::debug!("layer `{}` added as {:?}", name, root);
        root
    }

    /// Remove a non-permanent layer, closing its windows and destroying its
    /// content.
    pub fn remove_layer(&mut self, root: ComponentId) -> Result<()> {
        let index = self.layer_index(root).ok_or(Error::StaleComponent(root))?;
        if self.layers[index].permanent {
            return Err(Error::PermanentLayer(root));
        }
        let open = self.layers[index]
            .windows()
            .map(|w| w.windows())
            .unwrap_or_default();
        for window in open {
            self.close_window(window)?;
        }

        self.damage_component(root);
        self.release_subtree(root);
        let layer = self.layers.remove(index);
        self.tree.destroy(root);
        self.update_move_owner();
        log::debug!("layer `{}` removed", layer.name);
        Ok(())
    }

    pub fn base_layer(&self) -> ComponentId {
        self.layers[0].root
    }

    /// Topmost window layer.
    pub fn window_layer(&self) -> Option<ComponentId> {
        self.layers
            .iter()
            .rev()
            .find(|l| l.windows().is_some())
            .map(|l| l.root)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, root: ComponentId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.root == root)
    }

    pub(crate) fn layer_index(&self, root: ComponentId) -> Option<usize> {
        self.layers.iter().position(|l| l.root == root)
    }

    pub(crate) fn layer_roots(&self) -> Vec<ComponentId> {
        self.layers.iter().map(|l| l.root).collect()
    }

    pub fn is_layer(&self, id: ComponentId) -> bool {
        self.layer_index(id).is_some()
    }

    // Component lifecycle

    pub fn create(&mut self, widget: impl Widget + 'static) -> ComponentId {
        self.tree.insert(widget)
    }

    pub fn create_container(
        &mut self,
        widget: impl Widget + 'static,
        layout: impl Layout + 'static,
    ) -> ComponentId {
        self.tree.insert_container(widget, layout)
    }

    /// Append `child` to `parent` with an optional layout constraint.
    pub fn add(
        &mut self,
        parent: ComponentId,
        child: ComponentId,
        constraint: Option<&str>,
    ) -> Result<()> {
        let index = self.tree.children(parent).len();
        self.insert(parent, index, child, constraint)
    }

    pub fn insert(
        &mut self,
        parent: ComponentId,
        index: usize,
        child: ComponentId,
        constraint: Option<&str>,
    ) -> Result<()> {
        if self.is_layer(child) {
            return Err(Error::LayerNotAttachable(child));
        }
        self.tree.insert_child(parent, index, child, constraint)?;
        self.deliver(child, &ComponentEvent::Added);
        Ok(())
    }

    /// Detach `child` from `parent`. An open window is closed instead.
    ///
    /// Focus and pointer ownership inside the removed subtree are released
    /// before it is detached.
    pub fn remove(&mut self, parent: ComponentId, child: ComponentId) -> Result<usize> {
        if let Some((layer, _)) = self.locate_window(child) {
            if self.layers[layer].root == parent {
                let index = self.tree.index_of(child).unwrap_or_default();
                self.close_window(child)?;
                return Ok(index);
            }
        }
        self.tree.require(child)?;
        if self.tree.parent(child) != Some(parent) {
            return Err(Error::NotAChild { parent, child });
        }
        self.damage_component(child);
        self.release_subtree(child);
        let index = self.tree.remove(parent, child)?;
        self.deliver(child, &ComponentEvent::Removed);
        self.update_move_owner();
        Ok(index)
    }

    /// Remove `id` from wherever it is attached and free its subtree.
    pub fn destroy(&mut self, id: ComponentId) -> Result<()> {
        if self.is_layer(id) {
            return self.remove_layer(id);
        }
        self.tree.require(id)?;
        if let Some(parent) = self.tree.parent(id) {
            self.remove(parent, id)?;
        }
        self.release_subtree(id);
        self.tree.destroy(id);
        Ok(())
    }

    /// Swap a container's layout. Layer layouts belong to the desktop.
    pub fn set_layout(
        &mut self,
        id: ComponentId,
        layout: impl Layout + 'static,
    ) -> Result<Box<dyn Layout>> {
        if self.is_layer(id) {
            return Err(Error::LayerLayout(id));
        }
        self.tree.set_layout(id, Box::new(layout))
    }

    // Component state

    pub fn set_visible(&mut self, id: ComponentId, visible: bool) -> Result<()> {
        self.tree.require(id)?;
        if self.flag(id, ComponentFlags::VISIBLE) == visible {
            return Ok(());
        }
        if visible {
            self.set_flag(id, ComponentFlags::VISIBLE, true);
            self.tree.invalidate(id);
            self.repaint(id);
            self.deliver(id, &ComponentEvent::Shown);
        } else {
            self.damage_component(id);
            self.set_flag(id, ComponentFlags::VISIBLE, false);
            self.tree.invalidate(id);
            self.release_unusable();
            self.deliver(id, &ComponentEvent::Hidden);
        }
        Ok(())
    }

    pub fn set_enabled(&mut self, id: ComponentId, enabled: bool) -> Result<()> {
        self.tree.require(id)?;
        if self.flag(id, ComponentFlags::ENABLED) == enabled {
            return Ok(());
        }
        self.set_flag(id, ComponentFlags::ENABLED, enabled);
        self.repaint(id);
        if enabled {
            self.deliver(id, &ComponentEvent::Enabled);
        } else {
            self.release_unusable();
            self.deliver(id, &ComponentEvent::Disabled);
        }
        Ok(())
    }

    pub fn set_opaque(&mut self, id: ComponentId, opaque: bool) -> Result<()> {
        self.tree.require(id)?;
        self.set_flag(id, ComponentFlags::OPAQUE, opaque);
        self.repaint(id);
        Ok(())
    }

    /// Move and resize. Inside a managed layout the next validation may
    /// override this.
    pub fn set_bounds(&mut self, id: ComponentId, bounds: Rect) -> Result<()> {
        self.tree.require(id)?;
        if self.is_layer(id) {
            return Err(Error::LayerLayout(id));
        }
        let bounds = Rect::new(
            bounds.x,
            bounds.y,
            bounds.width.max(0),
            bounds.height.max(0),
        );
        if self.tree.bounds(id) == bounds {
            return Ok(());
        }
        self.damage_component(id);
        if let Some(state) = self.tree.state_mut(id) {
            state.bounds = bounds;
        }
        self.tree.invalidate(id);
        self.damage_component(id);
        Ok(())
    }

    pub fn set_insets(&mut self, id: ComponentId, insets: Insets) -> Result<()> {
        self.update_state(id, |state| state.insets = insets)
    }

    /// Pin the preferred size; `None` restores measuring.
    pub fn set_fixed_size(&mut self, id: ComponentId, size: Option<Size>) -> Result<()> {
        self.update_state(id, |state| state.fixed_size = size)
    }

    pub fn set_skin(&mut self, id: ComponentId, skin: Option<Skin>) -> Result<()> {
        self.update_state(id, |state| state.skin = skin)
    }

    /// Look up a skin by key and apply it. Returns false for unknown keys.
    pub fn apply_skin(&mut self, id: ComponentId, key: &str) -> Result<bool> {
        self.tree.require(id)?;
        match self.resources.skin(key) {
            Some(skin) => {
                self.set_skin(id, Some(skin))?;
                Ok(true)
            }
            None => {
                log::debug!("no skin registered under `{}`", key);
                Ok(false)
            }
        }
    }

    pub fn set_background(&mut self, id: ComponentId, color: Option<Color>) -> Result<()> {
        self.tree.require(id)?;
        if let Some(state) = self.tree.state_mut(id) {
            state.background = color;
        }
        self.repaint(id);
        Ok(())
    }

    pub fn set_cursor(&mut self, id: ComponentId, cursor: Cursor) -> Result<()> {
        self.tree.require(id)?;
        if let Some(state) = self.tree.state_mut(id) {
            state.cursor = cursor;
        }
        if self.pointer.move_owner == Some(id) {
            self.update_cursor(cursor);
        }
        Ok(())
    }

    fn update_state(
        &mut self,
        id: ComponentId,
        f: impl FnOnce(&mut ComponentState),
    ) -> Result<()> {
        self.tree.require(id)?;
        if let Some(state) = self.tree.state_mut(id) {
            f(state);
        }
        self.tree.invalidate(id);
        self.repaint(id);
        Ok(())
    }

    fn flag(&self, id: ComponentId, flag: ComponentFlags) -> bool {
        self.tree
            .state(id)
            .map(|s| s.flags.contains(flag))
            .unwrap_or(false)
    }

    fn set_flag(&mut self, id: ComponentId, flag: ComponentFlags, on: bool) {
        if let Some(state) = self.tree.state_mut(id) {
            state.flags.set(flag, on);
        }
    }

    // Validation and painting

    pub fn invalidate(&mut self, id: ComponentId) {
        self.tree.invalidate(id);
    }

    /// Validate every invalid layer. A layer that needed layout is damaged
    /// as a whole.
    pub fn validate(&mut self) {
        for root in self.layer_roots() {
            let valid = self.tree.state(root).map(|s| s.is_valid()).unwrap_or(true);
            if !valid {
                self.tree.validate(root);
                self.damage_component(root);
            }
        }
    }

    /// Queue a repaint of the whole component. No-op when it is not showing.
    pub fn repaint(&mut self, id: ComponentId) -> bool {
        if !self.is_attached(id) {
            return false;
        }
        let screen = self.screen();
        self.paint.request(&self.tree, id, None, screen)
    }

    /// Queue a repaint of part of a component, in its local coordinates.
    pub fn repaint_rect(&mut self, id: ComponentId, rect: Rect) -> bool {
        if !self.is_attached(id) {
            return false;
        }
        let screen = self.screen();
        self.paint.request(&self.tree, id, Some(rect), screen)
    }

    pub fn pending_damage(&self) -> Option<Rect> {
        self.paint.pending_damage()
    }

    /// Send the pending damage to the host as one rect.
    pub fn flush_damage(&mut self) -> Option<Rect> {
        let damage = self.paint.take_damage()?;
        if !self.shown {
            return None;
        }
        log::trace!("damage flushed: {:?}", damage);
        self.host.request_repaint(damage);
        Some(damage)
    }

    /// Paint every layer into `surface`, limited to its current clip.
    pub fn paint(&mut self, surface: &mut dyn Surface) {
        self.validate();
        if !self.shown {
            return;
        }
        let clip = surface.clip().intersection(&self.screen());
        surface.set_clip(clip);
        let roots = self.layer_roots();
        self.paint
            .paint_roots(&self.tree, &roots, self.config.background, surface);
    }

    /// Damage the current on-screen area of `id`, even if it is about to
    /// be hidden or removed.
    fn damage_component(&mut self, id: ComponentId) {
        if self.is_attached(id) && self.tree.is_showing(id) {
            let rect = self
                .tree
                .absolute_bounds(id)
                .intersection(&self.screen());
            self.paint.add_damage(rect);
        }
    }

    // Focus

    pub fn focus_owner(&self) -> Option<ComponentId> {
        self.focus.owner()
    }

    pub fn has_focus(&self, id: ComponentId) -> bool {
        self.focus.has_focus(id)
    }

    /// Give `id` the keyboard focus.
    ///
    /// Returns false when `id` is not focusable or sits in a window that may
    /// not be activated. Focusing the owner again is a no-op that succeeds.
    pub fn request_focus(&mut self, id: ComponentId) -> bool {
        if self.focus.has_focus(id) {
            return true;
        }
        if !focus::is_focusable(&self.tree, id) || !self.is_attached(id) {
            return false;
        }
        if let Some((_, window)) = self.window_of(id) {
            if self.active_window() != Some(window) {
                if let Err(err) = self.activate_window_inner(window, false) {
                    log::debug!("focus request for {:?} rejected: {}", id, err);
                    return false;
                }
            }
        }
        self.set_focus(Some(id));
        true
    }

    pub fn clear_focus(&mut self) {
        self.set_focus(None);
    }

    /// Move focus to the next focusable component in the focus root.
    pub fn focus_next(&mut self) -> bool {
        self.traverse_focus(true)
    }

    pub fn focus_previous(&mut self) -> bool {
        self.traverse_focus(false)
    }

    fn traverse_focus(&mut self, forward: bool) -> bool {
        let root = self.focus_root();
        let next = focus::traverse(&self.tree, root, self.focus.owner(), forward);
        match next {
            Some(next) => self.request_focus(next),
            None => false,
        }
    }

    /// Scope of focus traversal: the owner's window, else the active window,
    /// else the base layer.
    pub fn focus_root(&self) -> ComponentId {
        self.focus
            .owner()
            .and_then(|owner| self.window_of(owner))
            .map(|(_, window)| window)
            .or_else(|| self.active_window())
            .unwrap_or_else(|| self.base_layer())
    }

    pub fn add_focus_listener(&mut self, listener: Rc<dyn Fn(&FocusChange)>) -> ListenerId {
        self.focus.add_listener(listener)
    }

    pub fn remove_focus_listener(&mut self, id: ListenerId) -> bool {
        self.focus.remove_listener(id)
    }

    /// Switch the owner, firing focus-lost then focus-gained, each followed
    /// by a repaint, then the focus listeners.
    pub(crate) fn set_focus(&mut self, owner: Option<ComponentId>) {
        let previous = self.focus.set_owner(owner);
        if previous == owner {
            return;
        }
        if let Some(old) = previous {
            self.deliver(old, &ComponentEvent::FocusLost);
            self.repaint(old);
        }
        if let Some(new) = owner {
            self.deliver(new, &ComponentEvent::FocusGained);
            self.repaint(new);
        }
        log::debug!("focus moved from {:?} to {:?}", previous, owner);
        self.focus.notify(FocusChange {
            previous,
            current: owner,
        });
    }

    /// Attached, directly or indirectly, to one of the layers.
    pub fn is_attached(&self, id: ComponentId) -> bool {
        self.tree.contains(id) && self.is_layer(self.tree.root_of(id))
    }

    /// Clear focus and pointer slots held by components inside `root`.
    fn release_subtree(&mut self, root: ComponentId) {
        if let Some(owner) = self.focus.owner() {
            if self.tree.is_ancestor_or_self(root, owner) {
                self.set_focus(None);
            }
        }
        self.exit_move_owner_unless(|tree, id| !tree.is_ancestor_or_self(root, id));
        let tree = &self.tree;
        self.pointer
            .retain(|id| !tree.is_ancestor_or_self(root, id));
        self.focus
            .forget_suspended_unless(|id| !tree.is_ancestor_or_self(root, id));
    }

    /// Clear focus and pointer slots held by hidden or disabled components.
    fn release_unusable(&mut self) {
        if let Some(owner) = self.focus.owner() {
            if !focus::is_focusable(&self.tree, owner) {
                self.set_focus(None);
            }
        }
        self.exit_move_owner_unless(|tree, id| tree.is_showing(id));
        let tree = &self.tree;
        self.pointer.retain(|id| tree.is_showing(id));
        if let Some(press) = self.pointer.press_owner {
            if !tree.is_enabled(press) {
                self.pointer.clear_press();
            }
        }
        self.focus
            .forget_suspended_unless(|id| focus::is_focusable(tree, id));
        self.update_move_owner();
    }

    // Event delivery

    /// Hand `event` to the widget of `id` and apply what it requested.
    pub fn dispatch_event(&mut self, id: ComponentId, event: &ComponentEvent) -> EventResponse {
        self.deliver(id, event)
    }

    pub(crate) fn deliver(&mut self, id: ComponentId, event: &ComponentEvent) -> EventResponse {
        let mut requests = Vec::new();
        let response = self
            .tree
            .with_widget_mut(id, |widget, tree| match tree.state(id) {
                Some(state) => {
                    let mut cx = EventCx::new(id, state, &mut requests);
                    widget.event(&mut cx, event)
                }
                None => EventResponse::Ignored,
            })
            .unwrap_or(EventResponse::Ignored);
        self.requests.append(&mut requests);
        self.process_requests();
        response
    }

    /// Apply queued widget requests. Requests raised while applying are
    /// picked up by the same loop.
    fn process_requests(&mut self) {
        if self.processing {
            return;
        }
        self.processing = true;
        while !self.requests.is_empty() {
            let batch = std::mem::take(&mut self.requests);
            for request in batch {
                match request {
                    Request::Repaint(id, None) => {
                        self.repaint(id);
                    }
                    Request::Repaint(id, Some(rect)) => {
                        self.repaint_rect(id, rect);
                    }
                    Request::Invalidate(id) => self.tree.invalidate(id),
                    Request::Focus(id) => {
                        self.request_focus(id);
                    }
                    Request::ReleaseFocus(id) => {
                        if self.focus.has_focus(id) {
                            self.set_focus(None);
                        }
                    }
                }
            }
        }
        self.processing = false;
    }

    // Host lifecycle

    pub fn is_shown(&self) -> bool {
        self.shown
    }

    /// Show or hide the whole desktop. Damage is dropped while hidden.
    pub fn set_shown(&mut self, shown: bool) {
        if self.shown == shown {
            return;
        }
        self.shown = shown;
        log::debug!("desktop {}", if shown { "shown" } else { "hidden" });
        if shown {
            self.paint.add_damage(self.screen());
            self.validate();
            self.flush_damage();
        } else {
            self.paint.take_damage();
        }
    }

    /// Resize the desktop and every layer.
    pub fn resize(&mut self, width: i32, height: i32) {
        self.config.width = width.max(0);
        self.config.height = height.max(0);
        let screen = self.screen();
        for root in self.layer_roots() {
            if let Some(state) = self.tree.state_mut(root) {
                state.bounds = screen;
            }
            self.tree.invalidate(root);
        }
        self.paint = PaintManager::new(self.config.effective_buffer_limit());
        log::debug!("desktop resized to {}x{}", screen.width, screen.height);
        self.paint.add_damage(screen);
        self.validate();
        self.flush_damage();
    }

    /// The host window gained keyboard focus: restore the remembered owner.
    pub fn focus_in(&mut self) {
        if let Some(id) = self.focus.take_suspended() {
            if focus::is_focusable(&self.tree, id) && self.is_attached(id) {
                self.set_focus(Some(id));
            }
        }
        self.validate();
        self.flush_damage();
    }

    /// The host window lost keyboard focus: the owner loses focus but is
    /// remembered for [`Desktop::focus_in`].
    pub fn focus_out(&mut self) {
        if let Some(owner) = self.focus.suspend() {
            self.deliver(owner, &ComponentEvent::FocusLost);
            self.repaint(owner);
            self.focus.notify(FocusChange {
                previous: Some(owner),
                current: None,
            });
        }
        self.validate();
        self.flush_damage();
    }

    fn update_cursor(&mut self, cursor: Cursor) {
        if self.cursor != cursor {
            self.cursor = cursor;
            self.host.set_cursor(cursor);
        }
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }
}

impl std::fmt::Debug for Desktop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Desktop")
            .field("config", &self.config)
            .field("components", &self.tree.len())
            .field("layers", &self.layers)
            .field("focus", &self.focus.owner())
            .finish()
    }
}
