//! The component contract: per-node state owned by the tree and the
//! [`Widget`] trait implemented by concrete widgets.

use bitflags::bitflags;

use crate::event::{ComponentEvent, EventCx, EventResponse};
use crate::geometry::{Insets, Rect, Size};
use crate::surface::{Color, Surface};
use crate::tree::ComponentId;
use crate::view::Skin;

bitflags! {
    /// Boolean component state.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ComponentFlags: u8 {
        const VISIBLE = 0b0001;
        /// Self-enabled. The effective state also depends on the ancestors.
        const ENABLED = 0b0010;
        /// The component fills its whole bounds, so `update` runs.
        const OPAQUE  = 0b0100;
        /// Layout and cached metrics are current.
        const VALID   = 0b1000;
    }
}

bitflags! {
    /// Optional capabilities, resolved once when the widget is inserted.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    pub struct Capabilities: u8 {
        /// May become the focus owner.
        const ACCEPTS_FOCUS = 0b01;
        /// May keep pointer input that would otherwise reach a descendant.
        const INPUT_CATCHER = 0b10;
    }
}

/// Pointer shape requested from the host while the pointer is over a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    Pointer,
    Text,
    Wait,
    Move,
    Crosshair,
    ResizeHorizontal,
    ResizeVertical,
}

/// State the tree keeps for every component, independent of the widget type.
#[derive(Debug, Clone)]
pub struct ComponentState {
    pub(crate) bounds: Rect,
    pub(crate) insets: Insets,
    pub(crate) flags: ComponentFlags,
    pub(crate) capabilities: Capabilities,
    pub(crate) fixed_size: Option<Size>,
    pub(crate) skin: Option<Skin>,
    pub(crate) background: Option<Color>,
    pub(crate) cursor: Cursor,
    pub(crate) preferred_cache: Option<Size>,
}

impl ComponentState {
    pub(crate) fn new(capabilities: Capabilities) -> Self {
        Self {
            bounds: Rect::default(),
            insets: Insets::default(),
            flags: ComponentFlags::VISIBLE | ComponentFlags::ENABLED,
            capabilities,
            fixed_size: None,
            skin: None,
            background: None,
            cursor: Cursor::Default,
            preferred_cache: None,
        }
    }

    /// Bounds relative to the parent.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn width(&self) -> i32 {
        self.bounds.width
    }

    pub fn height(&self) -> i32 {
        self.bounds.height
    }

    /// The component's own coordinate space: origin at zero, own size.
    pub fn local_rect(&self) -> Rect {
        Rect::from_size(self.bounds.size())
    }

    /// Insets as set on the component, ignoring the skin.
    pub fn own_insets(&self) -> Insets {
        self.insets
    }

    /// Effective insets: element-wise max of the own insets and the skin's.
    pub fn insets(&self) -> Insets {
        match &self.skin {
            Some(skin) => self.insets.max(skin.insets()),
            None => self.insets,
        }
    }

    /// Local rect minus effective insets.
    pub fn content_rect(&self) -> Rect {
        self.local_rect().shrink(self.insets())
    }

    pub fn is_visible(&self) -> bool {
        self.flags.contains(ComponentFlags::VISIBLE)
    }

    /// Self-enabled flag. See [`crate::ComponentTree::is_enabled`] for the
    /// effective value.
    pub fn is_self_enabled(&self) -> bool {
        self.flags.contains(ComponentFlags::ENABLED)
    }

    pub fn is_opaque(&self) -> bool {
        self.flags.contains(ComponentFlags::OPAQUE)
    }

    pub fn is_valid(&self) -> bool {
        self.flags.contains(ComponentFlags::VALID)
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn fixed_size(&self) -> Option<Size> {
        self.fixed_size
    }

    pub fn skin(&self) -> Option<&Skin> {
        self.skin.as_ref()
    }

    pub fn background(&self) -> Option<Color> {
        self.background
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }
}

/// Behavior of a concrete component.
///
/// Geometry, flags and skin live in [`ComponentState`], which the core hands
/// to every hook. Painting happens in the component's own coordinate space:
/// the surface origin sits at the component's top-left corner.
pub trait Widget {
    /// Capabilities, queried once when the widget enters the tree.
    fn capabilities(&self) -> Capabilities {
        Capabilities::empty()
    }

    /// The "pure" preferred size, excluding insets and skin.
    ///
    /// Only consulted for leaves; containers are measured by their layout.
    fn calc_preferred_size(&self, state: &ComponentState) -> Size {
        let _ = state;
        Size::zero()
    }

    /// Refresh cached metrics. Called by `validate` before layout.
    fn recalc(&mut self, state: &ComponentState) {
        let _ = state;
    }

    /// Background fill. Only called for opaque components.
    fn update(&self, state: &ComponentState, surface: &mut dyn Surface) {
        if let Some(color) = state.background {
            surface.set_color(color);
            surface.fill_rect(state.local_rect());
        }
    }

    /// Component content, painted after the skin and before the children.
    fn paint(&self, state: &ComponentState, surface: &mut dyn Surface) {
        let _ = (state, surface);
    }

    /// Overlay pass that runs after all children were painted, with the
    /// component's own clip restored.
    fn paint_on_top(&self, state: &ComponentState, surface: &mut dyn Surface) {
        let _ = (state, surface);
    }

    /// Asked only when [`Capabilities::INPUT_CATCHER`] is set: whether pointer
    /// input aimed at the descendant `target` is kept by this component.
    fn catches_input(&self, target: ComponentId) -> bool {
        let _ = target;
        true
    }

    /// Lifecycle and input notifications.
    fn event(&mut self, cx: &mut EventCx<'_>, event: &ComponentEvent) -> EventResponse {
        let _ = (cx, event);
        EventResponse::Ignored
    }
}

impl Widget for Box<dyn Widget> {
    fn capabilities(&self) -> Capabilities {
        (**self).capabilities()
    }
    fn calc_preferred_size(&self, state: &ComponentState) -> Size {
        (**self).calc_preferred_size(state)
    }
    fn recalc(&mut self, state: &ComponentState) {
        (**self).recalc(state)
    }
    fn update(&self, state: &ComponentState, surface: &mut dyn Surface) {
        (**self).update(state, surface)
    }
    fn paint(&self, state: &ComponentState, surface: &mut dyn Surface) {
        (**self).paint(state, surface)
    }
    fn paint_on_top(&self, state: &ComponentState, surface: &mut dyn Surface) {
        (**self).paint_on_top(state, surface)
    }
    fn catches_input(&self, target: ComponentId) -> bool {
        (**self).catches_input(target)
    }
    fn event(&mut self, cx: &mut EventCx<'_>, event: &ComponentEvent) -> EventResponse {
        (**self).event(cx, event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{Skin, View};

    #[test]
    fn test_new_state_is_visible_enabled_invalid() {
        let state = ComponentState::new(Capabilities::empty());
        assert!(state.is_visible());
        assert!(state.is_self_enabled());
        assert!(!state.is_opaque());
        assert!(!state.is_valid());
    }

    #[test]
    fn test_effective_insets_merge_skin() {
        let mut state = ComponentState::new(Capabilities::empty());
        state.insets = Insets::new(1, 6, 1, 1);
        state.skin = Some(Skin::new().border(View::frame(Color::BLACK, 3)));
        assert_eq!(state.insets(), Insets::new(3, 6, 3, 3));
        assert_eq!(state.own_insets(), Insets::new(1, 6, 1, 1));
    }

    #[test]
    fn test_content_rect() {
        let mut state = ComponentState::new(Capabilities::empty());
        state.bounds = Rect::new(40, 40, 20, 10);
        state.insets = Insets::all(2);
        assert_eq!(state.content_rect(), Rect::new(2, 2, 16, 6));
    }
}
