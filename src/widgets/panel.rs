use std::rc::Rc;

use crate::component::{Capabilities, ComponentState, Widget};
use crate::event::{ComponentEvent, EventCx, EventResponse, KeyCode};
use crate::geometry::Size;
use crate::surface::{Color, Surface};
use crate::tree::ComponentId;

/// Callback for click events, and for Enter/Space while focused
pub type ClickCallback = Rc<dyn Fn()>;
/// Callback for hover events (bool = is_hovered)
pub type HoverCallback = Rc<dyn Fn(bool)>;
/// Raw event hook, consulted before the panel's own handling
pub type EventHandler = Rc<dyn Fn(&mut EventCx<'_>, &ComponentEvent) -> EventResponse>;

/// General purpose component: a plain box when used as a leaf, a themed
/// group when given a layout.
///
/// Appearance comes from the component's skin and background; the panel
/// itself only draws an optional focus ring.
#[derive(Default)]
pub struct Panel {
    capabilities: Capabilities,
    preferred: Size,
    focus_ring: Option<Color>,
    catch_filter: Option<Rc<dyn Fn(ComponentId) -> bool>>,

    on_click: Option<ClickCallback>,
    on_hover: Option<HoverCallback>,
    on_event: Option<EventHandler>,

    is_hovered: bool,
    is_pressed: bool,
    is_focused: bool,
}

impl Panel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow the panel to become the focus owner.
    pub fn focusable(mut self, focusable: bool) -> Self {
        self.capabilities
            .set(Capabilities::ACCEPTS_FOCUS, focusable);
        self
    }

    /// Keep all pointer input aimed at descendants.
    pub fn catch_input(mut self) -> Self {
        self.capabilities.insert(Capabilities::INPUT_CATCHER);
        self.catch_filter = None;
        self
    }

    /// Keep pointer input aimed at the descendants for which `filter` holds.
    pub fn catch_input_if(mut self, filter: impl Fn(ComponentId) -> bool + 'static) -> Self {
        self.capabilities.insert(Capabilities::INPUT_CATCHER);
        self.catch_filter = Some(Rc::new(filter));
        self
    }

    /// Leaf preferred size, before insets.
    pub fn preferred_size(mut self, width: i32, height: i32) -> Self {
        self.preferred = Size::new(width, height);
        self
    }

    /// Draw a one-pixel ring in `color` while focused.
    pub fn focus_ring(mut self, color: Color) -> Self {
        self.focus_ring = Some(color);
        self
    }

    pub fn on_click(mut self, callback: impl Fn() + 'static) -> Self {
        self.on_click = Some(Rc::new(callback));
        self
    }

    pub fn on_hover(mut self, callback: impl Fn(bool) + 'static) -> Self {
        self.on_hover = Some(Rc::new(callback));
        self
    }

    pub fn on_event(
        mut self,
        handler: impl Fn(&mut EventCx<'_>, &ComponentEvent) -> EventResponse + 'static,
    ) -> Self {
        self.on_event = Some(Rc::new(handler));
        self
    }

    pub fn is_hovered(&self) -> bool {
        self.is_hovered
    }

    pub fn is_pressed(&self) -> bool {
        self.is_pressed
    }

    pub fn is_focused(&self) -> bool {
        self.is_focused
    }

    fn set_hovered(&mut self, cx: &mut EventCx<'_>, hovered: bool) {
        if self.is_hovered != hovered {
            self.is_hovered = hovered;
            if let Some(callback) = &self.on_hover {
                callback(hovered);
            }
            cx.repaint();
        }
    }

    fn click(&self) -> EventResponse {
        match &self.on_click {
            Some(callback) => {
                callback();
                EventResponse::Handled
            }
            None => EventResponse::Ignored,
        }
    }
}

pub fn panel() -> Panel {
    Panel::new()
}

impl Widget for Panel {
    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn calc_preferred_size(&self, _state: &ComponentState) -> Size {
        self.preferred
    }

    fn paint_on_top(&self, state: &ComponentState, surface: &mut dyn Surface) {
        if let (true, Some(color)) = (self.is_focused, self.focus_ring) {
            surface.set_color(color);
            surface.draw_rect(state.local_rect());
        }
    }

    fn catches_input(&self, target: ComponentId) -> bool {
        self.catch_filter.as_ref().map_or(true, |f| f(target))
    }

    fn event(&mut self, cx: &mut EventCx<'_>, event: &ComponentEvent) -> EventResponse {
        if let Some(handler) = self.on_event.clone() {
            if handler(cx, event) == EventResponse::Handled {
                return EventResponse::Handled;
            }
        }

        match event {
            ComponentEvent::MouseEntered { .. } => {
                self.set_hovered(cx, true);
                EventResponse::Handled
            }
            ComponentEvent::MouseExited { .. } => {
                self.set_hovered(cx, false);
                self.is_pressed = false;
                EventResponse::Handled
            }
            ComponentEvent::MousePressed { .. } => {
                self.is_pressed = true;
                cx.repaint();
                EventResponse::Handled
            }
            ComponentEvent::MouseReleased { .. } => {
                self.is_pressed = false;
                cx.repaint();
                EventResponse::Handled
            }
            ComponentEvent::MouseClicked { .. } => self.click(),
            ComponentEvent::KeyPressed(key)
                if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) =>
            {
                self.click()
            }
            ComponentEvent::FocusGained => {
                self.is_focused = true;
                EventResponse::Handled
            }
            ComponentEvent::FocusLost => {
                self.is_focused = false;
                EventResponse::Handled
            }
            ComponentEvent::Disabled | ComponentEvent::Hidden | ComponentEvent::Removed => {
                self.is_pressed = false;
                self.is_hovered = false;
                EventResponse::Ignored
            }
            _ => EventResponse::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::desktop::{Desktop, DesktopConfig};
    use crate::event::{Buttons, KeyEvent, PointerEvent};
    use crate::geometry::Rect;
    use crate::layout::NullLayout;
    use crate::surface::RecordingSurface;

    fn desktop_with(widget: Panel) -> (Desktop, ComponentId) {
        let config = DesktopConfig::new()
            .width(50)
            .height(50)
            .double_buffered(false);
        let mut desktop = Desktop::new(config);
        let group = desktop.create_container(panel(), NullLayout);
        desktop.add(desktop.base_layer(), group, None).unwrap();
        let id = desktop.create(widget);
        desktop.add(group, id, None).unwrap();
        desktop.set_bounds(id, Rect::new(10, 10, 10, 10)).unwrap();
        (desktop, id)
    }

    #[test]
    fn test_click_and_keyboard_activation() {
        let clicks = Rc::new(Cell::new(0));
        let c = Rc::clone(&clicks);
        let (mut desktop, id) = desktop_with(panel().focusable(true).on_click(move || c.set(c.get() + 1)));

        desktop.handle_pointer(PointerEvent::down(12, 12, Buttons::LEFT));
        desktop.handle_pointer(PointerEvent::up(12, 12, Buttons::LEFT));
        assert_eq!(clicks.get(), 1);
        assert_eq!(desktop.focus_owner(), Some(id));

        desktop.handle_key(KeyEvent::down(KeyCode::Enter));
        desktop.handle_key(KeyEvent::down(KeyCode::Char(' ')));
        assert_eq!(clicks.get(), 3);
    }

    #[test]
    fn test_hover_callback_pairs() {
        let log = Rc::new(std::cell::RefCell::new(Vec::new()));
        let l = Rc::clone(&log);
        let (mut desktop, _) = desktop_with(panel().on_hover(move |h| l.borrow_mut().push(h)));

        desktop.handle_pointer(PointerEvent::moved(15, 15));
        desktop.handle_pointer(PointerEvent::moved(16, 16));
        desktop.handle_pointer(PointerEvent::moved(40, 40));
        assert_eq!(*log.borrow(), vec![true, false]);
    }

    #[test]
    fn test_event_hook_runs_first() {
        let clicks = Rc::new(Cell::new(0));
        let c = Rc::clone(&clicks);
        let (mut desktop, _) = desktop_with(
            panel()
                .on_event(|_, event| match event {
                    ComponentEvent::MouseClicked { .. } => EventResponse::Handled,
                    _ => EventResponse::Ignored,
                })
                .on_click(move || c.set(c.get() + 1)),
        );

        desktop.handle_pointer(PointerEvent::down(12, 12, Buttons::LEFT));
        desktop.handle_pointer(PointerEvent::up(12, 12, Buttons::LEFT));
        assert_eq!(clicks.get(), 0);
    }

    #[test]
    fn test_focus_ring_painted_only_while_focused() {
        let ring = Color::rgb(1.0, 0.0, 0.0);
        let (mut desktop, id) = desktop_with(panel().focusable(true).focus_ring(ring));
        let mut surface = RecordingSurface::new(50, 50);
        desktop.paint(&mut surface);
        assert!(surface.fills().iter().all(|(_, c)| *c != ring));

        assert!(desktop.request_focus(id));
        let mut surface = RecordingSurface::new(50, 50);
        desktop.paint(&mut surface);
        let ring_fills: Vec<Rect> = surface
            .fills()
            .into_iter()
            .filter(|(_, c)| *c == ring)
            .map(|(r, _)| r)
            .collect();
        assert_eq!(ring_fills.len(), 4);
        assert!(ring_fills.contains(&Rect::new(10, 10, 10, 1)));
    }

    #[test]
    fn test_filtered_catcher() {
        let mut desktop = Desktop::new(DesktopConfig::new().width(50).height(50));
        let keep = Rc::new(Cell::new(None));
        let k = Rc::clone(&keep);
        let group = desktop.create_container(
            panel().catch_input_if(move |target| Some(target) == k.get()),
            NullLayout,
        );
        desktop.add(desktop.base_layer(), group, None).unwrap();
        let a = desktop.create(panel());
        let b = desktop.create(panel());
        desktop.add(group, a, None).unwrap();
        desktop.add(group, b, None).unwrap();
        desktop.set_bounds(a, Rect::new(0, 0, 10, 10)).unwrap();
        desktop.set_bounds(b, Rect::new(20, 0, 10, 10)).unwrap();
        keep.set(Some(a));
        desktop.validate();

        assert_eq!(desktop.component_at(5, 5), Some(group));
        assert_eq!(desktop.component_at(25, 5), Some(b));
    }
}
