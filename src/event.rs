//! Raw host input, component notifications and listener multicast.

use std::rc::Rc;

use bitflags::bitflags;

use crate::component::ComponentState;
use crate::geometry::Rect;
use crate::tree::ComponentId;

bitflags! {
    /// Pointer button mask.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    pub struct Buttons: u8 {
        const LEFT   = 0b001;
        const RIGHT  = 0b010;
        const MIDDLE = 0b100;
    }
}

bitflags! {
    /// Keyboard modifier mask.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
        const LOGO  = 0b1000;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Up,
    Move,
    /// Pointer entered the desktop surface.
    Enter,
    /// Pointer left the desktop surface.
    Exit,
}

/// Pointer input as delivered by the host, in desktop coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub x: i32,
    pub y: i32,
    pub buttons: Buttons,
    pub click_count: u32,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, x: i32, y: i32) -> Self {
        Self {
            kind,
            x,
            y,
            buttons: Buttons::empty(),
            click_count: 0,
        }
    }

    pub fn down(x: i32, y: i32, buttons: Buttons) -> Self {
        Self {
            buttons,
            click_count: 1,
            ..Self::new(PointerKind::Down, x, y)
        }
    }

    pub fn up(x: i32, y: i32, buttons: Buttons) -> Self {
        Self {
            buttons,
            ..Self::new(PointerKind::Up, x, y)
        }
    }

    pub fn moved(x: i32, y: i32) -> Self {
        Self::new(PointerKind::Move, x, y)
    }

    pub fn enter(x: i32, y: i32) -> Self {
        Self::new(PointerKind::Enter, x, y)
    }

    pub fn exit(x: i32, y: i32) -> Self {
        Self::new(PointerKind::Exit, x, y)
    }

    pub fn with_click_count(mut self, click_count: u32) -> Self {
        self.click_count = click_count;
        self
    }
}

/// Key identity. Printable keys carry their character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Backspace,
    Delete,
    Enter,
    Tab,
    Escape,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    Char(char),
    /// Host-specific code with no named variant.
    Other(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Down,
    Up,
    Typed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub kind: KeyKind,
    pub code: KeyCode,
    pub ch: Option<char>,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(kind: KeyKind, code: KeyCode, modifiers: Modifiers) -> Self {
        let ch = match code {
            KeyCode::Char(c) => Some(c),
            _ => None,
        };
        Self {
            kind,
            code,
            ch,
            modifiers,
        }
    }

    pub fn down(code: KeyCode) -> Self {
        Self::new(KeyKind::Down, code, Modifiers::empty())
    }

    pub fn up(code: KeyCode) -> Self {
        Self::new(KeyKind::Up, code, Modifiers::empty())
    }

    pub fn typed(ch: char) -> Self {
        Self::new(KeyKind::Typed, KeyCode::Char(ch), Modifiers::empty())
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Notifications the core delivers to a widget. Pointer coordinates are
/// relative to the receiving component.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentEvent {
    Shown,
    Hidden,
    Enabled,
    Disabled,
    Added,
    Removed,
    FocusGained,
    FocusLost,
    MouseEntered { x: i32, y: i32 },
    MouseExited { x: i32, y: i32 },
    MouseMoved { x: i32, y: i32 },
    MousePressed {
        x: i32,
        y: i32,
        buttons: Buttons,
        click_count: u32,
    },
    MouseReleased { x: i32, y: i32, buttons: Buttons },
    MouseClicked {
        x: i32,
        y: i32,
        buttons: Buttons,
        click_count: u32,
    },
    DragStarted { x: i32, y: i32, buttons: Buttons },
    Dragged { x: i32, y: i32, dx: i32, dy: i32 },
    DragEnded { x: i32, y: i32 },
    KeyPressed(KeyEvent),
    KeyReleased(KeyEvent),
    KeyTyped(KeyEvent),
}

impl ComponentEvent {
    /// Local pointer coordinates, if any.
    pub fn coords(&self) -> Option<(i32, i32)> {
        match self {
            ComponentEvent::MouseEntered { x, y }
            | ComponentEvent::MouseExited { x, y }
            | ComponentEvent::MouseMoved { x, y }
            | ComponentEvent::MousePressed { x, y, .. }
            | ComponentEvent::MouseReleased { x, y, .. }
            | ComponentEvent::MouseClicked { x, y, .. }
            | ComponentEvent::DragStarted { x, y, .. }
            | ComponentEvent::Dragged { x, y, .. }
            | ComponentEvent::DragEnded { x, y } => Some((*x, *y)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResponse {
    Ignored,
    Handled,
}

/// Work a widget asks the desktop to do once its handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Request {
    Repaint(ComponentId, Option<Rect>),
    Invalidate(ComponentId),
    Focus(ComponentId),
    ReleaseFocus(ComponentId),
}

/// Context handed to [`crate::Widget::event`].
///
/// Requests are queued and applied after the handler returns, so a handler
/// never re-enters dispatch.
pub struct EventCx<'a> {
    id: ComponentId,
    state: &'a ComponentState,
    requests: &'a mut Vec<Request>,
}

impl<'a> EventCx<'a> {
    pub(crate) fn new(
        id: ComponentId,
        state: &'a ComponentState,
        requests: &'a mut Vec<Request>,
    ) -> Self {
        Self {
            id,
            state,
            requests,
        }
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn state(&self) -> &ComponentState {
        self.state
    }

    pub fn repaint(&mut self) {
        self.requests.push(Request::Repaint(self.id, None));
    }

    /// Repaint part of the component, in local coordinates.
    pub fn repaint_rect(&mut self, rect: Rect) {
        self.requests.push(Request::Repaint(self.id, Some(rect)));
    }

    pub fn invalidate(&mut self) {
        self.requests.push(Request::Invalidate(self.id));
    }

    pub fn request_focus(&mut self) {
        self.requests.push(Request::Focus(self.id));
    }

    pub fn release_focus(&mut self) {
        self.requests.push(Request::ReleaseFocus(self.id));
    }
}

/// Handle returned by [`Listeners::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Multicast listener list.
///
/// `notify` iterates over a snapshot, so listeners added or removed while a
/// notification is in flight take effect from the next notification on.
pub struct Listeners<E> {
    next_id: u64,
    entries: Vec<(ListenerId, Rc<dyn Fn(&E)>)>,
}

impl<E> Listeners<E> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    pub fn add(&mut self, listener: Rc<dyn Fn(&E)>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    /// Returns false when the id was not registered.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn notify(&self, event: &E) {
        let snapshot: Vec<Rc<dyn Fn(&E)>> =
            self.entries.iter().map(|(_, l)| Rc::clone(l)).collect();
        for listener in snapshot {
            listener(event);
        }
    }
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for Listeners<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_key_event_carries_char() {
        let ev = KeyEvent::typed('a');
        assert_eq!(ev.ch, Some('a'));
        assert_eq!(KeyEvent::down(KeyCode::Tab).ch, None);
    }

    #[test]
    fn test_event_coords() {
        let ev = ComponentEvent::MouseMoved { x: 3, y: 4 };
        assert_eq!(ev.coords(), Some((3, 4)));
        assert_eq!(ComponentEvent::FocusLost.coords(), None);
    }

    #[test]
    fn test_listeners_notify_and_remove() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut listeners: Listeners<i32> = Listeners::new();

        let l = Rc::clone(&log);
        let first = listeners.add(Rc::new(move |v| l.borrow_mut().push(*v)));
        let l = Rc::clone(&log);
        listeners.add(Rc::new(move |v| l.borrow_mut().push(*v * 10)));

        listeners.notify(&1);
        assert_eq!(*log.borrow(), vec![1, 10]);

        assert!(listeners.remove(first));
        assert!(!listeners.remove(first));
        listeners.notify(&2);
        assert_eq!(*log.borrow(), vec![1, 10, 20]);
    }
}
