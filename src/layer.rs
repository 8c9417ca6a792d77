//! Desktop layers and the window layer's activation bookkeeping.
//!
//! A layer is a root container spanning the desktop. Layers stack bottom to
//! top; the base layer is permanent. A window layer additionally records
//! which of its children are open windows, in opening order, and which one
//! is active.

use std::rc::Rc;

use crate::component::Widget;
use crate::event::{ListenerId, Listeners};
use crate::tree::ComponentId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowKind {
    /// Exclusively owns activation while open.
    Modal,
    /// Regular overlapping window.
    Floating,
    /// Transient information (tooltips). Never activated, never cycled.
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    Opened,
    Activated,
    Deactivated,
    Closed,
}

/// Payload of window listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowNotice {
    pub window: ComponentId,
    pub event: WindowEvent,
}

pub type WindowListener = Rc<dyn Fn(&WindowNotice)>;

/// How a window is opened.
#[derive(Clone)]
pub struct WindowOptions {
    pub(crate) kind: WindowKind,
    pub(crate) owner: Option<ComponentId>,
    pub(crate) listener: Option<WindowListener>,
}

impl WindowOptions {
    pub fn new(kind: WindowKind) -> Self {
        Self {
            kind,
            owner: None,
            listener: None,
        }
    }

    pub fn modal() -> Self {
        Self::new(WindowKind::Modal)
    }

    pub fn floating() -> Self {
        Self::new(WindowKind::Floating)
    }

    pub fn info() -> Self {
        Self::new(WindowKind::Info)
    }

    /// Component the window belongs to, e.g. the field a tooltip describes.
    pub fn owner(mut self, owner: ComponentId) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Listener for this window only.
    pub fn listener(mut self, listener: WindowListener) -> Self {
        self.listener = Some(listener);
        self
    }
}

impl std::fmt::Debug for WindowOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowOptions")
            .field("kind", &self.kind)
            .field("owner", &self.owner)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

pub(crate) struct WindowEntry {
    pub(crate) window: ComponentId,
    pub(crate) kind: WindowKind,
    pub(crate) owner: Option<ComponentId>,
    pub(crate) listener: Option<WindowListener>,
}

/// Open windows of one layer.
#[derive(Default)]
pub struct WinLayer {
    /// Activation stack, in opening order.
    stack: Vec<WindowEntry>,
    active: Option<ComponentId>,
    listeners: Listeners<WindowNotice>,
}

impl WinLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<ComponentId> {
        self.active
    }

    pub(crate) fn set_active(&mut self, window: Option<ComponentId>) {
        self.active = window;
    }

    pub fn is_open(&self, window: ComponentId) -> bool {
        self.position(window).is_some()
    }

    /// Index of `window` in the activation stack.
    pub fn position(&self, window: ComponentId) -> Option<usize> {
        self.stack.iter().position(|e| e.window == window)
    }

    pub fn kind(&self, window: ComponentId) -> Option<WindowKind> {
        self.entry(window).map(|e| e.kind)
    }

    pub fn owner(&self, window: ComponentId) -> Option<ComponentId> {
        self.entry(window).and_then(|e| e.owner)
    }

    /// Open windows in opening order.
    pub fn windows(&self) -> Vec<ComponentId> {
        self.stack.iter().map(|e| e.window).collect()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Stack index and id of the most recently opened modal window.
    pub fn top_modal(&self) -> Option<(usize, ComponentId)> {
        self.stack
            .iter()
            .enumerate()
            .rev()
            .find(|(_, e)| e.kind == WindowKind::Modal)
            .map(|(i, e)| (i, e.window))
    }

    /// The modal keeping `window` from activation, if any.
    pub fn blocking_modal(&self, window: ComponentId) -> Option<ComponentId> {
        let (modal_index, modal) = self.top_modal()?;
        match self.position(window) {
            Some(index) if index >= modal_index => None,
            _ => Some(modal),
        }
    }

    fn entry(&self, window: ComponentId) -> Option<&WindowEntry> {
        self.stack.iter().find(|e| e.window == window)
    }

    pub(crate) fn push(&mut self, entry: WindowEntry) {
        self.stack.push(entry);
    }

    pub(crate) fn take(&mut self, window: ComponentId) -> Option<WindowEntry> {
        let index = self.position(window)?;
        if self.active == Some(window) {
            self.active = None;
        }
        Some(self.stack.remove(index))
    }

    pub fn add_listener(&mut self, listener: WindowListener) -> ListenerId {
        self.listeners.add(listener)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Tell the window's own listener, then the layer's listeners.
    pub(crate) fn notify(&self, window: ComponentId, event: WindowEvent) {
        let notice = WindowNotice { window, event };
        if let Some(listener) = self.entry(window).and_then(|e| e.listener.clone()) {
            listener(&notice);
        }
        self.listeners.notify(&notice);
    }

    /// Notify after the entry is gone.
    pub(crate) fn notify_closed(&self, entry: &WindowEntry) {
        let notice = WindowNotice {
            window: entry.window,
            event: WindowEvent::Closed,
        };
        if let Some(listener) = &entry.listener {
            listener(&notice);
        }
        self.listeners.notify(&notice);
    }
}

impl std::fmt::Debug for WinLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WinLayer")
            .field("windows", &self.windows())
            .field("active", &self.active)
            .finish()
    }
}

#[derive(Debug)]
pub enum LayerKind {
    Plain,
    Windows(WinLayer),
}

/// One z-ordered plane of the desktop.
#[derive(Debug)]
pub struct Layer {
    pub(crate) root: ComponentId,
    pub(crate) name: String,
    pub(crate) permanent: bool,
    pub(crate) kind: LayerKind,
}

impl Layer {
    pub fn root(&self) -> ComponentId {
        self.root
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_permanent(&self) -> bool {
        self.permanent
    }

    pub fn windows(&self) -> Option<&WinLayer> {
        match &self.kind {
            LayerKind::Windows(w) => Some(w),
            LayerKind::Plain => None,
        }
    }

    pub(crate) fn windows_mut(&mut self) -> Option<&mut WinLayer> {
        match &mut self.kind {
            LayerKind::Windows(w) => Some(w),
            LayerKind::Plain => None,
        }
    }
}

/// Widget behind every layer root. Paints only its background, when opaque.
pub(crate) struct LayerWidget;

impl Widget for LayerWidget {}
