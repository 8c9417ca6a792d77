//! A retained-mode component toolkit core.
//!
//! Components live in a [`ComponentTree`] owned by a [`Desktop`], which
//! stacks them into layers, validates layout, tracks damage, paints onto a
//! [`Surface`] and routes host input to them.
//!
//! ```ignore
//! use tessera::prelude::*;
//!
//! let mut desktop = Desktop::new(DesktopConfig::new().width(320).height(200));
//! let form = desktop.create_container(panel(), GridLayout::new(2, 1));
//! desktop.add(desktop.base_layer(), form, None)?;
//! let ok = desktop.create(panel().focusable(true).on_click(|| println!("ok")));
//! desktop.add(form, ok, None)?;
//!
//! desktop.handle_pointer(PointerEvent::down(10, 10, Buttons::LEFT));
//! desktop.paint(&mut surface);
//! ```

pub mod component;
pub mod container;
pub mod desktop;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod focus;
pub mod geometry;
pub mod layer;
pub mod layout;
pub mod paint;
pub mod surface;
pub mod timer;
pub mod tree;
pub mod validate;
pub mod view;
pub mod widgets;

pub use component::{Capabilities, ComponentState, Cursor, Widget};
pub use desktop::{Desktop, DesktopConfig, Host, NullHost};
pub use error::{Error, Result};
pub use event::{
    Buttons, ComponentEvent, EventCx, EventResponse, KeyCode, KeyEvent, KeyKind, ListenerId,
    Listeners, Modifiers, PointerEvent, PointerKind,
};
pub use focus::FocusChange;
pub use geometry::{Insets, Point, Rect, Size};
pub use layer::{WindowEvent, WindowKind, WindowNotice, WindowOptions};
pub use layout::Layout;
pub use surface::{Color, Surface};
pub use tree::{ComponentId, ComponentTree};
pub use view::{PaintMode, Skin, View, ViewManager};

pub mod prelude {
    pub use crate::component::{Capabilities, ComponentState, Cursor, Widget};
    pub use crate::desktop::{Desktop, DesktopConfig, Host, NullHost};
    pub use crate::event::{
        Buttons, ComponentEvent, EventCx, EventResponse, KeyCode, KeyEvent, Modifiers,
        PointerEvent,
    };
    pub use crate::geometry::{Insets, Point, Rect, Size};
    pub use crate::layer::{WindowKind, WindowOptions};
    pub use crate::layout::{BorderLayout, GridLayout, Layout, NullLayout, StackLayout};
    pub use crate::surface::{Color, RasterSurface, RecordingSurface, Surface};
    pub use crate::timer::{CalloopTimers, ManualTimers, TimerService};
    pub use crate::tree::{ComponentId, ComponentTree};
    pub use crate::view::{PaintMode, Skin, View, ViewManager};
    pub use crate::widgets::{panel, Panel};
    pub use crate::{Error, Result};
}
