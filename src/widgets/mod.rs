pub mod panel;

pub use panel::{panel, ClickCallback, EventHandler, HoverCallback, Panel};
