//! Host input routing.
//!
//! Pointer events go to the component under the pointer, except that a
//! press makes its target the press owner until release, and moving away
//! from the press point turns it into the drag owner until release. While dragging,
//! enter/exit tracking is suspended. Keys go to the focus owner after the
//! window layer has had a chance to intercept them.

use crate::component::Cursor;
use crate::dispatch;
use crate::focus;
use crate::event::{
    Buttons, ComponentEvent, EventResponse, KeyCode, KeyEvent, KeyKind, Modifiers, PointerEvent,
    PointerKind,
};
use crate::geometry::Point;
use crate::tree::{ComponentId, ComponentTree};

use super::Desktop;

impl Desktop {
    /// Deepest component under (x, y), after input-catcher vetoes. Layer
    /// roots are transparent, so an empty spot yields `None`.
    pub fn component_at(&self, x: i32, y: i32) -> Option<ComponentId> {
        let roots = self.layer_roots();
        dispatch::hit_test(&self.tree, &roots, x, y).map(|(_, hit)| hit)
    }

    /// Like [`Desktop::component_at`], but swallowed by an open modal
    /// window when the hit lies below it.
    fn target_at(&self, x: i32, y: i32) -> Option<ComponentId> {
        let target = self.component_at(x, y)?;
        if self.is_blocked_by_modal(target) {
            log::trace!("pointer input for {:?} swallowed by modal", target);
            return None;
        }
        Some(target)
    }

    fn local_point(&self, id: ComponentId, x: i32, y: i32) -> Point {
        let origin = self.tree.absolute_origin(id);
        Point::new(x - origin.x, y - origin.y)
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) {
        self.validate();
        match event.kind {
            PointerKind::Enter => {
                self.pointer.inside = true;
                self.pointer.last = Point::new(event.x, event.y);
                self.update_move_owner();
            }
            PointerKind::Exit => {
                self.pointer.inside = false;
                self.pointer.last = Point::new(event.x, event.y);
                self.update_move_owner();
            }
            PointerKind::Move => self.pointer_moved(event),
            PointerKind::Down => self.pointer_pressed(event),
            PointerKind::Up => self.pointer_released(event),
        }
        self.validate();
        self.flush_damage();
    }

    fn pointer_moved(&mut self, event: PointerEvent) {
        let previous = self.pointer.last;
        let current = Point::new(event.x, event.y);
        self.pointer.last = current;
        let entering = !self.pointer.inside;
        self.pointer.inside = true;
        if current == previous && !entering {
            return;
        }

        if let Some(owner) = self.pointer.drag_owner {
            let p = self.local_point(owner, event.x, event.y);
            self.deliver_if_enabled(
                owner,
                &ComponentEvent::Dragged {
                    x: p.x,
                    y: p.y,
                    dx: event.x - previous.x,
                    dy: event.y - previous.y,
                },
            );
            return;
        }

        if let Some(owner) = self.pointer.press_owner {
            let from = self.pointer.press_point;
            if current == from {
                return;
            }
            self.pointer.drag_owner = Some(owner);
            log::trace!("drag started by {:?}", owner);
            let start = self.local_point(owner, from.x, from.y);
            self.deliver_if_enabled(
                owner,
                &ComponentEvent::DragStarted {
                    x: start.x,
                    y: start.y,
                    buttons: self.pointer.buttons,
                },
            );
            // The handler may have released the owner (e.g. by disabling it).
            if let Some(owner) = self.pointer.drag_owner {
                let p = self.local_point(owner, event.x, event.y);
                self.deliver_if_enabled(
                    owner,
                    &ComponentEvent::Dragged {
                        x: p.x,
                        y: p.y,
                        dx: event.x - previous.x,
                        dy: event.y - previous.y,
                    },
                );
            }
            return;
        }

        self.update_move_owner();
        if let Some(owner) = self.pointer.move_owner {
            let p = self.local_point(owner, event.x, event.y);
            self.deliver_if_enabled(owner, &ComponentEvent::MouseMoved { x: p.x, y: p.y });
        }
    }

    fn pointer_pressed(&mut self, event: PointerEvent) {
        self.pointer.last = Point::new(event.x, event.y);
        self.pointer.inside = true;
        self.pointer.buttons |= event.buttons;
        self.update_move_owner();

        let target = self
            .target_at(event.x, event.y)
            .filter(|&target| self.tree.is_enabled(target));
        let Some(target) = target else {
            self.pointer.clear_press();
            return;
        };

        let focusable = focus::is_focusable(&self.tree, target);
        if let Some((_, window)) = self.window_of(target) {
            if let Err(err) = self.activate_window_inner(window, !focusable) {
                log::debug!("press did not activate {:?}: {}", window, err);
            }
        }
        if focusable {
            self.request_focus(target);
        }

        self.pointer.press_owner = Some(target);
        self.pointer.drag_owner = None;
        self.pointer.press_point = self.pointer.last;
        self.pointer.clicks = event.click_count;
        let p = self.local_point(target, event.x, event.y);
        self.deliver(
            target,
            &ComponentEvent::MousePressed {
                x: p.x,
                y: p.y,
                buttons: event.buttons,
                click_count: event.click_count,
            },
        );
    }

    fn pointer_released(&mut self, event: PointerEvent) {
        self.pointer.last = Point::new(event.x, event.y);
        self.pointer.inside = true;
        let buttons = if event.buttons.is_empty() {
            self.pointer.buttons
        } else {
            event.buttons
        };
        self.pointer.buttons = Buttons::empty();

        let dragged = self.pointer.drag_owner.take();
        if let Some(owner) = dragged {
            let p = self.local_point(owner, event.x, event.y);
            log::trace!("drag ended by {:?}", owner);
            self.deliver_if_enabled(owner, &ComponentEvent::DragEnded { x: p.x, y: p.y });
        }

        if let Some(owner) = self.pointer.press_owner.take() {
            let p = self.local_point(owner, event.x, event.y);
            self.deliver_if_enabled(
                owner,
                &ComponentEvent::MouseReleased {
                    x: p.x,
                    y: p.y,
                    buttons,
                },
            );
            if dragged.is_none() && self.target_at(event.x, event.y) == Some(owner) {
                let clicks = if event.click_count > 0 {
                    event.click_count
                } else {
                    self.pointer.clicks.max(1)
                };
                self.deliver_if_enabled(
                    owner,
                    &ComponentEvent::MouseClicked {
                        x: p.x,
                        y: p.y,
                        buttons,
                        click_count: clicks,
                    },
                );
            }
        }

        self.update_move_owner();
    }

    /// Drop the move owner when `keep` rejects it, sending it the exit that
    /// pairs its earlier enter.
    pub(super) fn exit_move_owner_unless(
        &mut self,
        keep: impl Fn(&ComponentTree, ComponentId) -> bool,
    ) {
        let Some(owner) = self.pointer.move_owner else {
            return;
        };
        if keep(&self.tree, owner) {
            return;
        }
        self.pointer.move_owner = None;
        if self.tree.contains(owner) {
            let Point { x, y } = self.pointer.last;
            let p = self.local_point(owner, x, y);
            self.deliver(owner, &ComponentEvent::MouseExited { x: p.x, y: p.y });
        }
    }

    /// Re-evaluate the component under the pointer, firing exit on the old
    /// one and enter on the new one. Suspended while dragging.
    pub(super) fn update_move_owner(&mut self) {
        if self.pointer.drag_owner.is_some() {
            return;
        }
        let Point { x, y } = self.pointer.last;
        let current = if self.pointer.inside {
            self.target_at(x, y)
        } else {
            None
        };
        let previous = self.pointer.move_owner;
        if current == previous {
            return;
        }
        self.pointer.move_owner = current;

        if let Some(old) = previous {
            if self.tree.contains(old) {
                let p = self.local_point(old, x, y);
                self.deliver(old, &ComponentEvent::MouseExited { x: p.x, y: p.y });
            }
        }
        if let Some(new) = current {
            let p = self.local_point(new, x, y);
            self.deliver(new, &ComponentEvent::MouseEntered { x: p.x, y: p.y });
        }

        let cursor = current
            .and_then(|id| self.tree.state(id))
            .map(|s| s.cursor())
            .unwrap_or(Cursor::Default);
        self.update_cursor(cursor);
    }

    fn deliver_if_enabled(&mut self, id: ComponentId, event: &ComponentEvent) -> EventResponse {
        if self.tree.contains(id) && self.tree.is_enabled(id) {
            self.deliver(id, event)
        } else {
            EventResponse::Ignored
        }
    }

    pub fn handle_key(&mut self, event: KeyEvent) {
        self.validate();
        if !self.intercept_key(&event) {
            self.route_key(&event);
        }
        self.validate();
        self.flush_damage();
    }

    /// Window-layer shortcuts: Ctrl+Tab and Ctrl+Shift+Tab cycle windows.
    fn intercept_key(&mut self, event: &KeyEvent) -> bool {
        let cycling = event.code == KeyCode::Tab && event.modifiers.contains(Modifiers::CTRL);
        if !cycling || self.window_layer().is_none() {
            return false;
        }
        if event.kind == KeyKind::Down {
            let forward = !event.modifiers.contains(Modifiers::SHIFT);
            self.cycle_windows(forward);
        }
        true
    }

    fn route_key(&mut self, event: &KeyEvent) {
        let traversal = event.kind == KeyKind::Down
            && event.code == KeyCode::Tab
            && !event.modifiers.contains(Modifiers::CTRL);

        let response = match self.focus_owner() {
            Some(owner) => {
                let wrapped = match event.kind {
                    KeyKind::Down => ComponentEvent::KeyPressed(*event),
                    KeyKind::Up => ComponentEvent::KeyReleased(*event),
                    KeyKind::Typed => ComponentEvent::KeyTyped(*event),
                };
                self.deliver_if_enabled(owner, &wrapped)
            }
            None => EventResponse::Ignored,
        };

        if traversal && response == EventResponse::Ignored {
            let forward = !event.modifiers.contains(Modifiers::SHIFT);
            if forward {
                self.focus_next();
            } else {
                self.focus_previous();
            }
        }
    }
}
