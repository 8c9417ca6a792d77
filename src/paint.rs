//! Paint walk, damage tracking and double buffering.
//!
//! The walk recurses from a root in child-list order. Each component paints
//! in its own coordinate space with the clip narrowed to the intersection of
//! its ancestors' clips and its own bounds:
//!
//! 1. `update` (background fill), opaque components only
//! 2. the skin: border, then background, then face
//! 3. `paint`
//! 4. children, each clipped to its own bounds
//! 5. `paint_on_top`, with the component's full clip restored
//!
//! Repaint requests do not paint. They are converted to desktop coordinates
//! and merged into one pending damage rect that the desktop hands to the host.

use std::mem;

use image::RgbaImage;

use crate::geometry::{Rect, Size};
use crate::surface::{Color, RasterSurface, Surface};
use crate::tree::{ComponentId, ComponentTree};

/// Drives painting and collects damage for one desktop.
#[derive(Debug)]
pub struct PaintManager {
    damage: Option<Rect>,
    buffer: Option<DoubleBuffer>,
}

impl PaintManager {
    /// `buffer_limit` enables double buffering with that maximum buffer size.
    pub fn new(buffer_limit: Option<Size>) -> Self {
        Self {
            damage: None,
            buffer: buffer_limit.map(DoubleBuffer::new),
        }
    }

    /// Record damage for part of a component, in its local coordinates.
    ///
    /// Returns false and records nothing when the component is not showing
    /// or the clipped rect has no area.
    pub fn request(
        &mut self,
        tree: &ComponentTree,
        id: ComponentId,
        rect: Option<Rect>,
        screen: Rect,
    ) -> bool {
        if !tree.is_showing(id) {
            return false;
        }
        let local = tree.state(id).map(|s| s.local_rect()).unwrap_or_default();
        let rect = rect.unwrap_or(local);
        if rect.is_empty() {
            return false;
        }
        let origin = tree.absolute_origin(id);
        let absolute = rect.offset(origin.x, origin.y).intersection(&screen);
        self.add_damage(absolute)
    }

    /// Merge a rect already in desktop coordinates.
    pub fn add_damage(&mut self, rect: Rect) -> bool {
        if rect.is_empty() {
            return false;
        }
        self.damage = Some(match self.damage {
            Some(pending) => pending.union(&rect),
            None => rect,
        });
        true
    }

    pub fn pending_damage(&self) -> Option<Rect> {
        self.damage
    }

    pub fn take_damage(&mut self) -> Option<Rect> {
        self.damage.take()
    }

    pub fn buffer(&self) -> Option<&DoubleBuffer> {
        self.buffer.as_ref()
    }

    /// Paint `roots` bottom to top into `target`, limited to its current clip.
    ///
    /// `background` fills the clip first. With double buffering on, clips
    /// that fit the buffer limit are composed off screen and copied in one
    /// `draw_image`; larger ones are painted straight into `target`.
    pub fn paint_roots(
        &mut self,
        tree: &ComponentTree,
        roots: &[ComponentId],
        background: Color,
        target: &mut dyn Surface,
    ) {
        let clip = target.clip();
        if clip.is_empty() {
            return;
        }

        let buffered = self
            .buffer
            .as_mut()
            .map(|b| b.prepare(clip.size()))
            .unwrap_or(false);
        let Some(buffer) = self.buffer.as_mut().filter(|_| buffered) else {
            paint_direct(tree, roots, background, target, clip);
            return;
        };

        let mut raster = RasterSurface::from_image(mem::take(&mut buffer.image));
        let area = Rect::from_size(clip.size());
        raster.clear(area);
        raster.set_clip(area);
        raster.translate(-clip.x, -clip.y);
        fill_background(&mut raster, background, clip);
        for &root in roots {
            paint_component(tree, root, &mut raster);
        }
        buffer.image = raster.into_image();

        let origin = target.origin();
        target.draw_image(&buffer.image, clip.x - origin.x, clip.y - origin.y);
    }
}

impl Default for PaintManager {
    fn default() -> Self {
        Self::new(None)
    }
}

fn paint_direct(
    tree: &ComponentTree,
    roots: &[ComponentId],
    background: Color,
    target: &mut dyn Surface,
    clip: Rect,
) {
    let origin = target.origin();
    fill_background(target, background, clip.offset(-origin.x, -origin.y));
    for &root in roots {
        paint_component(tree, root, target);
        target.set_clip(clip);
    }
}

fn fill_background(surface: &mut dyn Surface, color: Color, rect: Rect) {
    if color.a > 0.0 {
        surface.set_color(color);
        surface.fill_rect(rect);
    }
}

/// Paint `id` and its subtree. The surface origin must be at the origin of
/// `id`'s parent (or of the desktop, for a root).
///
/// Surface clip and origin are restored before returning.
pub fn paint_component(tree: &ComponentTree, id: ComponentId, surface: &mut dyn Surface) {
    let Some(state) = tree.state(id) else {
        return;
    };
    if !state.is_visible() {
        return;
    }

    let saved = surface.clip();
    let origin = surface.origin();
    let bounds = state.bounds();
    let clip = saved.intersection(&bounds.offset(origin.x, origin.y));
    if clip.is_empty() {
        return;
    }

    surface.translate(bounds.x, bounds.y);
    surface.set_clip(clip);

    tree.with_widget(id, |widget| {
        if state.is_opaque() {
            widget.update(state, surface);
        }
        if let Some(skin) = state.skin() {
            skin.paint(surface, state.local_rect(), state.insets());
        }
        widget.paint(state, surface);
    });

    for &child in tree.children(id) {
        paint_component(tree, child, surface);
    }

    surface.set_clip(clip);
    tree.with_widget(id, |widget| widget.paint_on_top(state, surface));

    surface.translate(-bounds.x, -bounds.y);
    surface.set_clip(saved);
}

/// Reusable off-screen image for buffered paints.
#[derive(Debug)]
pub struct DoubleBuffer {
    image: RgbaImage,
    limit: Size,
}

impl DoubleBuffer {
    pub fn new(limit: Size) -> Self {
        Self {
            image: RgbaImage::new(0, 0),
            limit,
        }
    }

    /// Current buffer size: the largest clip seen so far within the limit.
    pub fn size(&self) -> Size {
        Size::new(self.image.width() as i32, self.image.height() as i32)
    }

    pub fn limit(&self) -> Size {
        self.limit
    }

    pub fn set_limit(&mut self, limit: Size) {
        self.limit = limit;
        if self.size().width > limit.width || self.size().height > limit.height {
            self.image = RgbaImage::new(0, 0);
        }
    }

    /// Grow the buffer to hold `clip`. Returns false when `clip` exceeds the
    /// limit and must be painted directly.
    fn prepare(&mut self, clip: Size) -> bool {
        if clip.width > self.limit.width || clip.height > self.limit.height {
            return false;
        }
        let current = self.size();
        if clip.width > current.width || clip.height > current.height {
            let grown = current.max(clip);
            log::trace!(
                "double buffer grows from {}x{} to {}x{}",
                current.width,
                current.height,
                grown.width,
                grown.height
            );
            self.image = RgbaImage::new(grown.width as u32, grown.height as u32);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::component::{ComponentFlags, ComponentState, Widget};
    use crate::layout::NullLayout;
    use crate::surface::{DrawCommand, RecordingSurface};
    use crate::view::{PaintMode, Skin, View};

    const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);

    /// Logs paint hooks and paints its whole local rect in `color`.
    struct Painter {
        name: &'static str,
        color: Color,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Widget for Painter {
        fn update(&self, state: &ComponentState, surface: &mut dyn Surface) {
            self.log.borrow_mut().push(format!("{}.update", self.name));
            surface.set_color(Color::WHITE);
            surface.fill_rect(state.local_rect());
        }

        fn paint(&self, state: &ComponentState, surface: &mut dyn Surface) {
            self.log.borrow_mut().push(format!("{}.paint", self.name));
            surface.set_color(self.color);
            surface.fill_rect(state.local_rect());
        }

        fn paint_on_top(&self, _: &ComponentState, surface: &mut dyn Surface) {
            self.log
                .borrow_mut()
                .push(format!("{}.top {:?}", self.name, surface.clip()));
        }
    }

    fn painter(name: &'static str, color: Color, log: &Rc<RefCell<Vec<String>>>) -> Painter {
        Painter {
            name,
            color,
            log: Rc::clone(log),
        }
    }

    fn two_level(log: &Rc<RefCell<Vec<String>>>) -> (ComponentTree, ComponentId, ComponentId) {
        let mut tree = ComponentTree::new();
        let root = tree.insert_container(painter("root", RED, log), NullLayout);
        let child = tree.insert(painter("child", GREEN, log));
        tree.add(root, child, None).unwrap();
        tree.state_mut(root).unwrap().bounds = Rect::new(0, 0, 50, 50);
        tree.state_mut(child).unwrap().bounds = Rect::new(40, 40, 20, 20);
        (tree, root, child)
    }

    #[test]
    fn test_paint_order_and_child_clip() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (tree, root, _) = two_level(&log);
        let mut surface = RecordingSurface::new(100, 100);

        paint_component(&tree, root, &mut surface);

        assert_eq!(
            *log.borrow(),
            vec![
                "root.paint".to_string(),
                "child.paint".to_string(),
                format!("child.top {:?}", Rect::new(40, 40, 10, 10)),
                format!("root.top {:?}", Rect::new(0, 0, 50, 50)),
            ]
        );
        // The child is clipped to the parent's bounds.
        assert_eq!(
            surface.fills(),
            vec![
                (Rect::new(0, 0, 50, 50), RED),
                (Rect::new(40, 40, 10, 10), GREEN)
            ]
        );
        assert_eq!(surface.clip(), Rect::new(0, 0, 100, 100));
        assert_eq!(surface.origin(), crate::geometry::Point::default());
    }

    #[test]
    fn test_update_runs_only_when_opaque() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (mut tree, root, _) = two_level(&log);
        tree.state_mut(root)
            .unwrap()
            .flags
            .insert(ComponentFlags::OPAQUE);

        paint_component(&tree, root, &mut RecordingSurface::new(100, 100));
        assert_eq!(log.borrow()[0], "root.update");
        assert!(!log.borrow().iter().any(|l| l == "child.update"));
    }

    #[test]
    fn test_hidden_components_are_skipped() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (mut tree, root, child) = two_level(&log);
        tree.state_mut(child)
            .unwrap()
            .flags
            .remove(ComponentFlags::VISIBLE);

        paint_component(&tree, root, &mut RecordingSurface::new(100, 100));
        assert!(!log.borrow().iter().any(|l| l.starts_with("child")));
    }

    #[test]
    fn test_skin_paints_before_content() {
        struct Plain;
        impl Widget for Plain {}

        let mut tree = ComponentTree::new();
        let id = tree.insert(Plain);
        let face = View::fill(BLUE)
            .with_preferred_size(Size::new(2, 2))
            .with_mode(PaintMode::Original);
        let state = tree.state_mut(id).unwrap();
        state.bounds = Rect::new(10, 10, 10, 10);
        state.skin = Some(Skin::new().border(View::frame(RED, 1)).face(face));

        let mut surface = RecordingSurface::new(100, 100);
        paint_component(&tree, id, &mut surface);
        let fills = surface.fills();
        assert_eq!(fills.len(), 5);
        assert_eq!(fills[4], (Rect::new(11, 11, 2, 2), BLUE));
    }

    #[test]
    fn test_repaint_translates_to_desktop_coordinates() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (tree, _, child) = two_level(&log);
        let mut paint = PaintManager::default();
        let screen = Rect::new(0, 0, 55, 100);

        assert!(paint.request(&tree, child, Some(Rect::new(1, 2, 3, 4)), screen));
        assert_eq!(paint.pending_damage(), Some(Rect::new(41, 42, 3, 4)));

        // Clipped to the screen.
        paint.take_damage();
        paint.request(&tree, child, None, screen);
        assert_eq!(paint.take_damage(), Some(Rect::new(40, 40, 15, 20)));
    }

    #[test]
    fn test_repaint_is_idempotent_and_skips_hidden() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (mut tree, root, child) = two_level(&log);
        let mut paint = PaintManager::default();
        let screen = Rect::new(0, 0, 100, 100);

        paint.request(&tree, child, Some(Rect::new(0, 0, 5, 5)), screen);
        let once = paint.pending_damage();
        paint.request(&tree, child, Some(Rect::new(0, 0, 5, 5)), screen);
        assert_eq!(paint.pending_damage(), once);

        paint.take_damage();
        assert!(!paint.request(&tree, child, Some(Rect::new(0, 0, 0, 5)), screen));
        tree.state_mut(root)
            .unwrap()
            .flags
            .remove(ComponentFlags::VISIBLE);
        assert!(!paint.request(&tree, child, None, screen));
        assert_eq!(paint.pending_damage(), None);
    }

    #[test]
    fn test_double_buffer_copies_in_one_image() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (tree, root, _) = two_level(&log);
        let mut paint = PaintManager::new(Some(Size::new(100, 100)));
        let mut target = RecordingSurface::new(100, 100);
        target.set_clip(Rect::new(10, 10, 30, 20));

        paint.paint_roots(&tree, &[root], Color::BLACK, &mut target);
        assert_eq!(
            target.commands(),
            &[DrawCommand::Image {
                dest: Rect::new(10, 10, 30, 20),
                size: (30, 20)
            }]
        );
        assert_eq!(paint.buffer().unwrap().size(), Size::new(30, 20));

        // The buffer only grows.
        target.set_clip(Rect::new(0, 0, 10, 40));
        paint.paint_roots(&tree, &[root], Color::BLACK, &mut target);
        assert_eq!(paint.buffer().unwrap().size(), Size::new(30, 40));
    }

    #[test]
    fn test_double_buffer_bypassed_above_limit() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (tree, root, _) = two_level(&log);
        let mut paint = PaintManager::new(Some(Size::new(20, 20)));
        let mut target = RecordingSurface::new(100, 100);

        paint.paint_roots(&tree, &[root], Color::BLACK, &mut target);
        let fills = target.fills();
        assert_eq!(fills[0], (Rect::new(0, 0, 100, 100), Color::BLACK));
        assert_eq!(fills[1], (Rect::new(0, 0, 50, 50), RED));
        assert_eq!(paint.buffer().unwrap().size(), Size::zero());
    }

    #[test]
    fn test_buffered_pixels_match_direct_paint() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (tree, root, _) = two_level(&log);

        let mut direct = RasterSurface::new(60, 60);
        PaintManager::new(None).paint_roots(&tree, &[root], BLUE, &mut direct);

        let mut buffered = RasterSurface::new(60, 60);
        buffered.set_clip(Rect::new(30, 30, 30, 30));
        PaintManager::new(Some(Size::new(60, 60))).paint_roots(&tree, &[root], BLUE, &mut buffered);

        for (x, y) in [(35, 35), (45, 45), (55, 55)] {
            assert_eq!(buffered.pixel(x, y), direct.pixel(x, y));
        }
        assert_eq!(buffered.pixel(45, 45), GREEN);
        assert_eq!(buffered.pixel(55, 55), BLUE);
        // Outside the clip nothing was drawn.
        assert_eq!(buffered.pixel(5, 5), Color::TRANSPARENT);
    }
}
