//! Decorative painters (views), the per-component skin and the named skin
//! registry.

use std::collections::HashMap;
use std::rc::Rc;

use image::RgbaImage;

use crate::geometry::{Insets, Rect, Size};
use crate::surface::{Color, Surface};

/// How a view covers its target rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaintMode {
    /// Scale to the full target.
    #[default]
    Stretch,
    /// Tile the preferred size across the target.
    Mosaic,
    /// Paint once at the preferred size, anchored at the target's inset origin.
    Original,
}

#[derive(Clone)]
pub enum ViewContent {
    Fill(Color),
    /// A border of the given thickness along every edge.
    Frame { color: Color, width: i32 },
    Image(Rc<RgbaImage>),
}

impl std::fmt::Debug for ViewContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewContent::Fill(color) => f.debug_tuple("Fill").field(color).finish(),
            ViewContent::Frame { color, width } => f
                .debug_struct("Frame")
                .field("color", color)
                .field("width", width)
                .finish(),
            ViewContent::Image(img) => f.debug_tuple("Image").field(&img.dimensions()).finish(),
        }
    }
}

/// A stateless decorative painter with cached metrics.
#[derive(Debug, Clone)]
pub struct View {
    mode: PaintMode,
    content: ViewContent,
    insets: Insets,
    preferred: Size,
}

impl View {
    pub fn new(content: ViewContent) -> Self {
        let (insets, preferred) = match &content {
            ViewContent::Fill(_) => (Insets::default(), Size::zero()),
            ViewContent::Frame { width, .. } => {
                let w = (*width).max(0);
                (Insets::all(w), Size::new(w * 2, w * 2))
            }
            ViewContent::Image(img) => (
                Insets::default(),
                Size::new(img.width() as i32, img.height() as i32),
            ),
        };
        Self {
            mode: PaintMode::Stretch,
            content,
            insets,
            preferred,
        }
    }

    pub fn fill(color: Color) -> Self {
        Self::new(ViewContent::Fill(color))
    }

    pub fn frame(color: Color, width: i32) -> Self {
        Self::new(ViewContent::Frame { color, width })
    }

    pub fn image(image: Rc<RgbaImage>) -> Self {
        Self::new(ViewContent::Image(image))
    }

    pub fn with_mode(mut self, mode: PaintMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_insets(mut self, insets: Insets) -> Self {
        self.insets = insets;
        self
    }

    pub fn with_preferred_size(mut self, size: Size) -> Self {
        self.preferred = size;
        self
    }

    pub fn mode(&self) -> PaintMode {
        self.mode
    }

    pub fn content(&self) -> &ViewContent {
        &self.content
    }

    pub fn insets(&self) -> Insets {
        self.insets
    }

    pub fn preferred_size(&self) -> Size {
        self.preferred
    }

    /// Paint into `target` (origin-relative). `anchor_insets` locates the
    /// anchor for [`PaintMode::Original`].
    pub fn paint(&self, surface: &mut dyn Surface, target: Rect, anchor_insets: Insets) {
        match self.mode {
            PaintMode::Stretch => self.render(surface, target),
            PaintMode::Mosaic => self.tile(surface, target),
            PaintMode::Original => {
                let at = Rect::new(
                    target.x + anchor_insets.left,
                    target.y + anchor_insets.top,
                    self.preferred.width,
                    self.preferred.height,
                );
                self.render(surface, at);
            }
        }
    }

    fn tile(&self, surface: &mut dyn Surface, target: Rect) {
        let tile = self.preferred;
        if tile.is_empty() {
            self.render(surface, target);
            return;
        }
        if target.is_empty() {
            return;
        }

        let saved = surface.clip();
        let origin = surface.origin();
        surface.set_clip(saved.intersection(&target.offset(origin.x, origin.y)));

        let cols = (target.width + tile.width - 1) / tile.width;
        let rows = (target.height + tile.height - 1) / tile.height;
        for row in 0..rows {
            for col in 0..cols {
                let cell = Rect::new(
                    target.x + col * tile.width,
                    target.y + row * tile.height,
                    tile.width,
                    tile.height,
                );
                self.render(surface, cell);
            }
        }

        surface.set_clip(saved);
    }

    fn render(&self, surface: &mut dyn Surface, rect: Rect) {
        if rect.is_empty() {
            return;
        }
        match &self.content {
            ViewContent::Fill(color) => {
                surface.set_color(*color);
                surface.fill_rect(rect);
            }
            ViewContent::Frame { color, width } => {
                if *width <= 0 {
                    return;
                }
                let w = (*width).min(rect.width / 2).min(rect.height / 2).max(1);
                surface.set_color(*color);
                surface.fill_rect(Rect::new(rect.x, rect.y, rect.width, w));
                surface.fill_rect(Rect::new(rect.x, rect.bottom() - w, rect.width, w));
                surface.fill_rect(Rect::new(rect.x, rect.y + w, w, rect.height - 2 * w));
                surface.fill_rect(Rect::new(
                    rect.right() - w,
                    rect.y + w,
                    w,
                    rect.height - 2 * w,
                ));
            }
            ViewContent::Image(img) => {
                if rect.size() == Size::new(img.width() as i32, img.height() as i32) {
                    surface.draw_image(img, rect.x, rect.y);
                } else {
                    surface.draw_image_scaled(img, rect);
                }
            }
        }
    }
}

/// Background, border and face views of a component. Each is optional.
#[derive(Debug, Clone, Default)]
pub struct Skin {
    pub background: Option<View>,
    pub border: Option<View>,
    pub face: Option<View>,
}

impl Skin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn background(mut self, view: View) -> Self {
        self.background = Some(view);
        self
    }

    pub fn border(mut self, view: View) -> Self {
        self.border = Some(view);
        self
    }

    pub fn face(mut self, view: View) -> Self {
        self.face = Some(view);
        self
    }

    fn views(&self) -> impl Iterator<Item = &View> {
        [&self.background, &self.border, &self.face]
            .into_iter()
            .flatten()
    }

    /// Element-wise max of the present views' insets.
    pub fn insets(&self) -> Insets {
        self.views()
            .fold(Insets::default(), |acc, v| acc.max(v.insets()))
    }

    /// Element-wise max of the present views' preferred sizes.
    pub fn preferred_size(&self) -> Size {
        self.views()
            .fold(Size::zero(), |acc, v| acc.max(v.preferred_size()))
    }

    /// Paint the skin over a component's local rect.
    ///
    /// Order: border over the whole rect, background inside the border's
    /// insets, then the face. An original-mode face is placed after the
    /// component's insets; any other face covers the content rect.
    pub fn paint(&self, surface: &mut dyn Surface, local: Rect, insets: Insets) {
        let inner = match &self.border {
            Some(border) => {
                border.paint(surface, local, Insets::default());
                local.shrink(border.insets())
            }
            None => local,
        };
        if let Some(background) = &self.background {
            background.paint(surface, inner, Insets::default());
        }
        if let Some(face) = &self.face {
            if face.mode() == PaintMode::Original {
                face.paint(surface, local, insets);
            } else {
                face.paint(surface, local.shrink(insets), Insets::default());
            }
        }
    }
}

/// Source of named skins.
pub trait ResourceLookup {
    fn skin(&self, key: &str) -> Option<Skin>;
}

/// In-memory skin registry.
#[derive(Debug, Default)]
pub struct ViewManager {
    skins: HashMap<String, Skin>,
}

impl ViewManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a skin, returning the one it replaces.
    pub fn register(&mut self, key: impl Into<String>, skin: Skin) -> Option<Skin> {
        self.skins.insert(key.into(), skin)
    }

    pub fn unregister(&mut self, key: &str) -> Option<Skin> {
        self.skins.remove(key)
    }

    pub fn len(&self) -> usize {
        self.skins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skins.is_empty()
    }
}

impl ResourceLookup for ViewManager {
    fn skin(&self, key: &str) -> Option<Skin> {
        self.skins.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, RecordingSurface};

    const RED: Color = Color::rgb(1.0, 0.0, 0.0);

    #[test]
    fn test_stretch_covers_target() {
        let mut surface = RecordingSurface::new(100, 100);
        View::fill(RED).paint(&mut surface, Rect::new(5, 5, 30, 20), Insets::default());
        assert_eq!(surface.fills(), vec![(Rect::new(5, 5, 30, 20), RED)]);
    }

    #[test]
    fn test_zero_width_frame_paints_nothing() {
        let mut surface = RecordingSurface::new(100, 100);
        let view = View::frame(RED, 0);
        assert_eq!(view.insets(), Insets::default());
        view.paint(&mut surface, Rect::new(5, 5, 30, 20), Insets::default());
        assert!(surface.fills().is_empty());
    }

    #[test]
    fn test_mosaic_tiles_with_ceiling_division() {
        let mut surface = RecordingSurface::new(100, 100);
        let view = View::fill(RED)
            .with_preferred_size(Size::new(10, 10))
            .with_mode(PaintMode::Mosaic);
        view.paint(&mut surface, Rect::new(0, 0, 25, 15), Insets::default());

        let fills = surface.fills();
        // ceil(25/10) x ceil(15/10) tiles.
        assert_eq!(fills.len(), 6);
        // The last column and row are clipped to the target.
        assert!(fills.contains(&(Rect::new(20, 10, 5, 5), RED)));
        assert_eq!(surface.clip(), Rect::new(0, 0, 100, 100));
    }

    #[test]
    fn test_original_ignores_target_size() {
        let mut surface = RecordingSurface::new(100, 100);
        let view = View::fill(RED)
            .with_preferred_size(Size::new(4, 3))
            .with_mode(PaintMode::Original);
        view.paint(&mut surface, Rect::new(0, 0, 50, 50), Insets::new(2, 1, 0, 0));
        assert_eq!(surface.fills(), vec![(Rect::new(1, 2, 4, 3), RED)]);
    }

    #[test]
    fn test_image_view_prefers_image_size() {
        let view = View::image(Rc::new(RgbaImage::new(7, 3)));
        assert_eq!(view.preferred_size(), Size::new(7, 3));

        let mut surface = RecordingSurface::new(100, 100);
        view.paint(&mut surface, Rect::new(0, 0, 14, 6), Insets::default());
        assert_eq!(
            surface.commands(),
            &[DrawCommand::Image {
                dest: Rect::new(0, 0, 14, 6),
                size: (7, 3)
            }]
        );
    }

    #[test]
    fn test_skin_metrics_are_elementwise_max() {
        let skin = Skin::new()
            .border(View::frame(Color::BLACK, 2))
            .face(View::fill(RED).with_preferred_size(Size::new(1, 9)).with_insets(Insets::new(0, 5, 0, 0)));
        assert_eq!(skin.insets(), Insets::new(2, 5, 2, 2));
        assert_eq!(skin.preferred_size(), Size::new(4, 9));
        assert_eq!(Skin::new().preferred_size(), Size::zero());
    }

    #[test]
    fn test_skin_paint_order() {
        let blue = Color::rgb(0.0, 0.0, 1.0);
        let skin = Skin::new()
            .border(View::frame(Color::BLACK, 1))
            .background(View::fill(blue))
            .face(View::fill(RED).with_preferred_size(Size::new(2, 2)).with_mode(PaintMode::Original));

        let mut surface = RecordingSurface::new(100, 100);
        let local = Rect::new(0, 0, 10, 10);
        skin.paint(&mut surface, local, skin.insets());

        let fills = surface.fills();
        assert_eq!(fills.len(), 6);
        assert!(fills[..4].iter().all(|(_, c)| *c == Color::BLACK));
        assert_eq!(fills[4], (Rect::new(1, 1, 8, 8), blue));
        assert_eq!(fills[5], (Rect::new(1, 1, 2, 2), RED));
    }

    #[test]
    fn test_view_manager_lookup() {
        let mut manager = ViewManager::new();
        assert!(manager.skin("button").is_none());
        manager.register("button", Skin::new().background(View::fill(RED)));
        assert!(manager.skin("button").is_some());
        assert_eq!(manager.len(), 1);
        assert!(manager.unregister("button").is_some());
        assert!(manager.is_empty());
    }
}
