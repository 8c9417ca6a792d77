//! Drawing surfaces.
//!
//! The core draws through the [`Surface`] trait only. Clip rectangles are in
//! device coordinates; every drawing call is relative to the current origin,
//! which the paint walk moves with [`Surface::translate`].

mod raster;
mod recording;

pub use raster::RasterSurface;
pub use recording::{DrawCommand, RecordingSurface};

use image::RgbaImage;

use crate::geometry::{Point, Rect};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as f32 / 255.0,
            g: ((hex >> 8) & 0xFF) as f32 / 255.0,
            b: (hex & 0xFF) as f32 / 255.0,
            a: 1.0,
        }
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [channel(self.r), channel(self.g), channel(self.b), channel(self.a)]
    }

    pub fn from_rgba8(px: [u8; 4]) -> Self {
        Self::rgba(
            f32::from(px[0]) / 255.0,
            f32::from(px[1]) / 255.0,
            f32::from(px[2]) / 255.0,
            f32::from(px[3]) / 255.0,
        )
    }

    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);
}

impl Default for Color {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

/// A raw drawing target provided by the host.
pub trait Surface {
    /// Replace the clip, in device coordinates.
    fn set_clip(&mut self, clip: Rect);

    /// Current clip, in device coordinates.
    fn clip(&self) -> Rect;

    /// Move the drawing origin by (dx, dy).
    fn translate(&mut self, dx: i32, dy: i32);

    /// Current drawing origin, in device coordinates.
    fn origin(&self) -> Point;

    fn set_color(&mut self, color: Color);

    fn color(&self) -> Color;

    fn fill_rect(&mut self, rect: Rect);

    /// One-pixel outline just inside `rect`.
    fn draw_rect(&mut self, rect: Rect) {
        if rect.is_empty() {
            return;
        }
        self.fill_rect(Rect::new(rect.x, rect.y, rect.width, 1));
        self.fill_rect(Rect::new(rect.x, rect.bottom() - 1, rect.width, 1));
        self.fill_rect(Rect::new(rect.x, rect.y, 1, rect.height));
        self.fill_rect(Rect::new(rect.right() - 1, rect.y, 1, rect.height));
    }

    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32);

    /// Draw an image at its natural size with its top-left at (x, y).
    fn draw_image(&mut self, image: &RgbaImage, x: i32, y: i32);

    /// Draw an image scaled to cover `dest`.
    fn draw_image_scaled(&mut self, image: &RgbaImage, dest: Rect);
}
