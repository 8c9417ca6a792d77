//! Software surface over an `image::RgbaImage`.

use image::{Rgba, RgbaImage};

use super::{Color, Surface};
use crate::geometry::{Point, Rect};

/// Rasterizes into an owned RGBA pixel buffer with source-over blending.
pub struct RasterSurface {
    image: RgbaImage,
    clip: Rect,
    origin: Point,
    color: Color,
}

impl RasterSurface {
    /// A transparent surface of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self::from_image(RgbaImage::new(width, height))
    }

    pub fn from_image(image: RgbaImage) -> Self {
        let clip = Rect::new(0, 0, image.width() as i32, image.height() as i32);
        Self {
            image,
            clip,
            origin: Point::default(),
            color: Color::BLACK,
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    fn device_bounds(&self) -> Rect {
        Rect::new(0, 0, self.image.width() as i32, self.image.height() as i32)
    }

    /// Color of a device pixel; transparent outside the buffer.
    pub fn pixel(&self, x: i32, y: i32) -> Color {
        if !self.device_bounds().contains(x, y) {
            return Color::TRANSPARENT;
        }
        Color::from_rgba8(self.image.get_pixel(x as u32, y as u32).0)
    }

    /// Reset a device-space rect to transparent, ignoring clip and origin.
    pub fn clear(&mut self, rect: Rect) {
        let area = rect.intersection(&self.device_bounds());
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                self.image.put_pixel(x as u32, y as u32, Rgba([0, 0, 0, 0]));
            }
        }
    }

    /// Effective drawable area: clip within the buffer.
    fn drawable(&self) -> Rect {
        self.clip.intersection(&self.device_bounds())
    }

    fn blend(&mut self, x: i32, y: i32, src: [u8; 4]) {
        let dst = self.image.get_pixel_mut(x as u32, y as u32);
        *dst = Rgba(blend_over(dst.0, src));
    }
}

/// Source-over compositing of straight-alpha pixels.
fn blend_over(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    let sa = u32::from(src[3]);
    if sa == 255 {
        return src;
    }
    if sa == 0 {
        return dst;
    }
    let da = u32::from(dst[3]);
    let out_a = sa + da * (255 - sa) / 255;
    if out_a == 0 {
        return [0, 0, 0, 0];
    }
    let mut out = [0u8; 4];
    for i in 0..3 {
        let s = u32::from(src[i]) * sa;
        let d = u32::from(dst[i]) * da * (255 - sa) / 255;
        out[i] = ((s + d) / out_a).min(255) as u8;
    }
    out[3] = out_a.min(255) as u8;
    out
}

impl Surface for RasterSurface {
    fn set_clip(&mut self, clip: Rect) {
        self.clip = clip;
    }

    fn clip(&self) -> Rect {
        self.clip
    }

    fn translate(&mut self, dx: i32, dy: i32) {
        self.origin.x += dx;
        self.origin.y += dy;
    }

    fn origin(&self) -> Point {
        self.origin
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn color(&self) -> Color {
        self.color
    }

    fn fill_rect(&mut self, rect: Rect) {
        let target = rect
            .offset(self.origin.x, self.origin.y)
            .intersection(&self.drawable());
        if target.is_empty() {
            return;
        }
        let src = self.color.to_rgba8();
        for y in target.y..target.bottom() {
            for x in target.x..target.right() {
                self.blend(x, y, src);
            }
        }
    }

    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        let area = self.drawable();
        let src = self.color.to_rgba8();
        let (mut x, mut y) = (x1 + self.origin.x, y1 + self.origin.y);
        let (x2, y2) = (x2 + self.origin.x, y2 + self.origin.y);
        let dx = (x2 - x).abs();
        let dy = -(y2 - y).abs();
        let sx = if x < x2 { 1 } else { -1 };
        let sy = if y < y2 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            if area.contains(x, y) {
                self.blend(x, y, src);
            }
            if x == x2 && y == y2 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn draw_image(&mut self, image: &RgbaImage, x: i32, y: i32) {
        let dest = Rect::new(
            x + self.origin.x,
            y + self.origin.y,
            image.width() as i32,
            image.height() as i32,
        );
        let target = dest.intersection(&self.drawable());
        for py in target.y..target.bottom() {
            for px in target.x..target.right() {
                let src = image.get_pixel((px - dest.x) as u32, (py - dest.y) as u32).0;
                self.blend(px, py, src);
            }
        }
    }

    fn draw_image_scaled(&mut self, image: &RgbaImage, dest: Rect) {
        if dest.is_empty() || image.width() == 0 || image.height() == 0 {
            return;
        }
        let dest = dest.offset(self.origin.x, self.origin.y);
        let target = dest.intersection(&self.drawable());
        let (iw, ih) = (image.width() as i64, image.height() as i64);
        for py in target.y..target.bottom() {
            for px in target.x..target.right() {
                // Nearest-neighbour sampling.
                let sx = ((px - dest.x) as i64 * iw / dest.width as i64).min(iw - 1);
                let sy = ((py - dest.y) as i64 * ih / dest.height as i64).min(ih - 1);
                let src = image.get_pixel(sx as u32, sy as u32).0;
                self.blend(px, py, src);
            }
        }
    }
}
