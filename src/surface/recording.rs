//! A surface that records draw calls instead of rasterizing them.

use image::RgbaImage;

use super::{Color, Surface};
use crate::geometry::{Point, Rect};

/// A single recorded draw call. Geometry is in device coordinates and
/// already clipped; calls that were clipped away entirely are not recorded.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect { rect: Rect, color: Color },
    Line {
        from: Point,
        to: Point,
        color: Color,
        clip: Rect,
    },
    Image { dest: Rect, size: (u32, u32) },
}

impl DrawCommand {
    pub fn fill_rect(rect: Rect, color: Color) -> Self {
        Self::FillRect { rect, color }
    }
}

/// Records every visible draw call for inspection in tests and debugging.
#[derive(Debug)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    clip: Rect,
    origin: Point,
    color: Color,
}

impl RecordingSurface {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            commands: Vec::new(),
            clip: Rect::new(0, 0, width, height),
            origin: Point::default(),
            color: Color::BLACK,
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Filled rects only, in call order.
    pub fn fills(&self) -> Vec<(Rect, Color)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillRect { rect, color } => Some((*rect, *color)),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
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
        let rect = rect
            .offset(self.origin.x, self.origin.y)
            .intersection(&self.clip);
        if !rect.is_empty() {
            self.commands.push(DrawCommand::FillRect {
                rect,
                color: self.color,
            });
        }
    }

    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        if self.clip.is_empty() {
            return;
        }
        self.commands.push(DrawCommand::Line {
            from: Point::new(x1 + self.origin.x, y1 + self.origin.y),
            to: Point::new(x2 + self.origin.x, y2 + self.origin.y),
            color: self.color,
            clip: self.clip,
        });
    }

    fn draw_image(&mut self, image: &RgbaImage, x: i32, y: i32) {
        let dest = Rect::new(
            x + self.origin.x,
            y + self.origin.y,
            image.width() as i32,
            image.height() as i32,
        )
        .intersection(&self.clip);
        if !dest.is_empty() {
            self.commands.push(DrawCommand::Image {
                dest,
                size: image.dimensions(),
            });
        }
    }

    fn draw_image_scaled(&mut self, image: &RgbaImage, dest: Rect) {
        let dest = dest
            .offset(self.origin.x, self.origin.y)
            .intersection(&self.clip);
        if !dest.is_empty() {
            self.commands.push(DrawCommand::Image {
                dest,
                size: image.dimensions(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_clipped_device_rects() {
        let mut surface = RecordingSurface::new(100, 100);
        surface.translate(10, 10);
        surface.set_clip(Rect::new(10, 10, 5, 5));
        surface.set_color(Color::WHITE);
        surface.fill_rect(Rect::new(0, 0, 20, 20));
        surface.fill_rect(Rect::new(50, 50, 5, 5));

        assert_eq!(
            surface.commands(),
            &[DrawCommand::fill_rect(Rect::new(10, 10, 5, 5), Color::WHITE)]
        );
    }

    #[test]
    fn test_draw_rect_outline_is_four_fills() {
        let mut surface = RecordingSurface::new(100, 100);
        surface.draw_rect(Rect::new(0, 0, 10, 10));
        assert_eq!(surface.fills().len(), 4);
    }
}
