//! Render targets
//!
//! The field only ever needs four operations from whatever it draws on. The
//! browser host implements them over a 2D canvas context, the CLI over an
//! SVG document, and tests over [`RecordingSurface`].

use crate::model::{Color, Vec2, Viewport};

/// Something a frame can be drawn onto
pub trait Surface {
    /// Match the surface's pixel size to the viewport
    fn resize(&mut self, viewport: Viewport);

    /// Wipe the previous frame
    fn clear(&mut self);

    fn fill_circle(&mut self, center: Vec2, radius: f64, color: Color);

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f64, color: Color);
}

/// One recorded drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Circle {
        center: Vec2,
        radius: f64,
        color: Color,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f64,
        color: Color,
    },
}

/// Surface that remembers what was drawn in the current frame
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    /// Commands since the last [`Surface::clear`], starting with that clear
    pub commands: Vec<DrawCommand>,
    pub viewport: Viewport,
    /// How many frames have been started
    pub clears: u64,
    pub resizes: u64,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
    }
}

impl Surface for RecordingSurface {
    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.resizes += 1;
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
        self.clears += 1;
    }

    fn fill_circle(&mut self, center: Vec2, radius: f64, color: Color) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f64, color: Color) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_starts_a_new_frame() {
        let mut surface = RecordingSurface::new();
        let color = Color::rgba(0, 0, 0, 1.0);

        surface.clear();
        surface.fill_circle(Vec2::new(1.0, 1.0), 2.0, color);
        surface.stroke_line(Vec2::default(), Vec2::new(3.0, 4.0), 1.0, color);
        assert_eq!(surface.commands.len(), 3);
        assert_eq!(surface.circles().count(), 1);
        assert_eq!(surface.lines().count(), 1);

        surface.clear();
        assert_eq!(surface.commands, vec![DrawCommand::Clear]);
        assert_eq!(surface.clears, 2);
    }

    #[test]
    fn resize_tracks_viewport() {
        let mut surface = RecordingSurface::new();
        surface.resize(Viewport::new(320.0, 240.0));

        assert_eq!(surface.viewport, Viewport::new(320.0, 240.0));
        assert_eq!(surface.resizes, 1);
    }
}
