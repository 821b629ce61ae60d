use std::fs;
use std::path::Path;

use anyhow::Context;
use askama::Template;
use neural_field::{Color, Surface, Vec2, Viewport};

/// Page background behind the field, matching the site's near-black
pub const BACKGROUND: &str = "#030303";

/// Circle element with pre-formatted attributes
#[derive(Debug, Clone)]
pub struct SvgCircle {
    pub cx: String,
    pub cy: String,
    pub r: String,
    pub fill: String,
}

/// Line element with pre-formatted attributes
#[derive(Debug, Clone)]
pub struct SvgLine {
    pub x1: String,
    pub y1: String,
    pub x2: String,
    pub y2: String,
    pub stroke: String,
    pub width: String,
}

#[derive(Template)]
#[template(path = "frame.svg")]
struct FrameTemplate<'a> {
    width: String,
    height: String,
    background: &'a str,
    circles: &'a [SvgCircle],
    lines: &'a [SvgLine],
}

/// Surface that captures a frame as an SVG document
#[derive(Debug, Clone)]
pub struct SvgSurface {
    viewport: Viewport,
    background: String,
    circles: Vec<SvgCircle>,
    lines: Vec<SvgLine>,
}

impl SvgSurface {
    pub fn new(background: &str) -> Self {
        Self {
            viewport: Viewport::default(),
            background: background.to_string(),
            circles: Vec::new(),
            lines: Vec::new(),
        }
    }

    /// Render the captured frame
    pub fn render(&self) -> askama::Result<String> {
        FrameTemplate {
            width: self.viewport.width.to_string(),
            height: self.viewport.height.to_string(),
            background: &self.background,
            circles: &self.circles,
            lines: &self.lines,
        }
        .render()
    }

    /// Render the captured frame into `path`
    pub fn write(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let svg = self.render()?;
        fs::write(path, svg).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}

fn px(value: f64) -> String {
    format!("{value:.2}")
}

impl Surface for SvgSurface {
    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn clear(&mut self) {
        self.circles.clear();
        self.lines.clear();
    }

    fn fill_circle(&mut self, center: Vec2, radius: f64, color: Color) {
        self.circles.push(SvgCircle {
            cx: px(center.x),
            cy: px(center.y),
            r: px(radius),
            fill: color.to_css(),
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f64, color: Color) {
        self.lines.push(SvgLine {
            x1: px(from.x),
            y1: px(from.y),
            x2: px(to.x),
            y2: px(to.y),
            stroke: color.to_css(),
            width: width.to_string(),
        });
    }
}
