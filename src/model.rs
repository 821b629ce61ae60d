//! Core data types for the particle field
//!
//! Plain values with no rendering or browser dependencies, so everything here
//! can be unit tested natively.

use std::ops::{Add, AddAssign, Mul, Sub};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{CursorMode, FieldConfig};

/// A 2D point or vector in canvas pixels
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Euclidean distance between two points
    pub fn distance(self, other: Self) -> f64 {
        (other - self).length()
    }
}

impl Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// Size of the drawable area in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether particles can be seeded into this viewport at all
    pub fn is_drawable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Closed-interval containment, `[0, width] x [0, height]`
    pub fn contains(&self, point: Vec2) -> bool {
        (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
    }
}

/// Pointer position plus the zone it influences
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    /// `None` until the first pointer event
    pub position: Option<Vec2>,
    /// Influence radius in pixels
    pub radius: f64,
    /// Fraction of the offset to the cursor applied per frame at zero distance
    pub strength: f64,
    pub mode: CursorMode,
}

impl Cursor {
    /// A cursor that has not been seen yet, using the config's influence
    /// settings. It influences nothing until it gets a position.
    pub fn idle(config: &FieldConfig) -> Self {
        Self {
            position: None,
            radius: config.cursor_radius,
            strength: config.cursor_strength,
            mode: config.cursor_mode,
        }
    }

    /// Displacement this cursor applies to a particle at `point`, if any.
    ///
    /// Falls off linearly from the full strength at the cursor to nothing at
    /// the edge of the radius.
    pub fn displacement(&self, point: Vec2) -> Option<Vec2> {
        let delta = self.position? - point;
        let distance = delta.length();
        if distance >= self.radius {
            return None;
        }

        let force = (self.radius - distance) / self.radius;
        let shift = delta * (force * self.strength);
        Some(match self.mode {
            CursorMode::Attract => shift,
            CursorMode::Repel => shift * -1.0,
        })
    }
}

/// The mutable state shared between input events and frames.
///
/// Event handlers write it, the next frame reads it. Latest value wins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stage {
    pub viewport: Viewport,
    pub cursor: Cursor,
}

impl Stage {
    pub fn new(viewport: Viewport, config: &FieldConfig) -> Self {
        Self {
            viewport,
            cursor: Cursor::idle(config),
        }
    }
}

/// RGBA color with 8-bit channels and a floating point alpha
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: f64,
}

fn opaque() -> f64 {
    1.0
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with a different alpha
    pub const fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// CSS `rgba()` notation, alpha rounded to three decimals
    pub fn to_css(&self) -> String {
        let alpha = (self.a * 1000.0).round() / 1000.0;
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha)
    }
}

/// A single simulated point
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Drawn circle radius, fixed for the particle's lifetime
    pub radius: f64,
}

impl Particle {
    pub const fn new(position: Vec2, velocity: Vec2, radius: f64) -> Self {
        Self {
            position,
            velocity,
            radius,
        }
    }

    /// Seed a particle somewhere inside `viewport`.
    ///
    /// The viewport must be drawable, otherwise the position ranges are empty.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, viewport: Viewport, config: &FieldConfig) -> Self {
        let position = Vec2::new(
            rng.gen_range(0.0..viewport.width),
            rng.gen_range(0.0..viewport.height),
        );
        let velocity = Vec2::new(
            random_component(rng, config.max_speed),
            random_component(rng, config.max_speed),
        );
        let radius = if config.max_radius > config.min_radius {
            rng.gen_range(config.min_radius..config.max_radius)
        } else {
            config.min_radius
        };

        Self::new(position, velocity, radius)
    }

    /// Move by one frame's velocity, then bounce off the viewport edges.
    ///
    /// The velocity is reflected, the position is never clamped, so a
    /// particle can sit up to one step outside before coming back.
    pub fn advance(&mut self, viewport: Viewport) {
        self.position += self.velocity;

        if self.position.x < 0.0 || self.position.x > viewport.width {
            self.velocity.x = -self.velocity.x;
        }
        if self.position.y < 0.0 || self.position.y > viewport.height {
            self.velocity.y = -self.velocity.y;
        }
    }

    /// Nudge the particle according to the cursor's influence
    pub fn apply_cursor(&mut self, cursor: &Cursor) {
        if let Some(shift) = cursor.displacement(self.position) {
            self.position += shift;
        }
    }
}

/// Magnitude in `[0, max)` with a random sign
fn random_component<R: Rng + ?Sized>(rng: &mut R, max: f64) -> f64 {
    if max <= 0.0 {
        return 0.0;
    }
    let magnitude = rng.gen_range(0.0..max);
    if rng.gen_bool(0.5) { magnitude } else { -magnitude }
}
