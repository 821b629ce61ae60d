//! neural-field - an animated particle field for decorative page backgrounds.
//!
//! Moving points bounce around the viewport, nearby points are joined by
//! lines that fade with distance, and the pointer pulls (or pushes) the
//! points around it. The engine here knows nothing about browsers: hosts
//! provide a [`surface::Surface`] and call [`engine::Engine::frame`] once per
//! display refresh.

pub mod config;
pub mod connections;
pub mod engine;
pub mod field;
pub mod model;
pub mod surface;

pub use config::{ConfigError, CursorMode, FieldConfig};
pub use connections::ConnectionStrategy;
pub use engine::{Engine, FrameOutcome, HeadlessHost, Lifecycle};
pub use field::ParticleField;
pub use model::{Color, Cursor, Particle, Stage, Vec2, Viewport};
pub use surface::{DrawCommand, RecordingSurface, Surface};
