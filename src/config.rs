//! Field configuration
//!
//! Every knob has a default, so an empty JSON object (or no config at all)
//! gives the stock look.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::connections::ConnectionStrategy;
use crate::model::Color;

/// Errors raised while loading or validating a [`FieldConfig`]
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A field holds a value the engine cannot work with
    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: String,
    },

    /// The JSON document could not be parsed
    #[error("parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Largest accepted `particle_count`
pub const MAX_PARTICLES: usize = 100_000;

/// How the cursor influences nearby particles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorMode {
    /// Particles drift toward the pointer
    #[default]
    Attract,
    /// Particles are pushed away from the pointer
    Repel,
}

/// Tunables for a particle field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldConfig {
    /// Number of particles per (re)initialisation
    pub particle_count: usize,
    /// Pairs closer than this are joined by a line
    pub connection_distance: f64,
    /// Cursor influence radius
    pub cursor_radius: f64,
    /// Fraction of the particle-to-cursor offset applied per frame
    pub cursor_strength: f64,
    pub cursor_mode: CursorMode,
    /// Upper bound of each initial velocity component's magnitude
    pub max_speed: f64,
    pub min_radius: f64,
    pub max_radius: f64,
    pub particle_color: Color,
    /// Line color; its alpha is replaced by the distance-faded opacity
    pub line_color: Color,
    /// Line opacity at zero distance
    pub line_opacity: f64,
    pub line_width: f64,
    pub connection_strategy: ConnectionStrategy,
    /// Opacity of the whole canvas element (browser host only)
    pub canvas_opacity: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            particle_count: 60,
            connection_distance: 150.0,
            cursor_radius: 150.0,
            cursor_strength: 0.02,
            cursor_mode: CursorMode::Attract,
            max_speed: 0.25,
            min_radius: 1.0,
            max_radius: 3.0,
            particle_color: Color::rgba(99, 102, 241, 0.4),
            line_color: Color::rgba(79, 70, 229, 1.0),
            line_opacity: 0.8,
            line_width: 0.8,
            connection_strategy: ConnectionStrategy::Auto,
            canvas_opacity: 0.4,
        }
    }
}

impl FieldConfig {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable by the engine
    pub fn validate(&self) -> ConfigResult<()> {
        if self.particle_count > MAX_PARTICLES {
            return Err(ConfigError::InvalidValue {
                field: "particle_count",
                reason: format!(
                    "{} is more than the maximum of {MAX_PARTICLES}",
                    self.particle_count
                ),
            });
        }
        positive("connection_distance", self.connection_distance)?;
        positive("cursor_radius", self.cursor_radius)?;
        positive("min_radius", self.min_radius)?;
        positive("max_radius", self.max_radius)?;
        positive("line_width", self.line_width)?;
        non_negative("cursor_strength", self.cursor_strength)?;
        non_negative("max_speed", self.max_speed)?;
        unit_interval("line_opacity", self.line_opacity)?;
        unit_interval("canvas_opacity", self.canvas_opacity)?;
        unit_interval("particle_color.a", self.particle_color.a)?;
        unit_interval("line_color.a", self.line_color.a)?;

        if self.min_radius > self.max_radius {
            return Err(ConfigError::InvalidValue {
                field: "min_radius",
                reason: format!(
                    "{} is larger than max_radius {}",
                    self.min_radius, self.max_radius
                ),
            });
        }

        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            reason: format!("expected a positive number, got {value}"),
        })
    }
}

fn non_negative(field: &'static str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            reason: format!("expected zero or more, got {value}"),
        })
    }
}

fn unit_interval(field: &'static str, value: f64) -> ConfigResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            reason: format!("expected a value between 0 and 1, got {value}"),
        })
    }
}
