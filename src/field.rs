//! The particle field simulation
//!
//! Owns the particle set and this frame's connections. Everything the
//! outside world changes between frames (viewport size, cursor) arrives
//! through a [`Stage`] passed into [`ParticleField::step`].

use rand::Rng;

use crate::config::{FieldConfig, MAX_PARTICLES};
use crate::connections::{Connection, NeighborScan, Scanner};
use crate::model::{Particle, Stage, Viewport};
use crate::surface::Surface;

/// A set of moving points joined by proximity lines
#[derive(Debug, Clone)]
pub struct ParticleField {
    config: FieldConfig,
    particles: Vec<Particle>,
    connections: Vec<Connection>,
    scanner: Scanner,
}

impl ParticleField {
    /// Create an empty field; call [`ParticleField::init`] to seed it
    pub fn new(config: FieldConfig) -> Self {
        let scanner = Scanner::for_strategy(config.connection_strategy, config.particle_count);
        Self {
            particles: Vec::with_capacity(config.particle_count.min(MAX_PARTICLES)),
            connections: Vec::new(),
            scanner,
            config,
        }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Connections found by the last [`ParticleField::step`]
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Throw away the current particles and seed a fresh set inside
    /// `viewport`.
    ///
    /// Does nothing if the viewport has no area.
    pub fn init<R: Rng + ?Sized>(&mut self, viewport: Viewport, rng: &mut R) {
        if !viewport.is_drawable() {
            tracing::debug!(
                width = viewport.width,
                height = viewport.height,
                "Ignoring init for an empty viewport"
            );
            return;
        }

        self.particles.clear();
        self.connections.clear();
        for _ in 0..self.config.particle_count {
            self.particles
                .push(Particle::random(rng, viewport, &self.config));
        }

        tracing::debug!(
            particles = self.particles.len(),
            width = viewport.width,
            height = viewport.height,
            "Seeded particle field"
        );
    }

    /// Advance the simulation by one frame
    pub fn step(&mut self, stage: &Stage) {
        for particle in &mut self.particles {
            particle.advance(stage.viewport);
            particle.apply_cursor(&stage.cursor);
        }

        self.scanner.scan(
            &self.particles,
            self.config.connection_distance,
            self.config.line_opacity,
            &mut self.connections,
        );
    }

    /// Draw the current state: particles first, connections on top
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.clear();

        for particle in &self.particles {
            surface.fill_circle(particle.position, particle.radius, self.config.particle_color);
        }

        for connection in &self.connections {
            let from = self.particles[connection.from].position;
            let to = self.particles[connection.to].position;
            surface.stroke_line(
                from,
                to,
                self.config.line_width,
                self.config.line_color.with_alpha(connection.opacity),
            );
        }
    }
}
