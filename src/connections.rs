//! Proximity lines between particles
//!
//! Finding every pair closer than the connection distance is the dominant
//! per-frame cost. [`PairwiseScan`] checks all pairs and is what the default
//! particle count uses. [`GridScan`] buckets particles into cells one
//! connection distance wide so each particle is only compared against its
//! own and the eight surrounding cells. Both produce the same connections in
//! the same order.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::Particle;

/// Above this many particles [`ConnectionStrategy::Auto`] switches to the grid
pub const AUTO_GRID_THRESHOLD: usize = 300;

/// A line to draw between two particles this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    /// Index of the first particle, always less than `to`
    pub from: usize,
    pub to: usize,
    pub distance: f64,
    /// Stroke opacity, fading linearly with distance
    pub opacity: f64,
}

/// Stroke opacity for two particles `distance` apart.
///
/// `max_opacity` at distance zero, fading linearly to nothing at `threshold`.
/// Pairs at or beyond the threshold are not connected at all.
pub fn opacity(distance: f64, threshold: f64, max_opacity: f64) -> Option<f64> {
    if distance < threshold {
        Some(max_opacity * (1.0 - distance / threshold))
    } else {
        None
    }
}

/// Finds the particle pairs that should be joined by a line
pub trait NeighborScan {
    /// Replace the contents of `out` with this frame's connections, ordered
    /// by `(from, to)`
    fn scan(
        &mut self,
        particles: &[Particle],
        threshold: f64,
        max_opacity: f64,
        out: &mut Vec<Connection>,
    );
}

/// Which [`NeighborScan`] a field uses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStrategy {
    /// Every pair, O(n²)
    Pairwise,
    /// Uniform grid keyed by `floor(position / threshold)`
    Grid,
    /// Pairwise for small fields, grid above [`AUTO_GRID_THRESHOLD`] particles
    #[default]
    Auto,
}

impl ConnectionStrategy {
    /// Resolve `Auto` for a given particle count
    pub fn resolve(self, particle_count: usize) -> Self {
        match self {
            Self::Auto if particle_count > AUTO_GRID_THRESHOLD => Self::Grid,
            Self::Auto => Self::Pairwise,
            other => other,
        }
    }
}

/// Scanner chosen by a [`ConnectionStrategy`]
#[derive(Debug, Clone)]
pub enum Scanner {
    Pairwise(PairwiseScan),
    Grid(GridScan),
}

impl Scanner {
    pub fn for_strategy(strategy: ConnectionStrategy, particle_count: usize) -> Self {
        match strategy.resolve(particle_count) {
            ConnectionStrategy::Grid => Self::Grid(GridScan::default()),
            _ => Self::Pairwise(PairwiseScan),
        }
    }
}

impl NeighborScan for Scanner {
    fn scan(
        &mut self,
        particles: &[Particle],
        threshold: f64,
        max_opacity: f64,
        out: &mut Vec<Connection>,
    ) {
        match self {
            Self::Pairwise(scan) => scan.scan(particles, threshold, max_opacity, out),
            Self::Grid(scan) => scan.scan(particles, threshold, max_opacity, out),
        }
    }
}

/// Checks every unordered pair
#[derive(Debug, Clone, Copy, Default)]
pub struct PairwiseScan;

impl NeighborScan for PairwiseScan {
    fn scan(
        &mut self,
        particles: &[Particle],
        threshold: f64,
        max_opacity: f64,
        out: &mut Vec<Connection>,
    ) {
        out.clear();
        let n = particles.len();

        for i in 0..n {
            for j in (i + 1)..n {
                if let Some(connection) = connect(particles, i, j, threshold, max_opacity) {
                    out.push(connection);
                }
            }
        }
    }
}

/// Spatial hash with square cells one threshold wide
#[derive(Debug, Clone, Default)]
pub struct GridScan {
    cells: HashMap<(i64, i64), Vec<usize>>,
}

impl GridScan {
    fn cell_of(particle: &Particle, cell_size: f64) -> (i64, i64) {
        (
            (particle.position.x / cell_size).floor() as i64,
            (particle.position.y / cell_size).floor() as i64,
        )
    }
}

impl NeighborScan for GridScan {
    fn scan(
        &mut self,
        particles: &[Particle],
        threshold: f64,
        max_opacity: f64,
        out: &mut Vec<Connection>,
    ) {
        out.clear();
        // Rebuilt every frame; cell keys change whenever particles move or
        // the viewport is reseeded.
        self.cells.clear();

        for (index, particle) in particles.iter().enumerate() {
            self.cells
                .entry(Self::cell_of(particle, threshold))
                .or_default()
                .push(index);
        }

        for (i, particle) in particles.iter().enumerate() {
            let (cx, cy) = Self::cell_of(particle, threshold);
            for dx in -1..=1 {
                for dy in -1..=1 {
                    // Cells of far-off particles saturate at the i64 limits
                    let (Some(x), Some(y)) = (cx.checked_add(dx), cy.checked_add(dy)) else {
                        continue;
                    };
                    let Some(bucket) = self.cells.get(&(x, y)) else {
                        continue;
                    };
                    for &j in bucket.iter().filter(|&&j| j > i) {
                        if let Some(connection) = connect(particles, i, j, threshold, max_opacity)
                        {
                            out.push(connection);
                        }
                    }
                }
            }
        }

        out.sort_unstable_by_key(|c| (c.from, c.to));
    }
}

fn connect(
    particles: &[Particle],
    i: usize,
    j: usize,
    threshold: f64,
    max_opacity: f64,
) -> Option<Connection> {
    let distance = particles[i].position.distance(particles[j].position);
    opacity(distance, threshold, max_opacity).map(|opacity| Connection {
        from: i,
        to: j,
        distance,
        opacity,
    })
}
