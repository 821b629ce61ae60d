//! Engine lifecycle and the render-loop contract
//!
//! [`Engine`] is a small state machine around a [`ParticleField`], its
//! [`Stage`] and a [`Surface`]. Hosts feed it input events and call
//! [`Engine::frame`] once per display refresh; the returned
//! [`FrameOutcome`] tells them whether to schedule another frame.
//!
//! [`HeadlessHost`] is the display-less host used by the CLI and by tests.
//! It keeps a single pending-frame slot, exactly like a browser's
//! `requestAnimationFrame` handle.

use rand::Rng;

use crate::config::FieldConfig;
use crate::field::ParticleField;
use crate::model::{Stage, Vec2, Viewport};
use crate::surface::Surface;

/// Where an [`Engine`] is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Constructed, not yet mounted
    Idle,
    /// Mounted; frames draw
    Running,
    /// Unmounted; nothing draws again
    Stopped,
}

/// What a host should do after calling [`Engine::frame`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// A frame was drawn, schedule the next one
    Rendered,
    /// The engine is not running, do not reschedule
    Stopped,
}

/// A particle field bound to a surface
pub struct Engine<S, R> {
    field: ParticleField,
    stage: Stage,
    surface: S,
    rng: R,
    lifecycle: Lifecycle,
    frames: u64,
}

impl<S: Surface, R: Rng> Engine<S, R> {
    pub fn new(config: FieldConfig, surface: S, rng: R) -> Self {
        let stage = Stage::new(Viewport::default(), &config);
        Self {
            field: ParticleField::new(config),
            stage,
            surface,
            rng,
            lifecycle: Lifecycle::Idle,
            frames: 0,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle == Lifecycle::Running
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Frames drawn since mounting
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Start simulating inside `viewport`.
    ///
    /// Returns `false` if the engine was already mounted or has been
    /// stopped; a stopped engine cannot be revived.
    pub fn mount(&mut self, viewport: Viewport) -> bool {
        if self.lifecycle != Lifecycle::Idle {
            tracing::debug!(lifecycle = ?self.lifecycle, "Refusing to mount engine");
            return false;
        }

        self.lifecycle = Lifecycle::Running;
        self.reseed(viewport);
        tracing::debug!("Engine mounted");
        true
    }

    /// The viewport changed size: resize the surface and reseed every
    /// particle.
    pub fn resize(&mut self, viewport: Viewport) {
        if !self.is_running() {
            return;
        }
        self.reseed(viewport);
    }

    /// Record the latest pointer position
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.stage.cursor.position = Some(Vec2::new(x, y));
    }

    /// Run one animation tick: update every particle, then draw.
    pub fn frame(&mut self) -> FrameOutcome {
        if !self.is_running() {
            return FrameOutcome::Stopped;
        }

        self.field.step(&self.stage);
        self.field.draw(&mut self.surface);
        self.frames += 1;
        tracing::trace!(
            frame = self.frames,
            connections = self.field.connections().len(),
            "Drew frame"
        );
        FrameOutcome::Rendered
    }

    /// Stop for good. Only the first call does anything.
    pub fn unmount(&mut self) -> bool {
        if self.lifecycle == Lifecycle::Stopped {
            return false;
        }

        self.lifecycle = Lifecycle::Stopped;
        tracing::debug!(frames = self.frames, "Engine unmounted");
        true
    }

    /// An empty viewport leaves surface, stage and particles as they were
    fn reseed(&mut self, viewport: Viewport) {
        if !viewport.is_drawable() {
            tracing::debug!(
                width = viewport.width,
                height = viewport.height,
                "Ignoring empty viewport"
            );
            return;
        }
        self.surface.resize(viewport);
        self.stage.viewport = viewport;
        self.field.init(viewport, &mut self.rng);
    }
}

/// Drives an [`Engine`] one tick at a time without a display.
///
/// Mirrors the browser host: mounting schedules the first frame, every
/// rendered frame schedules the next, and unmounting cancels whatever is
/// pending and detaches input.
pub struct HeadlessHost<S, R> {
    engine: Engine<S, R>,
    pending_frame: bool,
    listening: bool,
}

impl<S: Surface, R: Rng> HeadlessHost<S, R> {
    pub fn new(engine: Engine<S, R>) -> Self {
        Self {
            engine,
            pending_frame: false,
            listening: false,
        }
    }

    pub fn engine(&self) -> &Engine<S, R> {
        &self.engine
    }

    /// Whether a frame is waiting to run
    pub fn has_pending_frame(&self) -> bool {
        self.pending_frame
    }

    /// Whether resize and pointer events reach the engine
    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn mount(&mut self, viewport: Viewport) -> bool {
        if !self.engine.mount(viewport) {
            return false;
        }
        self.listening = true;
        self.pending_frame = true;
        true
    }

    /// Deliver a resize event
    pub fn resize(&mut self, viewport: Viewport) {
        if self.listening {
            self.engine.resize(viewport);
        }
    }

    /// Deliver a pointer-move event
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        if self.listening {
            self.engine.pointer_move(x, y);
        }
    }

    /// Simulate one display refresh.
    ///
    /// Returns whether a frame actually ran.
    pub fn tick(&mut self) -> bool {
        if !self.pending_frame {
            return false;
        }

        self.pending_frame = false;
        if self.engine.frame() == FrameOutcome::Rendered {
            self.pending_frame = true;
        }
        true
    }

    /// Run `count` refreshes, returning how many frames ran
    pub fn run(&mut self, count: usize) -> usize {
        (0..count).filter(|_| self.tick()).count()
    }

    /// Cancel the pending frame and detach input, together and once
    pub fn unmount(&mut self) -> bool {
        if !self.engine.unmount() {
            return false;
        }
        self.pending_frame = false;
        self.listening = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn engine() -> Engine<RecordingSurface, SmallRng> {
        Engine::new(
            FieldConfig::default(),
            RecordingSurface::new(),
            SmallRng::seed_from_u64(3),
        )
    }

    #[test]
    fn idle_engine_does_not_draw() {
        let mut engine = engine();
        assert_eq!(engine.frame(), FrameOutcome::Stopped);
        assert_eq!(engine.surface().clears, 0);
    }

    #[test]
    fn mount_seeds_and_sizes_surface() {
        let mut engine = engine();
        assert!(engine.mount(Viewport::new(800.0, 600.0)));

        assert!(engine.is_running());
        assert_eq!(engine.field().particles().len(), 60);
        assert_eq!(engine.surface().viewport, Viewport::new(800.0, 600.0));
        assert_eq!(engine.stage().viewport, Viewport::new(800.0, 600.0));
    }

    #[test]
    fn frame_draws_every_particle() {
        let mut engine = engine();
        engine.mount(Viewport::new(800.0, 600.0));

        assert_eq!(engine.frame(), FrameOutcome::Rendered);
        assert_eq!(engine.surface().circles().count(), 60);
        assert_eq!(
            engine.surface().lines().count(),
            engine.field().connections().len()
        );
        assert_eq!(engine.frames(), 1);
    }

    #[test]
    fn pointer_move_updates_stage() {
        let mut engine = engine();
        engine.pointer_move(12.0, 34.0);
        assert_eq!(engine.stage().cursor.position, Some(Vec2::new(12.0, 34.0)));
    }

    #[test]
    fn resize_reseeds_and_resizes_surface() {
        let mut engine = engine();
        engine.mount(Viewport::new(800.0, 600.0));
        engine.frame();

        engine.resize(Viewport::new(300.0, 200.0));

        assert_eq!(engine.surface().resizes, 2);
        assert_eq!(engine.stage().viewport, Viewport::new(300.0, 200.0));
        assert_eq!(engine.field().particles().len(), 60);
        assert!(
            engine
                .field()
                .particles()
                .iter()
                .all(|p| p.position.x < 300.0 && p.position.y < 200.0)
        );
    }

    #[test]
    fn empty_resize_changes_nothing() {
        let mut engine = engine();
        engine.mount(Viewport::new(800.0, 600.0));
        engine.frame();
        let before = engine.field().particles().to_vec();

        engine.resize(Viewport::new(0.0, 0.0));

        assert_eq!(engine.surface().resizes, 1);
        assert_eq!(engine.surface().viewport, Viewport::new(800.0, 600.0));
        assert_eq!(engine.stage().viewport, Viewport::new(800.0, 600.0));
        assert_eq!(engine.field().particles(), before.as_slice());

        // Particles keep moving instead of bouncing against a 0x0 box
        engine.frame();
        for (old, new) in before.iter().zip(engine.field().particles()) {
            assert_eq!(new.position, old.position + old.velocity);
        }
    }

    #[test]
    fn unmount_acts_once_and_stops_frames() {
        let mut engine = engine();
        engine.mount(Viewport::new(800.0, 600.0));
        engine.frame();

        assert!(engine.unmount());
        assert!(!engine.unmount());
        assert_eq!(engine.lifecycle(), Lifecycle::Stopped);

        let clears = engine.surface().clears;
        assert_eq!(engine.frame(), FrameOutcome::Stopped);
        assert_eq!(engine.surface().clears, clears);
    }

    #[test]
    fn stopped_engine_cannot_remount() {
        let mut engine = engine();
        engine.mount(Viewport::new(800.0, 600.0));
        assert!(!engine.mount(Viewport::new(800.0, 600.0)));

        engine.unmount();
        assert!(!engine.mount(Viewport::new(800.0, 600.0)));
        assert!(!engine.is_running());
    }

    #[test]
    fn host_schedules_only_after_mount() {
        let mut host = HeadlessHost::new(engine());
        assert!(!host.tick());

        host.mount(Viewport::new(640.0, 480.0));
        assert!(host.has_pending_frame());
        assert!(host.is_listening());
        assert_eq!(host.run(10), 10);
        assert_eq!(host.engine().frames(), 10);
    }

    #[test]
    fn host_ignores_input_after_unmount() {
        let mut host = HeadlessHost::new(engine());
        host.mount(Viewport::new(640.0, 480.0));
        host.tick();

        assert!(host.unmount());
        assert!(!host.unmount());
        assert!(!host.has_pending_frame());
        assert!(!host.is_listening());

        host.pointer_move(5.0, 5.0);
        host.resize(Viewport::new(10.0, 10.0));
        assert!(!host.tick());

        assert_eq!(host.engine().stage().cursor.position, None);
        assert_eq!(host.engine().surface().resizes, 1);
        assert_eq!(host.engine().frames(), 1);
    }
}
