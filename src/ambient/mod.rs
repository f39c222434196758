//! Ambient animated background.
//!
//! Runs its own frame timer from launch until shutdown and never looks at
//! session state. Each frame fades the previous one toward the background
//! (leaving trails), then paints orbs, waves and particles on top.

mod scene;
mod surface;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::time::{interval, Duration, Instant, Interval, MissedTickBehavior};
use tracing::debug;

pub use scene::{
    particle_count, Orb, Particle, Wave, CELL_HEIGHT_PX, CELL_WIDTH_PX, MAX_PARTICLES, ORBS,
    WAVES,
};
pub use surface::{Rgb, Surface, BACKGROUND};

/// Default redraw rate in frames per second.
pub const DEFAULT_FRAME_RATE: u32 = 30;

/// Opacity of the per-frame fade toward the background.
const TRAIL_FADE: f32 = 0.1;

/// Particle velocities are expressed per frame at this rate.
const REFERENCE_FRAME_RATE: f32 = 60.0;

/// Draws the decorative background on a terminal-sized surface.
#[derive(Debug)]
pub struct AmbientRenderer {
    surface: Surface,
    particles: Vec<Particle>,
    frame_rate: u32,
    frame_timer: Option<Interval>,
    started_at: Option<Instant>,
    rng: StdRng,
    frames_rendered: u64,
}

impl AmbientRenderer {
    /// Creates a stopped renderer for a `cols` x `rows` viewport.
    pub fn new(cols: u16, rows: u16, frame_rate: u32) -> Self {
        Self::with_rng(cols, rows, frame_rate, StdRng::from_entropy())
    }

    /// Creates a renderer with reproducible particle placement.
    pub fn with_seed(cols: u16, rows: u16, frame_rate: u32, seed: u64) -> Self {
        Self::with_rng(cols, rows, frame_rate, StdRng::seed_from_u64(seed))
    }

    fn with_rng(cols: u16, rows: u16, frame_rate: u32, rng: StdRng) -> Self {
        let mut renderer = Self {
            surface: Surface::new(cols, rows),
            particles: Vec::new(),
            frame_rate: frame_rate.max(1),
            frame_timer: None,
            started_at: None,
            rng,
            frames_rendered: 0,
        };
        renderer.spawn_particles();
        renderer
    }

    /// Starts the redraw loop. No-op if already running.
    ///
    /// Must be called within a tokio runtime.
    pub fn start(&mut self) {
        if self.frame_timer.is_some() {
            return;
        }

        let mut timer = interval(self.frame_period());
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
        self.frame_timer = Some(timer);
        self.started_at = Some(Instant::now());
        debug!(frame_rate = self.frame_rate, "Ambient renderer started");
    }

    /// Cancels the redraw loop and clears the surface. Idempotent.
    pub fn stop(&mut self) {
        self.frame_timer = None;
        self.started_at = None;
        self.surface.clear(BACKGROUND);
    }

    /// Returns true while the redraw loop is armed.
    pub fn is_running(&self) -> bool {
        self.frame_timer.is_some()
    }

    /// Waits for the next frame. Never resolves while stopped. Cancel safe.
    pub async fn next_frame(&mut self) {
        match self.frame_timer.as_mut() {
            Some(timer) => {
                timer.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }

    /// Renders the frame for the current moment. No-op while stopped.
    pub fn render_next(&mut self) {
        if let Some(started_at) = self.started_at {
            let time_ms = started_at.elapsed().as_secs_f64() * 1000.0;
            self.render_frame(time_ms);
        }
    }

    /// Renders the frame for `time_ms` milliseconds after start.
    pub fn render_frame(&mut self, time_ms: f64) {
        let steps = REFERENCE_FRAME_RATE / self.frame_rate as f32;

        self.surface.fade(BACKGROUND, TRAIL_FADE);
        scene::draw_orbs(&mut self.surface, time_ms);
        scene::draw_waves(&mut self.surface, time_ms);
        scene::draw_particles(&mut self.surface, &mut self.particles, steps);

        self.frames_rendered += 1;
    }

    /// Adapts to a new viewport and re-seeds particles for its width.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        if cols == self.surface.width() && rows == self.surface.height() {
            return;
        }

        self.surface.resize(cols, rows);
        self.spawn_particles();
        debug!(cols, rows, particles = self.particles.len(), "Ambient surface resized");
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    fn frame_period(&self) -> Duration {
        Duration::from_secs(1) / self.frame_rate
    }

    fn spawn_particles(&mut self) {
        let world_w = f32::from(self.surface.width()) * CELL_WIDTH_PX;
        let world_h = f32::from(self.surface.height()) * CELL_HEIGHT_PX;
        let count = particle_count(world_w);

        self.particles = (0..count)
            .map(|_| Particle::random(&mut self.rng, world_w, world_h))
            .collect();
    }
}
