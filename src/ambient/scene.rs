//! The decorative elements of the ambient background.
//!
//! Positions and sizes are in "world pixels": each terminal cell covers
//! `CELL_WIDTH_PX` x `CELL_HEIGHT_PX`, so the shapes keep the proportions of
//! a pixel canvas regardless of how coarse the terminal grid is.

use std::f32::consts::PI;

use rand::Rng;

use super::surface::{Rgb, Surface};

/// Horizontal world pixels per terminal cell.
pub const CELL_WIDTH_PX: f32 = 8.0;

/// Vertical world pixels per terminal cell.
pub const CELL_HEIGHT_PX: f32 = 16.0;

/// Upper bound on drifting particles.
pub const MAX_PARTICLES: usize = 50;

/// World pixels of viewport width per particle.
const PIXELS_PER_PARTICLE: f32 = 20.0;

/// How far orbs wander from their anchor, in world pixels.
const ORB_DRIFT_PX: f32 = 50.0;

const PARTICLE_COLOR: Rgb = Rgb::new(168.0, 237.0, 234.0);

// ============================================================================
// Orbs
// ============================================================================

/// A soft radial gradient anchored at a fraction of the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orb {
    /// Anchor as a fraction of width
    pub anchor_x: f32,
    /// Anchor as a fraction of height
    pub anchor_y: f32,
    /// Gradient radius in world pixels
    pub radius: f32,
    pub color: Rgb,
    /// Opacity at the centre; fades to zero at the radius
    pub alpha: f32,
}

pub const ORBS: [Orb; 3] = [
    Orb {
        anchor_x: 0.2,
        anchor_y: 0.3,
        radius: 300.0,
        color: Rgb::new(102.0, 126.0, 234.0),
        alpha: 0.15,
    },
    Orb {
        anchor_x: 0.8,
        anchor_y: 0.7,
        radius: 400.0,
        color: Rgb::new(240.0, 147.0, 251.0),
        alpha: 0.12,
    },
    Orb {
        anchor_x: 0.5,
        anchor_y: 0.5,
        radius: 350.0,
        color: Rgb::new(79.0, 172.0, 254.0),
        alpha: 0.1,
    },
];

/// Centre of the `index`th orb at `time_ms`, in world pixels.
pub fn orb_center(orb: &Orb, index: usize, world_w: f32, world_h: f32, time_ms: f64) -> (f32, f32) {
    let phase = (time_ms * 0.001) as f32 + index as f32;
    (
        world_w * orb.anchor_x + phase.sin() * ORB_DRIFT_PX,
        world_h * orb.anchor_y + phase.cos() * ORB_DRIFT_PX,
    )
}

pub fn draw_orbs(surface: &mut Surface, time_ms: f64) {
    let world_w = f32::from(surface.width()) * CELL_WIDTH_PX;
    let world_h = f32::from(surface.height()) * CELL_HEIGHT_PX;

    for (index, orb) in ORBS.iter().enumerate() {
        let (cx, cy) = orb_center(orb, index, world_w, world_h, time_ms);

        for y in 0..i32::from(surface.height()) {
            for x in 0..i32::from(surface.width()) {
                let px = (x as f32 + 0.5) * CELL_WIDTH_PX;
                let py = (y as f32 + 0.5) * CELL_HEIGHT_PX;
                let distance = (px - cx).hypot(py - cy);
                if distance < orb.radius {
                    let alpha = orb.alpha * (1.0 - distance / orb.radius);
                    surface.blend_pixel(x, y, orb.color, alpha);
                }
            }
        }
    }
}

// ============================================================================
// Waves
// ============================================================================

/// A sine curve across the middle of the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wave {
    /// Peak displacement in world pixels
    pub amplitude: f32,
    /// Radians per world pixel
    pub frequency: f32,
    /// Radians per millisecond
    pub speed: f32,
    /// Constant phase offset
    pub offset: f32,
    pub color: Rgb,
    pub alpha: f32,
}

pub const WAVES: [Wave; 3] = [
    Wave {
        amplitude: 30.0,
        frequency: 0.01,
        speed: 0.01,
        offset: 0.0,
        color: Rgb::new(102.0, 126.0, 234.0),
        alpha: 0.3,
    },
    Wave {
        amplitude: 40.0,
        frequency: 0.015,
        speed: 0.0075,
        offset: 100.0,
        color: Rgb::new(240.0, 147.0, 251.0),
        alpha: 0.2,
    },
    Wave {
        amplitude: 25.0,
        frequency: 0.02,
        speed: 0.0125,
        offset: 200.0,
        color: Rgb::new(79.0, 172.0, 254.0),
        alpha: 0.25,
    },
];

impl Wave {
    /// Vertical world position of the curve at `x`.
    pub fn y_at(&self, x: f32, center_y: f32, time_ms: f64) -> f32 {
        // Wrap the time term so long runs keep f32 precision.
        let time_phase = ((time_ms * f64::from(self.speed)) % (2.0 * std::f64::consts::PI)) as f32;
        center_y + (x * self.frequency + time_phase + self.offset).sin() * self.amplitude
    }
}

pub fn draw_waves(surface: &mut Surface, time_ms: f64) {
    let center_y = f32::from(surface.height()) * CELL_HEIGHT_PX / 2.0;

    for wave in &WAVES {
        for x in 0..i32::from(surface.width()) {
            let px = (x as f32 + 0.5) * CELL_WIDTH_PX;
            let row = (wave.y_at(px, center_y, time_ms) / CELL_HEIGHT_PX).floor() as i32;
            surface.blend_pixel(x, row, wave.color, wave.alpha);
        }
    }
}

// ============================================================================
// Particles
// ============================================================================

/// A small dot drifting at constant velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    /// World pixels per reference frame (1/60 s)
    pub vx: f32,
    pub vy: f32,
    pub opacity: f32,
}

impl Particle {
    /// Spawns a particle somewhere inside the viewport.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, world_w: f32, world_h: f32) -> Self {
        Self {
            x: rng.gen::<f32>() * world_w,
            y: rng.gen::<f32>() * world_h,
            radius: rng.gen::<f32>() * 2.0 + 1.0,
            vx: (rng.gen::<f32>() - 0.5) * 0.5,
            vy: (rng.gen::<f32>() - 0.5) * 0.5,
            opacity: rng.gen::<f32>() * 0.5 + 0.2,
        }
    }

    /// Moves the particle `steps` reference frames, wrapping at the edges.
    pub fn advance(&mut self, steps: f32, world_w: f32, world_h: f32) {
        self.x += self.vx * steps;
        self.y += self.vy * steps;

        if self.x < 0.0 {
            self.x = world_w;
        } else if self.x > world_w {
            self.x = 0.0;
        }
        if self.y < 0.0 {
            self.y = world_h;
        } else if self.y > world_h {
            self.y = 0.0;
        }
    }

    /// Opacity of the dot including its glow, relative to a whole cell.
    fn cell_alpha(&self) -> f32 {
        let glow_area = PI * (self.radius * 3.0).powi(2);
        let coverage = (glow_area / (CELL_WIDTH_PX * CELL_HEIGHT_PX)).min(1.0);
        (self.opacity * (0.5 + coverage)).min(1.0)
    }
}

/// Number of particles for a viewport `world_w` pixels wide.
pub fn particle_count(world_w: f32) -> usize {
    ((world_w / PIXELS_PER_PARTICLE) as usize).min(MAX_PARTICLES)
}

pub fn draw_particles(surface: &mut Surface, particles: &mut [Particle], steps: f32) {
    let world_w = f32::from(surface.width()) * CELL_WIDTH_PX;
    let world_h = f32::from(surface.height()) * CELL_HEIGHT_PX;

    for particle in particles.iter_mut() {
        particle.advance(steps, world_w, world_h);

        let x = (particle.x / CELL_WIDTH_PX).floor() as i32;
        let y = (particle.y / CELL_HEIGHT_PX).floor() as i32;
        surface.blend_pixel(x, y, PARTICLE_COLOR, particle.cell_alpha());
    }
}
