// Decorative particle backdrop for the landing hero.

use rand::Rng;
use serde::Serialize;

pub const PARTICLE_COUNT: usize = 100;
pub const PARTICLE_FILL: &str = "rgba(68, 221, 68, 0.4)";

const MIN_SPEED: f64 = 0.2;
const SPEED_SPREAD: f64 = 0.5;
const MIN_SIZE: f64 = 2.0;
const SIZE_SPREAD: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    /// Upward movement per frame.
    pub speed: f64,
    /// Radius.
    pub size: f64,
}

/// Particles drifting up a `width` x `height` canvas, wrapping to the bottom.
///
/// Created when the page mounts and dropped with it.
#[derive(Debug, Clone, Serialize)]
pub struct ParticleField {
    width: f64,
    height: f64,
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn new<R: Rng + ?Sized>(count: usize, width: f64, height: f64, rng: &mut R) -> Self {
        let particles = (0..count)
            .map(|_| Particle {
                x: rng.gen::<f64>() * width,
                y: rng.gen::<f64>() * height,
                speed: MIN_SPEED + rng.gen::<f64>() * SPEED_SPREAD,
                size: MIN_SIZE + rng.gen::<f64>() * SIZE_SPREAD,
            })
            .collect();
        Self {
            width,
            height,
            particles,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Advance one frame.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for p in &mut self.particles {
            p.y -= p.speed;
            if p.y < 0.0 {
                p.y = self.height;
                p.x = rng.gen::<f64>() * self.width;
            }
        }
    }

    /// Canvas resized. Existing particles keep their positions and are
    /// respawned inside the new bounds once they wrap.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }
}
