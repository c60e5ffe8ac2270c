//! Level transition: a timed, particle-driven cross-fade
//!
//! `Idle -> Active -> Idle`. Progress is a function of elapsed clock time,
//! so it is independent of frame rate. Once started it always runs to
//! completion.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Portal particle palette (yellow, magenta, cyan, white)
pub const PORTAL_COLORS: [u32; 4] = [0xffff00, 0xff00ff, 0x00ffff, 0xffffff];

/// Flash ramps up until this progress...
const FLASH_RISE_END: f32 = 0.3;
/// ...and starts fading after this one
const FLASH_FALL_START: f32 = 0.7;

/// A short-lived particle bursting out of a character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortalParticle {
    pub pos: Vec2,
    /// Displacement per frame
    pub vel: Vec2,
    /// Remaining life in frames
    pub life: f32,
    /// 0xRRGGBB
    pub color: u32,
    pub size: f32,
}

impl PortalParticle {
    /// Random particle at `origin`
    pub fn spawn(origin: Vec2, rng: &mut Pcg32) -> Self {
        Self {
            pos: origin,
            vel: Vec2::new(rng.random_range(-4.0..4.0), rng.random_range(-4.0..4.0)),
            life: rng.random_range(50.0..150.0),
            color: PORTAL_COLORS[rng.random_range(0..PORTAL_COLORS.len())],
            size: rng.random_range(2.0..6.0),
        }
    }
}

/// Cross-fade state between levels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionState {
    pub active: bool,
    /// Clock time the transition began (ms)
    pub start_ms: f64,
    pub duration_ms: f64,
    /// Elapsed fraction, 0..=1
    pub progress: f32,
    /// Full-screen flash intensity, 0..=1
    pub screen_flash: f32,
    pub particles: Vec<PortalParticle>,
}

impl TransitionState {
    pub fn new(duration_ms: f64) -> Self {
        Self {
            active: false,
            start_ms: 0.0,
            duration_ms,
            progress: 0.0,
            screen_flash: 0.0,
            particles: Vec::new(),
        }
    }

    /// Enter `Active`, bursting `per_burst` particles out of each origin.
    ///
    /// Refused while already active. Returns true if the transition started.
    pub fn begin(
        &mut self,
        now_ms: f64,
        origins: &[Vec2],
        per_burst: usize,
        rng: &mut Pcg32,
    ) -> bool {
        if self.active {
            return false;
        }

        self.active = true;
        self.start_ms = now_ms;
        self.progress = 0.0;
        self.screen_flash = 0.0;
        self.particles.clear();
        self.particles.reserve(origins.len() * per_burst);
        for &origin in origins {
            for _ in 0..per_burst {
                self.particles.push(PortalParticle::spawn(origin, rng));
            }
        }
        true
    }

    /// Advance one frame. Returns true on the frame the transition completes,
    /// after which the state is idle and empty.
    pub fn update(&mut self, now_ms: f64) -> bool {
        if !self.active {
            return false;
        }

        self.progress = if self.duration_ms > 0.0 {
            (((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)) as f32
        } else {
            1.0
        };
        self.screen_flash = flash_envelope(self.progress);

        for particle in &mut self.particles {
            particle.pos += particle.vel;
            particle.life -= 1.0;
        }
        self.particles.retain(|p| p.life > 0.0);

        if self.progress >= 1.0 {
            self.finish();
            return true;
        }
        false
    }

    /// Drop back to idle
    pub fn finish(&mut self) {
        self.active = false;
        self.particles.clear();
    }

    /// Forget any in-flight transition (restart)
    pub fn reset(&mut self) {
        *self = Self::new(self.duration_ms);
    }
}

/// Triangular flash: up over [0, 0.3], hold to 0.7, down to 1.0
pub fn flash_envelope(progress: f32) -> f32 {
    let p = progress.clamp(0.0, 1.0);
    if p < FLASH_RISE_END {
        p / FLASH_RISE_END
    } else if p > FLASH_FALL_START {
        (1.0 - p) / (1.0 - FLASH_FALL_START)
    } else {
        1.0
    }
}
