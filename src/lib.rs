//! Parallel Dimensions - a split-screen two-world platformer
//!
//! Core modules:
//! - `sim`: Simulation core (physics, collisions, levels, transitions, session)
//! - `settings`: Data-driven tuning loaded from JSON

pub mod settings;
pub mod sim;

pub use settings::{PhysicsSettings, Settings, TransitionSettings};
pub use sim::{GameEvent, GamePhase, LevelSet, Session, TickInput};

/// Game configuration constants
pub mod consts {
    /// Canvas dimensions (both worlds stacked vertically)
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Per-frame gravity (pixels/frame²)
    pub const GRAVITY: f32 = 0.5;
    /// Jump impulse (negative is up)
    pub const JUMP_POWER: f32 = -12.0;
    /// Horizontal speed (pixels/frame)
    pub const MOVE_SPEED: f32 = 4.0;

    /// Character box
    pub const BODY_WIDTH: f32 = 16.0;
    pub const BODY_HEIGHT: f32 = 16.0;

    pub const STARTING_LIVES: u8 = 3;

    /// Level transition length (ms)
    pub const TRANSITION_DURATION_MS: f64 = 2000.0;
    /// Portal particles spawned per character when a transition starts
    pub const PARTICLES_PER_BURST: usize = 50;

    /// Nominal frame length at 60 Hz (ms)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
}
