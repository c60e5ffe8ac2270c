//! Character bodies and the per-frame integration step

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::level::World;
use super::rect::Rect;
use super::tick::TickInput;
use crate::settings::PhysicsSettings;

/// One simulated character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    /// Set only by landing resolution in the current frame
    pub on_ground: bool,
    pub world: World,
}

impl Body {
    pub fn new(world: World, spawn: Vec2, size: Vec2) -> Self {
        Self {
            pos: spawn,
            vel: Vec2::ZERO,
            size,
            on_ground: false,
            world,
        }
    }

    /// Collision box at the current position
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Back to a spawn point, at rest and airborne
    pub fn reset(&mut self, spawn: Vec2) {
        self.pos = spawn;
        self.vel = Vec2::ZERO;
        self.on_ground = false;
    }

    /// Apply input, gravity and velocity for one frame.
    ///
    /// Horizontal velocity changes instantly. Jumping needs ground contact from
    /// the previous frame. Only x is clamped to the canvas; falling out the
    /// bottom is a loss, checked elsewhere.
    pub fn integrate(&mut self, input: &TickInput, physics: &PhysicsSettings, world_width: f32) {
        self.vel.x = input.move_dir.sign() * physics.move_speed;

        if input.jump && self.on_ground {
            self.vel.y = physics.jump_power;
            self.on_ground = false;
        }

        self.vel.y += physics.gravity;
        self.pos += self.vel;

        let max_x = (world_width - self.size.x).max(0.0);
        self.pos.x = self.pos.x.clamp(0.0, max_x);
    }
}
