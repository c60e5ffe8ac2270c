//! Per-frame simulation step
//!
//! Fixed order every frame while playing: input → integrate both bodies →
//! land both bodies → loss check → win check → transition update.

use serde::{Deserialize, Serialize};

use super::clock::Clock;
use super::collision::{fell_out, hits_obstacle, resolve_landing};
use super::level::World;
use super::state::{GameEvent, GamePhase, LossCause, Session};

/// Shared horizontal direction for both characters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveDir {
    Left,
    #[default]
    Still,
    Right,
}

impl MoveDir {
    /// -1, 0 or +1
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            MoveDir::Left => -1.0,
            MoveDir::Still => 0.0,
            MoveDir::Right => 1.0,
        }
    }

    pub fn from_sign(sign: i8) -> Self {
        match sign.signum() {
            -1 => MoveDir::Left,
            1 => MoveDir::Right,
            _ => MoveDir::Still,
        }
    }
}

/// Normalized input for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub move_dir: MoveDir,
    /// Jump if grounded; held jump re-jumps on every grounded frame
    pub jump: bool,
}

impl TickInput {
    /// Collapse raw key states. Left wins when both directions are held.
    pub fn from_keys(left: bool, right: bool, jump: bool) -> Self {
        let move_dir = if left {
            MoveDir::Left
        } else if right {
            MoveDir::Right
        } else {
            MoveDir::Still
        };
        Self { move_dir, jump }
    }
}

impl<C: Clock> Session<C> {
    /// Advance the session by one frame. No-op unless playing.
    ///
    /// Both bodies are frozen while a level transition runs; only the
    /// transition itself advances.
    pub fn simulate_frame(&mut self, input: &TickInput) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.frame += 1;

        if !self.transition.active {
            self.step_bodies(input);

            if let Some(cause) = self.check_loss() {
                self.lose_life(cause);
                return;
            }

            self.check_win();
        }

        if self.transition.update(self.clock.now_ms()) {
            self.advance_to_next_level_or_victory();
        }
    }

    fn step_bodies(&mut self, input: &TickInput) {
        let physics = self.settings.physics;
        let width = self.levels.layout().width;

        self.upper.integrate(input, &physics, width);
        self.lower.integrate(input, &physics, width);

        let level = self.levels.at(self.current_level);
        resolve_landing(&mut self.upper, level.platforms_in(World::Upper));
        resolve_landing(&mut self.lower, level.platforms_in(World::Lower));
    }

    /// First loss this frame: obstacles before falls, upper before lower
    fn check_loss(&self) -> Option<LossCause> {
        let level = self.levels.at(self.current_level);
        let bodies = [&self.upper, &self.lower];

        for body in bodies {
            if hits_obstacle(body, level.obstacles_in(body.world)) {
                return Some(LossCause::Obstacle(body.world));
            }
        }
        for body in bodies {
            if fell_out(body, self.levels.layout()) {
                return Some(LossCause::FellOut(body.world));
            }
        }
        None
    }

    fn lose_life(&mut self, cause: LossCause) {
        self.lives = self.lives.saturating_sub(1);
        self.events.push(GameEvent::LifeLost {
            cause,
            lives: self.lives,
        });
        log::debug!("Life lost ({cause:?}), {} left", self.lives);

        if self.lives == 0 {
            self.phase = GamePhase::GameOver;
            self.events.push(GameEvent::GameOver {
                level: self.current_level,
            });
            log::info!("Game over on level {}", self.current_level);
        } else {
            self.reset_bodies();
        }
    }
}
