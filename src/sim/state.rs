//! Session state and lifecycle
//!
//! `Session` owns everything that changes during play: both bodies, the
//! transition, lives and level progress. The per-frame pipeline lives in
//! `tick`; this module holds the data and the lifecycle operations.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::clock::{Clock, SystemClock};
use super::collision::at_exit;
use super::level::{LevelDescriptor, LevelSet, World};
use super::transition::TransitionState;
use crate::settings::Settings;

/// Overall game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for `start()`
    NotStarted,
    /// Active gameplay (including level transitions)
    Playing,
    /// Out of lives; terminal until restart
    GameOver,
    /// Last level cleared; terminal until restart
    Victory,
}

/// Why a life was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossCause {
    Obstacle(World),
    FellOut(World),
}

/// Lifecycle events for the UI layer, drained once per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Restarted,
    LifeLost { cause: LossCause, lives: u8 },
    TransitionStarted { level: usize },
    LevelAdvanced { level: usize },
    GameOver { level: usize },
    Victory { level: usize },
}

/// Read-only copy of everything a renderer draws
#[derive(Debug, Clone, Serialize)]
pub struct FrameSnapshot {
    pub frame: u64,
    pub phase: GamePhase,
    pub level: usize,
    pub level_count: usize,
    pub active_level: LevelDescriptor,
    pub lives: u8,
    pub upper: Body,
    pub lower: Body,
    pub transition: TransitionState,
}

/// A play session over one level pack
#[derive(Debug)]
pub struct Session<C: Clock = SystemClock> {
    pub(super) settings: Settings,
    pub(super) levels: LevelSet,
    pub(super) clock: C,
    pub(super) rng: Pcg32,
    pub(super) phase: GamePhase,
    /// 1-based, always within the level set
    pub(super) current_level: usize,
    pub(super) lives: u8,
    pub(super) upper: Body,
    pub(super) lower: Body,
    pub(super) transition: TransitionState,
    pub(super) events: Vec<GameEvent>,
    pub(super) frame: u64,
}

impl<C: Clock> Session<C> {
    /// New session, not yet started, positioned on level 1
    pub fn new(levels: LevelSet, settings: Settings, clock: C) -> Self {
        let size = glam::Vec2::new(settings.physics.body_width, settings.physics.body_height);
        let first = levels.at(1);
        let upper = Body::new(World::Upper, first.spawn(World::Upper), size);
        let lower = Body::new(World::Lower, first.spawn(World::Lower), size);

        Self {
            rng: Pcg32::seed_from_u64(settings.seed),
            transition: TransitionState::new(settings.transition.duration_ms),
            lives: settings.starting_lives,
            settings,
            levels,
            clock,
            phase: GamePhase::NotStarted,
            current_level: 1,
            upper,
            lower,
            events: Vec::new(),
            frame: 0,
        }
    }

    /// Begin play from the title state
    pub fn start(&mut self) {
        if self.phase != GamePhase::NotStarted {
            log::warn!("start() ignored in phase {:?}; use restart()", self.phase);
            return;
        }
        self.reset_progress();
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::Started);
        log::info!("Game started ({} levels)", self.levels.len());
    }

    /// Back to level 1 with full lives, from any phase
    pub fn restart(&mut self) {
        self.reset_progress();
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::Restarted);
        log::info!("Game restarted");
    }

    fn reset_progress(&mut self) {
        self.lives = self.settings.starting_lives;
        self.current_level = 1;
        self.rng = Pcg32::seed_from_u64(self.settings.seed);
        self.transition.reset();
        self.reset_bodies();
    }

    /// Put both bodies back on the current level's spawns
    pub(super) fn reset_bodies(&mut self) {
        let level = self.levels.at(self.current_level);
        self.upper.reset(level.spawn(World::Upper));
        self.lower.reset(level.spawn(World::Lower));
    }

    /// Move to the next level, or declare victory after the last one.
    /// Ignored unless playing.
    pub fn advance_to_next_level_or_victory(&mut self) {
        if self.phase != GamePhase::Playing {
            log::warn!("Level advance ignored in phase {:?}", self.phase);
            return;
        }
        self.transition.finish();

        if self.current_level < self.levels.len() {
            self.current_level += 1;
            self.reset_bodies();
            self.events.push(GameEvent::LevelAdvanced {
                level: self.current_level,
            });
            log::info!("Advanced to level {}", self.current_level);
        } else {
            self.phase = GamePhase::Victory;
            self.events.push(GameEvent::Victory {
                level: self.current_level,
            });
            log::info!("Victory on level {}", self.current_level);
        }
    }

    /// Start the transition if both bodies stand in their exits.
    ///
    /// Does nothing while a transition is already running. Returns true if
    /// one started.
    pub fn check_win(&mut self) -> bool {
        if self.phase != GamePhase::Playing || self.transition.active {
            return false;
        }

        let level = self.levels.at(self.current_level);
        if !(at_exit(&self.upper, level.exit(World::Upper))
            && at_exit(&self.lower, level.exit(World::Lower)))
        {
            return false;
        }

        let origins = [self.upper.center(), self.lower.center()];
        let started = self.transition.begin(
            self.clock.now_ms(),
            &origins,
            self.settings.transition.particles_per_burst,
            &mut self.rng,
        );
        if started {
            self.events.push(GameEvent::TransitionStarted {
                level: self.current_level,
            });
            log::debug!("Transition started on level {}", self.current_level);
        }
        started
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// 1-based index of the level in play
    pub fn current_level(&self) -> usize {
        self.current_level
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    pub fn body(&self, world: World) -> &Body {
        match world {
            World::Upper => &self.upper,
            World::Lower => &self.lower,
        }
    }

    pub fn active_level(&self) -> &LevelDescriptor {
        self.levels.at(self.current_level)
    }

    pub fn levels(&self) -> &LevelSet {
        &self.levels
    }

    pub fn transition(&self) -> &TransitionState {
        &self.transition
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Frames simulated while playing
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Take all events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            frame: self.frame,
            phase: self.phase,
            level: self.current_level,
            level_count: self.levels.len(),
            active_level: self.active_level().clone(),
            lives: self.lives,
            upper: self.upper.clone(),
            lower: self.lower.clone(),
            transition: self.transition.clone(),
        }
    }
}
