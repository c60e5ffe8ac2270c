//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering
//! and platform dependencies:
//! - One `simulate_frame` per animation tick
//! - Time only through the injected `Clock`
//! - Seeded RNG only
//! - Stable iteration order (level list order)

pub mod body;
pub mod clock;
pub mod collision;
pub mod level;
pub mod rect;
pub mod state;
pub mod tick;
pub mod transition;

pub use body::Body;
pub use clock::{Clock, ManualClock, SystemClock};
pub use collision::{at_exit, fell_out, hits_obstacle, resolve_landing};
pub use level::{Layout, LevelDescriptor, LevelError, LevelSet, Tagged, World};
pub use rect::Rect;
pub use state::{FrameSnapshot, GameEvent, GamePhase, LossCause, Session};
pub use tick::{MoveDir, TickInput};
pub use transition::{PortalParticle, TransitionState};
