//! Parallel Dimensions entry point
//!
//! Headless runner: loads settings and a level pack, plays a scripted run
//! against a synthetic 60 Hz clock and logs lifecycle events. Pass a level
//! pack JSON path as the first argument to replace the built-in levels.

use std::path::Path;
use std::process::ExitCode;

use parallel_dimensions::Settings;
use parallel_dimensions::consts::FRAME_MS;
use parallel_dimensions::sim::{GameEvent, GamePhase, LevelSet, ManualClock, Session, TickInput};

/// One minute of play at 60 Hz
const DEMO_FRAMES: u32 = 60 * 60;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Parallel Dimensions (headless) starting...");

    let settings = Settings::load();
    let levels = match std::env::args().nth(1) {
        Some(path) => LevelSet::from_json_file(Path::new(&path), &settings.layout),
        None => LevelSet::builtin(&settings.layout),
    };
    let levels = match levels {
        Ok(levels) => levels,
        Err(e) => {
            log::error!("Failed to load levels: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut session = Session::new(levels, settings, ManualClock::default());
    session.start();

    for frame in 0..DEMO_FRAMES {
        session.clock_mut().advance(FRAME_MS);
        session.simulate_frame(&autopilot(frame));

        for event in session.drain_events() {
            report(&event);
        }
        if matches!(session.phase(), GamePhase::GameOver | GamePhase::Victory) {
            break;
        }
    }

    match serde_json::to_string_pretty(&session.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize snapshot: {e}"),
    }
    ExitCode::SUCCESS
}

/// Run right, hopping in bursts
fn autopilot(frame: u32) -> TickInput {
    TickInput::from_keys(false, true, frame % 90 < 45)
}

fn report(event: &GameEvent) {
    match event {
        GameEvent::LifeLost { cause, lives } => {
            log::info!("Life lost: {cause:?} ({lives} left)");
        }
        GameEvent::TransitionStarted { level } => {
            log::info!("Both exits reached on level {level}");
        }
        other => log::debug!("{other:?}"),
    }
}
