//! Tiger Run entry point
//!
//! Runs a headless scripted session and prints the outcome. The real
//! renderer drives the same [`tiger_run::sim::tick`] loop; this binary
//! exists for profiling and for eyeballing balance changes.

use std::env;

use tiger_run::sim::{GamePhase, TickInput, WorldState, tick};
use tiger_run::{GameMode, normalize_dt};

fn main() {
    env_logger::init();

    let mut args = env::args().skip(1);
    let mode = match args.next().as_deref() {
        Some("jumper") => GameMode::Jumper,
        Some("runner") | None => GameMode::Runner,
        Some(other) => {
            eprintln!("unknown mode {other:?}, expected \"runner\" or \"jumper\"");
            std::process::exit(2);
        }
    };
    let seed: u64 = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });
    let frames: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(3600);

    log::info!("headless session: mode={mode:?} seed={seed} frames={frames}");

    let mut state = WorldState::new(mode, seed);
    state.start();

    // A 60 Hz frame per iteration, input from a fixed script so the run is
    // reproducible for a given seed
    let dt = normalize_dt(1000.0 / 60.0);
    for frame in 0..frames {
        let input = script(mode, frame);
        tick(&mut state, &input, dt);
        if state.phase == GamePhase::GameOver {
            break;
        }
    }

    println!(
        "mode={mode:?} seed={seed} phase={:?} frames={:.0} score={} meat={} distance={:.0}",
        state.phase, state.elapsed, state.score, state.meat, state.distance
    );
}

/// Deterministic stand-in for a player: periodic jumps and slides in the
/// runner, a weaving drift in the jumper
fn script(mode: GameMode, frame: u32) -> TickInput {
    match mode {
        GameMode::Runner => TickInput {
            jump: frame % 45 == 0,
            slide: frame % 170 == 80,
            ..Default::default()
        },
        GameMode::Jumper => TickInput {
            move_left: (frame / 90) % 2 == 0,
            move_right: (frame / 90) % 2 == 1,
            ..Default::default()
        },
    }
}
