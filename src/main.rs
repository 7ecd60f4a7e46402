//! Wave Arena headless host
//!
//! Runs the simulation with the autopilot at a fixed timestep and prints
//! the final world snapshot as JSON.
//!
//! Usage: `wave-arena [seed] [seconds] [easy|normal|hard|tuning.json]`

use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use wave_arena::autopilot;
use wave_arena::consts::{MAX_SUBSTEPS, SIM_DT};
use wave_arena::sim::{GameLogic, RunState, SimRng};
use wave_arena::tuning::{Difficulty, Tuning};

/// Simulated display refresh for the host loop
const FRAME_DT: f32 = 1.0 / 60.0;

struct Args {
    seed: u64,
    seconds: f32,
    tuning: TuningSource,
}

/// Where the balance sheet comes from
enum TuningSource {
    Preset(Difficulty),
    File(PathBuf),
}

fn parse_args() -> Result<Args> {
    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(s) => s.parse().with_context(|| format!("invalid seed {s:?}"))?,
        None => 0x5EED,
    };
    let seconds = match args.next() {
        Some(s) => s.parse().with_context(|| format!("invalid duration {s:?}"))?,
        None => 60.0,
    };
    Ok(Args {
        seed,
        seconds,
        tuning: match args.next() {
            Some(arg) => match Difficulty::from_str(&arg) {
                Some(preset) => TuningSource::Preset(preset),
                None => TuningSource::File(PathBuf::from(arg)),
            },
            None => TuningSource::Preset(Difficulty::Normal),
        },
    })
}

/// Host loop state
struct Host {
    game: GameLogic<SimRng>,
    accumulator: f32,
    last_wave: u32,
}

impl Host {
    fn new(tuning: Tuning, seed: u64) -> Self {
        Self {
            game: GameLogic::with_rng(tuning, SimRng::new(seed)),
            accumulator: 0.0,
            last_wave: 1,
        }
    }

    /// Run simulation ticks for one display frame
    fn frame(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let (input, pointer) = autopilot::drive(&self.game);
            self.game.update(SIM_DT, &input, pointer.x, pointer.y);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        // Offer an upgrade each time a new wave arrives
        let wave = self.game.current_wave();
        if wave != self.last_wave && self.game.run_state() == RunState::Playing {
            self.last_wave = wave;
            if self.game.offer_upgrades() {
                if let Some(pick) = self.game.offered.first() {
                    log::info!("Wave {}: taking {} ({})", wave, pick.name, pick.rarity.as_str());
                }
                self.game.choose_upgrade(0);
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = parse_args()?;
    let tuning = match &args.tuning {
        TuningSource::Preset(preset) => Tuning::from_preset(*preset),
        TuningSource::File(path) => Tuning::load(path)?,
    };

    log::info!("Wave Arena (headless) seed={:#x} for {}s", args.seed, args.seconds);
    let mut host = Host::new(tuning, args.seed);
    if !host.game.start_run() {
        bail!("could not start a run from {:?}", host.game.run_state());
    }

    let frames = (args.seconds / FRAME_DT).ceil() as u64;
    for _ in 0..frames {
        host.frame(FRAME_DT);
        if host.game.run_state() == RunState::GameOver {
            break;
        }
    }

    let snapshot = serde_json::to_string_pretty(&host.game.snapshot())
        .context("failed to serialize snapshot")?;
    println!("{snapshot}");
    Ok(())
}
