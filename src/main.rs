//! Battle Bomber headless driver
//!
//! Runs one level with a scripted pilot and reports what happened. Windowing,
//! input polling and drawing belong to the host game; this binary exercises
//! the simulation and the sprite batcher without them.

use std::collections::HashMap;
use std::path::PathBuf;

use clap::Parser;
use glam::Vec2;

use battle_bomber::Tuning;
use battle_bomber::render::{instance, sprite_batch};
use battle_bomber::sim::{FrameInput, LevelEvent, LevelId, LevelSession};

#[derive(Debug, Parser)]
#[command(name = "battle-bomber", about = "Run a level headless with a scripted pilot")]
struct Args {
    /// Level number
    #[arg(short, long, default_value_t = 1)]
    level: u32,
    /// Frames to simulate
    #[arg(short, long, default_value_t = 3600)]
    frames: u32,
    /// Seconds per frame
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,
    /// JSON tuning overrides
    #[arg(short, long)]
    tuning: Option<PathBuf>,
}

/// Wall-following pilot: keeps shooting ahead, turns clockwise when blocked
struct Pilot {
    heading: usize,
}

const HEADINGS: [Vec2; 4] = [Vec2::X, Vec2::Y, Vec2::NEG_X, Vec2::NEG_Y];

impl Pilot {
    fn input(&self) -> FrameInput {
        FrameInput {
            movement: HEADINGS[self.heading],
            fire: true,
        }
    }

    fn observe(&mut self, events: &[LevelEvent]) {
        if events.contains(&LevelEvent::MoveBlocked) {
            self.heading = (self.heading + 1) % HEADINGS.len();
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    let args = Args::parse();
    log::info!("Battle Bomber (headless) starting...");

    let tuning = match &args.tuning {
        Some(path) => Tuning::load_or_default(path),
        None => Tuning::default(),
    };

    let mut session = LevelSession::start(LevelId(args.level), &tuning);
    let mut pilot = Pilot { heading: 0 };
    let (mut shots, mut destroyed, mut pickups) = (0u32, 0u32, 0u32);

    for _ in 0..args.frames {
        let events = session.update(args.dt, &pilot.input()).to_vec();
        for event in &events {
            match event {
                LevelEvent::ProjectileFired { .. } => shots += 1,
                LevelEvent::TileDestroyed { .. } => destroyed += 1,
                LevelEvent::PickupConsumed { .. } => pickups += 1,
                _ => {}
            }
            log::trace!("frame {}: {:?}", session.frame(), event);
        }
        pilot.observe(&events);
        if session.outcome().is_some() {
            break;
        }
    }

    // Every sprite name mapped to a texture layer, as a host renderer would
    let layers: HashMap<String, u32> = ["wall", "destructible", "barrel", "powerup", "exit", "tank", "bullet"]
        .iter()
        .enumerate()
        .map(|(i, name)| (name.to_string(), i as u32))
        .collect();
    let draws = sprite_batch(&session, &layers);
    let bytes = instance::as_bytes(&instance::instances(&draws)).len();

    println!("Level {}", args.level);
    println!("  frames:      {} ({:.1}s)", session.frame(), session.elapsed());
    println!("  outcome:     {:?}", session.outcome());
    println!("  shots fired: {}", shots);
    println!("  destroyed:   {}", destroyed);
    println!("  pickups:     {}", pickups);
    println!(
        "  blocks left: {}",
        session.grid().remaining_destructibles()
    );
    println!("  enhanced:    {}", session.actor().is_enhanced());
    println!("  sprites:     {} ({} bytes)", draws.len(), bytes);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The host page drives the simulation directly
}
