//! Fleet Sim entry point
//!
//! Runs a headless battle between two default fleets and prints the result.
//!
//! Usage: `fleet-sim [seed] [max_ticks] [config.json]`

use fleet_sim::consts::SIM_DT;
use fleet_sim::sim::{Simulation, Team};
use fleet_sim::tuning::{ShipClass, SimConfig};

const DEFAULT_SEED: u64 = 12345;
const DEFAULT_MAX_TICKS: u64 = 60 * 60 * 3;
/// Progress report interval (ten simulated seconds)
const REPORT_EVERY: u64 = 600;

const DEFAULT_FLEET: [(ShipClass, u32); 5] = [
    (ShipClass::Fighter, 8),
    (ShipClass::Corvette, 4),
    (ShipClass::Frigate, 2),
    (ShipClass::Destroyer, 1),
    (ShipClass::Carrier, 1),
];

/// Load config from disk, falling back to defaults on any error
#[cfg(not(target_arch = "wasm32"))]
fn load_config(path: Option<&str>) -> SimConfig {
    let Some(path) = path else {
        return SimConfig::default();
    };
    match std::fs::read_to_string(path) {
        Ok(json) => match SimConfig::from_json(&json) {
            Ok(config) => {
                log::info!("Loaded config from {}", path);
                config
            }
            Err(e) => {
                log::warn!("Failed to parse {}: {}, using defaults", path, e);
                SimConfig::default()
            }
        },
        Err(e) => {
            log::warn!("Failed to read {}: {}, using defaults", path, e);
            SimConfig::default()
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let seed = args
        .first()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SEED);
    let max_ticks = args
        .get(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_MAX_TICKS);
    let config = load_config(args.get(2).map(String::as_str));

    log::info!("Fleet Sim starting (seed {}, up to {} ticks)", seed, max_ticks);

    let mut sim = Simulation::new(seed, config);
    sim.spawn_fleet(Team::Red, &DEFAULT_FLEET);
    sim.spawn_fleet(Team::Blue, &DEFAULT_FLEET);

    while sim.tick_count() < max_ticks && sim.winner().is_none() {
        sim.step(SIM_DT);
        if sim.tick_count() % REPORT_EVERY == 0 {
            log::info!(
                "t={:.0}s red {} ships / {} kills, blue {} ships / {} kills, {} bullets",
                sim.time(),
                sim.state.living_count(Team::Red),
                sim.score(Team::Red),
                sim.state.living_count(Team::Blue),
                sim.score(Team::Blue),
                sim.bullets().len()
            );
        }
    }

    let outcome = match sim.winner() {
        Some(team) => format!("{:?} wins", team),
        None => "no winner".to_string(),
    };
    println!(
        "{} after {:.1}s ({} ticks): red {} kills, blue {} kills",
        outcome,
        sim.time(),
        sim.tick_count(),
        sim.score(Team::Red),
        sim.score(Team::Blue)
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library-only on wasm; embedders drive `Simulation` directly
}
