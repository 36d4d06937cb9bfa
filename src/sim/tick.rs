//! Fixed timestep simulation tick
//!
//! Advances the battle deterministically. Step order is fixed:
//! 1. Clock
//! 2. Shield regeneration
//! 3. AI (intents, steering, turret targeting)
//! 4. Ship boundary policy
//! 5. Spatial index maintenance
//! 6. Turret fire
//! 7. Bullets and hits
//! 8. Deaths and kill credit
//! 9. Leveling
//! 10. Carrier launches
//! 11. Periodic cleanup

use super::boundary::{apply_ship_boundaries, periodic_cleanup};
use super::combat::{fire_turrets, process_deaths, regenerate_shields, update_bullets};
use super::progression::level_up_ships;
use super::spawn::launch_fighters;
use super::state::SimState;
use crate::ai::AiController;

/// Advance the simulation by one fixed timestep
pub fn tick(state: &mut SimState, controller: &mut AiController, dt: f32) {
    state.tick += 1;
    state.time += dt;

    regenerate_shields(state, dt);

    controller.update(state, dt);

    apply_ship_boundaries(state);

    update_spatial_index(state);

    fire_turrets(state, dt);
    update_bullets(state, dt);

    let removed = process_deaths(state, controller);
    if removed > 0 {
        log::debug!(
            "Tick {}: {} ships destroyed, score {}-{}",
            state.tick,
            removed,
            state.score[0],
            state.score[1]
        );
    }

    level_up_ships(state);

    launch_fighters(state, dt);

    let teleported = periodic_cleanup(state);
    if teleported > 0 {
        log::debug!("Tick {}: cleanup returned {} ships", state.tick, teleported);
    }
}

/// Move living ships in the grid and purge ids that are dead or gone
fn update_spatial_index(state: &mut SimState) {
    let living = state.living_ids();
    let Some(grid) = state.spatial.as_mut() else {
        return;
    };
    for ship in state.ships.iter().filter(|s| s.is_alive()) {
        grid.upsert(ship.id, ship.position);
    }
    grid.retain(&living);
}
