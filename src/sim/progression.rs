//! Experience and leveling

use super::state::Ship;
use crate::tuning::{ProgressionConfig, ShipClassConfig};

/// Spend banked XP on level-ups; returns how many levels were gained
///
/// Each level rescales max health/shield from the class base stats, heals a
/// fraction of the new max health and refills the shield.
pub fn apply_leveling(ship: &mut Ship, base: &ShipClassConfig, curve: &ProgressionConfig) -> u32 {
    let mut gained = 0;
    // A non-positive requirement would loop forever
    while ship.next_level_xp > 0.0 && ship.xp >= ship.next_level_xp {
        ship.xp -= ship.next_level_xp;
        ship.level += 1;
        ship.next_level_xp = curve.xp_to_next(ship.level);

        ship.max_health = base.max_health * curve.health_scale(ship.level);
        ship.max_shield = base.max_shield * curve.shield_scale(ship.level);
        ship.health = (ship.health + ship.max_health * curve.level_up_heal).min(ship.max_health);
        ship.shield = ship.max_shield;
        gained += 1;
    }
    gained
}

/// Run leveling over every living ship
pub fn level_up_ships(state: &mut super::SimState) {
    let config = &state.config;
    for ship in state.ships.iter_mut().filter(|s| s.is_alive()) {
        let gained = apply_leveling(ship, config.ships.get(ship.class), &config.progression);
        if gained > 0 {
            log::debug!("Ship {} reached level {}", ship.id, ship.level);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimState;
    use crate::sim::spawn::{SpawnRequest, spawn_ship};
    use crate::sim::state::Team;
    use crate::tuning::{ShipClass, SimConfig};
    use glam::Vec3;
    use proptest::prelude::*;

    fn fresh_ship(class: ShipClass) -> (SimState, u32) {
        let mut state = SimState::new(1, SimConfig::default());
        let id = spawn_ship(&mut state, SpawnRequest::new(Team::Red, class, Vec3::splat(100.0)));
        (state, id)
    }

    #[test]
    fn test_single_level_up_heals_and_refills() {
        let (mut state, id) = fresh_ship(ShipClass::Frigate);
        let base = state.config.class(ShipClass::Frigate).clone();
        let curve = state.config.progression.clone();
        let ship = state.ship_mut(id).unwrap();
        ship.health = 50.0;
        ship.shield = 0.0;
        ship.xp = 120.0;

        assert_eq!(apply_leveling(ship, &base, &curve), 1);
        assert_eq!(ship.level, 2);
        assert!((ship.xp - 20.0).abs() < 1e-4);
        assert!((ship.max_health - 220.0).abs() < 1e-3);
        // 50 + 20% of 220
        assert!((ship.health - 94.0).abs() < 1e-3);
        assert_eq!(ship.shield, ship.max_shield);
        assert!((ship.next_level_xp - 150.0).abs() < 1e-3);
    }

    #[test]
    fn test_multiple_levels_from_one_grant() {
        let (mut state, id) = fresh_ship(ShipClass::Fighter);
        let base = state.config.class(ShipClass::Fighter).clone();
        let curve = state.config.progression.clone();
        let ship = state.ship_mut(id).unwrap();
        ship.xp = 100.0 + 150.0 + 10.0;
        assert_eq!(apply_leveling(ship, &base, &curve), 2);
        assert_eq!(ship.level, 3);
        assert!((ship.xp - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_heal_never_exceeds_max() {
        let (mut state, id) = fresh_ship(ShipClass::Fighter);
        let base = state.config.class(ShipClass::Fighter).clone();
        let curve = state.config.progression.clone();
        let ship = state.ship_mut(id).unwrap();
        ship.xp = 100.0;
        apply_leveling(ship, &base, &curve);
        assert!(ship.health <= ship.max_health);
    }

    proptest! {
        #[test]
        fn prop_leveling_is_monotonic(grants in proptest::collection::vec(0.0f32..400.0, 1..40)) {
            let (mut state, id) = fresh_ship(ShipClass::Destroyer);
            let base = state.config.class(ShipClass::Destroyer).clone();
            let curve = state.config.progression.clone();
            let ship = state.ship_mut(id).unwrap();
            let mut level = ship.level;
            let mut max_health = ship.max_health;
            let mut max_shield = ship.max_shield;
            for xp in grants {
                ship.xp += xp;
                apply_leveling(ship, &base, &curve);
                prop_assert!(ship.level >= level);
                prop_assert!(ship.max_health >= max_health);
                prop_assert!(ship.max_shield >= max_shield);
                prop_assert!(ship.xp < ship.next_level_xp);
                level = ship.level;
                max_health = ship.max_health;
                max_shield = ship.max_shield;
            }
        }
    }
}
