//! World boundary handling for ships and bullets

use glam::Vec3;

use super::state::{SimState, Team};
use crate::tuning::{BoundaryPolicy, WorldConfig};

/// Outcome of applying a boundary policy to one entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryOutcome {
    Inside,
    Bounced,
    Wrapped,
    /// Entity left the world under the remove policy and must be deleted
    Removed,
}

/// Apply `policy` to a position/velocity pair inside `world`
///
/// Bounce flips the sign of each offending velocity component and clamps the
/// position to the face; wrap shifts by the axis extent; remove leaves the
/// entity where it is and reports it.
pub fn apply_boundary(
    policy: BoundaryPolicy,
    world: &WorldConfig,
    position: &mut Vec3,
    velocity: &mut Vec3,
) -> BoundaryOutcome {
    if world.contains(*position) {
        return BoundaryOutcome::Inside;
    }
    let extent = world.extent();
    match policy {
        BoundaryPolicy::Bounce => {
            for axis in 0..3 {
                if position[axis] < 0.0 {
                    position[axis] = 0.0;
                    velocity[axis] = -velocity[axis];
                } else if position[axis] > extent[axis] {
                    position[axis] = extent[axis];
                    velocity[axis] = -velocity[axis];
                }
            }
            BoundaryOutcome::Bounced
        }
        BoundaryPolicy::Wrap => {
            for axis in 0..3 {
                if position[axis] < 0.0 {
                    position[axis] += extent[axis];
                } else if position[axis] > extent[axis] {
                    position[axis] -= extent[axis];
                }
            }
            BoundaryOutcome::Wrapped
        }
        BoundaryPolicy::Remove => BoundaryOutcome::Removed,
    }
}

/// Apply the ship policy to every living ship; removed ships get zero health
pub fn apply_ship_boundaries(state: &mut SimState) {
    let policy = state.config.world.ship_boundary;
    let world = &state.config.world;
    for ship in state.ships.iter_mut().filter(|s| s.is_alive()) {
        if apply_boundary(policy, world, &mut ship.position, &mut ship.velocity)
            == BoundaryOutcome::Removed
        {
            ship.health = 0.0;
        }
    }
}

/// Small fixed offset derived from an id, so cleanup teleports do not stack ships
fn id_jitter(id: u32) -> Vec3 {
    let component = |salt: u32| {
        let h = id.wrapping_mul(2654435761).wrapping_add(salt.wrapping_mul(40503));
        ((h >> 8) % 41) as f32 - 20.0
    };
    Vec3::new(component(1), component(2), component(3))
}

/// Send stray ships home and prune stray bullets
///
/// Runs every `cleanup_interval_ticks` when enabled. Returns the number of
/// ships teleported.
pub fn periodic_cleanup(state: &mut SimState) -> usize {
    let world = &state.config.world;
    if !world.cleanup_enabled || world.cleanup_interval_ticks == 0 {
        return 0;
    }
    if state.tick % world.cleanup_interval_ticks != 0 {
        return 0;
    }

    let mut teleported = 0;
    for ship in state.ships.iter_mut() {
        if world.contains(ship.position) {
            continue;
        }
        let home = home_position(world, ship.team, ship.id);
        log::debug!(
            "Cleanup: ship {} out of bounds at {:?}, returning to {:?}",
            ship.id,
            ship.position,
            home
        );
        ship.position = home;
        ship.velocity = Vec3::ZERO;
        ship.target_id = None;
        teleported += 1;
    }
    state.bullets.retain(|b| world.contains(b.position));
    teleported
}

fn home_position(world: &WorldConfig, team: Team, id: u32) -> Vec3 {
    (world.spawn_center(team) + id_jitter(id)).clamp(Vec3::ZERO, world.extent())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Bullet;
    use crate::sim::spawn::{SpawnRequest, spawn_ship};
    use crate::tuning::{ShipClass, SimConfig};
    use proptest::prelude::*;

    fn world() -> WorldConfig {
        WorldConfig {
            width: 1000.0,
            height: 800.0,
            depth: 600.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_wrap_maps_past_far_face_to_near_face() {
        let w = world();
        let mut pos = Vec3::new(1000.0 + 25.0, 400.0, 300.0);
        let mut vel = Vec3::new(10.0, 0.0, 0.0);
        let out = apply_boundary(BoundaryPolicy::Wrap, &w, &mut pos, &mut vel);
        assert_eq!(out, BoundaryOutcome::Wrapped);
        assert!((pos.x - 25.0).abs() < 1e-3);
        assert_eq!(vel, Vec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_bounce_clamps_and_flips() {
        let w = world();
        let mut pos = Vec3::new(1010.0, 400.0, -5.0);
        let mut vel = Vec3::new(30.0, 4.0, -2.0);
        let out = apply_boundary(BoundaryPolicy::Bounce, &w, &mut pos, &mut vel);
        assert_eq!(out, BoundaryOutcome::Bounced);
        assert_eq!(pos, Vec3::new(1000.0, 400.0, 0.0));
        assert_eq!(vel, Vec3::new(-30.0, 4.0, 2.0));
    }

    #[test]
    fn test_remove_does_not_move() {
        let w = world();
        let mut pos = Vec3::new(-1.0, 10.0, 10.0);
        let mut vel = Vec3::X;
        assert_eq!(
            apply_boundary(BoundaryPolicy::Remove, &w, &mut pos, &mut vel),
            BoundaryOutcome::Removed
        );
        assert_eq!(pos, Vec3::new(-1.0, 10.0, 10.0));
    }

    #[test]
    fn test_ship_remove_policy_zeroes_health() {
        let mut config = SimConfig::default();
        config.world.ship_boundary = BoundaryPolicy::Remove;
        let mut state = SimState::new(1, config);
        let id = spawn_ship(&mut state, SpawnRequest::new(Team::Red, ShipClass::Fighter, Vec3::splat(10.0)));
        state.ship_mut(id).unwrap().position.x = -50.0;
        apply_ship_boundaries(&mut state);
        assert_eq!(state.ship(id).unwrap().health, 0.0);
    }

    #[test]
    fn test_cleanup_teleports_home_and_prunes_bullets() {
        let mut config = SimConfig::default();
        config.world.cleanup_interval_ticks = 10;
        let mut state = SimState::new(1, config);
        let id = spawn_ship(&mut state, SpawnRequest::new(Team::Blue, ShipClass::Fighter, Vec3::splat(10.0)));
        {
            let ship = state.ship_mut(id).unwrap();
            ship.position = Vec3::new(-500.0, 10.0, 10.0);
            ship.velocity = Vec3::splat(5.0);
            ship.target_id = Some(99);
        }
        state.bullets.push(Bullet {
            id: 1,
            owner_id: id,
            owner_team: Team::Blue,
            position: Vec3::new(0.0, -3.0, 0.0),
            velocity: Vec3::ZERO,
            ttl: 1.0,
            damage: 1.0,
        });

        state.tick = 9;
        assert_eq!(periodic_cleanup(&mut state), 0);
        assert_eq!(state.bullets.len(), 1);

        state.tick = 10;
        assert_eq!(periodic_cleanup(&mut state), 1);
        let ship = state.ship(id).unwrap();
        let home = state.config.world.spawn_center(Team::Blue);
        assert!((ship.position - home).abs().max_element() <= 20.0);
        assert_eq!(ship.velocity, Vec3::ZERO);
        assert!(ship.target_id.is_none());
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_cleanup_jitter_is_deterministic() {
        assert_eq!(id_jitter(17), id_jitter(17));
        assert!(id_jitter(17).abs().max_element() <= 20.0);
    }

    proptest! {
        #[test]
        fn prop_wrap_offsets_by_extent(k in 0.1f32..500.0) {
            let w = world();
            let mut pos = Vec3::new(w.width + k, 10.0, 10.0);
            let mut vel = Vec3::ZERO;
            apply_boundary(BoundaryPolicy::Wrap, &w, &mut pos, &mut vel);
            prop_assert!((pos.x - k).abs() < 1e-3);
        }

        #[test]
        fn prop_bounce_ends_inside(x in -2000.0f32..3000.0, vx in -100.0f32..100.0) {
            let w = world();
            let mut pos = Vec3::new(x, 10.0, 10.0);
            let mut vel = Vec3::new(vx, 0.0, 0.0);
            apply_boundary(BoundaryPolicy::Bounce, &w, &mut pos, &mut vel);
            prop_assert!(w.contains(pos));
        }
    }
}
