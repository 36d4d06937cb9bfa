//! Turn-rate limited steering and thrust integration

use glam::Vec3;

use super::intent::{AiContext, SteeringGoal};
use super::Neighbors;
use crate::consts::{DAMPING, MAX_PITCH, THRUST_FACTOR};
use crate::sim::{Orientation, Ship};
use crate::{angles_from_direction, normalize_angle};

/// Pitch and yaw that point from `from` toward `to`
#[inline]
pub fn look_at(from: Vec3, to: Vec3) -> (f32, f32) {
    angles_from_direction(to - from)
}

/// Turn toward `target` by at most `turn_rate * dt` per axis, then thrust forward
pub fn steer_toward(ship: &mut Ship, target: Vec3, dt: f32) {
    if target.distance_squared(ship.position) > f32::EPSILON {
        let (pitch, yaw) = look_at(ship.position, target);
        let max_delta = ship.turn_rate * dt;

        // Shortest way around
        let yaw_delta = normalize_angle(yaw - ship.orientation.yaw).clamp(-max_delta, max_delta);
        let pitch_delta = (pitch - ship.orientation.pitch).clamp(-max_delta, max_delta);

        ship.set_orientation(Orientation {
            pitch: (ship.orientation.pitch + pitch_delta).clamp(-MAX_PITCH, MAX_PITCH),
            yaw: normalize_angle(ship.orientation.yaw + yaw_delta),
            roll: ship.orientation.roll,
        });
    }

    let forward = ship.orientation.forward();
    ship.velocity += forward * THRUST_FACTOR * ship.speed * dt;
    integrate(ship, dt);
}

/// No thrust; damping still bleeds off speed
pub fn coast(ship: &mut Ship, dt: f32) {
    integrate(ship, dt);
}

fn integrate(ship: &mut Ship, dt: f32) {
    ship.velocity *= DAMPING;
    ship.velocity = ship.velocity.clamp_length_max(ship.speed.max(0.0));
    ship.position += ship.velocity * dt;
}

/// Unit push away from crowding teammates, or zero
///
/// Each neighbor closer than `distance` contributes its away direction weighted
/// by inverse distance.
pub fn separation_force(ship: &Ship, neighbors: &Neighbors<'_>, distance: f32) -> Vec3 {
    let mut sum = Vec3::ZERO;
    let mut count = 0;
    for other in neighbors.within(ship.position, distance) {
        if other.team != ship.team {
            continue;
        }
        let d = other.position.distance(ship.position);
        if d <= 0.0 {
            continue;
        }
        sum += (ship.position - other.position).normalize() / d;
        count += 1;
    }
    if count == 0 {
        return Vec3::ZERO;
    }
    (sum / count as f32).normalize_or_zero()
}

/// Blend the goal direction with separation and steer toward the adjusted point
pub fn steer_with_separation(ship: &mut Ship, target: Vec3, ctx: &AiContext<'_, '_>) {
    let behavior = &ctx.config.behavior;
    let separation = separation_force(ship, ctx.neighbors, behavior.separation_distance);
    if separation == Vec3::ZERO {
        steer_toward(ship, target, ctx.dt);
        return;
    }
    let to_target = target - ship.position;
    let dist = to_target.length();
    let desired =
        (to_target.normalize_or_zero() + separation * behavior.separation_weight).normalize_or_zero();
    let adjusted = ship.position + desired * dist.max(1.0);
    steer_toward(ship, adjusted, ctx.dt);
}

/// Execute a handler's goal
pub fn apply_goal(ship: &mut Ship, goal: SteeringGoal, ctx: &AiContext<'_, '_>) {
    match goal {
        SteeringGoal::Hold => coast(ship, ctx.dt),
        SteeringGoal::Seek(target) if ctx.config.behavior.use_separation => {
            steer_with_separation(ship, target, ctx)
        }
        SteeringGoal::Seek(target) => steer_toward(ship, target, ctx.dt),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spawn::{SpawnRequest, spawn_ship};
    use crate::sim::{SimState, Team};
    use crate::tuning::{ShipClass, SimConfig};
    use std::f32::consts::PI;

    fn ship_at(pos: Vec3, yaw: f32) -> Ship {
        let mut state = SimState::new(1, SimConfig::default());
        let id = spawn_ship(
            &mut state,
            SpawnRequest::new(Team::Red, ShipClass::Fighter, pos).with_heading(yaw),
        );
        state.ship(id).unwrap().clone()
    }

    #[test]
    fn test_turn_is_clamped_to_turn_rate() {
        let mut ship = ship_at(Vec3::splat(500.0), 0.0);
        // Target straight behind: full turn needed
        steer_toward(&mut ship, Vec3::new(0.0, 500.0, 500.0), 0.1);
        let max = ship.turn_rate * 0.1;
        assert!((ship.orientation.yaw.abs() - max).abs() < 1e-4);
        assert_eq!(ship.angle, ship.orientation.yaw);
    }

    #[test]
    fn test_yaw_takes_shortest_path_across_pi() {
        let mut ship = ship_at(Vec3::splat(500.0), PI - 0.05);
        // Target just past -PI
        let target = Vec3::splat(500.0) + Vec3::new((-PI + 0.05).cos(), (-PI + 0.05).sin(), 0.0) * 100.0;
        steer_toward(&mut ship, target, 0.1);
        assert!(ship.orientation.yaw.abs() > PI - 0.05 - 1e-4);
    }

    #[test]
    fn test_speed_never_exceeds_max() {
        let mut ship = ship_at(Vec3::splat(500.0), 0.0);
        ship.velocity = Vec3::new(1000.0, 0.0, 0.0);
        steer_toward(&mut ship, Vec3::new(2000.0, 500.0, 500.0), 0.1);
        assert!(ship.velocity.length() <= ship.speed + 1e-3);
    }

    #[test]
    fn test_pitch_stays_clamped() {
        let mut ship = ship_at(Vec3::splat(500.0), 0.0);
        ship.turn_rate = 100.0;
        steer_toward(&mut ship, Vec3::new(500.0, 500.0, 900.0), 1.0);
        assert!(ship.orientation.pitch <= MAX_PITCH);
    }

    #[test]
    fn test_separation_pushes_apart() {
        let mut state = SimState::new(1, SimConfig::default());
        spawn_ship(&mut state, SpawnRequest::new(Team::Red, ShipClass::Fighter, Vec3::new(500.0, 500.0, 500.0)));
        spawn_ship(&mut state, SpawnRequest::new(Team::Red, ShipClass::Fighter, Vec3::new(520.0, 500.0, 500.0)));
        spawn_ship(&mut state, SpawnRequest::new(Team::Blue, ShipClass::Fighter, Vec3::new(480.0, 500.0, 500.0)));
        let (me, rest) = state.ships.split_first().unwrap();
        let neighbors = Neighbors::new(&[], rest, &state.index, None);
        let push = separation_force(me, &neighbors, 60.0);
        // Enemy on the other side is ignored
        assert!((push - Vec3::new(-1.0, 0.0, 0.0)).length() < 1e-5);
    }
}
