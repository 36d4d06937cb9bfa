//! Escape-point scoring for evading ships
//!
//! A fixed number of candidate points is generated around the ship, the first
//! always straight away from the nearest threat. Candidates are scored on threat
//! proximity, world-edge proximity, distance gained from the ship's nearest
//! threat and crowding; the highest score wins and ties go to the earlier candidate.

use std::f32::consts::{FRAC_PI_4, TAU};

use glam::Vec3;

use super::intent::AiContext;
use crate::direction_from_angles;
use crate::sim::{SimRng, Ship};
use crate::tuning::WorldConfig;

const BASE_SCORE: f32 = 100.0;
const THREAT_PENALTY: f32 = 50.0;
const BOUNDARY_PENALTY: f32 = 30.0;
const DISTANCE_GAIN_WEIGHT: f32 = 0.1;
const CROWDING_PENALTY: f32 = 10.0;

/// Inputs for scoring one candidate
pub struct EscapeField<'s> {
    pub origin: Vec3,
    pub threats: &'s [Vec3],
    pub friends: &'s [Vec3],
    pub world: &'s WorldConfig,
    pub threat_penalty_radius: f32,
    pub boundary_margin: f32,
    pub crowding_radius: f32,
}

impl EscapeField<'_> {
    /// Threat closest to the evading ship
    fn nearest_threat(&self) -> Option<Vec3> {
        self.threats.iter().copied().min_by(|a, b| {
            a.distance_squared(self.origin)
                .total_cmp(&b.distance_squared(self.origin))
        })
    }

    pub fn score(&self, candidate: Vec3) -> f32 {
        let mut score = BASE_SCORE;

        if self.threat_penalty_radius > 0.0 {
            for threat in self.threats {
                let d = threat.distance(candidate);
                if d < self.threat_penalty_radius {
                    score -= THREAT_PENALTY * (1.0 - d / self.threat_penalty_radius);
                }
            }
        }

        if self.boundary_margin > 0.0 {
            let extent = self.world.extent();
            for axis in 0..3 {
                for gap in [candidate[axis], extent[axis] - candidate[axis]] {
                    if gap < self.boundary_margin {
                        score -= BOUNDARY_PENALTY * (self.boundary_margin - gap) / self.boundary_margin;
                    }
                }
            }
        }

        if let Some(threat) = self.nearest_threat() {
            score += DISTANCE_GAIN_WEIGHT * (threat.distance(candidate) - threat.distance(self.origin));
        }

        if self.crowding_radius > 0.0 {
            for friend in self.friends {
                let d = friend.distance(candidate);
                if d < self.crowding_radius {
                    score -= CROWDING_PENALTY * (self.crowding_radius - d) / self.crowding_radius;
                }
            }
        }

        score
    }
}

/// Best escape point for `ship`; straight ahead when nothing threatens it
pub fn best_escape(ship: &Ship, ctx: &AiContext<'_, '_>, rng: &mut SimRng) -> Vec3 {
    let behavior = &ctx.config.behavior;
    let nearby = ctx
        .neighbors
        .within(ship.position, behavior.evade_awareness_radius);
    let threats: Vec<Vec3> = nearby
        .iter()
        .filter(|s| s.team != ship.team)
        .map(|s| s.position)
        .collect();
    let friends: Vec<Vec3> = nearby
        .iter()
        .filter(|s| s.team == ship.team)
        .map(|s| s.position)
        .collect();

    let distance = behavior.evade_distance;
    let Some(nearest) = threats
        .iter()
        .copied()
        .min_by(|a, b| a.distance_squared(ship.position).total_cmp(&b.distance_squared(ship.position)))
    else {
        return ship.position + ship.orientation.forward() * distance;
    };

    let away = (ship.position - nearest).normalize_or(ship.orientation.forward());
    let mut candidates = Vec::with_capacity(behavior.evade_candidates.max(1));
    candidates.push(ship.position + away * distance);
    for _ in 1..behavior.evade_candidates {
        let yaw = rng.next_f32() * TAU;
        let pitch = (rng.next_f32() * 2.0 - 1.0) * FRAC_PI_4;
        candidates.push(ship.position + direction_from_angles(pitch, yaw) * distance);
    }

    let field = EscapeField {
        origin: ship.position,
        threats: &threats,
        friends: &friends,
        world: &ctx.config.world,
        threat_penalty_radius: behavior.threat_penalty_radius,
        boundary_margin: behavior.boundary_margin,
        crowding_radius: behavior.crowding_radius,
    };

    let mut best = candidates[0];
    let mut best_score = field.score(best);
    for &candidate in &candidates[1..] {
        let score = field.score(candidate);
        if score > best_score {
            best = candidate;
            best_score = score;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{FormationRegistry, Neighbors};
    use crate::sim::spawn::{SpawnRequest, spawn_ship};
    use crate::sim::{SimState, Team};
    use crate::tuning::{ShipClass, SimConfig};

    fn field<'s>(threats: &'s [Vec3], friends: &'s [Vec3], world: &'s WorldConfig) -> EscapeField<'s> {
        EscapeField {
            origin: Vec3::new(1000.0, 1000.0, 500.0),
            threats,
            friends,
            world,
            threat_penalty_radius: 200.0,
            boundary_margin: 100.0,
            crowding_radius: 80.0,
        }
    }

    #[test]
    fn test_open_space_scores_base_plus_gain() {
        let world = WorldConfig::default();
        let threats = [Vec3::new(900.0, 1000.0, 500.0)];
        let f = field(&threats, &[], &world);
        // 100 from the threat before, 400 after: +30 gain, no penalties
        let score = f.score(Vec3::new(1300.0, 1000.0, 500.0));
        assert!((score - 130.0).abs() < 1e-3);
    }

    #[test]
    fn test_gain_measured_from_ships_nearest_threat() {
        let world = WorldConfig::default();
        let threats = [Vec3::new(950.0, 1000.0, 500.0), Vec3::new(1400.0, 1000.0, 500.0)];
        let f = field(&threats, &[], &world);
        // Gain vs the threat 50 away from the ship: 350 - 50 => +30.
        // The far threat is 100 from the candidate: -25.
        let score = f.score(Vec3::new(1300.0, 1000.0, 500.0));
        assert!((score - 105.0).abs() < 1e-3);
    }

    #[test]
    fn test_boundary_and_crowding_penalties() {
        let world = WorldConfig::default();
        let friends = [Vec3::new(1000.0, 1000.0, 90.0)];
        let f = field(&[], &friends, &world);
        // 50 from the floor: -15; friend 40 away: -5
        let score = f.score(Vec3::new(1000.0, 1000.0, 50.0));
        assert!((score - 80.0).abs() < 1e-3);
    }

    #[test]
    fn test_threat_proximity_penalty() {
        let world = WorldConfig::default();
        let threats = [Vec3::new(1000.0, 1000.0, 500.0)];
        let f = field(&threats, &[], &world);
        // 100 from the threat: -25 penalty, no distance gained
        let score = f.score(Vec3::new(1000.0, 1100.0, 500.0));
        assert!((score - (100.0 - 25.0 + 10.0)).abs() < 1e-3);
    }

    #[test]
    fn test_escape_moves_away_from_threat() {
        let mut state = SimState::new(4, SimConfig::default());
        spawn_ship(&mut state, SpawnRequest::new(Team::Red, ShipClass::Fighter, Vec3::new(1000.0, 1000.0, 500.0)));
        spawn_ship(&mut state, SpawnRequest::new(Team::Blue, ShipClass::Fighter, Vec3::new(900.0, 1000.0, 500.0)));
        let registry = FormationRegistry::default();
        let (me, rest) = state.ships.split_first().unwrap();
        let neighbors = Neighbors::new(&[], rest, &state.index, None);
        let ctx = AiContext {
            neighbors: &neighbors,
            config: &state.config,
            formations: &registry,
            time: 0.0,
            dt: 0.1,
        };
        let mut rng = SimRng::new(9);
        let point = best_escape(me, &ctx, &mut rng);
        let threat = Vec3::new(900.0, 1000.0, 500.0);
        assert!(point.distance(threat) > me.position.distance(threat));
    }

    #[test]
    fn test_no_threat_goes_straight_without_drawing() {
        let mut state = SimState::new(4, SimConfig::default());
        spawn_ship(
            &mut state,
            SpawnRequest::new(Team::Red, ShipClass::Fighter, Vec3::splat(500.0)).with_heading(0.0),
        );
        let registry = FormationRegistry::default();
        let neighbors = Neighbors::new(&[], &[], &state.index, None);
        let ctx = AiContext {
            neighbors: &neighbors,
            config: &state.config,
            formations: &registry,
            time: 0.0,
            dt: 0.1,
        };
        let mut rng = SimRng::new(9);
        let mut fresh = SimRng::new(9);
        let point = best_escape(&state.ships[0], &ctx, &mut rng);
        assert!((point - Vec3::new(800.0, 500.0, 500.0)).length() < 1e-3);
        assert_eq!(rng.next_f32(), fresh.next_f32());
    }
}
