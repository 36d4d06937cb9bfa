//! Roaming anchors and patrol patterns
//!
//! Each team keeps a list of claimed anchor points. New anchors are sampled
//! uniformly in the world box and must keep `anchor_min_separation` from every
//! anchor the team already holds; after `anchor_attempts` misses the ship's own
//! position is used instead.

use std::collections::HashMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::sim::{SimRng, Team};
use crate::tuning::{RoamingConfig, WorldConfig};

/// Distance under which a released point matches a stored anchor
const RELEASE_EPSILON: f32 = 1.0;

/// Shape traced around an anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatrolPattern {
    Circle,
    FigureEight,
    /// Back and forth along x
    Sweep,
}

impl PatrolPattern {
    pub const ALL: [PatrolPattern; 3] = [
        PatrolPattern::Circle,
        PatrolPattern::FigureEight,
        PatrolPattern::Sweep,
    ];
}

/// Point on the patrol path `elapsed` seconds after the patrol began
pub fn patrol_point(anchor: Vec3, pattern: PatrolPattern, elapsed: f32, cfg: &RoamingConfig) -> Vec3 {
    let phase = elapsed * cfg.patrol_rate;
    let r = cfg.patrol_radius;
    let offset = match pattern {
        PatrolPattern::Circle => Vec3::new(phase.cos() * r, phase.sin() * r, 0.0),
        PatrolPattern::FigureEight => Vec3::new(phase.sin() * r, (2.0 * phase).sin() * r * 0.5, 0.0),
        PatrolPattern::Sweep => Vec3::new(phase.sin() * r, 0.0, 0.0),
    };
    anchor + offset
}

#[derive(Debug, Clone, Default)]
pub struct RoamingAnchors {
    by_team: HashMap<Team, Vec<Vec3>>,
}

impl RoamingAnchors {
    pub fn anchors(&self, team: Team) -> &[Vec3] {
        self.by_team.get(&team).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn total(&self) -> usize {
        self.by_team.values().map(Vec::len).sum()
    }

    /// Claim a new anchor for `team`
    ///
    /// Always consumes three draws per attempt until a point is accepted.
    pub fn assign(
        &mut self,
        team: Team,
        fallback: Vec3,
        world: &WorldConfig,
        cfg: &RoamingConfig,
        rng: &mut SimRng,
    ) -> Vec3 {
        let extent = world.extent();
        let held = self.by_team.entry(team).or_default();
        let min_sep_sq = cfg.anchor_min_separation * cfg.anchor_min_separation;

        let mut chosen = None;
        for _ in 0..cfg.anchor_attempts {
            let candidate = Vec3::new(
                rng.next_f32() * extent.x,
                rng.next_f32() * extent.y,
                rng.next_f32() * extent.z,
            );
            if held.iter().all(|a| a.distance_squared(candidate) >= min_sep_sq) {
                chosen = Some(candidate);
                break;
            }
        }

        let anchor = chosen.unwrap_or_else(|| {
            log::debug!("No separated anchor for {:?}; using ship position", team);
            fallback
        });
        held.push(anchor);
        anchor
    }

    /// Release the anchor nearest `point` (within a small tolerance)
    pub fn release(&mut self, team: Team, point: Vec3) -> bool {
        let Some(held) = self.by_team.get_mut(&team) else {
            return false;
        };
        match held
            .iter()
            .position(|a| a.distance(point) <= RELEASE_EPSILON)
        {
            Some(i) => {
                held.remove(i);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_anchors_keep_min_separation() {
        let world = WorldConfig::default();
        let cfg = RoamingConfig::default();
        let mut rng = SimRng::new(21);
        let mut anchors = RoamingAnchors::default();
        for _ in 0..5 {
            anchors.assign(Team::Red, Vec3::ZERO, &world, &cfg, &mut rng);
        }
        let held = anchors.anchors(Team::Red);
        assert_eq!(held.len(), 5);
        for (i, a) in held.iter().enumerate() {
            assert!(world.contains(*a));
            for b in &held[i + 1..] {
                assert!(a.distance(*b) >= cfg.anchor_min_separation);
            }
        }
    }

    #[test]
    fn test_falls_back_to_ship_position() {
        let world = WorldConfig::default();
        let cfg = RoamingConfig {
            anchor_min_separation: 1.0e6,
            ..RoamingConfig::default()
        };
        let mut rng = SimRng::new(21);
        let mut anchors = RoamingAnchors::default();
        anchors.assign(Team::Blue, Vec3::ZERO, &world, &cfg, &mut rng);
        let fallback = Vec3::new(12.0, 34.0, 56.0);
        assert_eq!(anchors.assign(Team::Blue, fallback, &world, &cfg, &mut rng), fallback);
    }

    #[test]
    fn test_teams_do_not_constrain_each_other() {
        let world = WorldConfig::default();
        let cfg = RoamingConfig {
            anchor_min_separation: 1.0e6,
            ..RoamingConfig::default()
        };
        let mut rng = SimRng::new(3);
        let mut anchors = RoamingAnchors::default();
        let red = anchors.assign(Team::Red, Vec3::ZERO, &world, &cfg, &mut rng);
        let blue = anchors.assign(Team::Blue, Vec3::ONE, &world, &cfg, &mut rng);
        // Each first anchor is sampled, not the fallback
        assert_ne!(red, Vec3::ZERO);
        assert_ne!(blue, Vec3::ONE);
    }

    #[test]
    fn test_release_removes_only_matching_anchor() {
        let world = WorldConfig::default();
        let cfg = RoamingConfig::default();
        let mut rng = SimRng::new(8);
        let mut anchors = RoamingAnchors::default();
        let a = anchors.assign(Team::Red, Vec3::ZERO, &world, &cfg, &mut rng);
        anchors.assign(Team::Red, Vec3::ZERO, &world, &cfg, &mut rng);
        assert!(anchors.release(Team::Red, a + Vec3::splat(0.1)));
        assert!(!anchors.release(Team::Red, a));
        assert!(!anchors.release(Team::Blue, a));
        assert_eq!(anchors.total(), 1);
    }

    proptest! {
        #[test]
        fn prop_patrol_stays_within_radius(elapsed in 0.0f32..1000.0, pick in 0usize..3) {
            let cfg = RoamingConfig::default();
            let anchor = Vec3::splat(500.0);
            let p = patrol_point(anchor, PatrolPattern::ALL[pick], elapsed, &cfg);
            prop_assert!(p.distance(anchor) <= cfg.patrol_radius * 1.5 + 1e-3);
        }
    }
}
