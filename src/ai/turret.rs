//! Independent turret targeting

use super::Neighbors;
use crate::sim::{Ship, TurretAi};
use crate::tuning::SimConfig;

/// Target preference: closer, more damaged and higher level ships score higher
#[inline]
pub fn turret_score(distance: f32, missing_health: f32, level: u32) -> f32 {
    1000.0 / distance.max(1.0) + 0.1 * missing_health + 5.0 * level as f32
}

/// Re-pick targets for turrets whose retarget interval has elapsed
///
/// Does nothing unless independent targeting is enabled; turrets then fall back
/// to the ship target only while they have none of their own.
pub fn update_turrets(ship: &mut Ship, neighbors: &Neighbors<'_>, config: &SimConfig, time: f32) {
    let behavior = &config.behavior;
    if !behavior.independent_targeting {
        return;
    }
    let class_cfg = config.class(ship.class);
    let position = ship.position;
    let team = ship.team;

    for turret in &mut ship.turrets {
        let due = turret
            .ai
            .as_ref()
            .is_none_or(|ai| time - ai.last_update >= behavior.turret_retarget_interval);
        if !due {
            continue;
        }
        let Some(spec) = class_cfg.turrets.get(turret.id) else {
            continue;
        };

        let mut best: Option<(u32, f32)> = None;
        for enemy in neighbors.within(position, spec.range) {
            if enemy.team == team {
                continue;
            }
            let d = enemy.position.distance(position);
            if d < spec.min_range {
                continue;
            }
            let score = turret_score(d, enemy.max_health - enemy.health, enemy.level);
            if best.is_none_or(|(_, s)| score > s) {
                best = Some((enemy.id, score));
            }
        }

        turret.ai = Some(TurretAi {
            target_id: best.map(|(id, _)| id),
            last_update: time,
        });
    }
}
