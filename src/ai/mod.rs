//! Ship AI controller
//!
//! One controller lives for the whole session and is handed to every tick. It
//! owns the per-team roaming-anchor registry and the formation registry; the
//! per-ship state lives on the ships themselves (`Ship::ai`).
//!
//! Ships are processed in store order and each ship sees the already-updated
//! positions of the ships before it. That order, together with the order of
//! candidates inside each behavior, fixes RNG consumption.

pub mod evasion;
pub mod formation;
pub mod intent;
pub mod roaming;
mod selection;
pub mod steering;
pub mod turret;

pub use formation::{Formation, FormationAnchor, FormationRegistry, slot_offsets};
pub use intent::{AiContext, Intent, SteeringGoal};
pub use roaming::{PatrolPattern, RoamingAnchors};

use std::collections::HashMap;

use glam::Vec3;

use crate::sim::{AiState, SimRng, SimState, Ship, SpatialGrid};
use crate::tuning::{ShipClass, SimConfig};

/// Read-only view of every ship except the one being updated
///
/// Iteration order is store order with the updated ship skipped.
pub struct Neighbors<'a> {
    before: &'a [Ship],
    after: &'a [Ship],
    self_idx: usize,
    index: &'a HashMap<u32, usize>,
    grid: Option<&'a SpatialGrid>,
}

impl<'a> Neighbors<'a> {
    pub fn new(
        before: &'a [Ship],
        after: &'a [Ship],
        index: &'a HashMap<u32, usize>,
        grid: Option<&'a SpatialGrid>,
    ) -> Self {
        Self {
            self_idx: before.len(),
            before,
            after,
            index,
            grid,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Ship> + 'a {
        self.before.iter().chain(self.after.iter())
    }

    fn at(&self, idx: usize) -> Option<&'a Ship> {
        if idx < self.self_idx {
            self.before.get(idx)
        } else if idx > self.self_idx {
            self.after.get(idx - self.self_idx - 1)
        } else {
            None
        }
    }

    /// Another ship by id (never the updated ship itself)
    pub fn get(&self, id: u32) -> Option<&'a Ship> {
        self.index
            .get(&id)
            .and_then(|&idx| self.at(idx))
            .filter(|s| s.id == id)
    }

    /// Living ships within `radius` of `pos`, in store order
    pub fn within(&self, pos: Vec3, radius: f32) -> Vec<&'a Ship> {
        let radius_sq = radius * radius;
        let in_range = |s: &&'a Ship| s.is_alive() && s.position.distance_squared(pos) <= radius_sq;

        match self.grid {
            Some(grid) => {
                // Grid positions lag by one tick; pad the query by a cell
                let mut indices: Vec<usize> = grid
                    .query_radius(pos, radius + grid.cell_size())
                    .into_iter()
                    .filter_map(|id| self.index.get(&id).copied())
                    .filter(|&idx| idx != self.self_idx)
                    .collect();
                indices.sort_unstable();
                indices.dedup();
                indices
                    .into_iter()
                    .filter_map(|idx| self.at(idx))
                    .filter(in_range)
                    .collect()
            }
            None => self.iter().filter(in_range).collect(),
        }
    }

    /// Nearest living ship not on `ship`'s team; ties go to the first in order
    pub fn nearest_enemy(&self, ship: &Ship) -> Option<(&'a Ship, f32)> {
        let mut best: Option<(&'a Ship, f32)> = None;
        for other in self.iter() {
            if !other.is_alive() || other.team == ship.team {
                continue;
            }
            let d = other.position.distance(ship.position);
            if best.is_none_or(|(_, bd)| d < bd) {
                best = Some((other, d));
            }
        }
        best
    }
}

/// Preferred engagement range of a class
pub fn preferred_range(config: &SimConfig, class: ShipClass) -> f32 {
    let class_cfg = config.class(class);
    let range = class_cfg.max_turret_range();
    let range = if range > 0.0 { range } else { 200.0 };
    range * class_cfg.personality.preferred_range_multiplier
}

/// Session-lived AI service
#[derive(Debug, Clone, Default)]
pub struct AiController {
    anchors: RoamingAnchors,
    formations: FormationRegistry,
}

impl AiController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn anchors(&self) -> &RoamingAnchors {
        &self.anchors
    }

    pub fn formations(&self) -> &FormationRegistry {
        &self.formations
    }

    /// Give back everything a ship holds in the registries
    pub fn release_ship(&mut self, ship: &Ship) {
        let Some(ai) = ship.ai.as_ref() else {
            return;
        };
        if let Some(roaming) = ai.roaming {
            self.anchors.release(ship.team, roaming.anchor);
        }
        if let Some(slot) = ai.formation {
            self.formations.leave(slot.formation_id, ship.id);
        }
    }

    /// Run one AI step for every living ship
    pub fn update(&mut self, state: &mut SimState, dt: f32) {
        let time = state.time;
        let config = &state.config;
        let index = &state.index;
        let rng = &mut state.rng;
        let ships = &mut state.ships;

        // Fighters launched last tick are not in the grid yet; scan linearly then
        let grid = state.spatial.as_ref().filter(|grid| {
            ships
                .iter()
                .filter(|s| s.is_alive())
                .all(|s| grid.contains(s.id))
        });

        self.formations.refresh(ships, index);

        for i in 0..ships.len() {
            if !ships[i].is_alive() {
                continue;
            }
            let (before, rest) = ships.split_at_mut(i);
            let Some((ship, after)) = rest.split_first_mut() else {
                continue;
            };
            let neighbors = Neighbors::new(before, after, index, grid);
            self.update_ship(ship, &neighbors, config, rng, time, dt);
        }
    }

    fn update_ship(
        &mut self,
        ship: &mut Ship,
        neighbors: &Neighbors<'_>,
        config: &SimConfig,
        rng: &mut SimRng,
        time: f32,
        dt: f32,
    ) {
        let behavior = &config.behavior;
        let ai = ship
            .ai
            .get_or_insert_with(|| AiState::new(preferred_range(config, ship.class)));
        ai.recent_damage = (ai.recent_damage - behavior.damage_decay_rate * dt).max(0.0);
        let forced_evade = ai.recent_damage >= behavior.evade_damage_threshold;
        let due = time - ai.last_reevaluation >= config.class(ship.class).personality.reevaluation_interval
            || time >= ai.intent_end_time;

        // Stale targets are dropped and replaced by the nearest enemy
        let target_valid = ship
            .target_id
            .and_then(|id| neighbors.get(id))
            .is_some_and(|t| t.is_alive() && t.team != ship.team);
        if !target_valid {
            ship.target_id = neighbors.nearest_enemy(ship).map(|(t, _)| t.id);
        }

        if forced_evade {
            let duration = self
                .intent_duration(ship, config, rng)
                .min(behavior.forced_evade_max_duration);
            self.transition(ship, Intent::Evade, duration, time);
        } else if due {
            ship.target_id = neighbors.nearest_enemy(ship).map(|(t, _)| t.id);
            let intent = self.select_intent(ship, neighbors, config, rng, time);
            let duration = self.intent_duration(ship, config, rng);
            self.transition(ship, intent, duration, time);
        }

        let intent = ship.intent().unwrap_or(Intent::Idle);
        let ctx = AiContext {
            neighbors,
            config,
            formations: &self.formations,
            time,
            dt,
        };
        let goal = (intent.handler())(ship, &ctx, rng);
        steering::apply_goal(ship, goal, &ctx);

        turret::update_turrets(ship, neighbors, config, time);
    }

    /// Personality min duration plus a random share of the min..max span
    fn intent_duration(&self, ship: &Ship, config: &SimConfig, rng: &mut SimRng) -> f32 {
        let p = &config.class(ship.class).personality;
        p.min_intent_duration + rng.next_f32() * (p.max_intent_duration - p.min_intent_duration).max(0.0)
    }

    /// Switch intent and release registry resources the new intent does not use
    fn transition(&mut self, ship: &mut Ship, intent: Intent, duration: f32, time: f32) {
        let team = ship.team;
        let ship_id = ship.id;
        let Some(ai) = ship.ai.as_mut() else {
            return;
        };
        if ai.intent != intent {
            log::trace!("Ship {} intent {:?} -> {:?}", ship_id, ai.intent, intent);
        }
        if intent != Intent::Patrol {
            if let Some(roaming) = ai.roaming.take() {
                self.anchors.release(team, roaming.anchor);
            }
        }
        if intent != Intent::Group {
            if let Some(slot) = ai.formation.take() {
                self.formations.leave(slot.formation_id, ship_id);
            }
        }
        ai.intent = intent;
        ai.last_reevaluation = time;
        ai.intent_end_time = time + duration;
    }
}
