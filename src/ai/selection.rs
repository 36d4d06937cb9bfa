//! Intent selection per personality mode

use super::{AiController, Intent, Neighbors};
use crate::sim::{FormationSlot, RoamingState, SimRng, Ship};
use crate::tuning::{PersonalityMode, ShipClass, SimConfig};

/// Chance that a roaming ship breaks off to chase an enemy, per aggressiveness point
const ROAMING_ENGAGE_FACTOR: f32 = 0.3;
/// Pursue without rolling when the target is this close (in preferred ranges)
const PURSUE_RANGE_FACTOR: f32 = 1.2;
const PURSUE_CHANCE: f32 = 0.6;
/// Defensive ships consider enemies this close (in preferred ranges) a threat
const THREAT_RANGE_FACTOR: f32 = 0.5;

impl AiController {
    pub(super) fn select_intent(
        &mut self,
        ship: &mut Ship,
        neighbors: &Neighbors<'_>,
        config: &SimConfig,
        rng: &mut SimRng,
        time: f32,
    ) -> Intent {
        match config.behavior.mode {
            PersonalityMode::Aggressive => aggressive(ship, neighbors, rng),
            PersonalityMode::Defensive => defensive(ship, neighbors, config, rng),
            PersonalityMode::Roaming => self.roaming(ship, neighbors, config, rng, time),
            PersonalityMode::Formation => self.formation(ship, neighbors, config, rng),
            PersonalityMode::CarrierGroup => self.carrier_group(ship, neighbors, config, rng),
            PersonalityMode::Mixed => mixed(ship, neighbors, config, rng),
        }
    }

    fn roaming(
        &mut self,
        ship: &mut Ship,
        neighbors: &Neighbors<'_>,
        config: &SimConfig,
        rng: &mut SimRng,
        time: f32,
    ) -> Intent {
        let has_anchor = ship.ai.as_ref().is_some_and(|ai| ai.roaming.is_some());
        if !has_anchor {
            let anchor = self.anchors.assign(
                ship.team,
                ship.position,
                &config.world,
                &config.behavior.roaming,
                rng,
            );
            let pattern = rng
                .pick(&super::PatrolPattern::ALL)
                .copied()
                .unwrap_or(super::PatrolPattern::Circle);
            if let Some(ai) = ship.ai.as_mut() {
                ai.roaming = Some(RoamingState {
                    anchor,
                    pattern,
                    started_at: time,
                });
            }
        }

        let aggressiveness = config.class(ship.class).personality.aggressiveness;
        let enemy_in_range = neighbors
            .nearest_enemy(ship)
            .is_some_and(|(_, d)| d <= preferred(ship));
        if enemy_in_range && rng.chance(aggressiveness * ROAMING_ENGAGE_FACTOR) {
            Intent::Pursue
        } else {
            Intent::Patrol
        }
    }

    fn formation(
        &mut self,
        ship: &mut Ship,
        neighbors: &Neighbors<'_>,
        config: &SimConfig,
        rng: &mut SimRng,
    ) -> Intent {
        if self.formations.is_member(ship.id) {
            return Intent::Group;
        }
        let fcfg = &config.behavior.formation;

        // Escort the nearest friendly carrier first
        let carrier = neighbors
            .within(ship.position, fcfg.escort_search_radius)
            .into_iter()
            .filter(|s| s.team == ship.team && s.class == ShipClass::Carrier)
            .min_by(|a, b| {
                a.position
                    .distance_squared(ship.position)
                    .total_cmp(&b.position.distance_squared(ship.position))
            });
        let joined = match carrier {
            Some(carrier) if ship.class != ShipClass::Carrier => {
                self.formations.join_escort(carrier, ship, fcfg)
            }
            _ => {
                let friends = neighbors
                    .within(ship.position, fcfg.form_up_radius)
                    .into_iter()
                    .filter(|s| s.team == ship.team)
                    .count();
                if friends >= fcfg.form_up_min_neighbors {
                    self.formations.join_group(ship, fcfg)
                } else {
                    None
                }
            }
        };

        match joined {
            Some(slot) => {
                if let Some(ai) = ship.ai.as_mut() {
                    ai.formation = Some(slot);
                }
                Intent::Group
            }
            None => mixed(ship, neighbors, config, rng),
        }
    }

    fn carrier_group(
        &mut self,
        ship: &mut Ship,
        neighbors: &Neighbors<'_>,
        config: &SimConfig,
        rng: &mut SimRng,
    ) -> Intent {
        let parent_alive = ship
            .parent_carrier
            .and_then(|id| neighbors.get(id))
            .is_some_and(|c| c.is_alive());
        let escorting = ship
            .ai
            .as_ref()
            .and_then(|ai| ai.formation)
            .is_some_and(|slot: FormationSlot| self.formations.is_escort(slot.formation_id));
        if ship.class == ShipClass::Carrier || parent_alive || escorting {
            Intent::Group
        } else {
            defensive(ship, neighbors, config, rng)
        }
    }
}

fn preferred(ship: &Ship) -> f32 {
    ship.ai.as_ref().map_or(200.0, |ai| ai.preferred_range)
}

fn target_distance(ship: &Ship, neighbors: &Neighbors<'_>) -> Option<f32> {
    ship.target_id
        .and_then(|id| neighbors.get(id))
        .filter(|t| t.is_alive())
        .map(|t| t.position.distance(ship.position))
}

fn aggressive(ship: &Ship, neighbors: &Neighbors<'_>, rng: &mut SimRng) -> Intent {
    let Some(d) = target_distance(ship, neighbors) else {
        return Intent::Idle;
    };
    if d < PURSUE_RANGE_FACTOR * preferred(ship) || rng.chance(PURSUE_CHANCE) {
        Intent::Pursue
    } else {
        Intent::Strafe
    }
}

fn defensive(ship: &Ship, neighbors: &Neighbors<'_>, config: &SimConfig, rng: &mut SimRng) -> Intent {
    let behavior = &config.behavior;
    if ship.health_fraction() < behavior.retreat_health_fraction {
        return Intent::Retreat;
    }
    let threatened = neighbors
        .nearest_enemy(ship)
        .is_some_and(|(_, d)| d < THREAT_RANGE_FACTOR * preferred(ship));
    let hurt = ship
        .ai
        .as_ref()
        .is_some_and(|ai| ai.recent_damage >= behavior.evade_damage_threshold);
    if threatened && (behavior.allow_proximity_evade || hurt) {
        return Intent::Evade;
    }
    if rng.chance(config.class(ship.class).personality.group_cohesion) {
        Intent::Group
    } else {
        Intent::Patrol
    }
}

/// One draw split into aggressive, defensive and grouping bands
fn mixed(ship: &Ship, neighbors: &Neighbors<'_>, config: &SimConfig, rng: &mut SimRng) -> Intent {
    if ship.health_fraction() < config.behavior.retreat_health_fraction {
        return Intent::Retreat;
    }
    let p = &config.class(ship.class).personality;
    let r = rng.next_f32();
    if r < p.aggressiveness {
        aggressive(ship, neighbors, rng)
    } else if r < p.aggressiveness + p.caution {
        defensive(ship, neighbors, config, rng)
    } else if r < p.aggressiveness + p.caution + p.group_cohesion {
        Intent::Group
    } else {
        Intent::Patrol
    }
}
