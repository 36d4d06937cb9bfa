//! Weapons fire, bullet flight, the shield/armor damage model and kill credit

use glam::Vec3;

use super::boundary::{BoundaryOutcome, apply_boundary};
use super::state::{Bullet, DamageRecord, ShieldHit, SimState, Ship};
use crate::ai::AiController;
use crate::tuning::{ArmorModel, DamageConfig};

/// Damage split of a single hit
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HitResult {
    pub shield_damage: f32,
    pub hull_damage: f32,
}

impl HitResult {
    #[inline]
    pub fn total(&self) -> f32 {
        self.shield_damage + self.hull_damage
    }
}

/// Hull damage left after armor, for damage that already got past the shield
pub fn armor_reduced(overflow: f32, armor: f32, config: &DamageConfig) -> f32 {
    if overflow <= 0.0 {
        return 0.0;
    }
    let reduced = match config.armor_model {
        ArmorModel::Flat => overflow - armor * config.armor_flat_factor,
        ArmorModel::Percentage => {
            overflow * (1.0 - armor * config.armor_percent_per_point).max(0.0)
        }
    };
    reduced.max(config.min_hull_damage)
}

/// Apply raw damage to shield then hull
pub fn apply_damage(ship: &mut Ship, damage: f32, config: &DamageConfig) -> HitResult {
    let damage = damage.max(0.0);
    let shield_damage = damage.min(ship.shield.max(0.0));
    ship.shield = (ship.shield - shield_damage).max(0.0);

    let hull_damage = armor_reduced(damage - shield_damage, ship.armor, config);
    ship.health -= hull_damage;

    HitResult {
        shield_damage,
        hull_damage,
    }
}

/// Apply a bullet hit, including the bookkeeping that feeds visuals, kill credit and AI
pub fn resolve_hit(
    ship: &mut Ship,
    damage: f32,
    attacker_id: u32,
    impact: Vec3,
    time: f32,
    config: &DamageConfig,
) -> HitResult {
    let hit = apply_damage(ship, damage, config);

    if hit.shield_damage > 0.0 {
        ship.last_shield_hit = Some(ShieldHit {
            time,
            direction: (impact - ship.position).normalize_or_zero(),
            strength: hit.shield_damage,
        });
    }
    if hit.hull_damage > 0.0 {
        ship.last_damage = Some(DamageRecord {
            source: attacker_id,
            time,
        });
    }
    if let Some(ai) = ship.ai.as_mut() {
        ai.recent_damage += hit.total();
        ai.last_damage_time = time;
    }
    hit
}

/// Regenerate shields of ships that have not been hit recently
pub fn regenerate_shields(state: &mut SimState, dt: f32) {
    let delay = state.config.damage.shield_regen_delay;
    let time = state.time;
    for ship in state.ships.iter_mut().filter(|s| s.is_alive()) {
        let last_hit = ship
            .last_shield_hit
            .map(|h| h.time)
            .into_iter()
            .chain(ship.last_damage.map(|d| d.time))
            .fold(f32::NEG_INFINITY, f32::max);
        if time - last_hit >= delay {
            ship.shield = (ship.shield + ship.shield_regen * dt).min(ship.max_shield);
        }
    }
}

struct Shot {
    ship_idx: usize,
    turret_idx: usize,
    cooldown: f32,
    bullet: Bullet,
}

/// Tick turret cooldowns and fire every ready turret whose target is in range
///
/// Bullets are aimed at the target's current position (no lead). Under
/// independent targeting each turret uses its own target, falling back to the
/// ship's target when it has none.
pub fn fire_turrets(state: &mut SimState, dt: f32) {
    for ship in state.ships.iter_mut().filter(|s| s.is_alive()) {
        for turret in &mut ship.turrets {
            turret.cooldown = (turret.cooldown - dt).max(0.0);
        }
    }

    let independent = state.config.behavior.independent_targeting;
    let mut shots = Vec::new();

    for (ship_idx, ship) in state.ships.iter().enumerate() {
        if !ship.is_alive() {
            continue;
        }
        let class_cfg = state.config.class(ship.class);
        let damage_scale = state.config.progression.damage_scale(ship.level);

        for (turret_idx, turret) in ship.turrets.iter().enumerate() {
            if turret.cooldown > 0.0 {
                continue;
            }
            let Some(spec) = class_cfg.turrets.get(turret.id) else {
                continue;
            };
            let turret_target = if independent {
                turret.ai.as_ref().and_then(|ai| ai.target_id)
            } else {
                None
            };
            let Some(target) = turret_target
                .or(ship.target_id)
                .and_then(|id| state.ship(id))
                .filter(|t| t.is_alive() && t.team != ship.team)
            else {
                continue;
            };

            let to_target = target.position - ship.position;
            if to_target.length() > spec.range {
                continue;
            }

            shots.push(Shot {
                ship_idx,
                turret_idx,
                cooldown: spec.cooldown,
                bullet: Bullet {
                    id: 0,
                    owner_id: ship.id,
                    owner_team: ship.team,
                    position: ship.position,
                    velocity: to_target.normalize_or_zero() * spec.bullet_speed,
                    ttl: spec.bullet_ttl,
                    damage: spec.damage * damage_scale,
                },
            });
        }
    }

    for shot in shots {
        state.ships[shot.ship_idx].turrets[shot.turret_idx].cooldown = shot.cooldown;
        let mut bullet = shot.bullet;
        bullet.id = state.next_bullet_id();
        state.bullets.push(bullet);
    }
}

/// Move bullets, expire them, apply the bullet boundary policy and resolve hits
///
/// A bullet hits the first living enemy (in ship order) within that ship's
/// collision radius and is consumed.
pub fn update_bullets(state: &mut SimState, dt: f32) {
    let time = state.time;
    let policy = state.config.world.bullet_boundary;
    let config = &state.config;
    let ships = &mut state.ships;
    let mut xp_grants: Vec<(u32, f32)> = Vec::new();

    state.bullets.retain_mut(|bullet| {
        bullet.position += bullet.velocity * dt;
        bullet.ttl -= dt;
        if apply_boundary(policy, &config.world, &mut bullet.position, &mut bullet.velocity)
            == BoundaryOutcome::Removed
        {
            bullet.ttl = 0.0;
        }
        if bullet.ttl <= 0.0 {
            return false;
        }

        for ship in ships.iter_mut() {
            if !ship.is_alive() || ship.team == bullet.owner_team {
                continue;
            }
            let radius = config.ships.get(ship.class).collision_radius;
            if ship.position.distance(bullet.position) > radius {
                continue;
            }
            let hit = resolve_hit(
                ship,
                bullet.damage,
                bullet.owner_id,
                bullet.position,
                time,
                &config.damage,
            );
            if hit.hull_damage > 0.0 {
                xp_grants.push((bullet.owner_id, hit.hull_damage * config.damage.xp_per_damage));
            }
            return false;
        }
        true
    });

    for (owner, xp) in xp_grants {
        if let Some(ship) = state.ship_mut(owner) {
            ship.xp += xp;
        }
    }
}

/// Who gets the kill for `dead`, if anyone
///
/// The last damager wins if the hit is inside the credit window, even when it
/// died in the same tick; otherwise the first living enemy targeting the dead ship.
pub fn kill_credit(state: &SimState, dead: &Ship) -> Option<u32> {
    let window = state.config.damage.kill_credit_window;
    let recent = dead
        .last_damage
        .filter(|record| state.time - record.time <= window)
        .and_then(|record| state.ship(record.source))
        .filter(|killer| killer.team != dead.team)
        .map(|killer| killer.id);

    recent.or_else(|| {
        state
            .ships
            .iter()
            .find(|s| s.is_alive() && s.team != dead.team && s.target_id == Some(dead.id))
            .map(|s| s.id)
    })
}

/// Remove dead ships, credit kills and release their AI resources
///
/// Returns the number of ships removed. The id map is rebuilt afterwards.
pub fn process_deaths(state: &mut SimState, controller: &mut AiController) -> usize {
    struct Death {
        id: u32,
        level: u32,
        killer: Option<u32>,
        parent_carrier: Option<u32>,
    }

    let deaths: Vec<Death> = state
        .ships
        .iter()
        .filter(|s| !s.is_alive())
        .map(|dead| Death {
            id: dead.id,
            level: dead.level,
            killer: kill_credit(state, dead),
            parent_carrier: dead.parent_carrier,
        })
        .collect();
    if deaths.is_empty() {
        return 0;
    }

    for ship in state.ships.iter().filter(|s| !s.is_alive()) {
        controller.release_ship(ship);
    }

    let xp_per_kill = state.config.damage.xp_per_kill;
    for death in &deaths {
        match death.killer {
            Some(killer_id) => {
                if let Some(killer) = state.ship_mut(killer_id) {
                    killer.kills += 1;
                    killer.xp += xp_per_kill * death.level as f32;
                    let team = killer.team;
                    state.score[team.index()] += 1;
                }
                log::debug!("Ship {} destroyed by {}", death.id, killer_id);
            }
            None => log::debug!("Ship {} destroyed, no kill credit", death.id),
        }

        if let Some(hangar) = death
            .parent_carrier
            .and_then(|carrier_id| state.ship_mut(carrier_id))
            .and_then(|carrier| carrier.hangar.as_mut())
        {
            hangar.fighters_spawned = hangar.fighters_spawned.saturating_sub(1);
        }
    }

    let before = state.ships.len();
    state.ships.retain(|s| s.is_alive());
    state.rebuild_index();
    before - state.ships.len()
}
