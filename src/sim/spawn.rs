//! Ship creation: single ships, whole fleets and carrier fighter launches

use glam::Vec3;

use super::state::{HangarState, Orientation, SimState, Ship, Team, TurretState};
use crate::tuning::ShipClass;

/// Parameters for spawning one ship
#[derive(Debug, Clone)]
pub struct SpawnRequest {
    pub team: Team,
    pub class: ShipClass,
    pub position: Vec3,
    pub level: u32,
    /// Initial yaw; drawn from the RNG when `None`
    pub heading: Option<f32>,
    /// Initial velocity; zero (plus optional jitter) when `None`
    pub velocity: Option<Vec3>,
    pub parent_carrier: Option<u32>,
}

impl SpawnRequest {
    pub fn new(team: Team, class: ShipClass, position: Vec3) -> Self {
        Self {
            team,
            class,
            position,
            level: 1,
            heading: None,
            velocity: None,
            parent_carrier: None,
        }
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level.max(1);
        self
    }

    pub fn with_heading(mut self, yaw: f32) -> Self {
        self.heading = Some(yaw);
        self
    }
}

/// Spawn a ship and return its id
///
/// RNG draws, in order: heading (if not given), then three jitter components
/// (if jitter is enabled and no velocity was given).
pub fn spawn_ship(state: &mut SimState, request: SpawnRequest) -> u32 {
    let id = state.next_ship_id();
    let class_cfg = state.config.class(request.class).clone();
    let progression = &state.config.progression;
    let level = request.level.max(1);

    let max_health = class_cfg.max_health * progression.health_scale(level);
    let max_shield = class_cfg.max_shield * progression.shield_scale(level);
    let next_level_xp = progression.xp_to_next(level);

    let yaw = match request.heading {
        Some(yaw) => yaw,
        None => state.rng.range_f32(-std::f32::consts::PI, std::f32::consts::PI),
    };

    let velocity = match request.velocity {
        Some(v) => v,
        None if state.config.world.spawn_jitter_enabled => {
            let magnitude = class_cfg.speed * state.config.world.spawn_jitter_factor;
            let jitter = Vec3::new(
                state.rng.range_f32(-1.0, 1.0),
                state.rng.range_f32(-1.0, 1.0),
                state.rng.range_f32(-1.0, 1.0),
            );
            jitter * magnitude
        }
        None => Vec3::ZERO,
    };

    let turrets = (0..class_cfg.turrets.len()).map(TurretState::new).collect();
    let hangar = class_cfg.hangar.as_ref().map(|_| HangarState::default());

    let ship = Ship {
        id,
        team: request.team,
        class: request.class,
        position: request.position,
        velocity,
        orientation: Orientation::from_yaw(yaw),
        angle: yaw,
        health: max_health,
        max_health,
        armor: class_cfg.armor,
        shield: max_shield,
        max_shield,
        shield_regen: class_cfg.shield_regen,
        speed: class_cfg.speed,
        turn_rate: class_cfg.turn_rate,
        turrets,
        target_id: None,
        kills: 0,
        level,
        xp: 0.0,
        next_level_xp,
        hangar,
        parent_carrier: request.parent_carrier,
        ai: None,
        last_damage: None,
        last_shield_hit: None,
    };
    state.insert_ship(ship);
    id
}

/// Spawn a fleet inside the team's spawn zone
///
/// Ships are created class by class in the given order, each at a uniformly
/// sampled point of the zone box.
pub fn spawn_fleet(state: &mut SimState, team: Team, composition: &[(ShipClass, u32)]) -> Vec<u32> {
    let world = state.config.world.clone();
    let center = world.spawn_center(team);
    let r = world.spawn_zone_radius;
    let mut ids = Vec::new();

    for &(class, count) in composition {
        for _ in 0..count {
            let offset = Vec3::new(
                state.rng.range_f32(-r, r),
                state.rng.range_f32(-r, r),
                state.rng.range_f32(-r, r),
            );
            let position = (center + offset).clamp(Vec3::ZERO, world.extent());
            ids.push(spawn_ship(state, SpawnRequest::new(team, class, position)));
        }
    }

    log::info!("Spawned {:?} fleet of {} ships", team, ids.len());
    ids
}

/// Tick carrier hangars and launch fighters when ready
pub fn launch_fighters(state: &mut SimState, dt: f32) {
    if !state.config.carrier.enabled {
        return;
    }
    let carrier_cfg = state.config.carrier.clone();

    // Fighters launched this tick are appended and never launch themselves
    let count = state.ships.len();
    for i in 0..count {
        let ship = &mut state.ships[i];
        if !ship.is_alive() {
            continue;
        }
        let Some(spec) = state.config.ships.get(ship.class).hangar.clone() else {
            continue;
        };
        let Some(hangar) = ship.hangar.as_mut() else {
            continue;
        };

        hangar.spawn_cooldown = (hangar.spawn_cooldown - dt).max(0.0);
        if hangar.fighters_spawned >= spec.max_fighters || hangar.spawn_cooldown > 0.0 {
            continue;
        }
        hangar.fighters_spawned += 1;
        hangar.spawn_cooldown = spec.spawn_cooldown;

        let carrier_id = ship.id;
        let team = ship.team;
        let carrier_pos = ship.position;
        let carrier_vel = ship.velocity;
        let carrier_yaw = ship.orientation.yaw;

        let spread = carrier_cfg.launch_angle_spread;
        let heading = carrier_yaw + state.rng.range_f32(-spread, spread);
        let position =
            carrier_pos + Vec3::new(heading.cos(), heading.sin(), 0.0) * carrier_cfg.launch_offset;

        let mut request = SpawnRequest::new(team, carrier_cfg.fighter_class, position)
            .with_heading(heading);
        request.velocity = Some(carrier_vel);
        request.parent_carrier = Some(carrier_id);
        let fighter_id = spawn_ship(state, request);

        log::debug!("Carrier {} launched fighter {}", carrier_id, fighter_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::SimConfig;

    #[test]
    fn test_spawn_uses_class_stats_and_level_curve() {
        let mut state = SimState::new(1, SimConfig::default());
        let id = spawn_ship(
            &mut state,
            SpawnRequest::new(Team::Red, ShipClass::Corvette, Vec3::splat(500.0)).with_level(3),
        );
        let ship = state.ship(id).unwrap();
        let base = state.config.class(ShipClass::Corvette);
        assert!((ship.max_health - base.max_health * 1.2).abs() < 1e-3);
        assert_eq!(ship.health, ship.max_health);
        assert_eq!(ship.shield, ship.max_shield);
        assert_eq!(ship.turrets.len(), base.turrets.len());
        assert!(ship.turrets.iter().all(|t| t.cooldown == 0.0 && t.ai.is_none()));
        assert_eq!(ship.velocity, Vec3::ZERO);
        assert_eq!(ship.orientation.pitch, 0.0);
        assert_eq!(ship.orientation.roll, 0.0);
        assert_eq!(ship.angle, ship.orientation.yaw);
    }

    #[test]
    fn test_ids_increase_monotonically() {
        let mut state = SimState::new(1, SimConfig::default());
        let ids = spawn_fleet(&mut state, Team::Blue, &[(ShipClass::Fighter, 3), (ShipClass::Carrier, 1)]);
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert!(state.ships.iter().all(|s| s.team == Team::Blue));
        assert!(state.ship(4).unwrap().hangar.is_some());
    }

    #[test]
    fn test_fleet_spawns_inside_zone() {
        let mut state = SimState::new(9, SimConfig::default());
        spawn_fleet(&mut state, Team::Red, &[(ShipClass::Frigate, 10)]);
        let center = state.config.world.spawn_center(Team::Red);
        let r = state.config.world.spawn_zone_radius;
        for ship in &state.ships {
            let d = (ship.position - center).abs();
            assert!(d.max_element() <= r + 1e-3);
        }
    }

    #[test]
    fn test_spawn_jitter() {
        let mut config = SimConfig::default();
        config.world.spawn_jitter_enabled = true;
        let mut state = SimState::new(5, config);
        let id = spawn_ship(&mut state, SpawnRequest::new(Team::Red, ShipClass::Fighter, Vec3::splat(100.0)));
        let ship = state.ship(id).unwrap();
        let limit = ship.speed * state.config.world.spawn_jitter_factor;
        assert!(ship.velocity != Vec3::ZERO);
        assert!(ship.velocity.abs().max_element() <= limit);
    }

    #[test]
    fn test_carrier_launches_until_capacity() {
        let mut config = SimConfig::default();
        if let Some(hangar) = config.ships.carrier.hangar.as_mut() {
            hangar.max_fighters = 2;
            hangar.spawn_cooldown = 1.0;
        }
        let mut state = SimState::new(11, config);
        let carrier = spawn_ship(
            &mut state,
            SpawnRequest::new(Team::Red, ShipClass::Carrier, Vec3::splat(500.0)).with_heading(0.0),
        );

        // Cooldown starts empty: first launch is immediate
        launch_fighters(&mut state, 0.1);
        assert_eq!(state.ships.len(), 2);
        let fighter = &state.ships[1];
        assert_eq!(fighter.parent_carrier, Some(carrier));
        assert_eq!(fighter.class, ShipClass::Fighter);
        assert!((fighter.position - Vec3::splat(500.0)).length() > 49.0);
        assert!(fighter.orientation.yaw.abs() <= 0.5 + 1e-5);

        // Waiting on cooldown
        for _ in 0..5 {
            launch_fighters(&mut state, 0.1);
        }
        assert_eq!(state.ships.len(), 2);

        for _ in 0..20 {
            launch_fighters(&mut state, 0.1);
        }
        assert_eq!(state.ships.len(), 3);
        assert_eq!(state.ship(carrier).unwrap().hangar.as_ref().unwrap().fighters_spawned, 2);
    }
}
