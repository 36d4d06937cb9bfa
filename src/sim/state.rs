//! Simulation state and core entity types
//!
//! The store is single-writer: only the tick mutates it. Renderers and tooling
//! read `ships`/`bullets` between ticks.

use std::collections::{HashMap, HashSet};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::rng::SimRng;
use super::spatial::SpatialGrid;
use crate::ai::{Intent, PatrolPattern};
use crate::direction_from_angles;
use crate::tuning::{ShipClass, SimConfig};

/// The two factions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    Red,
    Blue,
}

impl Team {
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Team::Red => 0,
            Team::Blue => 1,
        }
    }

    #[inline]
    pub fn opponent(self) -> Team {
        match self {
            Team::Red => Team::Blue,
            Team::Blue => Team::Red,
        }
    }
}

/// Ship attitude in radians
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

impl Orientation {
    pub fn from_yaw(yaw: f32) -> Self {
        Self {
            pitch: 0.0,
            yaw,
            roll: 0.0,
        }
    }

    /// Unit vector the nose points along
    #[inline]
    pub fn forward(&self) -> Vec3 {
        direction_from_angles(self.pitch, self.yaw)
    }
}

/// Independent targeting state of one turret
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TurretAi {
    pub target_id: Option<u32>,
    pub last_update: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurretState {
    /// Index into the class turret specs
    pub id: usize,
    /// Seconds until the turret can fire again
    pub cooldown: f32,
    /// Only populated under independent targeting
    pub ai: Option<TurretAi>,
}

impl TurretState {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            cooldown: 0.0,
            ai: None,
        }
    }
}

/// Fighter bay bookkeeping of a carrier
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HangarState {
    /// Fighters launched and still alive
    pub fighters_spawned: u32,
    pub spawn_cooldown: f32,
}

/// Who last hurt this ship, for kill credit
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DamageRecord {
    pub source: u32,
    pub time: f32,
}

/// Last shield impact (visual feedback only)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ShieldHit {
    pub time: f32,
    /// Unit vector from the ship toward the impact
    pub direction: Vec3,
    /// Shield damage absorbed by the hit
    pub strength: f32,
}

/// Patrol state while roaming
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RoamingState {
    pub anchor: Vec3,
    pub pattern: PatrolPattern,
    pub started_at: f32,
}

/// A held formation slot
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FormationSlot {
    pub formation_id: u32,
    pub slot_index: usize,
    /// Offset from the formation center
    pub offset: Vec3,
}

/// Per-ship AI state, attached on the ship's first AI update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiState {
    pub intent: Intent,
    pub intent_end_time: f32,
    pub last_reevaluation: f32,
    pub preferred_range: f32,
    /// Decaying accumulator of damage taken
    pub recent_damage: f32,
    pub last_damage_time: f32,
    pub roaming: Option<RoamingState>,
    pub formation: Option<FormationSlot>,
}

impl AiState {
    pub fn new(preferred_range: f32) -> Self {
        Self {
            intent: Intent::Idle,
            intent_end_time: 0.0,
            last_reevaluation: 0.0,
            preferred_range,
            recent_damage: 0.0,
            last_damage_time: 0.0,
            roaming: None,
            formation: None,
        }
    }
}

/// A ship entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub id: u32,
    pub team: Team,
    pub class: ShipClass,
    pub position: Vec3,
    pub velocity: Vec3,
    pub orientation: Orientation,
    /// Legacy single-angle heading; always equals `orientation.yaw`
    pub angle: f32,
    pub health: f32,
    pub max_health: f32,
    pub armor: f32,
    pub shield: f32,
    pub max_shield: f32,
    pub shield_regen: f32,
    pub speed: f32,
    pub turn_rate: f32,
    pub turrets: Vec<TurretState>,
    pub target_id: Option<u32>,
    pub kills: u32,
    pub level: u32,
    pub xp: f32,
    pub next_level_xp: f32,
    pub hangar: Option<HangarState>,
    pub parent_carrier: Option<u32>,
    pub ai: Option<AiState>,
    pub last_damage: Option<DamageRecord>,
    pub last_shield_hit: Option<ShieldHit>,
}

impl Ship {
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Set yaw and keep the legacy angle in sync
    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
        self.angle = orientation.yaw;
    }

    pub fn intent(&self) -> Option<Intent> {
        self.ai.as_ref().map(|ai| ai.intent)
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_health > 0.0 {
            self.health / self.max_health
        } else {
            0.0
        }
    }
}

/// A projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub owner_id: u32,
    pub owner_team: Team,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Seconds left before expiry
    pub ttl: f32,
    pub damage: f32,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct SimState {
    /// Ships in spawn order; this order drives RNG consumption
    pub ships: Vec<Ship>,
    /// id -> position in `ships`
    pub(crate) index: HashMap<u32, usize>,
    pub bullets: Vec<Bullet>,
    /// Simulated seconds
    pub time: f32,
    pub tick: u64,
    /// Kills per team, indexed by `Team::index`
    pub score: [u32; 2],
    pub config: SimConfig,
    pub spatial: Option<SpatialGrid>,
    pub rng: SimRng,
    next_ship_id: u32,
    next_bullet_id: u32,
}

impl SimState {
    pub fn new(seed: u64, config: SimConfig) -> Self {
        let spatial = config
            .spatial
            .enabled
            .then(|| SpatialGrid::new(config.spatial.cell_size));
        Self {
            ships: Vec::new(),
            index: HashMap::new(),
            bullets: Vec::new(),
            time: 0.0,
            tick: 0,
            score: [0; 2],
            config,
            spatial,
            rng: SimRng::new(seed),
            next_ship_id: 1,
            next_bullet_id: 1,
        }
    }

    pub fn next_ship_id(&mut self) -> u32 {
        let id = self.next_ship_id;
        self.next_ship_id += 1;
        id
    }

    pub fn next_bullet_id(&mut self) -> u32 {
        let id = self.next_bullet_id;
        self.next_bullet_id += 1;
        id
    }

    /// Append a ship and index it
    pub fn insert_ship(&mut self, ship: Ship) {
        self.index.insert(ship.id, self.ships.len());
        self.ships.push(ship);
    }

    /// Position of a ship in `ships`
    #[inline]
    pub fn index_of(&self, id: u32) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn ship(&self, id: u32) -> Option<&Ship> {
        self.index_of(id).and_then(|i| self.ships.get(i))
    }

    pub fn ship_mut(&mut self, id: u32) -> Option<&mut Ship> {
        self.index_of(id).and_then(move |i| self.ships.get_mut(i))
    }

    /// Rebuild the id map from scratch after ships were removed
    pub fn rebuild_index(&mut self) {
        self.index.clear();
        for (i, ship) in self.ships.iter().enumerate() {
            self.index.insert(ship.id, i);
        }
    }

    /// Whether the id map agrees with the ship list
    pub fn index_is_consistent(&self) -> bool {
        self.index.len() == self.ships.len()
            && self
                .ships
                .iter()
                .enumerate()
                .all(|(i, ship)| self.index.get(&ship.id) == Some(&i))
    }

    pub fn living_ids(&self) -> HashSet<u32> {
        self.ships
            .iter()
            .filter(|s| s.is_alive())
            .map(|s| s.id)
            .collect()
    }

    pub fn score(&self, team: Team) -> u32 {
        self.score[team.index()]
    }

    pub fn living_count(&self, team: Team) -> usize {
        self.ships
            .iter()
            .filter(|s| s.team == team && s.is_alive())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spawn::{SpawnRequest, spawn_ship};

    #[test]
    fn test_index_tracks_spawns_and_rebuild() {
        let mut state = SimState::new(3, SimConfig::default());
        let a = spawn_ship(&mut state, SpawnRequest::new(Team::Red, ShipClass::Fighter, Vec3::splat(100.0)));
        let b = spawn_ship(&mut state, SpawnRequest::new(Team::Blue, ShipClass::Frigate, Vec3::splat(200.0)));
        assert!(state.index_is_consistent());
        assert_eq!(state.ship(b).map(|s| s.class), Some(ShipClass::Frigate));

        state.ships.retain(|s| s.id != a);
        assert!(!state.index_is_consistent());
        state.rebuild_index();
        assert!(state.index_is_consistent());
        assert!(state.ship(a).is_none());
        assert_eq!(state.index_of(b), Some(0));
    }

    #[test]
    fn test_team_helpers() {
        assert_eq!(Team::Red.opponent(), Team::Blue);
        assert_eq!(Team::Blue.index(), 1);
    }

    #[test]
    fn test_spatial_only_when_enabled() {
        let state = SimState::new(1, SimConfig::default());
        assert!(state.spatial.is_none());
        let mut config = SimConfig::default();
        config.spatial.enabled = true;
        assert!(SimState::new(1, config).spatial.is_some());
    }
}
