//! AI behavior tuning: personality weights, evasion, separation, roaming, formations

use serde::{Deserialize, Serialize};

/// How ships pick their next intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonalityMode {
    Aggressive,
    Defensive,
    Roaming,
    Formation,
    CarrierGroup,
    #[default]
    Mixed,
}

/// Behavioral weights of a ship class
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Personality {
    /// Probability band for aggressive choices (0-1)
    pub aggressiveness: f32,
    /// Probability band for defensive choices (0-1)
    pub caution: f32,
    /// Probability band for grouping (0-1)
    pub group_cohesion: f32,
    /// Preferred range = longest turret range * this
    pub preferred_range_multiplier: f32,
    /// Seconds between routine intent reevaluations
    pub reevaluation_interval: f32,
    pub min_intent_duration: f32,
    pub max_intent_duration: f32,
}

impl Default for Personality {
    fn default() -> Self {
        Self {
            aggressiveness: 0.5,
            caution: 0.3,
            group_cohesion: 0.2,
            preferred_range_multiplier: 0.9,
            reevaluation_interval: 1.5,
            min_intent_duration: 2.0,
            max_intent_duration: 5.0,
        }
    }
}

/// Formation layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormationKind {
    Line,
    Circle,
    #[default]
    Wedge,
    Column,
    /// Concentric shells around the center
    Sphere,
}

/// Roaming anchor tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoamingConfig {
    /// Minimum distance between two anchors of the same team
    pub anchor_min_separation: f32,
    /// Sampling attempts before falling back to the ship's own position
    pub anchor_attempts: u32,
    /// Radius of the patrol pattern around the anchor
    pub patrol_radius: f32,
    /// Angular speed of the patrol pattern (radians/s)
    pub patrol_rate: f32,
}

impl Default for RoamingConfig {
    fn default() -> Self {
        Self {
            anchor_min_separation: 400.0,
            anchor_attempts: 20,
            patrol_radius: 150.0,
            patrol_rate: 0.3,
        }
    }
}

/// Formation tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormationConfig {
    /// Layout for form-up groups
    pub kind: FormationKind,
    /// Layout around escorted carriers
    pub escort_kind: FormationKind,
    /// Slots per formation
    pub max_size: usize,
    /// Distance between neighbouring slots
    pub spacing: f32,
    /// How far a ship looks for a friendly carrier to escort
    pub escort_search_radius: f32,
    /// Radius used to count friendlies for a form-up
    pub form_up_radius: f32,
    /// Friendlies needed nearby to form up
    pub form_up_min_neighbors: usize,
}

impl Default for FormationConfig {
    fn default() -> Self {
        Self {
            kind: FormationKind::Wedge,
            escort_kind: FormationKind::Circle,
            max_size: 8,
            spacing: 40.0,
            escort_search_radius: 600.0,
            form_up_radius: 300.0,
            form_up_min_neighbors: 3,
        }
    }
}

/// Global AI tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    pub mode: PersonalityMode,

    // === Damage response ===
    /// Recent-damage decay per second
    pub damage_decay_rate: f32,
    /// Recent damage that forces an evade
    pub evade_damage_threshold: f32,
    /// Upper bound on forced evade duration (seconds)
    pub forced_evade_max_duration: f32,
    /// Defensive ships evade close threats even without recent damage
    pub allow_proximity_evade: bool,
    /// Defensive/mixed ships retreat below this health fraction
    pub retreat_health_fraction: f32,

    // === Evasion ===
    pub evade_distance: f32,
    /// Escape points scored per evade (including the straight-away point)
    pub evade_candidates: usize,
    /// Enemies within this radius count as threats
    pub evade_awareness_radius: f32,
    /// Threat proximity penalty falls off linearly to zero at this distance
    pub threat_penalty_radius: f32,
    /// Distance from a world face where candidates start being penalized
    pub boundary_margin: f32,
    /// Friendlies within this distance of a candidate crowd it
    pub crowding_radius: f32,

    // === Steering ===
    pub use_separation: bool,
    pub separation_distance: f32,
    pub separation_weight: f32,
    /// Orbit angle (radians) of strafing runs around the target
    pub strafe_angle: f32,
    /// Radius for finding friendlies to group with
    pub group_radius: f32,

    // === Turrets ===
    /// Turrets pick their own targets
    pub independent_targeting: bool,
    /// Seconds between turret retargeting
    pub turret_retarget_interval: f32,

    pub roaming: RoamingConfig,
    pub formation: FormationConfig,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            mode: PersonalityMode::Mixed,

            damage_decay_rate: 10.0,
            evade_damage_threshold: 25.0,
            forced_evade_max_duration: 3.0,
            allow_proximity_evade: false,
            retreat_health_fraction: 0.25,

            evade_distance: 300.0,
            evade_candidates: 8,
            evade_awareness_radius: 600.0,
            threat_penalty_radius: 200.0,
            boundary_margin: 100.0,
            crowding_radius: 80.0,

            use_separation: true,
            separation_distance: 60.0,
            separation_weight: 0.5,
            strafe_angle: 0.6,
            group_radius: 400.0,

            independent_targeting: false,
            turret_retarget_interval: 0.5,

            roaming: RoamingConfig::default(),
            formation: FormationConfig::default(),
        }
    }
}
