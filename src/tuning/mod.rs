//! Data-driven balance and behavior configuration
//!
//! Every section derives `serde` with `#[serde(default)]`, so a JSON file only has to
//! name the values it overrides. The simulation treats these values as trusted: nothing
//! here is revalidated at runtime, and degenerate numbers produce degenerate (but
//! non-crashing) behavior.

pub mod behavior;
pub mod progression;
pub mod ships;
pub mod world;

pub use behavior::{
    BehaviorConfig, FormationConfig, FormationKind, Personality, PersonalityMode, RoamingConfig,
};
pub use progression::ProgressionConfig;
pub use ships::{CarrierConfig, HangarSpec, ShipClass, ShipClassConfig, ShipTable, TurretSpec};
pub use world::{BoundaryPolicy, WorldConfig};

use serde::{Deserialize, Serialize};

/// How armor reduces hull damage that got past the shield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArmorModel {
    /// `overflow - armor * flat_factor`
    #[default]
    Flat,
    /// `overflow * (1 - armor * percent_per_point)`
    Percentage,
}

/// Damage model and kill-credit tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DamageConfig {
    pub armor_model: ArmorModel,
    /// Damage removed per armor point (flat model)
    pub armor_flat_factor: f32,
    /// Fraction of damage removed per armor point (percentage model)
    pub armor_percent_per_point: f32,
    /// Minimum hull damage for a hit that penetrated the shield
    pub min_hull_damage: f32,
    /// Seconds after the last hit during which the damager still gets the kill
    pub kill_credit_window: f32,
    /// XP granted per point of hull damage dealt
    pub xp_per_damage: f32,
    /// XP granted per kill, multiplied by the victim's level
    pub xp_per_kill: f32,
    /// Seconds without being hit before shields regenerate
    pub shield_regen_delay: f32,
}

impl Default for DamageConfig {
    fn default() -> Self {
        Self {
            armor_model: ArmorModel::Flat,
            armor_flat_factor: 0.3,
            armor_percent_per_point: 0.1,
            min_hull_damage: 1.0,
            kill_credit_window: 5.0,
            xp_per_damage: 1.0,
            xp_per_kill: 50.0,
            shield_regen_delay: 2.0,
        }
    }
}

/// Spatial index settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpatialConfig {
    pub enabled: bool,
    pub cell_size: f32,
}

impl Default for SpatialConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            cell_size: 200.0,
        }
    }
}

/// Complete simulation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub world: WorldConfig,
    pub behavior: BehaviorConfig,
    pub ships: ShipTable,
    pub carrier: CarrierConfig,
    pub progression: ProgressionConfig,
    pub damage: DamageConfig,
    pub spatial: SpatialConfig,
}

impl SimConfig {
    /// Parse a (possibly partial) JSON configuration
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Serialize the full configuration as pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Stats for a ship class
    pub fn class(&self, class: ShipClass) -> &ShipClassConfig {
        self.ships.get(class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{
            "damage": { "armor_model": "percentage" },
            "world": { "width": 500.0, "ship_boundary": "wrap" }
        }"#;
        let config = SimConfig::from_json(json).unwrap();
        assert_eq!(config.damage.armor_model, ArmorModel::Percentage);
        assert_eq!(config.world.ship_boundary, BoundaryPolicy::Wrap);
        assert_eq!(config.world.width, 500.0);
        // Untouched sections fall back to defaults
        assert_eq!(config.world.height, WorldConfig::default().height);
        assert_eq!(config.damage.kill_credit_window, 5.0);
    }

    #[test]
    fn test_json_roundtrip_preserves_behavior_mode() {
        let mut config = SimConfig::default();
        config.behavior.mode = PersonalityMode::CarrierGroup;
        let json = config.to_json().unwrap();
        let back = SimConfig::from_json(&json).unwrap();
        assert_eq!(back.behavior.mode, PersonalityMode::CarrierGroup);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(SimConfig::from_json("{ not json").is_err());
    }
}
