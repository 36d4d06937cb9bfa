//! Level curve: XP requirements and per-level stat scaling

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    /// XP needed to go from level 1 to 2
    pub base_xp: f32,
    /// Multiplier on the requirement for each further level
    pub xp_growth: f32,
    /// Fractional max-health gain per level above 1
    pub health_per_level: f32,
    /// Fractional max-shield gain per level above 1
    pub shield_per_level: f32,
    /// Fractional turret damage gain per level above 1
    pub damage_per_level: f32,
    /// Fraction of the new max health restored on level-up
    pub level_up_heal: f32,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            base_xp: 100.0,
            xp_growth: 1.5,
            health_per_level: 0.1,
            shield_per_level: 0.1,
            damage_per_level: 0.05,
            level_up_heal: 0.2,
        }
    }
}

impl ProgressionConfig {
    /// XP required to advance from `level` to `level + 1`
    pub fn xp_to_next(&self, level: u32) -> f32 {
        self.base_xp * self.xp_growth.powi(level.saturating_sub(1) as i32)
    }

    /// Scale factor on base max health at `level`
    pub fn health_scale(&self, level: u32) -> f32 {
        1.0 + self.health_per_level.max(0.0) * level.saturating_sub(1) as f32
    }

    /// Scale factor on base max shield at `level`
    pub fn shield_scale(&self, level: u32) -> f32 {
        1.0 + self.shield_per_level.max(0.0) * level.saturating_sub(1) as f32
    }

    /// Scale factor on turret damage at `level`
    pub fn damage_scale(&self, level: u32) -> f32 {
        1.0 + self.damage_per_level.max(0.0) * level.saturating_sub(1) as f32
    }
}
