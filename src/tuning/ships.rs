//! Per-class ship stats, turret specs and carrier tuning

use serde::{Deserialize, Serialize};

use super::behavior::Personality;

/// Ship hull classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipClass {
    Fighter,
    Corvette,
    Frigate,
    Destroyer,
    Carrier,
}

impl ShipClass {
    pub const ALL: [ShipClass; 5] = [
        ShipClass::Fighter,
        ShipClass::Corvette,
        ShipClass::Frigate,
        ShipClass::Destroyer,
        ShipClass::Carrier,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShipClass::Fighter => "fighter",
            ShipClass::Corvette => "corvette",
            ShipClass::Frigate => "frigate",
            ShipClass::Destroyer => "destroyer",
            ShipClass::Carrier => "carrier",
        }
    }
}

/// A turret mount
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TurretSpec {
    /// Maximum firing range
    pub range: f32,
    /// Targets closer than this are ignored by independent turret AI
    pub min_range: f32,
    /// Seconds between shots
    pub cooldown: f32,
    pub damage: f32,
    pub bullet_speed: f32,
    /// Bullet lifetime in seconds
    pub bullet_ttl: f32,
}

impl Default for TurretSpec {
    fn default() -> Self {
        Self {
            range: 200.0,
            min_range: 0.0,
            cooldown: 1.0,
            damage: 5.0,
            bullet_speed: 300.0,
            bullet_ttl: 1.5,
        }
    }
}

impl TurretSpec {
    fn new(range: f32, cooldown: f32, damage: f32) -> Self {
        Self {
            range,
            cooldown,
            damage,
            ..Default::default()
        }
    }
}

/// Fighter bay of a carrier-capable class
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HangarSpec {
    /// Maximum fighters alive at once
    pub max_fighters: u32,
    /// Seconds between launches
    pub spawn_cooldown: f32,
}

impl Default for HangarSpec {
    fn default() -> Self {
        Self {
            max_fighters: 6,
            spawn_cooldown: 4.0,
        }
    }
}

/// Base (level 1) stats of a ship class
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipClassConfig {
    pub max_health: f32,
    pub armor: f32,
    pub max_shield: f32,
    /// Shield points regenerated per second
    pub shield_regen: f32,
    /// Maximum speed (units/s)
    pub speed: f32,
    /// Maximum turn rate (radians/s) for both pitch and yaw
    pub turn_rate: f32,
    /// Bullet hit radius
    pub collision_radius: f32,
    pub turrets: Vec<TurretSpec>,
    pub hangar: Option<HangarSpec>,
    pub personality: Personality,
}

impl Default for ShipClassConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            armor: 0.0,
            max_shield: 40.0,
            shield_regen: 2.0,
            speed: 40.0,
            turn_rate: 1.5,
            collision_radius: 10.0,
            turrets: vec![TurretSpec::default()],
            hangar: None,
            personality: Personality::default(),
        }
    }
}

impl ShipClassConfig {
    /// Longest turret range, or 0 for unarmed hulls
    pub fn max_turret_range(&self) -> f32 {
        self.turrets.iter().map(|t| t.range).fold(0.0, f32::max)
    }
}

/// Stats for every ship class
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipTable {
    pub fighter: ShipClassConfig,
    pub corvette: ShipClassConfig,
    pub frigate: ShipClassConfig,
    pub destroyer: ShipClassConfig,
    pub carrier: ShipClassConfig,
}

impl ShipTable {
    pub fn get(&self, class: ShipClass) -> &ShipClassConfig {
        match class {
            ShipClass::Fighter => &self.fighter,
            ShipClass::Corvette => &self.corvette,
            ShipClass::Frigate => &self.frigate,
            ShipClass::Destroyer => &self.destroyer,
            ShipClass::Carrier => &self.carrier,
        }
    }

    pub fn get_mut(&mut self, class: ShipClass) -> &mut ShipClassConfig {
        match class {
            ShipClass::Fighter => &mut self.fighter,
            ShipClass::Corvette => &mut self.corvette,
            ShipClass::Frigate => &mut self.frigate,
            ShipClass::Destroyer => &mut self.destroyer,
            ShipClass::Carrier => &mut self.carrier,
        }
    }
}

impl Default for ShipTable {
    fn default() -> Self {
        Self {
            fighter: ShipClassConfig {
                max_health: 60.0,
                armor: 0.0,
                max_shield: 30.0,
                shield_regen: 2.0,
                speed: 60.0,
                turn_rate: 2.5,
                collision_radius: 8.0,
                turrets: vec![TurretSpec {
                    cooldown: 0.5,
                    damage: 4.0,
                    ..Default::default()
                }],
                hangar: None,
                personality: Personality {
                    aggressiveness: 0.7,
                    caution: 0.2,
                    group_cohesion: 0.3,
                    preferred_range_multiplier: 0.9,
                    reevaluation_interval: 1.0,
                    min_intent_duration: 2.0,
                    max_intent_duration: 4.0,
                },
            },
            corvette: ShipClassConfig {
                max_health: 120.0,
                armor: 1.0,
                max_shield: 50.0,
                shield_regen: 3.0,
                speed: 45.0,
                turn_rate: 1.8,
                collision_radius: 12.0,
                turrets: vec![TurretSpec::new(250.0, 0.8, 6.0); 2],
                hangar: None,
                personality: Personality {
                    aggressiveness: 0.5,
                    caution: 0.3,
                    group_cohesion: 0.4,
                    ..Default::default()
                },
            },
            frigate: ShipClassConfig {
                max_health: 200.0,
                armor: 2.0,
                max_shield: 80.0,
                shield_regen: 4.0,
                speed: 35.0,
                turn_rate: 1.2,
                collision_radius: 18.0,
                turrets: vec![
                    TurretSpec::new(300.0, 1.0, 8.0),
                    TurretSpec::new(300.0, 1.0, 8.0),
                    TurretSpec::new(300.0, 1.0, 8.0),
                    TurretSpec::new(180.0, 0.4, 3.0),
                ],
                hangar: None,
                personality: Personality {
                    aggressiveness: 0.4,
                    caution: 0.3,
                    group_cohesion: 0.5,
                    preferred_range_multiplier: 0.8,
                    ..Default::default()
                },
            },
            destroyer: ShipClassConfig {
                max_health: 350.0,
                armor: 4.0,
                max_shield: 120.0,
                shield_regen: 5.0,
                speed: 25.0,
                turn_rate: 0.8,
                collision_radius: 25.0,
                turrets: vec![
                    TurretSpec {
                        range: 400.0,
                        min_range: 60.0,
                        cooldown: 1.5,
                        damage: 15.0,
                        bullet_speed: 350.0,
                        bullet_ttl: 2.0,
                    };
                    4
                ],
                hangar: None,
                personality: Personality {
                    aggressiveness: 0.5,
                    caution: 0.2,
                    group_cohesion: 0.5,
                    preferred_range_multiplier: 0.75,
                    ..Default::default()
                },
            },
            carrier: ShipClassConfig {
                max_health: 500.0,
                armor: 3.0,
                max_shield: 200.0,
                shield_regen: 6.0,
                speed: 18.0,
                turn_rate: 0.5,
                collision_radius: 35.0,
                turrets: vec![TurretSpec::new(250.0, 1.0, 5.0); 2],
                hangar: Some(HangarSpec::default()),
                personality: Personality {
                    aggressiveness: 0.1,
                    caution: 0.6,
                    group_cohesion: 0.3,
                    preferred_range_multiplier: 1.5,
                    ..Default::default()
                },
            },
        }
    }
}

/// Global carrier launch tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CarrierConfig {
    pub enabled: bool,
    /// Class launched from hangars
    pub fighter_class: ShipClass,
    /// Distance from the carrier at which fighters appear
    pub launch_offset: f32,
    /// Maximum deviation (radians) of the launch heading from the carrier's yaw
    pub launch_angle_spread: f32,
}

impl Default for CarrierConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            fighter_class: ShipClass::Fighter,
            launch_offset: 50.0,
            launch_angle_spread: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_carriers_have_hangars() {
        let table = ShipTable::default();
        for class in ShipClass::ALL {
            assert_eq!(
                table.get(class).hangar.is_some(),
                class == ShipClass::Carrier,
                "{}",
                class.as_str()
            );
        }
    }

    #[test]
    fn test_max_turret_range() {
        let table = ShipTable::default();
        assert_eq!(table.get(ShipClass::Frigate).max_turret_range(), 300.0);
        let unarmed = ShipClassConfig {
            turrets: Vec::new(),
            ..Default::default()
        };
        assert_eq!(unarmed.max_turret_range(), 0.0);
    }
}
