//! World bounds, boundary policies and spawn zones

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::sim::Team;

/// What happens to an entity that leaves the world box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Reflect the offending velocity component and clamp to the face
    #[default]
    Bounce,
    /// Re-enter from the opposite face
    Wrap,
    /// Mark for deletion
    Remove,
}

/// The world is the box `[0, width] x [0, height] x [0, depth]`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub ship_boundary: BoundaryPolicy,
    pub bullet_boundary: BoundaryPolicy,
    /// Teleport stray ships home every `cleanup_interval_ticks`
    pub cleanup_enabled: bool,
    pub cleanup_interval_ticks: u64,
    /// Half-extent of the box fleets spawn in
    pub spawn_zone_radius: f32,
    /// Random velocity kick on spawn to break symmetry
    pub spawn_jitter_enabled: bool,
    /// Jitter magnitude as a fraction of ship speed
    pub spawn_jitter_factor: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 2000.0,
            height: 2000.0,
            depth: 1000.0,
            ship_boundary: BoundaryPolicy::Bounce,
            bullet_boundary: BoundaryPolicy::Remove,
            cleanup_enabled: true,
            cleanup_interval_ticks: 300,
            spawn_zone_radius: 150.0,
            spawn_jitter_enabled: false,
            spawn_jitter_factor: 0.1,
        }
    }
}

impl WorldConfig {
    /// Size of the world box along each axis
    #[inline]
    pub fn extent(&self) -> Vec3 {
        Vec3::new(self.width, self.height, self.depth)
    }

    /// Whether `pos` lies inside the world box (faces inclusive)
    pub fn contains(&self, pos: Vec3) -> bool {
        pos.cmpge(Vec3::ZERO).all() && pos.cmple(self.extent()).all()
    }

    /// Center of a team's spawn zone; teams start on opposite x ends
    pub fn spawn_center(&self, team: Team) -> Vec3 {
        let x = match team {
            Team::Red => self.width * 0.15,
            Team::Blue => self.width * 0.85,
        };
        Vec3::new(x, self.height * 0.5, self.depth * 0.5)
    }
}
