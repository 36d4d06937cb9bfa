//! Fleet Sim - deterministic fleet combat between two factions
//!
//! Core modules:
//! - `sim`: Deterministic simulation (store, spawning, combat, progression, tick)
//! - `ai`: Ship AI controller (intents, steering, evasion, formations, roaming)
//! - `tuning`: Data-driven balance and behavior configuration

pub mod ai;
pub mod sim;
pub mod tuning;

pub use ai::AiController;
pub use sim::{Simulation, SimState, tick};
pub use tuning::SimConfig;

use glam::Vec3;

/// Simulation constants
pub mod consts {
    /// Default fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Forward thrust as a fraction of ship speed per second
    pub const THRUST_FACTOR: f32 = 0.5;
    /// Per-tick velocity damping
    pub const DAMPING: f32 = 0.98;

    /// Pitch is kept just shy of straight up/down so yaw stays meaningful
    pub const MAX_PITCH: f32 = std::f32::consts::FRAC_PI_2 - 0.01;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit direction for a pitch/yaw pair (z is up, yaw measured in the xy plane)
#[inline]
pub fn direction_from_angles(pitch: f32, yaw: f32) -> Vec3 {
    Vec3::new(pitch.cos() * yaw.cos(), pitch.cos() * yaw.sin(), pitch.sin())
}

/// Pitch/yaw that point along `dir` (inverse of [`direction_from_angles`])
#[inline]
pub fn angles_from_direction(dir: Vec3) -> (f32, f32) {
    let horizontal = (dir.x * dir.x + dir.y * dir.y).sqrt();
    (dir.z.atan2(horizontal), dir.y.atan2(dir.x))
}
