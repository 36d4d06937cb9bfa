//! Deterministic simulation module
//!
//! All battle logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - One seeded RNG, passed explicitly
//! - Stable iteration order (ship store order)
//! - No rendering or platform dependencies

pub mod boundary;
pub mod combat;
pub mod progression;
pub mod rng;
pub mod session;
pub mod spatial;
pub mod spawn;
pub mod state;
pub mod tick;

pub use boundary::{BoundaryOutcome, apply_boundary};
pub use combat::{HitResult, apply_damage, kill_credit, resolve_hit};
pub use rng::SimRng;
pub use session::Simulation;
pub use spatial::SpatialGrid;
pub use spawn::{SpawnRequest, launch_fighters, spawn_fleet, spawn_ship};
pub use state::{
    AiState, Bullet, DamageRecord, FormationSlot, HangarState, Orientation, RoamingState,
    ShieldHit, SimState, Ship, Team, TurretAi, TurretState,
};
pub use tick::tick;
