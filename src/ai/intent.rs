//! Intents and their per-tick behaviors
//!
//! Each intent maps to a plain function that turns the ship's situation into a
//! steering goal. The controller picks the intent; the handler only decides where
//! to go this tick.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::formation::FormationRegistry;
use super::{Neighbors, evasion, roaming};
use crate::sim::{SimRng, Ship};
use crate::tuning::SimConfig;

/// Current high-level goal of a ship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Idle,
    Pursue,
    Evade,
    Strafe,
    Group,
    Patrol,
    Retreat,
}

/// What the ship should do with its engines this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SteeringGoal {
    /// Coast without thrust
    Hold,
    /// Turn toward and thrust at a point
    Seek(Vec3),
}

/// Everything a handler may read
pub struct AiContext<'a, 'n> {
    pub neighbors: &'n Neighbors<'a>,
    pub config: &'n SimConfig,
    pub formations: &'n FormationRegistry,
    pub time: f32,
    pub dt: f32,
}

pub type IntentHandler = fn(&Ship, &AiContext<'_, '_>, &mut SimRng) -> SteeringGoal;

impl Intent {
    pub fn handler(self) -> IntentHandler {
        match self {
            Intent::Idle => idle,
            Intent::Pursue => pursue,
            Intent::Evade => evade,
            Intent::Strafe => strafe,
            Intent::Group => group,
            Intent::Patrol => patrol,
            Intent::Retreat => retreat,
        }
    }
}

fn target_of<'a>(ship: &Ship, ctx: &AiContext<'a, '_>) -> Option<&'a Ship> {
    ship.target_id
        .and_then(|id| ctx.neighbors.get(id))
        .filter(|t| t.is_alive())
}

fn idle(_ship: &Ship, _ctx: &AiContext<'_, '_>, _rng: &mut SimRng) -> SteeringGoal {
    SteeringGoal::Hold
}

fn pursue(ship: &Ship, ctx: &AiContext<'_, '_>, _rng: &mut SimRng) -> SteeringGoal {
    match target_of(ship, ctx) {
        Some(target) => SteeringGoal::Seek(target.position),
        None => SteeringGoal::Hold,
    }
}

/// Orbit the target at preferred range, offset by the strafe angle
fn strafe(ship: &Ship, ctx: &AiContext<'_, '_>, _rng: &mut SimRng) -> SteeringGoal {
    let Some(target) = target_of(ship, ctx) else {
        return SteeringGoal::Hold;
    };
    let range = ship.ai.as_ref().map_or(200.0, |ai| ai.preferred_range);
    let from_target = (ship.position - target.position).normalize_or(Vec3::X);
    let rotated = Quat::from_rotation_z(ctx.config.behavior.strafe_angle) * from_target;
    SteeringGoal::Seek(target.position + rotated * range)
}

fn evade(ship: &Ship, ctx: &AiContext<'_, '_>, rng: &mut SimRng) -> SteeringGoal {
    SteeringGoal::Seek(evasion::best_escape(ship, ctx, rng))
}

/// Formation slot, then parent carrier, then the local friendly centroid
fn group(ship: &Ship, ctx: &AiContext<'_, '_>, _rng: &mut SimRng) -> SteeringGoal {
    if let Some(slot) = ship.ai.as_ref().and_then(|ai| ai.formation) {
        if let Some(pos) = ctx.formations.slot_position(slot.formation_id, ship.id) {
            return SteeringGoal::Seek(pos);
        }
    }
    if let Some(carrier) = ship
        .parent_carrier
        .and_then(|id| ctx.neighbors.get(id))
        .filter(|c| c.is_alive())
    {
        return SteeringGoal::Seek(carrier.position);
    }

    let friends: Vec<&Ship> = ctx
        .neighbors
        .within(ship.position, ctx.config.behavior.group_radius)
        .into_iter()
        .filter(|s| s.team == ship.team)
        .collect();
    if friends.is_empty() {
        return SteeringGoal::Hold;
    }
    let centroid = friends.iter().map(|s| s.position).sum::<Vec3>() / friends.len() as f32;
    SteeringGoal::Seek(centroid)
}

fn patrol(ship: &Ship, ctx: &AiContext<'_, '_>, _rng: &mut SimRng) -> SteeringGoal {
    let roaming_cfg = &ctx.config.behavior.roaming;
    let point = match ship.ai.as_ref().and_then(|ai| ai.roaming) {
        Some(state) => roaming::patrol_point(
            state.anchor,
            state.pattern,
            ctx.time - state.started_at,
            roaming_cfg,
        ),
        None => roaming::patrol_point(
            ctx.config.world.spawn_center(ship.team),
            roaming::PatrolPattern::Circle,
            ctx.time,
            roaming_cfg,
        ),
    };
    SteeringGoal::Seek(point)
}

fn retreat(ship: &Ship, ctx: &AiContext<'_, '_>, _rng: &mut SimRng) -> SteeringGoal {
    SteeringGoal::Seek(ctx.config.world.spawn_center(ship.team))
}
