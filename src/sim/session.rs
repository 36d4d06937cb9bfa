//! Owning wrapper that pairs a state with its AI controller

use super::spawn::{SpawnRequest, spawn_fleet, spawn_ship};
use super::state::{Bullet, SimState, Ship, Team};
use super::tick::tick;
use crate::ai::AiController;
use crate::tuning::{ShipClass, SimConfig};

/// A running battle
#[derive(Debug, Clone)]
pub struct Simulation {
    pub state: SimState,
    controller: AiController,
}

impl Simulation {
    pub fn new(seed: u64, config: SimConfig) -> Self {
        Self {
            state: SimState::new(seed, config),
            controller: AiController::new(),
        }
    }

    pub fn spawn_fleet(&mut self, team: Team, composition: &[(ShipClass, u32)]) -> Vec<u32> {
        spawn_fleet(&mut self.state, team, composition)
    }

    pub fn spawn_ship(&mut self, request: SpawnRequest) -> u32 {
        spawn_ship(&mut self.state, request)
    }

    /// Advance by one fixed step
    pub fn step(&mut self, dt: f32) {
        tick(&mut self.state, &mut self.controller, dt);
    }

    pub fn ships(&self) -> &[Ship] {
        &self.state.ships
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.state.bullets
    }

    pub fn score(&self, team: Team) -> u32 {
        self.state.score(team)
    }

    pub fn time(&self) -> f32 {
        self.state.time
    }

    pub fn tick_count(&self) -> u64 {
        self.state.tick
    }

    pub fn controller(&self) -> &AiController {
        &self.controller
    }

    /// Winning team once the other side has no ships left
    pub fn winner(&self) -> Option<Team> {
        let red = self.state.living_count(Team::Red);
        let blue = self.state.living_count(Team::Blue);
        match (red, blue) {
            (0, 0) => None,
            (_, 0) => Some(Team::Red),
            (0, _) => Some(Team::Blue),
            _ => None,
        }
    }
}
