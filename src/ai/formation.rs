//! Formation layouts and the formation registry
//!
//! A formation is a set of slot offsets around a moving center. Escort
//! formations follow a carrier; form-up formations follow the centroid of their
//! members. Every slot is held by at most one ship.

use std::collections::HashMap;
use std::f32::consts::TAU;

use glam::Vec3;

use crate::sim::{FormationSlot, Ship, Team};
use crate::tuning::{FormationConfig, FormationKind};

/// Golden angle in radians, for evenly spread sphere points
const GOLDEN_ANGLE: f32 = 2.399_963_3;

/// Slot offsets for `count` ships; slot 0 is the leader position
pub fn slot_offsets(kind: FormationKind, count: usize, spacing: f32) -> Vec<Vec3> {
    match kind {
        FormationKind::Line => {
            let mid = (count as f32 - 1.0) / 2.0;
            (0..count)
                .map(|i| Vec3::new(0.0, (i as f32 - mid) * spacing, 0.0))
                .collect()
        }
        FormationKind::Column => (0..count)
            .map(|i| Vec3::new(-(i as f32) * spacing, 0.0, 0.0))
            .collect(),
        FormationKind::Circle => {
            let radius = spacing.max(spacing * count as f32 / TAU);
            (0..count)
                .map(|i| {
                    let a = TAU * i as f32 / count as f32;
                    Vec3::new(a.cos() * radius, a.sin() * radius, 0.0)
                })
                .collect()
        }
        FormationKind::Wedge => (0..count)
            .map(|i| {
                if i == 0 {
                    return Vec3::ZERO;
                }
                let row = i.div_ceil(2) as f32;
                let side = if i % 2 == 1 { 1.0 } else { -1.0 };
                Vec3::new(-row * spacing, side * row * spacing, 0.0)
            })
            .collect(),
        FormationKind::Sphere => sphere_offsets(count, spacing),
    }
}

/// Concentric shells; shell k holds up to 4k² points at radius k * spacing
fn sphere_offsets(count: usize, spacing: f32) -> Vec<Vec3> {
    let mut out = Vec::with_capacity(count);
    let mut shell = 1usize;
    while out.len() < count {
        let capacity = 4 * shell * shell;
        let n = capacity.min(count - out.len());
        let radius = shell as f32 * spacing;
        for i in 0..n {
            // Fibonacci sphere
            let z = 1.0 - 2.0 * (i as f32 + 0.5) / n as f32;
            let r = (1.0 - z * z).max(0.0).sqrt();
            let theta = GOLDEN_ANGLE * i as f32;
            out.push(Vec3::new(theta.cos() * r, theta.sin() * r, z) * radius);
        }
        shell += 1;
    }
    out
}

/// What a formation is centered on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormationAnchor {
    /// Escort around a carrier
    Carrier(u32),
    /// Centroid of the members
    Centroid,
}

#[derive(Debug, Clone)]
pub struct Formation {
    pub id: u32,
    pub team: Team,
    pub kind: FormationKind,
    pub anchor: FormationAnchor,
    pub center: Vec3,
    pub offsets: Vec<Vec3>,
    /// (ship id, slot index) in join order
    pub members: Vec<(u32, usize)>,
}

impl Formation {
    fn is_full(&self) -> bool {
        self.members.len() >= self.offsets.len()
    }

    fn slot_of(&self, ship_id: u32) -> Option<usize> {
        self.members
            .iter()
            .find(|(id, _)| *id == ship_id)
            .map(|&(_, slot)| slot)
    }

    /// Free slot nearest to `pos`; ties go to the lowest index
    fn nearest_free_slot(&self, pos: Vec3) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (slot, offset) in self.offsets.iter().enumerate() {
            if self.members.iter().any(|&(_, s)| s == slot) {
                continue;
            }
            let d = (self.center + *offset).distance_squared(pos);
            if best.is_none_or(|(_, bd)| d < bd) {
                best = Some((slot, d));
            }
        }
        best.map(|(slot, _)| slot)
    }

    fn assign(&mut self, ship: &Ship) -> Option<FormationSlot> {
        if self.slot_of(ship.id).is_some() || self.is_full() {
            return None;
        }
        let slot = self.nearest_free_slot(ship.position)?;
        self.members.push((ship.id, slot));
        Some(FormationSlot {
            formation_id: self.id,
            slot_index: slot,
            offset: self.offsets[slot],
        })
    }
}

/// All live formations, in creation order
#[derive(Debug, Clone, Default)]
pub struct FormationRegistry {
    formations: Vec<Formation>,
    next_id: u32,
}

impl FormationRegistry {
    pub fn formations(&self) -> &[Formation] {
        &self.formations
    }

    pub fn len(&self) -> usize {
        self.formations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formations.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&Formation> {
        self.formations.iter().find(|f| f.id == id)
    }

    pub fn is_member(&self, ship_id: u32) -> bool {
        self.formations
            .iter()
            .any(|f| f.slot_of(ship_id).is_some())
    }

    pub fn is_escort(&self, formation_id: u32) -> bool {
        self.get(formation_id)
            .is_some_and(|f| matches!(f.anchor, FormationAnchor::Carrier(_)))
    }

    /// World position of a member's slot
    pub fn slot_position(&self, formation_id: u32, ship_id: u32) -> Option<Vec3> {
        let formation = self.get(formation_id)?;
        let slot = formation.slot_of(ship_id)?;
        Some(formation.center + formation.offsets[slot])
    }

    fn create(&mut self, team: Team, kind: FormationKind, anchor: FormationAnchor, center: Vec3, cfg: &FormationConfig) -> usize {
        self.next_id += 1;
        self.formations.push(Formation {
            id: self.next_id,
            team,
            kind,
            anchor,
            center,
            offsets: slot_offsets(kind, cfg.max_size.max(1), cfg.spacing),
            members: Vec::new(),
        });
        self.formations.len() - 1
    }

    /// Take a slot in the escort formation around `carrier`, creating it if needed
    pub fn join_escort(&mut self, carrier: &Ship, ship: &Ship, cfg: &FormationConfig) -> Option<FormationSlot> {
        let existing = self
            .formations
            .iter()
            .position(|f| f.anchor == FormationAnchor::Carrier(carrier.id));
        let idx = match existing {
            Some(idx) => idx,
            None => self.create(
                carrier.team,
                cfg.escort_kind,
                FormationAnchor::Carrier(carrier.id),
                carrier.position,
                cfg,
            ),
        };
        let slot = self.formations[idx].assign(ship);
        if slot.is_some() {
            log::trace!("Ship {} escorts carrier {}", ship.id, carrier.id);
        }
        slot
    }

    /// Join a nearby form-up formation of the ship's team with room, or start one
    pub fn join_group(&mut self, ship: &Ship, cfg: &FormationConfig) -> Option<FormationSlot> {
        let radius_sq = cfg.form_up_radius * cfg.form_up_radius;
        let existing = self.formations.iter().position(|f| {
            f.team == ship.team
                && f.anchor == FormationAnchor::Centroid
                && !f.is_full()
                && f.center.distance_squared(ship.position) <= radius_sq
        });
        let idx = match existing {
            Some(idx) => idx,
            None => self.create(ship.team, cfg.kind, FormationAnchor::Centroid, ship.position, cfg),
        };
        self.formations[idx].assign(ship)
    }

    /// Give up a slot; empty formations disappear
    pub fn leave(&mut self, formation_id: u32, ship_id: u32) {
        if let Some(formation) = self.formations.iter_mut().find(|f| f.id == formation_id) {
            formation.members.retain(|&(id, _)| id != ship_id);
        }
        self.formations
            .retain(|f| !f.members.is_empty() || f.id != formation_id);
    }

    /// Drop dead members, dissolve escorts of dead carriers and move centers
    pub fn refresh(&mut self, ships: &[Ship], index: &HashMap<u32, usize>) {
        let alive = |id: u32| {
            index
                .get(&id)
                .and_then(|&i| ships.get(i))
                .filter(|s| s.id == id && s.is_alive())
        };

        self.formations.retain(|f| match f.anchor {
            FormationAnchor::Carrier(carrier) => alive(carrier).is_some(),
            FormationAnchor::Centroid => true,
        });

        for formation in &mut self.formations {
            formation.members.retain(|&(id, _)| alive(id).is_some());
            formation.center = match formation.anchor {
                FormationAnchor::Carrier(carrier) => {
                    alive(carrier).map_or(formation.center, |c| c.position)
                }
                FormationAnchor::Centroid if !formation.members.is_empty() => {
                    let sum: Vec3 = formation
                        .members
                        .iter()
                        .filter_map(|&(id, _)| alive(id))
                        .map(|s| s.position)
                        .sum();
                    sum / formation.members.len() as f32
                }
                FormationAnchor::Centroid => formation.center,
            };
        }

        self.formations.retain(|f| !f.members.is_empty());
    }
}
