//! Uniform grid spatial index
//!
//! Buckets entity ids by integer cell coordinate. The grid is a candidate filter
//! only: callers still check exact distances, and cells are visited in a fixed
//! order so queries do not depend on hash iteration.

use std::collections::{HashMap, HashSet};

use glam::Vec3;

type Cell = (i32, i32, i32);

#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f32,
    cells: HashMap<Cell, Vec<u32>>,
    /// Cell each id currently lives in
    entries: HashMap<u32, Cell>,
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size: cell_size.max(1.0),
            cells: HashMap::new(),
            entries: HashMap::new(),
        }
    }

    #[inline]
    fn cell_of(&self, pos: Vec3) -> Cell {
        let c = (pos / self.cell_size).floor();
        (c.x as i32, c.y as i32, c.z as i32)
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: u32) -> bool {
        self.entries.contains_key(&id)
    }

    /// Insert `id` at `pos`, or move it if it is already tracked
    pub fn upsert(&mut self, id: u32, pos: Vec3) {
        let cell = self.cell_of(pos);
        match self.entries.get(&id).copied() {
            Some(old) if old == cell => {}
            Some(old) => {
                self.detach(id, old);
                self.cells.entry(cell).or_default().push(id);
                self.entries.insert(id, cell);
            }
            None => {
                self.cells.entry(cell).or_default().push(id);
                self.entries.insert(id, cell);
            }
        }
    }

    pub fn remove(&mut self, id: u32) {
        if let Some(cell) = self.entries.remove(&id) {
            self.detach(id, cell);
        }
    }

    /// Drop every id not in `live`
    pub fn retain(&mut self, live: &HashSet<u32>) {
        let stale: Vec<u32> = self
            .entries
            .keys()
            .copied()
            .filter(|id| !live.contains(id))
            .collect();
        for id in stale {
            self.remove(id);
        }
    }

    fn detach(&mut self, id: u32, cell: Cell) {
        if let Some(bucket) = self.cells.get_mut(&cell) {
            bucket.retain(|&other| other != id);
            if bucket.is_empty() {
                self.cells.remove(&cell);
            }
        }
    }

    /// Ids in every cell overlapping the cube of half-size `radius` around `pos`
    pub fn query_radius(&self, pos: Vec3, radius: f32) -> Vec<u32> {
        let min = self.cell_of(pos - Vec3::splat(radius));
        let max = self.cell_of(pos + Vec3::splat(radius));
        let mut out = Vec::new();
        for x in min.0..=max.0 {
            for y in min.1..=max.1 {
                for z in min.2..=max.2 {
                    if let Some(bucket) = self.cells.get(&(x, y, z)) {
                        out.extend_from_slice(bucket);
                    }
                }
            }
        }
        out
    }
}
