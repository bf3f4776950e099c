//! Uniform spatial hash over atom positions.

use glam::Vec3;
use rustc_hash::FxHashMap;

/// Atom indices bucketed into cubic cells of a fixed edge length.
#[derive(Debug, Clone, Default)]
pub struct SpatialGrid {
    cell_size: f32,
    positions: Vec<Vec3>,
    cells: FxHashMap<(i32, i32, i32), Vec<usize>>,
}

impl SpatialGrid {
    /// Bucket `positions`. Non-positive cell sizes fall back to 1 Å.
    #[must_use]
    pub fn new(positions: Vec<Vec3>, cell_size: f32) -> Self {
        let cell_size = if cell_size > 0.0 { cell_size } else { 1.0 };
        let mut cells: FxHashMap<(i32, i32, i32), Vec<usize>> =
            FxHashMap::default();
        for (i, p) in positions.iter().enumerate() {
            cells.entry(cell_of(*p, cell_size)).or_default().push(i);
        }
        Self {
            cell_size,
            positions,
            cells,
        }
    }

    /// Number of indexed positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the grid indexes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Indices of all positions within `distance` (inclusive) of any of
    /// `centers`, sorted and without duplicates.
    #[must_use]
    pub fn within(&self, centers: &[Vec3], distance: f32) -> Vec<usize> {
        if distance < 0.0 {
            return Vec::new();
        }
        let reach = (distance / self.cell_size).ceil().max(1.0) as i32;
        let dist_sq = distance * distance;
        let mut hit = vec![false; self.positions.len()];

        for &center in centers {
            let base = cell_of(center, self.cell_size);
            for dx in -reach..=reach {
                for dy in -reach..=reach {
                    for dz in -reach..=reach {
                        let cell = (base.0 + dx, base.1 + dy, base.2 + dz);
                        let Some(bucket) = self.cells.get(&cell) else {
                            continue;
                        };
                        for &j in bucket {
                            if !hit[j]
                                && self.positions[j].distance_squared(center)
                                    <= dist_sq
                            {
                                hit[j] = true;
                            }
                        }
                    }
                }
            }
        }

        hit.iter()
            .enumerate()
            .filter_map(|(i, &h)| h.then_some(i))
            .collect()
    }
}

fn cell_of(p: Vec3, cell_size: f32) -> (i32, i32, i32) {
    let c = (p / cell_size).floor();
    (c.x as i32, c.y as i32, c.z as i32)
}
