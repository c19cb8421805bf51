//! Broad-phase spatial regions
//!
//! The arena is cut into a fixed `(N + 1) x (N + 1)` grid. A shape belongs to
//! the cell holding its centre, plus the neighbouring cell(s) its outline
//! reaches into. Two shapes on the same grid whose region sets are disjoint
//! cannot overlap, so the narrow phase can skip them entirely.

use glam::{IVec2, Vec2};

use super::shape::{Bounds, Extent};

/// Most cells a single shape can touch: its own, one per axis, and the diagonal
pub const MAX_REGIONS: usize = 4;

/// Small fixed-capacity set of region ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegionSet {
    ids: [u32; MAX_REGIONS],
    len: u8,
}

impl RegionSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, id: u32) {
        if self.contains(id) {
            return;
        }
        debug_assert!((self.len as usize) < MAX_REGIONS, "region set overflow");
        self.ids[self.len as usize] = id;
        self.len += 1;
    }

    /// Region ids in insertion order (primary cell first)
    pub fn as_slice(&self) -> &[u32] {
        &self.ids[..self.len as usize]
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, id: u32) -> bool {
        self.as_slice().contains(&id)
    }

    /// True if the two sets share at least one region
    pub fn intersects(&self, other: &RegionSet) -> bool {
        self.as_slice().iter().any(|&id| other.contains(id))
    }
}

/// Fixed partition lines of a bounds rectangle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionGrid {
    /// Boundary `i` is the x past which a point falls into row `i + 1`
    x_boundaries: Vec<i32>,
    /// Boundary `i` is the y past which a point falls into column `i + 1`
    y_boundaries: Vec<i32>,
}

impl RegionGrid {
    /// Partition `bounds` with `divisions` lines per axis.
    ///
    /// # Panics
    /// If `divisions` is zero.
    pub fn new(bounds: &Bounds, divisions: usize) -> Self {
        assert!(divisions >= 1, "region grid needs at least one division");
        Self {
            x_boundaries: partition(bounds.min.x, bounds.max.x, divisions),
            y_boundaries: partition(bounds.min.y, bounds.max.y, divisions),
        }
    }

    /// Number of partition lines per axis
    pub fn divisions(&self) -> usize {
        self.x_boundaries.len()
    }

    /// Cells along each axis
    pub fn cells_per_axis(&self) -> usize {
        self.divisions() + 1
    }

    pub fn x_boundaries(&self) -> &[i32] {
        &self.x_boundaries
    }

    pub fn y_boundaries(&self) -> &[i32] {
        &self.y_boundaries
    }

    /// Flattened id of the cell at `(row, column)`
    #[inline]
    pub fn region_id(&self, row: usize, column: usize) -> u32 {
        (row * self.cells_per_axis() + column) as u32
    }

    /// Regions touched by a shape centred at `pos` with local `extent`
    pub fn locate(&self, pos: Vec2, extent: &Extent) -> RegionSet {
        let row = cell_index(&self.x_boundaries, pos.x);
        let column = cell_index(&self.y_boundaries, pos.y);

        let neighbour = IVec2::new(
            straddle(
                &self.x_boundaries,
                row,
                pos.x + extent.min.x as f32,
                pos.x + extent.max.x as f32,
            ),
            straddle(
                &self.y_boundaries,
                column,
                pos.y + extent.min.y as f32,
                pos.y + extent.max.y as f32,
            ),
        );
        let next_row = row.wrapping_add_signed(neighbour.x as isize);
        let next_column = column.wrapping_add_signed(neighbour.y as isize);

        let mut regions = RegionSet::new();
        regions.insert(self.region_id(row, column));

        if neighbour.x != 0 && neighbour.y != 0 {
            regions.insert(self.region_id(next_row, next_column));
        }
        if neighbour.x != 0 {
            regions.insert(self.region_id(next_row, column));
        }
        if neighbour.y != 0 {
            regions.insert(self.region_id(row, next_column));
        }

        regions
    }
}

/// Split `[min, max]` into `divisions + 1` equal cells, returning the inner lines.
fn partition(min: i32, max: i32, divisions: usize) -> Vec<i32> {
    let step = (max - min) / (divisions as i32 + 1);
    let mut lines = vec![0; divisions];

    lines[divisions - 1] = max - step;
    for i in (0..divisions - 1).rev() {
        lines[i] = lines[i + 1] - step;
    }

    lines
}

/// Highest cell whose lower line the (truncated) coordinate lies past
fn cell_index(boundaries: &[i32], coord: f32) -> usize {
    let coord = coord as i32;
    (1..=boundaries.len())
        .rev()
        .find(|&i| coord > boundaries[i - 1])
        .unwrap_or(0)
}

/// -1 / +1 when the outline crosses the lower / upper line of `cell`, else 0
fn straddle(boundaries: &[i32], cell: usize, low: f32, high: f32) -> i32 {
    if cell > 0 && low <= boundaries[cell - 1] as f32 {
        -1
    } else if cell < boundaries.len() && high >= boundaries[cell] as f32 {
        1
    } else {
        0
    }
}
