//! D8 flow direction: each cell drains to its steepest downhill neighbour.
use serde::{Deserialize, Serialize};

use crate::grid::Grid;

/// D8 neighbour offsets (row, col), clockwise from north.
pub const D8_OFFSETS: [(isize, isize); 8] = [
    (-1, 0),  // N
    (-1, 1),  // NE
    (0, 1),   // E
    (1, 1),   // SE
    (1, 0),   // S
    (1, -1),  // SW
    (0, -1),  // W
    (-1, -1), // NW
];

/// Direction marker for cells with no downhill neighbour.
pub const SINK: u8 = 8;

/// Per-cell D8 compass index (0–7, clockwise from north) or `SINK`.
/// No cell ever points outside the grid: the border ring is always `SINK`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowDirectionGrid {
    pub directions: Vec<u8>,
    pub width: usize,
    pub height: usize,
}

impl FlowDirectionGrid {
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.directions[row * self.width + col]
    }

    #[inline]
    pub fn is_sink(&self, row: usize, col: usize) -> bool {
        self.get(row, col) == SINK
    }

    /// Coordinates of the downslope target of (row, col); None for sinks.
    pub fn downstream(&self, row: usize, col: usize) -> Option<(usize, usize)> {
        let d = self.get(row, col);
        if d == SINK {
            return None;
        }
        let (dr, dc) = D8_OFFSETS[d as usize];
        Some(((row as isize + dr) as usize, (col as isize + dc) as usize))
    }
}

/// Compute D8 flow direction for every cell of `dem`.
///
/// Interior cells take the index of the neighbour with the largest strictly
/// positive elevation drop, scanning clockwise from north; ties keep the
/// first-encountered maximum, so identical input yields identical output.
/// Cells with no downhill neighbour are sinks, and the outermost ring is
/// always marked `SINK` so that no direction ever leaves the grid.
pub fn flow_direction(dem: &Grid) -> FlowDirectionGrid {
    let mut directions = vec![SINK; dem.width * dem.height];

    if dem.width >= 3 && dem.height >= 3 {
        for r in 1..dem.height - 1 {
            for c in 1..dem.width - 1 {
                let center = dem.get(r, c);
                let mut best_drop = 0.0f32;
                let mut best_dir = SINK;
                for (k, &(dr, dc)) in D8_OFFSETS.iter().enumerate() {
                    let nr = (r as isize + dr) as usize;
                    let nc = (c as isize + dc) as usize;
                    let drop = center - dem.get(nr, nc);
                    if drop > best_drop {
                        best_drop = drop;
                        best_dir = k as u8;
                    }
                }
                directions[r * dem.width + c] = best_dir;
            }
        }
    }

    FlowDirectionGrid {
        directions,
        width: dem.width,
        height: dem.height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Ramp sloping down to the east, with rows away from the centre row
    /// raised slightly so interior flow goes due east rather than diagonal.
    fn make_east_ramp(rows: usize, cols: usize) -> Grid {
        let mid = rows / 2;
        let mut dem = Grid::zeros(cols, rows);
        for r in 0..rows {
            for c in 0..cols {
                let off = (r as isize - mid as isize).unsigned_abs() as f32;
                dem.set(r, c, (cols - c) as f32 * 10.0 + off * 0.5);
            }
        }
        dem
    }

    #[test]
    fn border_ring_is_always_sink() {
        let dem = make_east_ramp(8, 8);
        let flow = flow_direction(&dem);
        for r in 0..8 {
            assert!(flow.is_sink(r, 0), "west border row {r} must be sink");
            assert!(flow.is_sink(r, 7), "east border row {r} must be sink");
        }
        for c in 0..8 {
            assert!(flow.is_sink(0, c), "north border col {c} must be sink");
            assert!(flow.is_sink(7, c), "south border col {c} must be sink");
        }
    }

    #[test]
    fn flat_grid_is_all_sink() {
        let dem = Grid::new(16, 16, 1.0);
        let flow = flow_direction(&dem);
        assert!(flow.directions.iter().all(|&d| d == SINK));
    }

    #[test]
    fn east_ramp_centre_row_flows_east() {
        let dem = make_east_ramp(9, 9);
        let flow = flow_direction(&dem);
        for c in 1..8 {
            assert_eq!(flow.get(4, c), 2, "centre row col {c} should flow E");
        }
    }

    #[test]
    fn tie_keeps_first_compass_direction() {
        // Centre cell with N and E neighbours equally low: the clockwise
        // scan starting north must pick N (index 0).
        let mut dem = Grid::new(3, 3, 5.0);
        dem.set(1, 1, 6.0);
        dem.set(0, 1, 1.0); // N
        dem.set(1, 2, 1.0); // E
        let flow = flow_direction(&dem);
        assert_eq!(flow.get(1, 1), 0);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let dem = make_east_ramp(16, 24);
        let a = flow_direction(&dem);
        let b = flow_direction(&dem);
        assert_eq!(a.directions, b.directions);
    }

    #[test]
    fn directions_never_leave_the_grid() {
        let dem = make_east_ramp(12, 12);
        let flow = flow_direction(&dem);
        for r in 0..12 {
            for c in 0..12 {
                if let Some((nr, nc)) = flow.downstream(r, c) {
                    assert!(nr < 12 && nc < 12, "({r},{c}) points off-grid");
                }
            }
        }
    }
}
