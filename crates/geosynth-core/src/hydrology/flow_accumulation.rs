//! Upstream flow accumulation: for every cell, the count of cells whose
//! flow path passes through it, itself included.
use crate::grid::Grid;

use super::flow_direction::{FlowDirectionGrid, D8_OFFSETS, SINK};

/// Compute per-cell flow accumulation from a D8 direction grid.
///
/// Each cell's value is 1 (self-contribution) plus the final accumulation of
/// every cell draining directly into it, so
/// `acc[c] == 1 + Σ acc[upstream(c)]` holds regardless of traversal order.
///
/// The upstream graph is built in one O(H·W) pass. Because every cell has at
/// most one downslope target and routing requires a strictly positive drop,
/// the graph is a forest: no two cells at equal elevation can point at each
/// other. Totals are folded by an explicit-stack post-order walk — each cell
/// is visited once, and auxiliary memory is bounded by the longest drainage
/// path rather than the call stack.
pub fn flow_accumulation(flow: &FlowDirectionGrid) -> Grid {
    let width = flow.width;
    let height = flow.height;
    let n = width * height;
    let mut acc = vec![1.0f32; n];
    if n == 0 {
        return Grid { data: acc, width, height };
    }

    // Upstream adjacency: append each non-sink cell to its target's list.
    let mut upstream: Vec<Vec<u32>> = vec![Vec::new(); n];
    for r in 0..height {
        for c in 0..width {
            let d = flow.get(r, c);
            if d == SINK {
                continue;
            }
            let (dr, dc) = D8_OFFSETS[d as usize];
            let nr = r as isize + dr;
            let nc = c as isize + dc;
            // The router never emits off-grid directions, but hand-built
            // direction grids may.
            if nr < 0 || nc < 0 || nr >= height as isize || nc >= width as isize {
                continue;
            }
            upstream[nr as usize * width + nc as usize].push((r * width + c) as u32);
        }
    }

    let mut visited = vec![false; n];
    // (cell, next upstream child) frames. Children are fully folded before
    // their receiver, so every total a cell reads is final.
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for start in 0..n {
        if visited[start] {
            continue;
        }
        stack.push((start, 0));
        while let Some(frame) = stack.last_mut() {
            let (cell, cursor) = *frame;
            if let Some(&up) = upstream[cell].get(cursor) {
                frame.1 += 1;
                if !visited[up as usize] {
                    stack.push((up as usize, 0));
                }
            } else {
                let mut total = 1.0f32;
                for &up in &upstream[cell] {
                    total += acc[up as usize];
                }
                acc[cell] = total;
                visited[cell] = true;
                stack.pop();
            }
        }
    }

    Grid { data: acc, width, height }
}
