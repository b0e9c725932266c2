//! Patch extraction: cut a feature stack and its label raster into
//! fixed-size, optionally overlapping training tiles.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grid::{Grid, LabelGrid};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum TileError {
    #[error("tile size must be > 0")]
    ZeroTileSize,
    #[error("overlap {overlap} must be smaller than tile size {tile_size}")]
    OverlapTooLarge { tile_size: usize, overlap: usize },
    #[error("feature channel {index} is {found_w}x{found_h} but labels are {label_w}x{label_h}")]
    ShapeMismatch {
        index: usize,
        found_w: usize,
        found_h: usize,
        label_w: usize,
        label_h: usize,
    },
}

/// One training patch: C feature channels plus a label window, with the
/// window origin in the source raster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TilePair {
    pub features: Vec<Grid>,
    pub labels: LabelGrid,
    pub row: usize,
    pub col: usize,
}

fn crop_grid(grid: &Grid, row: usize, col: usize, size: usize) -> Grid {
    let mut data = Vec::with_capacity(size * size);
    for r in row..row + size {
        let start = r * grid.width + col;
        data.extend_from_slice(&grid.data[start..start + size]);
    }
    Grid {
        data,
        width: size,
        height: size,
    }
}

fn crop_labels(labels: &LabelGrid, row: usize, col: usize, size: usize) -> LabelGrid {
    let mut data = Vec::with_capacity(size * size);
    for r in row..row + size {
        let start = r * labels.width + col;
        data.extend_from_slice(&labels.data[start..start + size]);
    }
    LabelGrid {
        data,
        width: size,
        height: size,
    }
}

/// Tile `features` and `labels` into `tile_size`² patches with the given
/// overlap (stride = tile_size − overlap). Windows that would cross the
/// raster edge are dropped, so the output may be empty for small inputs.
pub fn tile_pairs(
    features: &[Grid],
    labels: &LabelGrid,
    tile_size: usize,
    overlap: usize,
) -> Result<Vec<TilePair>, TileError> {
    if tile_size == 0 {
        return Err(TileError::ZeroTileSize);
    }
    if overlap >= tile_size {
        return Err(TileError::OverlapTooLarge { tile_size, overlap });
    }
    for (index, channel) in features.iter().enumerate() {
        if channel.width != labels.width || channel.height != labels.height {
            return Err(TileError::ShapeMismatch {
                index,
                found_w: channel.width,
                found_h: channel.height,
                label_w: labels.width,
                label_h: labels.height,
            });
        }
    }

    let stride = tile_size - overlap;
    let mut tiles = Vec::new();
    if labels.height < tile_size || labels.width < tile_size {
        return Ok(tiles);
    }

    let mut row = 0;
    while row + tile_size <= labels.height {
        let mut col = 0;
        while col + tile_size <= labels.width {
            tiles.push(TilePair {
                features: features
                    .iter()
                    .map(|ch| crop_grid(ch, row, col, tile_size))
                    .collect(),
                labels: crop_labels(labels, row, col, tile_size),
                row,
                col,
            });
            col += stride;
        }
        row += stride;
    }

    Ok(tiles)
}
