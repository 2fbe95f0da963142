use crate::errors::{RoadError, RoadResult};
use crate::map::HeightGrid;
use crate::pathfinding::coord::GridCoord;
use crate::terrain::constants::*;
use std::borrow::Cow;
use tracing::debug;

/// A graph the A* search can walk. Not tied to square grids.
pub trait WeightedGraph {
    /// Cost of stepping from `a` onto `b`
    fn cost(&self, a: &GridCoord, b: &GridCoord) -> f32;

    /// Passable neighbors of `id`, produced lazily
    fn neighbors(&self, id: GridCoord) -> impl Iterator<Item = GridCoord> + '_;

    /// Ratio between full-resolution coordinates and graph coordinates
    fn decimation_factor(&self) -> usize;

    fn width(&self) -> usize;

    fn height(&self) -> usize;

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width() && (y as usize) < self.height()
    }
}

/// Decimated view of a height grid with 8-directional moves.
#[derive(Debug, Clone)]
pub struct TerrainGraph<'a> {
    samples: Cow<'a, [f32]>,
    width: usize,
    height: usize,
    decimation_factor: usize,
}

impl<'a> TerrainGraph<'a> {
    /// Build the graph, keeping every `decimation_factor`-th cell on each axis.
    ///
    /// A factor of 1 borrows the grid's samples as they are.
    pub fn new(grid: &'a HeightGrid, decimation_factor: usize) -> RoadResult<Self> {
        if decimation_factor == 0 {
            return Err(RoadError::InvalidConfig {
                reason: "decimation_factor must be at least 1".to_string(),
            });
        }

        let source_width = grid.width() as usize;
        let width = source_width / decimation_factor;
        let height = grid.height() as usize / decimation_factor;

        let samples = if decimation_factor == 1 {
            Cow::Borrowed(grid.samples())
        } else {
            let mut decimated = Vec::with_capacity(width * height);
            for y in 0..height {
                let row_start = y * decimation_factor * source_width;
                for x in 0..width {
                    decimated.push(grid.samples()[row_start + x * decimation_factor]);
                }
            }
            Cow::Owned(decimated)
        };

        debug!(
            "Terrain graph {}x{} from {}x{} grid (factor {})",
            width, height, grid.width(), grid.height(), decimation_factor
        );

        Ok(Self {
            samples,
            width,
            height,
            decimation_factor,
        })
    }

    fn sample_at(&self, x: i32, y: i32) -> f32 {
        self.samples[y as usize * self.width + x as usize]
    }

    /// True when the cell exists and its sample is at or below the threshold
    pub fn passable(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y) && self.sample_at(x, y) <= PASSABLE_THRESHOLD
    }

    /// Coordinate carrying the decimated sample at `(x, y)`
    pub fn get_location_at(&self, x: i32, y: i32) -> RoadResult<GridCoord> {
        if !self.in_bounds(x, y) {
            return Err(RoadError::CoordinateOutOfBounds {
                x,
                y,
                width: self.width as u32,
                height: self.height as u32,
            });
        }
        Ok(GridCoord::new(x, y, self.sample_at(x, y)))
    }

    pub(crate) fn borrows_source(&self) -> bool {
        matches!(self.samples, Cow::Borrowed(_))
    }
}

impl WeightedGraph for TerrainGraph<'_> {
    fn cost(&self, a: &GridCoord, b: &GridCoord) -> f32 {
        if a.manhattan_distance(b) == DIAGONAL_MANHATTAN_DISTANCE {
            b.sample() * DIAGONAL_COST_MULTIPLIER * STEP_COST_SCALE
        } else {
            b.sample() * STEP_COST_SCALE
        }
    }

    fn neighbors(&self, id: GridCoord) -> impl Iterator<Item = GridCoord> + '_ {
        Neighbors {
            graph: self,
            origin: id,
            next_offset: 0,
        }
    }

    fn decimation_factor(&self) -> usize {
        self.decimation_factor
    }

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }
}

/// Lazy walk over the eight offsets of a cell
struct Neighbors<'g, 'a> {
    graph: &'g TerrainGraph<'a>,
    origin: GridCoord,
    next_offset: usize,
}

impl Iterator for Neighbors<'_, '_> {
    type Item = GridCoord;

    fn next(&mut self) -> Option<GridCoord> {
        while let Some(&(dx, dy)) = NEIGHBOR_OFFSETS.get(self.next_offset) {
            self.next_offset += 1;
            let x = self.origin.x + dx;
            let y = self.origin.y + dy;
            if self.graph.passable(x, y) {
                return Some(GridCoord::new(x, y, self.graph.sample_at(x, y)));
            }
        }
        None
    }
}
