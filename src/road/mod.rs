//! Carving a found path into the terrain vertices

pub mod spline;
pub mod strip;

use crate::errors::{RoadError, RoadResult};
use crate::pathfinding::GridCoord;
use crate::terrain::VertexGrid;
use crate::terrain::constants::MAX_SMOOTH_RADIUS;
use bevy_math::Vec3;
use tracing::debug;

pub use strip::flatten_center_strip;

/// What a carve pass produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarveReport {
    /// Path vertices the centerline was fitted through
    pub control_points: Vec<Vec3>,
    /// One sample per mesh row
    pub centerline: Vec<Vec3>,
    /// Number of distinct vertices whose elevation was rewritten
    pub affected_cells: usize,
}

/// Levels the terrain under a path to a smooth centerline.
#[derive(Debug, Clone, Copy)]
pub struct RoadCarver {
    smooth_radius: usize,
    node_density: usize,
}

impl RoadCarver {
    /// `node_density` keeps every Nth path vertex as a control point; 0 is rejected.
    /// `smooth_radius` may not exceed [`MAX_SMOOTH_RADIUS`].
    pub fn new(smooth_radius: usize, node_density: usize) -> RoadResult<Self> {
        if smooth_radius > MAX_SMOOTH_RADIUS {
            return Err(RoadError::InvalidConfig {
                reason: format!(
                    "smooth_radius {smooth_radius} exceeds the maximum of {MAX_SMOOTH_RADIUS}"
                ),
            });
        }
        if node_density == 0 {
            return Err(RoadError::InvalidConfig {
                reason: "road_node_density must be at least 1".to_string(),
            });
        }
        Ok(Self {
            smooth_radius,
            node_density,
        })
    }

    pub fn smooth_radius(&self) -> usize {
        self.smooth_radius
    }

    pub fn node_density(&self) -> usize {
        self.node_density
    }

    /// Carve `path` (full-resolution coordinates) into `vertices`.
    ///
    /// Every coordinate is bounds-checked before any vertex is touched.
    pub fn carve(&self, path: &[GridCoord], vertices: &mut VertexGrid) -> RoadResult<CarveReport> {
        if let Some(outside) = path.iter().find(|c| !vertices.contains(c.x, c.y)) {
            return Err(RoadError::CoordinateOutOfBounds {
                x: outside.x,
                y: outside.y,
                width: vertices.width(),
                height: vertices.height(),
            });
        }
        if path.is_empty() {
            return Ok(CarveReport::default());
        }

        let control_points: Vec<Vec3> = path
            .iter()
            .step_by(self.node_density)
            .filter_map(|c| vertices.get_vertex_at(c.x as u32, c.y as u32))
            .collect();
        let centerline = spline::centerline(&control_points, vertices.height() as usize);

        let cells = self.affected_cells(path, vertices);
        for &(x, y) in &cells {
            let Some(vertex) = vertices.get_vertex_at(x, y) else {
                continue;
            };
            if let (Some(target), Some(elevation)) =
                (nearest_sample(&centerline, vertex), vertices.elevation_mut(x, y))
            {
                *elevation = target.y;
            }
        }

        let report = CarveReport {
            control_points,
            centerline,
            affected_cells: cells.len(),
        };
        debug!(
            "Carved road: {} path cells, {} control points, {} centerline samples, {} vertices leveled",
            path.len(),
            report.control_points.len(),
            report.centerline.len(),
            report.affected_cells
        );
        Ok(report)
    }

    /// Union of the half-open windows around every path cell but the last, row-major
    fn affected_cells(&self, path: &[GridCoord], vertices: &VertexGrid) -> Vec<(u32, u32)> {
        let width = vertices.width() as usize;
        let mut selected = vec![false; width * vertices.height() as usize];
        let radius = self.smooth_radius as i32;

        for coord in &path[..path.len().saturating_sub(1)] {
            for cy in coord.y - radius..coord.y + radius {
                for cx in coord.x - radius..coord.x + radius {
                    if vertices.contains(cx, cy) {
                        selected[vertices.index_of(cx as u32, cy as u32)] = true;
                    }
                }
            }
        }

        selected
            .iter()
            .enumerate()
            .filter(|(_, hit)| **hit)
            .map(|(index, _)| ((index % width) as u32, (index / width) as u32))
            .collect()
    }
}

/// Centerline sample closest to `vertex` in the horizontal plane; first wins ties
fn nearest_sample(centerline: &[Vec3], vertex: Vec3) -> Option<Vec3> {
    let horizontal = |p: Vec3| {
        let dx = p.x - vertex.x;
        let dz = p.z - vertex.z;
        dx * dx + dz * dz
    };
    centerline
        .iter()
        .copied()
        .reduce(|best, p| if horizontal(p) < horizontal(best) { p } else { best })
}
