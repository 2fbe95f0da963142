use crate::config::range_types::HeightModifier;
use crate::config::{RoadConfig, RoadMode};
use crate::errors::RoadResult;
use crate::map::HeightGrid;
use crate::pathfinding::{GridCoord, PathSearch, TerrainGraph, WeightedGraph};
use crate::road::{CarveReport, RoadCarver, flatten_center_strip};
use crate::terrain::VertexGrid;
use crate::terrain::deformation::{deform, height_modifier_for};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct RoadOutcome {
    pub mode: RoadMode,
    /// Full-resolution path, entry excluded; empty when no route was found
    pub path: Vec<GridCoord>,
    pub total_cost: Option<f32>,
    pub nodes_explored: usize,
    /// Present only when a path was carved
    pub carve: Option<CarveReport>,
    /// Vertices whose elevation was rewritten, in either mode
    pub leveled_vertices: usize,
}

/// Runs one deform / mesh / route / carve pass over a height grid.
#[derive(Debug, Clone)]
pub struct RoadGenerator {
    config: RoadConfig,
    carver: RoadCarver,
    endpoints: Option<((i32, i32), (i32, i32))>,
}

impl RoadGenerator {
    pub fn new(config: RoadConfig) -> RoadResult<Self> {
        let config = config.validated()?;
        let carver = RoadCarver::new(config.smooth_radius, config.road_node_density)?;
        Ok(Self {
            config,
            carver,
            endpoints: None,
        })
    }

    /// Route between these decimated-grid cells instead of top-middle to bottom-middle
    pub fn with_endpoints(mut self, entry: (i32, i32), exit: (i32, i32)) -> Self {
        self.endpoints = Some((entry, exit));
        self
    }

    pub fn config(&self) -> &RoadConfig {
        &self.config
    }

    /// Elevation multiplier of the active deformation profile, else the config's
    pub fn height_modifier(&self) -> HeightModifier {
        height_modifier_for(self.config.deformation, self.config.height_modifier)
    }

    pub fn generate(&self, grid: &HeightGrid) -> RoadResult<(VertexGrid, RoadOutcome)> {
        let deformed = deform(grid, self.config.deformation)?;
        let mut vertices = VertexGrid::from_heights(&deformed, self.height_modifier());

        let outcome = match self.config.mode {
            RoadMode::Strip => {
                let leveled = flatten_center_strip(&mut vertices, self.config.smooth_radius);
                info!(
                    "Flattened center strip of radius {} ({} vertices)",
                    self.config.smooth_radius, leveled
                );
                RoadOutcome {
                    mode: RoadMode::Strip,
                    path: Vec::new(),
                    total_cost: None,
                    nodes_explored: 0,
                    carve: None,
                    leveled_vertices: leveled,
                }
            }
            RoadMode::Routed => self.route_and_carve(&deformed, &mut vertices)?,
        };

        Ok((vertices, outcome))
    }

    fn route_and_carve(
        &self,
        grid: &HeightGrid,
        vertices: &mut VertexGrid,
    ) -> RoadResult<RoadOutcome> {
        let graph = TerrainGraph::new(grid, self.config.decimation_factor)?;
        let (entry, exit) = match self.endpoints {
            Some(((sx, sy), (gx, gy))) => {
                (graph.get_location_at(sx, sy)?, graph.get_location_at(gx, gy)?)
            }
            None => entry_and_exit(&graph)?,
        };

        let search = PathSearch::run_bounded(&graph, entry, exit, self.config.max_expansions)?;
        let path = search.where_to();

        let mut outcome = RoadOutcome {
            mode: RoadMode::Routed,
            path,
            total_cost: search.total_cost(),
            nodes_explored: search.nodes_explored(),
            carve: None,
            leveled_vertices: 0,
        };

        if outcome.path.is_empty() {
            warn!(
                "No road from {} to {} after {} expansions; terrain left as is",
                entry,
                exit,
                search.nodes_explored()
            );
            return Ok(outcome);
        }

        let report = self.carver.carve(&outcome.path, vertices)?;
        info!(
            "Road of {} cells from {} to {} (cost {:.1}), {} vertices leveled",
            outcome.path.len(),
            entry,
            exit,
            outcome.total_cost.unwrap_or_default(),
            report.affected_cells
        );
        outcome.leveled_vertices = report.affected_cells;
        outcome.carve = Some(report);
        Ok(outcome)
    }
}

/// Default road ends: top-middle and bottom-middle of the decimated grid
pub fn entry_and_exit(graph: &TerrainGraph) -> RoadResult<(GridCoord, GridCoord)> {
    let middle = (graph.width() / 2) as i32;
    let bottom = graph.height() as i32 - 1;
    Ok((
        graph.get_location_at(middle, 0)?,
        graph.get_location_at(middle, bottom)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RoadError;
    use crate::terrain::deformation::DeformationKind;

    fn config(mode: RoadMode) -> RoadConfig {
        RoadConfig {
            mode,
            smooth_radius: 1,
            ..RoadConfig::default()
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = RoadConfig {
            road_node_density: 0,
            ..RoadConfig::default()
        };
        assert!(matches!(
            RoadGenerator::new(config),
            Err(RoadError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_entry_and_exit_are_middle_of_edges() {
        let grid = HeightGrid::create_flat(9, 12, 0.5).unwrap();
        let graph = TerrainGraph::new(&grid, 2).unwrap();
        let (entry, exit) = entry_and_exit(&graph).unwrap();
        assert_eq!((entry.x, entry.y), (2, 0));
        assert_eq!((exit.x, exit.y), (2, 5));
    }

    #[test]
    fn test_routed_mode_carves_straight_road() {
        let grid = HeightGrid::from_fn(7, 7, |x, _| 0.1 + x as f32 / 100.0).unwrap();
        let generator = RoadGenerator::new(config(RoadMode::Routed)).unwrap();
        let (vertices, outcome) = generator.generate(&grid).unwrap();

        let columns: Vec<i32> = outcome.path.iter().map(|c| c.x).collect();
        assert_eq!(columns, vec![3; 6]);
        assert_eq!(outcome.path.last().map(|c| c.y), Some(6));
        assert!(outcome.total_cost.is_some());

        let report = outcome.carve.as_ref().unwrap();
        assert_eq!(report.centerline.len(), 7);
        assert_eq!(outcome.leveled_vertices, report.affected_cells);
        assert!(outcome.leveled_vertices > 0);

        // Column 2 of a carved row now matches the road's column 3
        let left = vertices.get_vertex_at(2, 3).unwrap().y;
        let road = vertices.get_vertex_at(3, 3).unwrap().y;
        assert!((left - road).abs() < 1e-3);
    }

    #[test]
    fn test_blocked_grid_leaves_vertices_untouched() {
        let grid = HeightGrid::from_fn(5, 5, |_, y| if y == 2 { 2.0 } else { 0.3 }).unwrap();
        let generator = RoadGenerator::new(config(RoadMode::Routed)).unwrap();
        let (vertices, outcome) = generator.generate(&grid).unwrap();

        assert!(outcome.path.is_empty());
        assert!(outcome.carve.is_none());
        assert_eq!(outcome.total_cost, None);
        assert_eq!(
            vertices,
            VertexGrid::from_heights(&grid, generator.height_modifier())
        );
    }

    #[test]
    fn test_strip_mode_skips_search() {
        let grid = HeightGrid::from_fn(6, 4, |x, y| (x + y) as f32 / 20.0).unwrap();
        let generator = RoadGenerator::new(config(RoadMode::Strip)).unwrap();
        let (vertices, outcome) = generator.generate(&grid).unwrap();

        assert_eq!(outcome.mode, RoadMode::Strip);
        assert!(outcome.path.is_empty());
        assert_eq!(outcome.nodes_explored, 0);
        assert_eq!(outcome.leveled_vertices, 8);
        for y in 0..4 {
            let middle = vertices.get_vertex_at(3, y).unwrap().y;
            assert_eq!(vertices.get_vertex_at(2, y).unwrap().y, middle);
        }
    }

    #[test]
    fn test_custom_endpoints_and_decimation() {
        let grid = HeightGrid::create_flat(12, 12, 0.5).unwrap();
        let generator = RoadGenerator::new(RoadConfig {
            decimation_factor: 3,
            ..config(RoadMode::Routed)
        })
        .unwrap()
        .with_endpoints((0, 0), (3, 0));
        let (_, outcome) = generator.generate(&grid).unwrap();

        let cells: Vec<(i32, i32)> = outcome.path.iter().map(|c| (c.x, c.y)).collect();
        assert_eq!(cells, vec![(3, 0), (6, 0), (9, 0)]);
    }

    #[test]
    fn test_endpoint_outside_graph_fails() {
        let grid = HeightGrid::create_flat(6, 6, 0.5).unwrap();
        let generator = RoadGenerator::new(config(RoadMode::Routed))
            .unwrap()
            .with_endpoints((0, 0), (6, 0));
        assert!(matches!(
            generator.generate(&grid),
            Err(RoadError::CoordinateOutOfBounds { x: 6, .. })
        ));
    }

    #[test]
    fn test_deformation_runs_before_meshing() {
        let grid = HeightGrid::create_flat(10, 10, 0.8).unwrap();
        let generator = RoadGenerator::new(RoadConfig {
            deformation: DeformationKind::Valley,
            ..config(RoadMode::Strip)
        })
        .unwrap();
        let (vertices, _) = generator.generate(&grid).unwrap();

        let edge = vertices.get_vertex_at(0, 0).unwrap().y;
        let middle = vertices.get_vertex_at(5, 0).unwrap().y;
        assert!(middle < edge);
    }

    #[test]
    fn test_profile_height_modifier_scales_elevation() {
        let grid = HeightGrid::create_flat(10, 4, 0.5).unwrap();
        let mesh_with = |deformation| {
            let generator = RoadGenerator::new(RoadConfig {
                deformation,
                height_modifier: HeightModifier::new(10.0),
                ..config(RoadMode::Strip)
            })
            .unwrap();
            let (vertices, _) = generator.generate(&grid).unwrap();
            (generator.height_modifier(), vertices)
        };

        let (base_modifier, base) = mesh_with(DeformationKind::Base);
        let (valley_modifier, valley) = mesh_with(DeformationKind::Valley);
        assert_eq!(base_modifier, HeightModifier::new(10.0));
        assert_eq!(valley_modifier, HeightModifier::new(15.0));

        // Column 0 sits outside the strip and the valley walls keep its sample
        let base_edge = base.get_vertex_at(0, 1).unwrap().y;
        let valley_edge = valley.get_vertex_at(0, 1).unwrap().y;
        assert!((base_edge - 5.0).abs() < 1e-4);
        assert!((valley_edge - 7.5).abs() < 1e-4);
    }
}
