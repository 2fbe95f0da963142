pub mod config;
pub mod errors;
pub mod map;
pub mod pathfinding;
pub mod road;
pub mod terrain;

// Selective re-exports for external consumers
pub use config::{RoadConfig, RoadMode};
pub use errors::{RoadError, RoadResult};
pub use map::HeightGrid;
pub use self::pathfinding::{GridCoord, PathSearch, PriorityFrontier, TerrainGraph, WeightedGraph};
pub use road::{CarveReport, RoadCarver};
pub use terrain::VertexGrid;
pub use terrain::road_generator::{RoadGenerator, RoadOutcome};
