//! Least-cost routing over a decimated terrain grid

pub mod astar;
pub mod coord;
pub mod frontier;
pub mod graph;

pub use astar::{PathSearch, find_path};
pub use coord::GridCoord;
pub use frontier::PriorityFrontier;
pub use graph::{TerrainGraph, WeightedGraph};
