use crate::errors::{RoadError, RoadResult};
use crate::pathfinding::coord::GridCoord;
use crate::pathfinding::frontier::PriorityFrontier;
use crate::pathfinding::graph::WeightedGraph;
use std::collections::HashMap;
use tracing::{debug, warn};

/// State of one A* run: predecessor and cost maps keyed by cell.
///
/// The search runs to completion inside [`PathSearch::run`]; the maps are
/// kept afterwards so the path can be reconstructed with
/// [`PathSearch::where_to`].
#[derive(Debug, Clone)]
pub struct PathSearch {
    came_from: HashMap<GridCoord, GridCoord>,
    cost_so_far: HashMap<GridCoord, f32>,
    start: GridCoord,
    goal: GridCoord,
    decimation_factor: usize,
    nodes_explored: usize,
    reached_goal: bool,
}

impl PathSearch {
    /// Search from `start` to `goal` (graph coordinates) until the goal is
    /// settled or the frontier runs dry.
    pub fn run<G: WeightedGraph>(graph: &G, start: GridCoord, goal: GridCoord) -> RoadResult<Self> {
        Self::run_bounded(graph, start, goal, None)
    }

    /// Like [`PathSearch::run`], but gives up after `max_expansions` cells
    /// have been expanded. A search that gives up reports no path.
    pub fn run_bounded<G: WeightedGraph>(
        graph: &G,
        start: GridCoord,
        goal: GridCoord,
        max_expansions: Option<usize>,
    ) -> RoadResult<Self> {
        ensure_in_bounds(graph, &start)?;
        ensure_in_bounds(graph, &goal)?;

        let mut search = Self {
            came_from: HashMap::new(),
            cost_so_far: HashMap::new(),
            start,
            goal,
            decimation_factor: graph.decimation_factor(),
            nodes_explored: 0,
            reached_goal: false,
        };

        // Entries carry the cost they were queued with so stale copies can be spotted
        let mut frontier = PriorityFrontier::new();
        frontier.enqueue((start, 0.0), 0.0);
        search.came_from.insert(start, start);
        search.cost_so_far.insert(start, 0.0);

        while !frontier.is_empty() {
            let (current, queued_cost) = frontier.dequeue()?;
            let current_cost = search.cost_so_far[&current];

            if queued_cost > current_cost {
                continue;
            }

            if current == goal {
                search.reached_goal = true;
                break;
            }

            if max_expansions.is_some_and(|limit| search.nodes_explored >= limit) {
                warn!(
                    "Search from {} to {} gave up after {} expansions",
                    start, goal, search.nodes_explored
                );
                break;
            }
            search.nodes_explored += 1;

            for next in graph.neighbors(current) {
                let new_cost = current_cost + graph.cost(&current, &next);
                let improves = search
                    .cost_so_far
                    .get(&next)
                    .is_none_or(|&known| new_cost < known);

                if improves {
                    search.cost_so_far.insert(next, new_cost);
                    search.came_from.insert(next, current);
                    let priority = new_cost + next.manhattan_distance(&goal) as f32;
                    frontier.enqueue((next, new_cost), priority);
                }
            }
        }

        debug!(
            "Search {} -> {}: reached={}, expanded={}, visited={}",
            start,
            goal,
            search.reached_goal,
            search.nodes_explored,
            search.cost_so_far.len()
        );

        Ok(search)
    }

    /// Path from (excluding) start to (including) goal, in full-resolution
    /// coordinates. Empty when the goal was not reached.
    pub fn where_to(&self) -> Vec<GridCoord> {
        if !self.reached_goal {
            return Vec::new();
        }

        let mut path = Vec::new();
        let mut current = self.goal;
        while current != self.start {
            let Some((&stored, &from)) = self.came_from.get_key_value(&current) else {
                return Vec::new();
            };
            path.push(stored);
            current = from;
        }

        path.reverse();
        let factor = self.decimation_factor as i32;
        for location in &mut path {
            location.rescale(factor);
        }
        path
    }

    /// Accumulated cost at the goal, if it was reached
    pub fn total_cost(&self) -> Option<f32> {
        if self.reached_goal {
            self.cost_so_far.get(&self.goal).copied()
        } else {
            None
        }
    }

    pub fn reached_goal(&self) -> bool {
        self.reached_goal
    }

    /// Number of cells whose neighbors were examined
    pub fn nodes_explored(&self) -> usize {
        self.nodes_explored
    }

    pub fn cost_to(&self, coord: &GridCoord) -> Option<f32> {
        self.cost_so_far.get(coord).copied()
    }

    pub fn predecessor_of(&self, coord: &GridCoord) -> Option<GridCoord> {
        self.came_from.get(coord).copied()
    }
}

/// Run a search and return only the rescaled path
pub fn find_path<G: WeightedGraph>(
    graph: &G,
    start: GridCoord,
    goal: GridCoord,
) -> RoadResult<Vec<GridCoord>> {
    Ok(PathSearch::run(graph, start, goal)?.where_to())
}

fn ensure_in_bounds<G: WeightedGraph>(graph: &G, coord: &GridCoord) -> RoadResult<()> {
    if graph.in_bounds(coord.x, coord.y) {
        Ok(())
    } else {
        Err(RoadError::CoordinateOutOfBounds {
            x: coord.x,
            y: coord.y,
            width: graph.width() as u32,
            height: graph.height() as u32,
        })
    }
}
