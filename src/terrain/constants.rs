/// Constants for terrain graph and road carving
/// Pathfinding constants
pub const PASSABLE_THRESHOLD: f32 = 1.0;
pub const STEP_COST_SCALE: f32 = 10.0;
pub const DIAGONAL_COST_MULTIPLIER: f32 = 1.4;
/// Manhattan distance that marks a diagonal move
pub const DIAGONAL_MANHATTAN_DISTANCE: i32 = 2;

/// Neighbor offsets in enumeration order: right, down, left, up, then diagonals
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (1, 0),
    (0, -1),
    (-1, 0),
    (0, 1),
    (1, 1),
    (-1, 1),
    (1, -1),
    (-1, -1),
];

/// Road curve constants
pub const SPLINE_SEGMENT_SUBDIVISIONS: usize = 10;
/// Largest leveling half-width a carver accepts
pub const MAX_SMOOTH_RADIUS: usize = 256;
