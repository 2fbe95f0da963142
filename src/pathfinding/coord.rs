use derive_more::Display;
use std::hash::{Hash, Hasher};

/// A grid cell identity plus the sample stored at that cell.
///
/// Equality and hashing only look at `(x, y)`: two coordinates for the same
/// cell are interchangeable as map keys even when their samples differ.
#[derive(Debug, Clone, Copy, Display)]
#[display("({x}, {y})")]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
    sample: f32,
}

impl GridCoord {
    pub fn new(x: i32, y: i32, sample: f32) -> Self {
        Self { x, y, sample }
    }

    /// Coordinate with no meaningful sample, for lookups and goals
    pub fn at(x: i32, y: i32) -> Self {
        Self::new(x, y, 0.0)
    }

    pub fn sample(&self) -> f32 {
        self.sample
    }

    /// Manhattan distance, the search heuristic
    pub fn manhattan_distance(&self, other: &GridCoord) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Chebyshev distance; 1 for any of the eight neighbors
    pub fn chebyshev_distance(&self, other: &GridCoord) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// Scale a decimated coordinate back into full-resolution space
    pub(crate) fn rescale(&mut self, factor: i32) {
        self.x *= factor;
        self.y *= factor;
    }
}

impl PartialEq for GridCoord {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl Eq for GridCoord {}

impl Hash for GridCoord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x.hash(state);
        self.y.hash(state);
    }
}
