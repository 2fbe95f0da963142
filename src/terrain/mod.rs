use crate::config::range_types::HeightModifier;
use crate::errors::{RoadError, RoadResult};
use crate::map::HeightGrid;
use bevy_math::Vec3;

pub mod constants;
pub mod deformation;
pub mod road_generator;

/// Row-major terrain vertex buffer, one vertex per height sample.
///
/// Horizontal positions are laid out on a unit lattice centered on the
/// origin (`x` across, `z` down the rows); `y` is the elevation.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexGrid {
    width: u32,
    height: u32,
    vertices: Vec<Vec3>,
}

impl VertexGrid {
    pub fn new(width: u32, height: u32, vertices: Vec<Vec3>) -> RoadResult<Self> {
        let expected_size = width as usize * height as usize;
        if vertices.len() != expected_size {
            return Err(RoadError::InvalidGridData {
                reason: format!(
                    "Vertex buffer size {} does not match {}x{} (expected {})",
                    vertices.len(),
                    width,
                    height,
                    expected_size
                ),
            });
        }
        Ok(Self {
            width,
            height,
            vertices,
        })
    }

    /// Lay out one vertex per sample, elevation scaled by `modifier`
    pub fn from_heights(grid: &HeightGrid, modifier: HeightModifier) -> Self {
        let width = grid.width() as usize;
        let height = grid.height() as usize;

        // Calculate centering offset to position terrain around origin
        let top_left_x = (width as f32 - 1.0) / -2.0;
        let top_left_z = (height as f32 - 1.0) / -2.0;

        let mut vertices = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let sample = grid.samples()[y * width + x];
                vertices.push(Vec3::new(
                    top_left_x + x as f32,
                    sample * modifier.get(),
                    top_left_z + y as f32,
                ));
            }
        }

        Self {
            width: grid.width(),
            height: grid.height(),
            vertices,
        }
    }

    /// Convert elevations back into samples; a zero modifier keeps raw elevations
    pub fn to_height_grid(&self, modifier: HeightModifier) -> RoadResult<HeightGrid> {
        let divisor = if modifier.get() > 0.0 { modifier.get() } else { 1.0 };
        let samples = self.vertices.iter().map(|v| v.y / divisor).collect();
        HeightGrid::new(self.width, self.height, samples)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    pub fn index_of(&self, x: u32, y: u32) -> usize {
        x as usize + y as usize * self.width as usize
    }

    pub fn get_vertex_at(&self, x: u32, y: u32) -> Option<Vec3> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.vertices.get(self.index_of(x, y)).copied()
    }

    pub fn set_vertex_at(&mut self, x: u32, y: u32, vertex: Vec3) -> RoadResult<()> {
        if x >= self.width || y >= self.height {
            return Err(RoadError::CoordinateOutOfBounds {
                x: x as i32,
                y: y as i32,
                width: self.width,
                height: self.height,
            });
        }
        let index = self.index_of(x, y);
        self.vertices[index] = vertex;
        Ok(())
    }

    pub fn set_elevation_at(&mut self, x: u32, y: u32, elevation: f32) -> RoadResult<()> {
        let (width, height) = (self.width, self.height);
        match self.elevation_mut(x, y) {
            Some(slot) => {
                *slot = elevation;
                Ok(())
            }
            None => Err(RoadError::CoordinateOutOfBounds {
                x: x as i32,
                y: y as i32,
                width,
                height,
            }),
        }
    }

    /// Mutable access to the elevation only; horizontal position stays fixed
    pub fn elevation_mut(&mut self, x: u32, y: u32) -> Option<&mut f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = self.index_of(x, y);
        self.vertices.get_mut(index).map(|vertex| &mut vertex.y)
    }
}
