use crate::config::describe_validation_errors;
use crate::config::range_types::SampleScale;
use crate::errors::{RoadError, RoadResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;
use validator::Validate;

/// Normalized height/occupancy samples for a terrain, row-major.
///
/// Samples are finite and non-negative. Those at or below 1.0 are passable;
/// anything above marks an obstacle. Fields are only reachable through
/// validated constructors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct HeightGrid {
    #[validate(range(min = 1, max = 4096))]
    width: u32,
    #[validate(range(min = 1, max = 4096))]
    height: u32,
    samples: Vec<f32>, // Flattened 2D array (row-major)
}

impl HeightGrid {
    /// Create a new height grid with validation
    pub fn new(width: u32, height: u32, samples: Vec<f32>) -> RoadResult<Self> {
        let expected_size = width as usize * height as usize;
        if samples.len() != expected_size {
            return Err(RoadError::InvalidGridData {
                reason: format!(
                    "Samples array size {} does not match grid dimensions {}x{} (expected {})",
                    samples.len(),
                    width,
                    height,
                    expected_size
                ),
            });
        }

        let grid = Self {
            width,
            height,
            samples,
        };
        grid.check_consistency()
            .map_err(|reason| RoadError::InvalidGridData { reason })?;

        Ok(grid)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major samples
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Create a grid with every sample set to `value`
    pub fn create_flat(width: u32, height: u32, value: f32) -> RoadResult<Self> {
        Self::new(width, height, vec![value; width as usize * height as usize])
    }

    /// Create a grid by evaluating `f(x, y)` for every cell
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> f32) -> RoadResult<Self> {
        let mut samples = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                samples.push(f(x, y));
            }
        }
        Self::new(width, height, samples)
    }

    pub fn index_of(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the sample at a grid position
    pub fn get(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.samples.get(self.index_of(x, y)).copied()
    }

    /// Import a grayscale heightmap; each pixel becomes `luma / 255 * scale`
    pub fn from_image<P: AsRef<Path>>(path: P, scale: SampleScale) -> RoadResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(RoadError::GridFileNotFound {
                path: path.to_path_buf(),
            });
        }

        let image = image::open(path)?.to_luma8();
        let (width, height) = image.dimensions();
        let samples = image
            .pixels()
            .map(|pixel| pixel.0[0] as f32 / 255.0 * scale.get())
            .collect();

        info!(
            "Imported {}x{} heightmap from {}",
            width,
            height,
            path.display()
        );
        Self::new(width, height, samples)
    }

    /// Load a grid saved with [`HeightGrid::save_to_file`]
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> RoadResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(RoadError::GridFileNotFound {
                path: path.to_path_buf(),
            });
        }

        let data = std::fs::read(path)?;
        let (grid, _): (HeightGrid, usize) =
            bincode::serde::decode_from_slice(&data, bincode::config::standard()).map_err(|e| {
                RoadError::CorruptedGridFile {
                    reason: format!("Failed to deserialize grid data: {e}"),
                }
            })?;

        grid.check_consistency()
            .map_err(|reason| RoadError::CorruptedGridFile { reason })?;

        Ok(grid)
    }

    /// Save the grid as bincode
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> RoadResult<()> {
        self.check_consistency()
            .map_err(|reason| RoadError::InvalidGridData { reason })?;

        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let data = bincode::serde::encode_to_vec(self, bincode::config::standard()).map_err(|e| {
            RoadError::InvalidGridData {
                reason: format!("Failed to serialize grid: {e}"),
            }
        })?;
        std::fs::write(path, data)?;

        Ok(())
    }

    fn check_consistency(&self) -> Result<(), String> {
        self.validate()
            .map_err(|errors| format!("Grid validation failed: {}", describe_validation_errors(&errors)))?;
        let expected = self.width as usize * self.height as usize;
        if self.samples.len() != expected {
            return Err(format!(
                "Grid holds {} samples, expected {expected}",
                self.samples.len()
            ));
        }
        if let Some(index) = self.samples.iter().position(|s| !s.is_finite() || *s < 0.0) {
            return Err(format!(
                "Sample {} at ({}, {}) is not a finite, non-negative value",
                self.samples[index],
                index % self.width as usize,
                index / self.width as usize
            ));
        }
        Ok(())
    }

    /// Each row as integer percentages, for eyeballing a grid in logs
    pub fn to_percent_rows(&self) -> Vec<Vec<i32>> {
        self.samples
            .chunks(self.width as usize)
            .map(|row| row.iter().map(|&sample| (sample * 100.0) as i32).collect())
            .collect()
    }
}

/// Render percent rows as comma-separated lines
pub fn format_percent_rows(rows: &[Vec<i32>]) -> Vec<String> {
    rows.iter()
        .map(|row| {
            row.iter()
                .map(i32::to_string)
                .collect::<Vec<String>>()
                .join(",")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("roadbed-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_height_grid_creation() {
        let grid = HeightGrid::new(2, 2, vec![0.0, 0.25, 0.5, 0.75]).unwrap();
        assert_eq!(grid.width(), 2);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.samples().len(), 4);
    }

    #[test]
    fn test_height_grid_invalid_size() {
        let result = HeightGrid::new(2, 2, vec![0.0, 1.0, 2.0]);
        assert!(matches!(result, Err(RoadError::InvalidGridData { .. })));
    }

    #[test]
    fn test_height_grid_zero_width_rejected() {
        let result = HeightGrid::new(0, 3, vec![]);
        assert!(result.is_err());
    }

    #[test]
    fn test_flat_grid_creation() {
        let grid = HeightGrid::create_flat(3, 4, 0.5).unwrap();
        assert_eq!(grid.samples().len(), 12);
        assert!(grid.samples().iter().all(|&s| s == 0.5));
    }

    #[test]
    fn test_sample_lookup_is_row_major() {
        let grid = HeightGrid::from_fn(3, 2, |x, y| (y * 10 + x) as f32).unwrap();
        assert_eq!(grid.get(0, 0), Some(0.0));
        assert_eq!(grid.get(2, 0), Some(2.0));
        assert_eq!(grid.get(1, 1), Some(11.0));
        assert_eq!(grid.get(3, 0), None);
        assert_eq!(grid.get(0, 2), None);
    }

    #[test]
    fn test_percent_rows() {
        let grid = HeightGrid::new(2, 2, vec![0.0, 0.5, 1.0, 1.234]).unwrap();
        let rows = grid.to_percent_rows();
        assert_eq!(rows, vec![vec![0, 50], vec![100, 123]]);
        assert_eq!(format_percent_rows(&rows), vec!["0,50", "100,123"]);
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("grid.bin");
        let grid = HeightGrid::from_fn(4, 3, |x, y| x as f32 * 0.1 + y as f32 * 0.2).unwrap();

        grid.save_to_file(&path).unwrap();
        let loaded = HeightGrid::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, grid);
    }

    #[test]
    fn test_load_missing_file() {
        let result = HeightGrid::load_from_file(temp_path("missing.bin"));
        assert!(matches!(result, Err(RoadError::GridFileNotFound { .. })));
    }

    #[test]
    fn test_load_corrupted_file() {
        let path = temp_path("corrupt.bin");
        std::fs::write(&path, [0xFFu8, 0xFF, 0xFF]).unwrap();
        let result = HeightGrid::load_from_file(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(RoadError::CorruptedGridFile { .. })));
    }

    #[test]
    fn test_image_import() {
        let path = temp_path("heightmap.png");
        let mut image = image::GrayImage::new(3, 2);
        image.put_pixel(0, 0, image::Luma([0]));
        image.put_pixel(2, 1, image::Luma([255]));
        image.save(&path).unwrap();

        let grid = HeightGrid::from_image(&path, SampleScale::new(2.0)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!((grid.width(), grid.height()), (3, 2));
        assert_eq!(grid.get(0, 0), Some(0.0));
        assert_eq!(grid.get(2, 1), Some(2.0));
    }

    #[test]
    fn test_negative_and_non_finite_samples_rejected() {
        for bad in [-0.5, f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            let result = HeightGrid::new(2, 1, vec![0.5, bad]);
            assert!(
                matches!(result, Err(RoadError::InvalidGridData { .. })),
                "sample {bad} was accepted"
            );
        }

        let walled = HeightGrid::from_fn(5, 5, |_, y| if y == 2 { 3.0 } else { -0.5 });
        assert!(walled.is_err());
        assert!(HeightGrid::create_flat(3, 3, -0.1).is_err());
        assert!(HeightGrid::create_flat(3, 3, 0.0).is_ok());
    }

    #[test]
    fn test_load_rejects_negative_samples() {
        // Written without going through the validated constructor
        let raw = HeightGrid {
            width: 2,
            height: 2,
            samples: vec![0.5, -0.5, 0.5, 0.5],
        };
        let path = temp_path("negative.bin");
        let data = bincode::serde::encode_to_vec(&raw, bincode::config::standard()).unwrap();
        std::fs::write(&path, data).unwrap();

        let result = HeightGrid::load_from_file(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(RoadError::CorruptedGridFile { .. })));
    }

    #[test]
    fn test_save_rejects_non_finite_samples() {
        let raw = HeightGrid {
            width: 1,
            height: 1,
            samples: vec![f32::NAN],
        };
        let path = temp_path("nan.bin");
        let result = raw.save_to_file(&path);
        assert!(matches!(result, Err(RoadError::InvalidGridData { .. })));
        assert!(!path.exists());
    }
}
