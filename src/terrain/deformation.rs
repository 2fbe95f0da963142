use crate::config::range_types::HeightModifier;
use crate::errors::RoadResult;
use crate::map::HeightGrid;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Preset reshaping applied to a normalized grid before meshing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeformationKind {
    /// Leave the grid as it is
    #[default]
    Base,
    /// Sink a channel down the middle column
    Valley,
    /// Valley crossed by a low ridge halfway down
    Pass,
}

/// Piecewise-linear curve over `t` in [0, 1], keys as `(t, value)`.
///
/// Evaluation clamps to the first and last key; an empty curve is 0 everywhere.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeformationCurve {
    keys: Vec<(f32, f32)>,
}

impl DeformationCurve {
    pub fn new(mut keys: Vec<(f32, f32)>) -> Self {
        keys.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { keys }
    }

    pub fn constant(value: f32) -> Self {
        Self::new(vec![(0.0, value)])
    }

    pub fn evaluate(&self, t: f32) -> f32 {
        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return 0.0;
        };
        if t <= first.0 {
            return first.1;
        }
        if t >= last.0 {
            return last.1;
        }

        for pair in self.keys.windows(2) {
            let (t0, v0) = pair[0];
            let (t1, v1) = pair[1];
            if t <= t1 {
                let span = t1 - t0;
                if span <= f32::EPSILON {
                    return v1;
                }
                return v0 + (v1 - v0) * (t - t0) / span;
            }
        }
        last.1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeformationProfile {
    pub name: String,
    /// Elevation multiplier meshes of this profile use; `None` defers to the config
    pub height_modifier: Option<HeightModifier>,
    pub curve_x: DeformationCurve,
    pub curve_y: DeformationCurve,
}

impl DeformationProfile {
    /// Scale each sample by the larger of the two curves, clamped to [0, 1]
    pub fn apply(&self, grid: &HeightGrid) -> RoadResult<HeightGrid> {
        let width = grid.width() as f32;
        let height = grid.height() as f32;
        let deformed = HeightGrid::from_fn(grid.width(), grid.height(), |x, y| {
            let factor = self
                .curve_x
                .evaluate(x as f32 / width)
                .max(self.curve_y.evaluate(y as f32 / height));
            (grid.samples()[grid.index_of(x, y)] * factor).clamp(0.0, 1.0)
        })?;

        debug!(
            "Applied '{}' deformation to {}x{} grid",
            self.name,
            grid.width(),
            grid.height()
        );
        Ok(deformed)
    }

    pub fn height_modifier_or(&self, fallback: HeightModifier) -> HeightModifier {
        self.height_modifier.unwrap_or(fallback)
    }
}

/// Preset profile for `kind`; `Base` has none
pub fn profile_for(kind: DeformationKind) -> Option<DeformationProfile> {
    let valley_walls = DeformationCurve::new(vec![
        (0.0, 1.0),
        (0.3, 0.6),
        (0.45, 0.15),
        (0.55, 0.15),
        (0.7, 0.6),
        (1.0, 1.0),
    ]);

    match kind {
        DeformationKind::Base => None,
        DeformationKind::Valley => Some(DeformationProfile {
            name: "valley".to_string(),
            height_modifier: Some(HeightModifier::new(15.0)),
            curve_x: valley_walls,
            curve_y: DeformationCurve::constant(0.0),
        }),
        DeformationKind::Pass => Some(DeformationProfile {
            name: "pass".to_string(),
            height_modifier: Some(HeightModifier::new(20.0)),
            curve_x: valley_walls,
            curve_y: DeformationCurve::new(vec![
                (0.0, 0.0),
                (0.4, 0.0),
                (0.5, 0.5),
                (0.6, 0.0),
                (1.0, 0.0),
            ]),
        }),
    }
}

/// Apply the preset for `kind`, or copy the grid for `Base`
pub fn deform(grid: &HeightGrid, kind: DeformationKind) -> RoadResult<HeightGrid> {
    match profile_for(kind) {
        Some(profile) => profile.apply(grid),
        None => Ok(grid.clone()),
    }
}

/// Elevation multiplier for meshes deformed by `kind`; `Base` uses `fallback`
pub fn height_modifier_for(kind: DeformationKind, fallback: HeightModifier) -> HeightModifier {
    profile_for(kind).map_or(fallback, |profile| profile.height_modifier_or(fallback))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curve_interpolates_and_clamps() {
        let curve = DeformationCurve::new(vec![(1.0, 0.0), (0.0, 1.0)]);
        assert_eq!(curve.evaluate(-0.5), 1.0);
        assert_eq!(curve.evaluate(0.25), 0.75);
        assert_eq!(curve.evaluate(2.0), 0.0);
    }

    #[test]
    fn test_empty_curve_is_zero() {
        let curve = DeformationCurve::default();
        assert_eq!(curve.evaluate(0.0), 0.0);
        assert_eq!(curve.evaluate(0.7), 0.0);
    }

    #[test]
    fn test_base_leaves_grid_untouched() {
        let grid = HeightGrid::from_fn(6, 4, |x, y| (x + y) as f32 / 10.0).unwrap();
        assert!(profile_for(DeformationKind::Base).is_none());
        assert_eq!(deform(&grid, DeformationKind::Base).unwrap(), grid);
    }

    #[test]
    fn test_valley_lowers_the_middle() {
        let grid = HeightGrid::create_flat(20, 10, 0.8).unwrap();
        let deformed = deform(&grid, DeformationKind::Valley).unwrap();

        let edge = deformed.get(0, 5).unwrap();
        let middle = deformed.get(10, 5).unwrap();
        assert_eq!(edge, 0.8);
        assert!(middle < 0.2, "middle sample {middle} should be sunk");
    }

    #[test]
    fn test_pass_raises_a_ridge_across_the_valley() {
        let grid = HeightGrid::create_flat(20, 20, 0.8).unwrap();
        let valley = deform(&grid, DeformationKind::Valley).unwrap();
        let pass = deform(&grid, DeformationKind::Pass).unwrap();

        assert!(pass.get(10, 10).unwrap() > valley.get(10, 10).unwrap());
        assert_eq!(pass.get(10, 0), valley.get(10, 0));
    }

    #[test]
    fn test_results_clamped_to_unit_range() {
        let profile = DeformationProfile {
            name: "boost".to_string(),
            height_modifier: None,
            curve_x: DeformationCurve::constant(3.0),
            curve_y: DeformationCurve::constant(0.0),
        };
        let grid = HeightGrid::new(3, 1, vec![0.1, 0.5, 0.0]).unwrap();
        let deformed = profile.apply(&grid).unwrap();
        assert_eq!(deformed.samples()[1], 1.0);
        assert_eq!(deformed.samples()[2], 0.0);
        assert!((deformed.samples()[0] - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_presets_carry_their_own_height_modifier() {
        let fallback = HeightModifier::new(10.0);
        assert_eq!(height_modifier_for(DeformationKind::Base, fallback), fallback);
        assert_eq!(
            height_modifier_for(DeformationKind::Valley, fallback),
            HeightModifier::new(15.0)
        );
        assert_eq!(
            height_modifier_for(DeformationKind::Pass, fallback),
            HeightModifier::new(20.0)
        );

        let custom = DeformationProfile {
            name: "plain".to_string(),
            height_modifier: None,
            curve_x: DeformationCurve::constant(1.0),
            curve_y: DeformationCurve::constant(1.0),
        };
        assert_eq!(custom.height_modifier_or(fallback), fallback);
    }
}
