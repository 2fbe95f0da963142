use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// Multiplier from normalized sample to vertex elevation, constrained to [0.0, 1000.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, From, Serialize, Deserialize)]
pub struct HeightModifier(f32);

impl HeightModifier {
    const MIN: f32 = 0.0;
    const MAX: f32 = 1000.0;

    pub fn new(value: f32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for HeightModifier {
    fn default() -> Self {
        Self::new(10.0)
    }
}

/// Multiplier applied to imported image luma, constrained to [0.01, 100.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, From, Serialize, Deserialize)]
pub struct SampleScale(f32);

impl SampleScale {
    const MIN: f32 = 0.01;
    const MAX: f32 = 100.0;

    pub fn new(value: f32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for SampleScale {
    fn default() -> Self {
        Self::new(1.0)
    }
}
