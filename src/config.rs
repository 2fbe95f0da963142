pub mod range_types;

use crate::errors::{RoadError, RoadResult};
use crate::terrain::deformation::DeformationKind;
use range_types::HeightModifier;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use validator::{Validate, ValidationErrors};

/// How the generator shapes the road bed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoadMode {
    /// Search a path across the grid and carve it into the vertices
    #[default]
    Routed,
    /// Flatten a straight swath down the middle column, no search
    Strip,
}

/// Caller-supplied settings for one road generation pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
// NOTE: When adding new fields, update config.example.toml in the project root
pub struct RoadConfig {
    #[validate(range(min = 1, max = 64))]
    pub decimation_factor: usize,
    #[validate(range(max = 256))]
    pub smooth_radius: usize,
    #[validate(range(min = 1, max = 256))]
    pub road_node_density: usize,
    pub mode: RoadMode,
    pub deformation: DeformationKind,
    /// Used when the deformation profile has no multiplier of its own
    pub height_modifier: HeightModifier,
    /// Upper bound on search expansions; `None` searches to exhaustion
    #[validate(range(min = 1))]
    pub max_expansions: Option<usize>,
}

impl Default for RoadConfig {
    fn default() -> Self {
        Self {
            decimation_factor: 1,
            smooth_radius: 2,
            road_node_density: 1,
            mode: RoadMode::Routed,
            deformation: DeformationKind::Base,
            height_modifier: HeightModifier::default(),
            max_expansions: None,
        }
    }
}

impl RoadConfig {
    /// Validate and return the config, rejecting inconsistent values
    pub fn validated(self) -> RoadResult<Self> {
        self.validate().map_err(|errors| RoadError::InvalidConfig {
            reason: describe_validation_errors(&errors),
        })?;
        Ok(self)
    }
}

/// Flatten validator output into "field: message" pairs
pub(crate) fn describe_validation_errors(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            format!("{field}: {}", error_msgs.join(", "))
        })
        .collect::<Vec<String>>()
        .join("; ")
}

pub fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().and_then(|mut path| {
        path.push("roadbed");
        fs::create_dir_all(&path).ok()?;
        path.push("config.toml");
        Some(path)
    })
}

/// Load the user config, falling back to defaults when it is missing or unusable
pub fn load_config() -> RoadConfig {
    if let Some(config_path) = get_config_path() {
        if config_path.exists() {
            match load_config_from(&config_path) {
                Ok(config) => return config,
                Err(e) => warn!("Ignoring config at {}: {e}", config_path.display()),
            }
        }
    }
    RoadConfig::default()
}

/// Load and validate a config from an explicit path
pub fn load_config_from(path: &Path) -> RoadResult<RoadConfig> {
    if !path.exists() {
        return Err(RoadError::ConfigFileNotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = fs::read_to_string(path)?;
    let config = toml::from_str::<RoadConfig>(&contents)?.validated()?;
    debug!("Loaded road config from {}", path.display());
    Ok(config)
}

pub fn save_config(config: &RoadConfig) -> RoadResult<()> {
    let config_path = get_config_path().ok_or(RoadError::ConfigDirNotFound)?;
    let contents = toml::to_string_pretty(config)?;
    fs::write(config_path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = RoadConfig::default().validated().unwrap();
        assert_eq!(config.decimation_factor, 1);
        assert_eq!(config.road_node_density, 1);
        assert_eq!(config.mode, RoadMode::Routed);
        assert!(config.max_expansions.is_none());
    }

    #[test]
    fn test_zero_decimation_rejected() {
        let config = RoadConfig {
            decimation_factor: 0,
            ..RoadConfig::default()
        };
        let err = config.validated().unwrap_err();
        assert!(matches!(err, RoadError::InvalidConfig { .. }));
        assert!(err.to_string().contains("decimation_factor"));
    }

    #[test]
    fn test_zero_node_density_rejected() {
        let config = RoadConfig {
            road_node_density: 0,
            ..RoadConfig::default()
        };
        assert!(config.validated().is_err());
    }

    #[test]
    fn test_zero_expansion_limit_rejected() {
        let config = RoadConfig {
            max_expansions: Some(0),
            ..RoadConfig::default()
        };
        assert!(config.validated().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: RoadConfig = toml::from_str(
            r#"
            decimation_factor = 4
            mode = "strip"
            deformation = "valley"
            "#,
        )
        .unwrap();

        assert_eq!(config.decimation_factor, 4);
        assert_eq!(config.mode, RoadMode::Strip);
        assert_eq!(config.deformation, DeformationKind::Valley);
        assert_eq!(config.smooth_radius, 2);
        assert_eq!(config.height_modifier, HeightModifier::default());
    }

    #[test]
    fn test_load_missing_config_file() {
        let path = std::env::temp_dir().join("roadbed-definitely-missing.toml");
        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, RoadError::ConfigFileNotFound { .. }));
    }

    #[test]
    fn test_load_invalid_config_file() {
        let path = std::env::temp_dir().join(format!(
            "roadbed-invalid-{}.toml",
            std::process::id()
        ));
        fs::write(&path, "road_node_density = 0\n").unwrap();
        let result = load_config_from(&path);
        fs::remove_file(&path).ok();
        assert!(matches!(result, Err(RoadError::InvalidConfig { .. })));
    }
}
