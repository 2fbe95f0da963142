use roadbed::config::RoadMode;
use roadbed::errors::{RoadError, RoadResult};
use roadbed::terrain::deformation::DeformationKind;
use std::path::Path;

/// How the input height data is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// bincode grid written by `HeightGrid::save_to_file`
    Grid,
    /// Grayscale image, one pixel per sample
    Image,
}

fn invalid(reason: String) -> RoadError {
    RoadError::InvalidConfig { reason }
}

/// Generic parser for delimited strings that return fixed-size arrays
pub fn parse_delimited<T, E, const N: usize>(
    input: &str,
    delimiter: char,
    type_name: &str,
    parser: impl Fn(&str) -> Result<T, E>,
) -> RoadResult<[T; N]>
where
    T: Copy + Default,
{
    let parts: Vec<&str> = input.split(delimiter).map(str::trim).collect();
    if parts.len() != N {
        return Err(invalid(format!(
            "Invalid {type_name} format '{input}'. Expected {N} {delimiter}-separated values"
        )));
    }

    let mut result = [T::default(); N];
    for (i, part) in parts.iter().enumerate() {
        result[i] = parser(part).map_err(|_| invalid(format!("Invalid {type_name} value: '{part}'")))?;
    }

    Ok(result)
}

/// Parse a decimated-grid cell "X,Y"
pub fn parse_point(point_str: &str) -> RoadResult<(i32, i32)> {
    let [x, y] = parse_delimited::<i32, _, 2>(point_str, ',', "point", |s| s.parse())?;
    if x < 0 || y < 0 {
        return Err(invalid(format!("Point '{point_str}' must not be negative")));
    }
    Ok((x, y))
}

pub fn parse_road_mode(mode_str: &str) -> RoadResult<RoadMode> {
    match mode_str.trim().to_ascii_lowercase().as_str() {
        "routed" => Ok(RoadMode::Routed),
        "strip" => Ok(RoadMode::Strip),
        other => Err(invalid(format!(
            "Unknown road mode '{other}'. Expected routed or strip"
        ))),
    }
}

pub fn parse_deformation_kind(kind_str: &str) -> RoadResult<DeformationKind> {
    match kind_str.trim().to_ascii_lowercase().as_str() {
        "base" => Ok(DeformationKind::Base),
        "valley" => Ok(DeformationKind::Valley),
        "pass" => Ok(DeformationKind::Pass),
        other => Err(invalid(format!(
            "Unknown deformation '{other}'. Expected base, valley or pass"
        ))),
    }
}

/// Pick the loader from the file extension
pub fn detect_input_format(path: &Path) -> RoadResult<InputFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("bin") => Ok(InputFormat::Grid),
        Some("png" | "jpg" | "jpeg") => Ok(InputFormat::Image),
        _ => Err(invalid(format!(
            "Cannot tell the format of '{}'. Use a .bin grid or a .png/.jpg heightmap",
            path.display()
        ))),
    }
}

/// Output is always a bincode grid; its directory must already exist
pub fn validate_output_path(path: &Path) -> RoadResult<()> {
    if path.extension().and_then(|ext| ext.to_str()) != Some("bin") {
        return Err(invalid(format!(
            "Output path must end in .bin, got: {}",
            path.display()
        )));
    }

    let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
    if let Some(parent) = parent.filter(|p| !p.is_dir()) {
        return Err(invalid(format!(
            "Output directory does not exist: {}",
            parent.display()
        )));
    }

    Ok(())
}
