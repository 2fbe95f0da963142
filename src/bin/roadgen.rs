use clap::Parser;
use roadbed::config::range_types::{HeightModifier, SampleScale};
use roadbed::config::{RoadConfig, load_config, load_config_from};
use roadbed::errors::{RoadError, RoadResult};
use roadbed::map::{HeightGrid, format_percent_rows};
use roadbed::terrain::road_generator::{RoadGenerator, RoadOutcome};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod roadgen {
    pub mod cli_utils;
}

use roadgen::cli_utils::*;

#[derive(Parser, Clone)]
#[command(name = "roadgen")]
#[command(about = "Route a road across a height grid and carve it into the terrain")]
struct Args {
    /// Input height data: a .bin grid or a grayscale .png/.jpg heightmap
    input: PathBuf,

    /// Where to write the carved grid (.bin)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Config file to use instead of the user config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keep every Nth cell per axis when searching
    #[arg(long)]
    decimation: Option<usize>,

    /// Half-width of the leveled band around the road
    #[arg(long)]
    smooth_radius: Option<usize>,

    /// Use every Nth path vertex as a spline control point
    #[arg(long)]
    node_density: Option<usize>,

    /// Road mode (routed, strip)
    #[arg(long)]
    mode: Option<String>,

    /// Deformation preset (base, valley, pass)
    #[arg(long)]
    deformation: Option<String>,

    /// Elevation multiplier for deformations without their own (base)
    #[arg(long)]
    height_modifier: Option<f32>,

    /// Multiplier for image luma when importing a heightmap
    #[arg(long, default_value = "1.0")]
    sample_scale: f32,

    /// Entry cell on the decimated grid (format: X,Y)
    #[arg(long)]
    start: Option<String>,

    /// Exit cell on the decimated grid (format: X,Y)
    #[arg(long)]
    goal: Option<String>,

    /// Give up the search after this many expansions
    #[arg(long)]
    max_expansions: Option<usize>,

    /// Log the input grid as percentage rows at debug level
    #[arg(long)]
    dump: bool,
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn main() -> RoadResult<()> {
    init_logging();
    let args = Args::parse();

    if let Some(output) = &args.output {
        validate_output_path(output)?;
    }

    let config = build_config(&args)?;
    let grid = load_grid(&args.input, SampleScale::new(args.sample_scale))?;
    info!(
        "Loaded {}x{} grid from {}",
        grid.width(),
        grid.height(),
        args.input.display()
    );

    if args.dump {
        for row in format_percent_rows(&grid.to_percent_rows()) {
            debug!("{row}");
        }
    }

    let mut generator = RoadGenerator::new(config)?;
    match (&args.start, &args.goal) {
        (Some(start), Some(goal)) => {
            generator = generator.with_endpoints(parse_point(start)?, parse_point(goal)?);
        }
        (None, None) => {}
        _ => {
            return Err(RoadError::InvalidConfig {
                reason: "--start and --goal must be given together".to_string(),
            });
        }
    }

    let (vertices, outcome) = generator.generate(&grid)?;

    if let Some(output) = &args.output {
        vertices
            .to_height_grid(generator.height_modifier())?
            .save_to_file(output)?;
        info!("Carved grid saved to {}", output.display());
    }

    print_summary(generator.config(), generator.height_modifier(), &outcome);
    Ok(())
}

/// Start from the config file (or user config) and apply command-line overrides
fn build_config(args: &Args) -> RoadResult<RoadConfig> {
    let mut config = match &args.config {
        Some(path) => load_config_from(path)?,
        None => load_config(),
    };

    if let Some(decimation) = args.decimation {
        config.decimation_factor = decimation;
    }
    if let Some(radius) = args.smooth_radius {
        config.smooth_radius = radius;
    }
    if let Some(density) = args.node_density {
        config.road_node_density = density;
    }
    if let Some(mode) = &args.mode {
        config.mode = parse_road_mode(mode)?;
    }
    if let Some(kind) = &args.deformation {
        config.deformation = parse_deformation_kind(kind)?;
    }
    if let Some(modifier) = args.height_modifier {
        config.height_modifier = HeightModifier::new(modifier);
    }
    if args.max_expansions.is_some() {
        config.max_expansions = args.max_expansions;
    }

    config.validated()
}

fn load_grid(path: &Path, scale: SampleScale) -> RoadResult<HeightGrid> {
    match detect_input_format(path)? {
        InputFormat::Grid => HeightGrid::load_from_file(path),
        InputFormat::Image => HeightGrid::from_image(path, scale),
    }
}

fn print_summary(config: &RoadConfig, height_modifier: HeightModifier, outcome: &RoadOutcome) {
    println!("Road summary:");
    println!("  Mode: {:?}", outcome.mode);
    println!(
        "  Decimation: {}, smooth radius: {}, node density: {}",
        config.decimation_factor, config.smooth_radius, config.road_node_density
    );
    println!(
        "  Deformation: {:?} (height modifier {})",
        config.deformation, height_modifier
    );

    match (outcome.path.first(), outcome.path.last()) {
        (Some(first), Some(last)) => {
            println!(
                "  Path: {} cells from {} to {}",
                outcome.path.len(),
                first,
                last
            );
        }
        _ if outcome.nodes_explored > 0 => println!("  Path: none found"),
        _ => {}
    }
    if let Some(cost) = outcome.total_cost {
        println!("  Cost: {cost:.2}");
    }
    if outcome.nodes_explored > 0 {
        println!("  Expanded cells: {}", outcome.nodes_explored);
    }
    if let Some(report) = &outcome.carve {
        println!(
            "  Centerline: {} control points, {} samples",
            report.control_points.len(),
            report.centerline.len()
        );
    }
    println!("  Leveled vertices: {}", outcome.leveled_vertices);
}
