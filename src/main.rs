use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

use ground_grid::{ConfigurationManager, GeoCoordinate, GroundGridView, OrientationReading, PositionFix, RecordingSurface};

/// Headless ground grid demo: simulates a short walk and prints the last frame
#[derive(Debug, Parser)]
#[command(name = "ground-grid", version)]
struct Args {
    /// JSON configuration file (defaults are used when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of frames to simulate
    #[arg(long, default_value_t = 90)]
    frames: u32,

    /// Starting latitude (degrees)
    #[arg(long, default_value_t = 47.6062, allow_negative_numbers = true)]
    lat: f64,

    /// Starting longitude (degrees)
    #[arg(long, default_value_t = -122.3321, allow_negative_numbers = true)]
    lng: f64,

    /// Surface width (pixels)
    #[arg(long, default_value_t = 800.0)]
    width: f64,

    /// Surface height (pixels)
    #[arg(long, default_value_t = 600.0)]
    height: f64,

    /// Output format for the final frame
    #[arg(long, value_enum, default_value_t = OutputFormat::Svg)]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Svg,
    Json,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ConfigurationManager::from_file(path)?.into_config(),
        None => ConfigurationManager::new().into_config(),
    };
    let frame_interval = Duration::from_secs_f64(config.frame_interval_s());

    let start = GeoCoordinate::new(args.lat, args.lng);
    let mut view = GroundGridView::new(config, start, args.width, args.height);
    let mut surface = RecordingSurface::new(args.width, args.height);

    // Walk north-east at ~1.4 m/s while slowly turning and raising the view.
    let step_deg = 1.4 / 111_195.0;
    let t0 = Instant::now();

    for frame in 0..args.frames {
        let elapsed = frame as f64 * frame_interval.as_secs_f64();

        if frame % 30 == 0 {
            let walked = step_deg * elapsed;
            view.update_true_position(
                PositionFix::new(start.latitude + walked, start.longitude + walked)
                    .with_speed(1.4)
                    .with_accuracy(5.0),
            );
        }

        let heading = 45.0 + 20.0 * (elapsed * 0.5).sin();
        let tilt = (elapsed * 15.0).min(70.0);
        view.update_orientation(OrientationReading::new(Some(heading), Some(tilt)));

        view.render_frame(t0 + frame_interval * frame, &mut surface);
    }

    let stats = view.last_frame_stats();
    tracing::info!(
        frames = view.frame_count(),
        drawn = stats.lines_drawn,
        clipped = stats.lines_clipped,
        culled = stats.lines_culled,
        marker = stats.marker_drawn,
        "simulation finished"
    );

    match args.format {
        OutputFormat::Svg => print!("{}", surface.to_svg()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&surface)?),
    }

    Ok(())
}
