use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use shotmark::config::{DEFAULT_KERNEL_SIZE, DEFAULT_MARGIN, DEFAULT_TARGET_WIDTH};
use shotmark::listing::list_dir;
use shotmark::{DetectError, DetectionConfig, DetectionPipeline, FixedClicks, Measurement, PixelPoint};

#[derive(Parser)]
#[command(name = "shotmark")]
#[command(about = "Locate a colored circular target in a photograph")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List candidate images (hidden entries are skipped)
    Ls {
        #[arg(value_name = "DIR", default_value = "origin")]
        dir: PathBuf,
    },

    /// Measure the target and background circles in one image
    Measure(MeasureArgs),
}

#[derive(Args)]
struct MeasureArgs {
    /// Path to input image file
    #[arg(value_name = "IMAGE", default_value = "origin/image1.JPG")]
    image_path: PathBuf,

    /// Background sample point in the scaled image, as X,Y
    #[arg(long, value_name = "X,Y")]
    background: Option<PixelPoint>,

    /// Target sample point in the scaled image, as X,Y
    #[arg(long, value_name = "X,Y")]
    target: Option<PixelPoint>,

    /// Threshold half-width in each HSV channel
    #[arg(long, default_value_t = DEFAULT_MARGIN)]
    margin: u8,

    /// Width every image is scaled to before processing
    #[arg(long, default_value_t = DEFAULT_TARGET_WIDTH)]
    target_width: u32,

    /// Side of the square noise-removal kernel
    #[arg(long, default_value_t = DEFAULT_KERNEL_SIZE)]
    kernel_size: u8,

    /// Save stage previews to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,

    /// Print the measurement as JSON
    #[arg(long)]
    json: bool,

    /// Pick the sample points in a window
    #[cfg(feature = "gui")]
    #[arg(long)]
    interactive: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        None => ls(Path::new("origin")),
        Some(Commands::Ls { dir }) => ls(&dir),
        Some(Commands::Measure(measure_args)) => measure(measure_args, args.verbose),
    }
}

fn ls(dir: &Path) -> anyhow::Result<()> {
    for name in list_dir(dir)? {
        println!("{}", name);
    }
    Ok(())
}

fn measure(args: MeasureArgs, verbose: bool) -> anyhow::Result<()> {
    let config = DetectionConfig::new()
        .with_margin(args.margin)
        .with_target_width(args.target_width)
        .with_kernel_size(args.kernel_size);

    let mut pipeline = DetectionPipeline::new()
        .with_config(config)
        .with_verbose(verbose);
    if let Some(debug_dir) = args.debug_out {
        pipeline = pipeline.with_debug(debug_dir)?;
    }

    // An unreadable image is reported, not fatal
    let image = match pipeline.load(&args.image_path) {
        Ok(image) => image,
        Err(e @ DetectError::ImageNotFound { .. }) => {
            println!("{}", e);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    #[cfg(feature = "gui")]
    {
        if args.interactive {
            return match shotmark::gui::run(pipeline, image)? {
                Some(measurement) => report(&measurement, args.json),
                None => {
                    println!("No measurement taken.");
                    Ok(())
                }
            };
        }
    }

    let (Some(background), Some(target)) = (args.background, args.target) else {
        anyhow::bail!("--background X,Y and --target X,Y are required");
    };

    let mut clicks = FixedClicks::background_then_target(background, target);
    match pipeline.measure(&image, &mut clicks) {
        Ok(measurement) => report(&measurement, args.json),
        Err(e @ DetectError::NoContour { .. }) => {
            println!("{}", e);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn report(measurement: &Measurement, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(measurement)?);
        return Ok(());
    }

    println!("background color: {}", measurement.colors.background);
    println!("target color: {}", measurement.colors.target);

    let target = &measurement.target;
    println!("\n=== Target ===");
    println!(
        "contour {} of {} (area {:.1})",
        target.index, target.contour_count, target.area
    );
    println!(
        "center ({:.1}, {:.1}) radius {:.1}",
        target.circle.center.0, target.circle.center.1, target.circle.radius
    );

    println!("\n=== Background ===");
    println!("Total contours: {}", measurement.background.len());
    for (i, circle) in measurement.background.circles().enumerate() {
        println!(
            "  Circle {} at ({:.1}, {:.1}) - radius: {:.1}",
            i + 1,
            circle.center.0,
            circle.center.1,
            circle.radius
        );
    }

    Ok(())
}
