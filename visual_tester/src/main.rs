mod image_helper;

use anyhow::{Context, Result};
use clap::Parser;
use image_helper::DumpObserver;
use logo_vision::{DetectorConfig, Frame, Logo, LogoDetector, ParallelDetector};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "visual_tester")]
#[command(about = "Find two-tone logos in images and outline them")]
#[command(version)]
struct Cli {
    /// Images to search.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Directory for copies of the inputs with the logos outlined.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Detector configuration (JSON). Defaults to `config.json` next to the first input.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for PNG dumps of every intermediate pipeline stage.
    #[arg(long)]
    dump_dir: Option<PathBuf>,

    /// Log every pipeline stage.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    // --- 1. Configuration & Detector Setup ---
    let config = load_config(&cli)?;
    let detector = LogoDetector::new(config).context("invalid detector configuration")?;

    if let Some(dir) = &cli.output_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("cannot create output directory {}", dir.display()))?;
    }
    if let Some(dir) = &cli.dump_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("cannot create dump directory {}", dir.display()))?;
    }

    // --- 2. Image Loading ---
    let mut images = Vec::with_capacity(cli.inputs.len());
    for path in &cli.inputs {
        let image = image::open(path)
            .with_context(|| format!("failed to open image {}", path.display()))?
            .to_rgb8();
        info!(path = %path.display(), width = image.width(), height = image.height(), "loaded image");
        images.push(image);
    }

    // --- 3. Detection ---
    // Stage dumps need one observer per image, so they always run one by one.
    let results: Vec<Result<Vec<Logo>>> = if cli.inputs.len() > 1 && cli.dump_dir.is_none() {
        detect_in_parallel(detector, &images)?
    } else {
        cli.inputs
            .iter()
            .zip(&images)
            .map(|(path, image)| {
                let detector = match &cli.dump_dir {
                    Some(dir) => detector
                        .clone()
                        .with_observer(Arc::new(DumpObserver::new(dir, file_stem(path)))),
                    None => detector.clone(),
                };
                detector
                    .find_logos_in_image(image)
                    .map_err(anyhow::Error::from)
            })
            .collect()
    };

    // --- 4. Reporting & Visualization ---
    let show_names = cli.inputs.len() > 1;
    for ((path, mut image), result) in cli.inputs.iter().zip(images).zip(results) {
        let logos = match result {
            Ok(logos) => logos,
            Err(error) => {
                warn!(path = %path.display(), "detection failed: {error:#}");
                continue;
            }
        };

        if show_names {
            println!("{}", path.display());
        }
        print_logos(&logos);

        if let Some(dir) = &cli.output_dir {
            image_helper::draw_logos(&mut image, &logos);
            let target = output_path(dir, path);
            image
                .save(&target)
                .with_context(|| format!("failed to write {}", target.display()))?;
            info!(path = %target.display(), "saved annotated image");
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<DetectorConfig> {
    if let Some(path) = &cli.config {
        return DetectorConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()));
    }

    if let Some(first) = cli.inputs.first() {
        let sibling = DetectorConfig::sibling_path(first);
        if sibling.is_file() {
            info!(path = %sibling.display(), "using config next to the input");
            return DetectorConfig::from_json_file(&sibling)
                .with_context(|| format!("failed to load config {}", sibling.display()));
        }
    }

    info!("using built-in detector configuration");
    Ok(DetectorConfig::default())
}

fn detect_in_parallel(
    detector: LogoDetector,
    images: &[image::RgbImage],
) -> Result<Vec<Result<Vec<Logo>>>> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start the tokio runtime")?;

    let frames = images.iter().map(Frame::from_rgb_image).collect();
    let parallel = ParallelDetector::new(detector);
    let results = runtime.block_on(parallel.find_logos_in_batch(frames));

    Ok(results
        .into_iter()
        .map(|result| result.map_err(anyhow::Error::from))
        .collect())
}

fn print_logos(logos: &[Logo]) {
    println!("Found {} logos", logos.len());
    for logo in logos {
        println!("{} {} {} {}", logo.x, logo.y, logo.width, logo.height);
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string())
}

/// `<dir>/<input file name>`, switching to PNG when the input extension is unknown.
fn output_path(dir: &Path, input: &Path) -> PathBuf {
    let known = input
        .extension()
        .and_then(|ext| image::ImageFormat::from_extension(ext))
        .is_some();
    if known {
        if let Some(name) = input.file_name() {
            return dir.join(name);
        }
    }
    dir.join(format!("{}.png", file_stem(input)))
}
