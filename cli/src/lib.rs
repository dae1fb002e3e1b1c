use std::{
    ffi::OsString,
    io::Write,
    path::PathBuf,
};

use clap::Parser;
use color_eyre::eyre::Result;
use rectscan::{AccumulatorScope, BatchScanner, Detector, DetectorConfig, FileOverlaySink};
use tracing::{info, warn};

/// Printed when no image paths are given
pub const USAGE: &str = "usage: rectscan [-w|--windows] <image-path>...\n  \
-w, --windows  write an overlay of the detected rectangles for every image\n";

/// Find rectangles in images and print them as JSON
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Render overlays of the detected rectangles
    #[arg(short, long)]
    pub windows: bool,

    /// Directory overlays are written to
    #[arg(long, default_value = "overlays")]
    pub overlay_dir: PathBuf,

    /// Detector configuration (.toml or .json)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of threshold levels per channel
    #[arg(long)]
    pub levels: Option<u32>,

    /// Reset the rectangle list before each image
    #[arg(long)]
    pub per_image: bool,

    /// Identify the sheet of paper among each image's rectangles
    #[arg(long)]
    pub paper: bool,

    /// Write a flattened copy of each identified sheet of paper here (implies --paper)
    #[arg(long)]
    pub rectify_dir: Option<PathBuf>,

    /// Write all rectangles to a GeoJSON file after the batch
    #[arg(long)]
    pub geojson: Option<PathBuf>,

    /// Print the configuration JSON schema and exit
    #[arg(long)]
    pub print_schema: bool,

    /// Images to scan, in order
    pub paths: Vec<PathBuf>,
}

impl Cli {
    /// Configuration file (if any) with command line overrides applied
    pub fn detector_config(&self) -> rectscan::Result<DetectorConfig> {
        let mut config = match &self.config {
            Some(path) => DetectorConfig::from_file(path)?,
            None => DetectorConfig::default(),
        };

        if let Some(levels) = self.levels {
            config.threshold_levels = levels;
        }
        if self.per_image {
            config.accumulator_scope = AccumulatorScope::Image;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Parse command line arguments. Parse failures and `--help`/`--version` are
/// printed by clap and yield `None`, so the caller can still exit cleanly.
pub fn parse_args<I, T>(args: I) -> Option<Cli>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => Some(cli),
        Err(e) => {
            if let Err(io) = e.print() {
                warn!(error = %io, "failed to print argument error");
            }
            None
        }
    }
}

/// Run one invocation, writing usage, schema or reports to `out`
pub fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<()> {
    if cli.print_schema {
        let schema = DetectorConfig::schema();
        writeln!(out, "{}", serde_json::to_string_pretty(&schema)?)?;
        return Ok(());
    }

    if cli.paths.is_empty() {
        write!(out, "{}", USAGE)?;
        out.flush()?;
        return Ok(());
    }

    let config = cli.detector_config()?;
    let detector = Detector::builder().with_config(config).build()?;
    info!("{}", detector.info());

    let mut scanner = BatchScanner::new(detector).with_paper_detection(cli.paper);
    if cli.windows {
        match FileOverlaySink::create(&cli.overlay_dir) {
            Ok(sink) => {
                info!(dir = %sink.dir().display(), "writing overlays");
                scanner = scanner.with_overlay_sink(sink);
            }
            Err(e) => warn!(error = %e, "overlays disabled"),
        }
    }
    if let Some(dir) = &cli.rectify_dir {
        match FileOverlaySink::create(dir) {
            Ok(sink) => {
                info!(dir = %sink.dir().display(), "writing rectified paper");
                scanner = scanner.with_rectified_sink(sink);
            }
            Err(e) => warn!(error = %e, "paper rectification disabled"),
        }
    }

    let summary = scanner.run(&cli.paths, out)?;
    info!(
        processed = summary.processed,
        unreadable = summary.unreadable,
        candidates = summary.candidates,
        "batch complete"
    );

    if let Some(path) = &cli.geojson {
        scanner.accumulator().save_geojson(path)?;
        info!(path = %path.display(), "saved GeoJSON");
    }

    Ok(())
}
