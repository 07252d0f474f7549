//! detectgcp - find AprilTag ground control points in a folder of images
//!
//! Joins every detected tag against a surveyed locations file and writes one
//! line per observation (`<world coords> <px> <py> <image>`) below the
//! locations file's header. Tags without a surveyed location are reported.

use anyhow::Result;
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;

use dronegcp::gcp::list_images;
use dronegcp::{GcpConfig, GcpTable, ImageScanner, ReportWriter, TagDetector};

#[path = "../ui.rs"]
mod ui;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Folder of images to search.
    image_folder: PathBuf,
    /// Surveyed locations: header line, then `<tag name> <coords...>` lines.
    gcp_locations: PathBuf,
    /// Output listing (default: gcp_list.txt).
    output_file: Option<PathBuf>,
    /// AprilTag family to detect (default: tag36h11).
    #[arg(long)]
    family: Option<String>,
    /// UI mode for stderr progress (auto|plain|pretty)
    #[arg(long, default_value = "auto", value_name = "MODE")]
    ui: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let ui = ui::Ui::from_flag(&args.ui, std::io::stderr().is_terminal());

    let cfg = GcpConfig::load(
        args.image_folder,
        args.gcp_locations,
        args.output_file,
        args.family,
    )?;

    let table = {
        let _stage = ui.stage("Load gcp locations");
        GcpTable::load(&cfg.definitions_path)?
    };
    let mut detector = build_detector(&cfg.tag_family)?;
    log::info!("using {} detector", detector.name());

    let paths = list_images(&cfg.image_dir)?;
    let result = {
        let _stage = ui.stage("Detect tags");
        let bar = ui.progress(paths.len(), "scan");
        let result =
            ImageScanner::new(detector.as_mut()).scan_with(&paths, &table, |_| bar.inc(1));
        bar.finish_and_clear();
        result
    };

    let report = ReportWriter::new(&table, &result);
    println!();
    print!("{}", report.render_summary());

    let written = report.write_listing(&cfg.output_path)?;
    println!(
        "wrote {} observations to {}",
        written,
        cfg.output_path.display()
    );
    Ok(())
}

#[cfg(feature = "detect-apriltag")]
fn build_detector(family: &str) -> Result<Box<dyn TagDetector>> {
    Ok(Box::new(dronegcp::detect::AprilTagBackend::new(family)?))
}

#[cfg(not(feature = "detect-apriltag"))]
fn build_detector(family: &str) -> Result<Box<dyn TagDetector>> {
    Err(anyhow::anyhow!(
        "detecting {} tags requires the detect-apriltag feature",
        family
    ))
}
