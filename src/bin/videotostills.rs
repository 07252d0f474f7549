//! videotostills - extract geotagged stills from a drone video
//!
//! Needs `DJI_0123.MOV` and its caption track `DJI_0123.SRT` in the same
//! directory (enable video captions in the flight app to record it). Frames
//! are written at a fixed rate to an `images/` folder beside the video, each
//! with the caption's date and GPS position in its EXIF block.

use anyhow::Result;
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;

use dronegcp::geotag::list_frames;
use dronegcp::telemetry::load_records;
use dronegcp::{FrameExtractor, GeotagWriter, StillsConfig, TranscodeOverrides};

#[path = "../ui.rs"]
mod ui;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to the video file (e.g. DJI_0123.MOV).
    video: PathBuf,
    /// Frames extracted per second of video.
    #[arg(long)]
    fps: Option<u32>,
    /// Target video bitrate passed to the transcoder.
    #[arg(long, value_name = "RATE")]
    video_bitrate: Option<String>,
    /// Transcoder executable.
    #[arg(long, value_name = "PATH")]
    ffmpeg: Option<String>,
    /// UI mode for stderr progress (auto|plain|pretty)
    #[arg(long, default_value = "auto", value_name = "MODE")]
    ui: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let ui = ui::Ui::from_flag(&args.ui, std::io::stderr().is_terminal());

    let overrides = TranscodeOverrides {
        program: args.ffmpeg,
        fps: args.fps,
        video_bitrate: args.video_bitrate,
    };
    let cfg = StillsConfig::load(args.video, &overrides)?;

    let records = {
        let _stage = ui.stage("Parse captions");
        load_records(&cfg.caption_path)?
    };

    {
        let _stage = ui.stage("Extract frames");
        FrameExtractor::new(cfg.transcode.clone()).extract(&cfg.video_path, &cfg.output_dir)?;
    }

    let frames = list_frames(&cfg.output_dir)?;
    let written = {
        let _stage = ui.stage("Write geotags");
        let bar = ui.progress(frames.len().min(records.len()), "geotag");
        let written = GeotagWriter::new().apply_with(&frames, &records, |_| bar.inc(1))?;
        bar.finish_and_clear();
        written
    };

    println!(
        "tagged {} of {} frames in {}",
        written,
        frames.len(),
        cfg.output_dir.display()
    );
    Ok(())
}
