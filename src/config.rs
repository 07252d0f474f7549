use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::telemetry::caption_path_for;

const DEFAULT_FFMPEG: &str = "ffmpeg";
const DEFAULT_FPS: u32 = 1;
const DEFAULT_VIDEO_BITRATE: &str = "5000k";
const DEFAULT_SCALE_FLAGS: &str = "bilinear";
const DEFAULT_OUTPUT_SUBDIR: &str = "images";
const DEFAULT_CAPTION_EXTENSION: &str = "SRT";
const DEFAULT_GCP_OUTPUT: &str = "gcp_list.txt";
const DEFAULT_TAG_FAMILY: &str = "tag36h11";

#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    transcode: Option<TranscodeConfigFile>,
    stills: Option<StillsConfigFile>,
    gcp: Option<GcpConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct TranscodeConfigFile {
    program: Option<String>,
    fps: Option<u32>,
    video_bitrate: Option<String>,
    scale_flags: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct StillsConfigFile {
    output_subdir: Option<String>,
    caption_extension: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct GcpConfigFile {
    tag_family: Option<String>,
    output_file: Option<PathBuf>,
}

/// How the external transcoder is invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeSettings {
    pub program: String,
    pub fps: u32,
    pub video_bitrate: String,
    pub scale_flags: String,
}

impl Default for TranscodeSettings {
    fn default() -> Self {
        Self {
            program: DEFAULT_FFMPEG.to_string(),
            fps: DEFAULT_FPS,
            video_bitrate: DEFAULT_VIDEO_BITRATE.to_string(),
            scale_flags: DEFAULT_SCALE_FLAGS.to_string(),
        }
    }
}

/// Command-line values that take precedence over file and environment.
#[derive(Debug, Clone, Default)]
pub struct TranscodeOverrides {
    pub program: Option<String>,
    pub fps: Option<u32>,
    pub video_bitrate: Option<String>,
}

/// Validated settings for the video-to-stills pipeline.
#[derive(Debug, Clone)]
pub struct StillsConfig {
    pub video_path: PathBuf,
    pub caption_path: PathBuf,
    pub output_dir: PathBuf,
    pub transcode: TranscodeSettings,
}

impl StillsConfig {
    pub fn load(video_path: impl Into<PathBuf>, overrides: &TranscodeOverrides) -> Result<Self> {
        let file_cfg = read_config_from_env()?;
        let mut cfg = Self::from_file(video_path.into(), file_cfg);
        cfg.apply_env()?;
        cfg.apply_overrides(overrides);
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(video_path: PathBuf, file: ConfigFile) -> Self {
        let stills = file.stills.unwrap_or_default();
        let transcode = file.transcode.unwrap_or_default();
        let caption_extension = stills
            .caption_extension
            .unwrap_or_else(|| DEFAULT_CAPTION_EXTENSION.to_string());
        let output_subdir = stills
            .output_subdir
            .unwrap_or_else(|| DEFAULT_OUTPUT_SUBDIR.to_string());

        let caption_path = caption_path_for(&video_path, &caption_extension);
        let output_dir = video_path
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(output_subdir);
        let defaults = TranscodeSettings::default();
        Self {
            video_path,
            caption_path,
            output_dir,
            transcode: TranscodeSettings {
                program: transcode.program.unwrap_or(defaults.program),
                fps: transcode.fps.unwrap_or(defaults.fps),
                video_bitrate: transcode.video_bitrate.unwrap_or(defaults.video_bitrate),
                scale_flags: transcode.scale_flags.unwrap_or(defaults.scale_flags),
            },
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Some(program) = non_empty_env("DRONEGCP_FFMPEG") {
            self.transcode.program = program;
        }
        if let Some(fps) = non_empty_env("DRONEGCP_FPS") {
            self.transcode.fps = fps.parse().map_err(|_| {
                Error::Config("DRONEGCP_FPS must be a whole number of frames per second".into())
            })?;
        }
        if let Some(bitrate) = non_empty_env("DRONEGCP_VIDEO_BITRATE") {
            self.transcode.video_bitrate = bitrate;
        }
        Ok(())
    }

    fn apply_overrides(&mut self, overrides: &TranscodeOverrides) {
        if let Some(program) = &overrides.program {
            self.transcode.program = program.clone();
        }
        if let Some(fps) = overrides.fps {
            self.transcode.fps = fps;
        }
        if let Some(bitrate) = &overrides.video_bitrate {
            self.transcode.video_bitrate = bitrate.clone();
        }
    }

    fn validate(&self) -> Result<()> {
        if !self.video_path.is_file() {
            return Err(Error::MissingInputFile {
                what: "video (MOV) file",
                path: self.video_path.clone(),
            });
        }
        if !self.caption_path.is_file() {
            return Err(Error::MissingInputFile {
                what: "subtitle file (it must share the video's directory and base name)",
                path: self.caption_path.clone(),
            });
        }
        if self.transcode.fps == 0 {
            return Err(Error::Usage("frame rate must be greater than zero".into()));
        }
        if self.transcode.video_bitrate.trim().is_empty() {
            return Err(Error::Usage("video bitrate must not be empty".into()));
        }
        if self.transcode.program.trim().is_empty() {
            return Err(Error::Usage("transcoder program must not be empty".into()));
        }
        Ok(())
    }
}

/// Validated settings for the GCP detection pipeline.
#[derive(Debug, Clone)]
pub struct GcpConfig {
    pub image_dir: PathBuf,
    pub definitions_path: PathBuf,
    pub output_path: PathBuf,
    pub tag_family: String,
}

impl GcpConfig {
    pub fn load(
        image_dir: impl Into<PathBuf>,
        definitions_path: impl Into<PathBuf>,
        output_path: Option<PathBuf>,
        tag_family: Option<String>,
    ) -> Result<Self> {
        let file_cfg = read_config_from_env()?;
        let gcp = file_cfg.gcp.unwrap_or_default();
        let mut cfg = Self {
            image_dir: image_dir.into(),
            definitions_path: definitions_path.into(),
            output_path: gcp
                .output_file
                .unwrap_or_else(|| PathBuf::from(DEFAULT_GCP_OUTPUT)),
            tag_family: gcp
                .tag_family
                .unwrap_or_else(|| DEFAULT_TAG_FAMILY.to_string()),
        };
        if let Some(family) = non_empty_env("DRONEGCP_TAG_FAMILY") {
            cfg.tag_family = family;
        }
        if let Some(path) = output_path {
            cfg.output_path = path;
        }
        if let Some(family) = tag_family {
            cfg.tag_family = family;
        }
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        if !self.image_dir.is_dir() {
            return Err(Error::MissingInputFile {
                what: "image folder",
                path: self.image_dir.clone(),
            });
        }
        if !self.definitions_path.is_file() {
            return Err(Error::MissingInputFile {
                what: "gcp locations file",
                path: self.definitions_path.clone(),
            });
        }
        if self.tag_family.trim().is_empty() {
            return Err(Error::Usage("tag family must not be empty".into()));
        }
        Ok(())
    }
}

fn read_config_from_env() -> Result<ConfigFile> {
    match non_empty_env("DRONEGCP_CONFIG") {
        Some(path) => read_config_file(Path::new(&path)),
        None => Ok(ConfigFile::default()),
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("failed to read config file {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&raw)
        .map_err(|e| Error::Config(format!("invalid config file {}: {}", path.display(), e)))
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
}
