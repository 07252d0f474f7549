//! Frame extraction through the external `ffmpeg` binary.
//!
//! Frames are written as `%05d.jpg` starting at zero, so sorting the output
//! directory by filename yields extraction order.

use std::path::Path;
use std::process::{Command, Output};

use crate::config::TranscodeSettings;
use crate::error::{Error, Result};

pub const FRAME_PATTERN: &str = "%05d.jpg";
const START_NUMBER: u32 = 0;

pub struct FrameExtractor {
    settings: TranscodeSettings,
}

impl FrameExtractor {
    pub fn new(settings: TranscodeSettings) -> Self {
        Self { settings }
    }

    /// Builds the transcoder command line without running it.
    pub fn command(&self, video: &Path, output_dir: &Path) -> Command {
        let mut cmd = Command::new(&self.settings.program);
        cmd.arg("-hide_banner")
            .arg("-y")
            .arg("-i")
            .arg(video)
            .arg("-vf")
            .arg(format!("fps={}", self.settings.fps))
            .arg("-b:v")
            .arg(&self.settings.video_bitrate)
            .arg("-sws_flags")
            .arg(&self.settings.scale_flags)
            .arg("-start_number")
            .arg(START_NUMBER.to_string())
            .arg(output_dir.join(FRAME_PATTERN));
        cmd
    }

    /// Runs the transcoder, blocking until it exits.
    pub fn extract(&self, video: &Path, output_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(output_dir)?;
        log::info!(
            "extracting frames from {} at {} fps into {}",
            video.display(),
            self.settings.fps,
            output_dir.display()
        );
        let output = self
            .command(video, output_dir)
            .output()
            .map_err(|e| Error::ExternalToolFailure {
                tool: self.settings.program.clone(),
                status: format!("failed to spawn: {e}"),
                stdout: String::new(),
                stderr: String::new(),
            })?;
        self.check(output)
    }

    fn check(&self, output: Output) -> Result<()> {
        if output.status.success() {
            return Ok(());
        }
        Err(Error::ExternalToolFailure {
            tool: self.settings.program.clone(),
            status: output.status.to_string(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    #[test]
    fn command_uses_fixed_rate_and_bitrate() {
        let extractor = FrameExtractor::new(TranscodeSettings::default());
        let cmd = extractor.command(Path::new("DJI_0001.MOV"), Path::new("images"));

        assert_eq!(cmd.get_program(), OsStr::new("ffmpeg"));
        let args: Vec<String> = cmd
            .get_args()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();
        let expected_output = Path::new("images").join(FRAME_PATTERN);
        assert_eq!(
            args,
            vec![
                "-hide_banner",
                "-y",
                "-i",
                "DJI_0001.MOV",
                "-vf",
                "fps=1",
                "-b:v",
                "5000k",
                "-sws_flags",
                "bilinear",
                "-start_number",
                "0",
                expected_output.to_str().unwrap(),
            ]
        );
    }

    #[test]
    fn missing_program_is_an_external_tool_failure() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = FrameExtractor::new(TranscodeSettings {
            program: "dronegcp-no-such-transcoder".to_string(),
            ..TranscodeSettings::default()
        });
        let err = extractor
            .extract(Path::new("missing.MOV"), &dir.path().join("images"))
            .unwrap_err();
        assert!(matches!(err, Error::ExternalToolFailure { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_is_an_external_tool_failure() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = FrameExtractor::new(TranscodeSettings {
            program: "false".to_string(),
            ..TranscodeSettings::default()
        });
        match extractor.extract(Path::new("missing.MOV"), dir.path()) {
            Err(Error::ExternalToolFailure { tool, status, .. }) => {
                assert_eq!(tool, "false");
                assert!(status.contains('1'), "{status}");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
