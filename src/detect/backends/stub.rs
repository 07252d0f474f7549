use std::collections::VecDeque;

use image::GrayImage;

use crate::detect::backend::TagDetector;
use crate::detect::result::RawDetection;
use crate::error::{Error, Result};

/// Stub backend for testing. Replays scripted detections, one batch per call.
///
/// A `None` batch simulates a detector failure on that image. Once the script
/// runs out every further image yields no detections.
#[derive(Default)]
pub struct StubBackend {
    script: VecDeque<Option<Vec<RawDetection>>>,
    calls: usize,
}

impl StubBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scripted<I>(batches: I) -> Self
    where
        I: IntoIterator<Item = Vec<RawDetection>>,
    {
        Self {
            script: batches.into_iter().map(Some).collect(),
            calls: 0,
        }
    }

    /// Queue a failure for the next image.
    pub fn then_fail(mut self) -> Self {
        self.script.push_back(None);
        self
    }

    /// Queue a batch for the next image.
    pub fn then(mut self, batch: Vec<RawDetection>) -> Self {
        self.script.push_back(Some(batch));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl TagDetector for StubBackend {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn detect(&mut self, _image: &GrayImage) -> Result<Vec<RawDetection>> {
        self.calls += 1;
        match self.script.pop_front() {
            Some(Some(batch)) => Ok(batch),
            Some(None) => Err(Error::Detector {
                backend: self.name(),
                reason: format!("scripted failure on call {}", self.calls),
            }),
            None => Ok(Vec::new()),
        }
    }
}
