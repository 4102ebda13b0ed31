//! Vision Layer
//!
//! Turns the on-screen ROI into the crop and normalized region handed to the
//! object/text recognizer, and applies the detection policy to its answer.
//! The recognizer itself is an external collaborator behind [`Recognizer`].

pub mod region;

pub use region::{
    inset_for_recognition, normalized_to_pixels, normalized_to_screen, to_normalized,
    NormalizedRegion, PixelRect,
};

use anyhow::Result;
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, trace, warn};

use crate::capture::{CameraFrame, ExifOrientation};
use crate::geometry::{Rect, Size};

/// Answers below this confidence count as "nothing detected"
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.5;

/// Label and confidence reported by a recognizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recognition {
    /// Detected object name or text
    pub label: String,
    /// Confidence score (0.0 - 1.0)
    pub confidence: f32,
}

/// Object/text classifier consuming a cropped camera image
pub trait Recognizer {
    /// Classify `crop`, which covers `region` of the full frame.
    ///
    /// `orientation` describes `crop` itself. `Ok(None)` means the back end
    /// found nothing.
    fn recognize(
        &mut self,
        crop: &RgbaImage,
        region: &NormalizedRegion,
        orientation: ExifOrientation,
    ) -> Result<Option<Recognition>>;
}

/// Result of running the pipeline on one frame
#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionOutcome {
    Detected(Recognition),
    NothingDetected,
    /// The ROI was too small to query; not an error
    Skipped,
}

impl RecognitionOutcome {
    pub fn label(&self) -> Option<&str> {
        match self {
            RecognitionOutcome::Detected(r) => Some(&r.label),
            _ => None,
        }
    }
}

/// Configuration for the recognition pipeline
#[derive(Debug, Clone)]
pub struct VisionConfig {
    /// Minimum confidence for a detection (0.0 - 1.0)
    pub confidence_threshold: f32,
    /// Inward inset applied to the ROI, in screen units
    pub crop_inset: f32,
    /// Smallest inset ROI side worth recognizing, in screen units
    pub min_crop_dimension: f32,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            crop_inset: region::DEFAULT_CROP_INSET,
            min_crop_dimension: region::DEFAULT_MIN_CROP_DIMENSION,
        }
    }
}

/// ROI-driven recognition over camera frames.
///
/// Assumes the camera image covers the same area as the screen.
pub struct RecognitionPipeline<R> {
    recognizer: R,
    config: VisionConfig,
}

impl<R: Recognizer> RecognitionPipeline<R> {
    pub fn new(recognizer: R) -> Self {
        Self::with_config(recognizer, VisionConfig::default())
    }

    pub fn with_config(recognizer: R, config: VisionConfig) -> Self {
        Self { recognizer, config }
    }

    pub fn config(&self) -> &VisionConfig {
        &self.config
    }

    pub fn recognizer(&self) -> &R {
        &self.recognizer
    }

    /// Region the recognizer would be asked about, or `None` when skipped
    pub fn query_region(&self, roi: &Rect, screen: Size) -> Option<NormalizedRegion> {
        let inset =
            inset_for_recognition(roi, self.config.crop_inset, self.config.min_crop_dimension)?;
        let region = to_normalized(&inset, screen);
        if region.is_empty() {
            return None;
        }
        Some(region)
    }

    /// Run recognition for `roi` on `frame`
    pub fn process(&mut self, frame: &CameraFrame, roi: &Rect, screen: Size) -> RecognitionOutcome {
        let Some(region) = self.query_region(roi, screen) else {
            return RecognitionOutcome::Skipped;
        };

        // The region is in screen space, so crop from the display-oriented pixels
        let upright = frame.upright_image();
        let (width, height) = upright.dimensions();
        let Some(crop) = normalized_to_pixels(&region, width, height) else {
            trace!(frame = frame.sequence, "empty pixel crop, skipping");
            return RecognitionOutcome::Skipped;
        };

        let start = Instant::now();
        let cropped =
            image::imageops::crop_imm(upright.as_ref(), crop.x, crop.y, crop.width, crop.height)
                .to_image();

        let answer = match self.recognizer.recognize(&cropped, &region, ExifOrientation::Up) {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Recognizer failed on frame {}: {:#}", frame.sequence, e);
                return RecognitionOutcome::NothingDetected;
            }
        };

        debug!(
            "Recognition on frame {} ({}x{} crop) complete in {:?}",
            frame.sequence,
            crop.width,
            crop.height,
            start.elapsed()
        );

        match answer {
            Some(r) if r.confidence >= self.config.confidence_threshold => {
                let label = r.label.trim();
                if label.is_empty() {
                    RecognitionOutcome::NothingDetected
                } else {
                    RecognitionOutcome::Detected(Recognition {
                        label: label.to_string(),
                        confidence: r.confidence,
                    })
                }
            }
            _ => RecognitionOutcome::NothingDetected,
        }
    }
}
