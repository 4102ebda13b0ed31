//! Application Configuration
//!
//! Geometry, recognition and placement settings stored in TOML format.

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::geometry::{ClampPolicy, DEFAULT_MARGIN, DEFAULT_MIN_BOX_SIZE, DEFAULT_RESIZE_MARGIN};
use crate::overlay::BannerConfig;
use crate::vision::VisionConfig;

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// ROI geometry settings
    pub geometry: GeometryConfig,
    /// Recognition settings
    pub vision: VisionSettings,
    /// Annotation placement settings
    pub placement: PlacementConfig,
}

impl AppConfig {
    /// Constraints for gestures on the ROI
    pub fn clamp_policy(&self) -> ClampPolicy {
        ClampPolicy::new(self.geometry.margin, self.geometry.min_box_size)
    }

    /// Constraints for re-fitting the ROI after a container size change
    pub fn resize_policy(&self) -> ClampPolicy {
        ClampPolicy::new(self.geometry.resize_margin, self.geometry.min_box_size)
    }

    pub fn vision_config(&self) -> VisionConfig {
        VisionConfig {
            confidence_threshold: self.vision.confidence_threshold,
            crop_inset: self.vision.crop_inset,
            min_crop_dimension: self.vision.min_crop_dimension,
        }
    }

    pub fn banner_config(&self) -> BannerConfig {
        BannerConfig {
            max_banners: self.placement.max_banners,
            default_duration_ms: self.placement.failure_banner_ms,
        }
    }

    /// Reject values the geometry and placement code cannot work with
    pub fn validate(&self) -> Result<()> {
        let g = &self.geometry;
        ensure!(g.margin.is_finite() && g.margin >= 0.0, "geometry.margin must be >= 0");
        ensure!(
            g.resize_margin.is_finite() && g.resize_margin >= 0.0,
            "geometry.resize_margin must be >= 0"
        );
        ensure!(
            g.min_box_size.is_finite() && g.min_box_size > 0.0,
            "geometry.min_box_size must be > 0"
        );
        ensure!(
            g.initial_box_size.is_finite() && g.initial_box_size >= g.min_box_size,
            "geometry.initial_box_size must be >= min_box_size"
        );

        let v = &self.vision;
        ensure!(
            (0.0..=1.0).contains(&v.confidence_threshold),
            "vision.confidence_threshold must be within 0.0 - 1.0"
        );
        ensure!(v.crop_inset.is_finite() && v.crop_inset >= 0.0, "vision.crop_inset must be >= 0");

        let p = &self.placement;
        ensure!(
            p.annotation_scale.is_finite() && p.annotation_scale > 0.0,
            "placement.annotation_scale must be positive"
        );
        ensure!(p.max_banners > 0, "placement.max_banners must be at least 1");
        Ok(())
    }
}

/// ROI geometry settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Gap between the ROI and the screen edges during gestures
    pub margin: f32,
    /// Gap used when re-fitting after rotation
    pub resize_margin: f32,
    /// Minimum ROI side once a gesture ends
    pub min_box_size: f32,
    /// Touch radius around each corner handle
    pub handle_hit_radius: f32,
    /// Side of the ROI placed at startup
    pub initial_box_size: f32,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            margin: DEFAULT_MARGIN,
            resize_margin: DEFAULT_RESIZE_MARGIN,
            min_box_size: DEFAULT_MIN_BOX_SIZE,
            handle_hit_radius: 22.0,
            initial_box_size: 200.0,
        }
    }
}

/// Recognition settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionSettings {
    /// Minimum confidence for a detection (0.0 - 1.0)
    pub confidence_threshold: f32,
    /// Inward inset of the ROI before cropping
    pub crop_inset: f32,
    /// Smallest inset ROI side worth recognizing
    pub min_crop_dimension: f32,
}

impl Default for VisionSettings {
    fn default() -> Self {
        let defaults = VisionConfig::default();
        Self {
            confidence_threshold: defaults.confidence_threshold,
            crop_inset: defaults.crop_inset,
            min_crop_dimension: defaults.min_crop_dimension,
        }
    }
}

/// Annotation placement settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// How long a placement failure banner stays up, in milliseconds
    pub failure_banner_ms: u64,
    /// Uniform size multiplier for every annotation
    pub annotation_scale: f32,
    /// Maximum banners visible at once
    pub max_banners: usize,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            failure_banner_ms: 4000,
            annotation_scale: 1.0,
            max_banners: 3,
        }
    }
}

/// Load and validate configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {:?}", path))?;
    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config {:?}", path))?;
    config.validate()?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
