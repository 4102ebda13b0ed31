//! Overlay Interaction Layer
//!
//! The ROI bounding box the user drags over the camera view, handle
//! hit-testing, and the transient banners shown when an action fails.

pub mod bounding_box;
pub mod handles;

pub use bounding_box::{
    BoundingBoxController, DragSession, DragTrack, GestureEvent, GesturePhase, HandlePosition,
};
pub use handles::hit_test;

use std::time::{Duration, Instant};
use tracing::debug;

/// What a banner is reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    /// Annotation placement failed; the add action is disabled while shown
    PlacementFailed,
}

/// Banner queue configuration
#[derive(Debug, Clone)]
pub struct BannerConfig {
    /// Maximum number of banners visible at once
    pub max_banners: usize,
    /// Banner lifetime in milliseconds
    pub default_duration_ms: u64,
}

impl Default for BannerConfig {
    fn default() -> Self {
        Self {
            max_banners: 3,
            default_duration_ms: 4000,
        }
    }
}

/// A transient message with its display window
#[derive(Debug, Clone)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
    shown_at: Instant,
    expires_at: Instant,
}

impl Banner {
    fn new(kind: BannerKind, message: String, shown_at: Instant, duration: Duration) -> Self {
        Self {
            kind,
            message,
            shown_at,
            expires_at: shown_at + duration,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    pub fn shown_at(&self) -> Instant {
        self.shown_at
    }

    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }
}

/// Auto-dismissing banners, oldest first
#[derive(Debug, Default)]
pub struct BannerQueue {
    banners: Vec<Banner>,
    config: BannerConfig,
}

impl BannerQueue {
    pub fn new(config: BannerConfig) -> Self {
        Self {
            banners: Vec::new(),
            config,
        }
    }

    /// Show a banner starting at `now`; returns when it expires
    pub fn push_at(
        &mut self,
        kind: BannerKind,
        message: impl Into<String>,
        now: Instant,
    ) -> Instant {
        let duration = Duration::from_millis(self.config.default_duration_ms);
        let banner = Banner::new(kind, message.into(), now, duration);
        let expires_at = banner.expires_at;
        self.banners.push(banner);

        // Limit number of banners
        if self.banners.len() > self.config.max_banners {
            let dropped = self.banners.remove(0);
            debug!("dropping banner early: {}", dropped.message);
        }

        expires_at
    }

    /// Remove expired banners, returning how many were removed
    pub fn prune(&mut self, now: Instant) -> usize {
        let before = self.banners.len();
        self.banners.retain(|b| !b.is_expired(now));
        before - self.banners.len()
    }

    /// Whether a banner of `kind` is still on screen at `now`
    pub fn has_active(&self, kind: BannerKind, now: Instant) -> bool {
        self.banners.iter().any(|b| b.kind == kind && !b.is_expired(now))
    }

    pub fn visible(&self) -> &[Banner] {
        &self.banners
    }

    pub fn len(&self) -> usize {
        self.banners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.banners.is_empty()
    }
}
