//! Fitting a rectangle inside a container
//!
//! Minimum size is enforced first, then the margins. When the container is
//! too small to hold `min_size + 2 * margin` the margin wins and the rect is
//! allowed to end up narrower than the minimum.

use tracing::trace;

use super::{ClampPolicy, Rect, Size};

/// Clamp `rect` into `container` under `policy`.
///
/// Growth keeps the origin fixed unless that pushes the far edge past the
/// margin, in which case the origin shifts back. Degenerate containers and
/// non-finite rects are returned unchanged.
pub fn clamp_rect(rect: Rect, container: Size, policy: &ClampPolicy) -> Rect {
    if container.is_degenerate() || !rect.is_finite() {
        trace!(?rect, ?container, "skipping clamp for degenerate input");
        return rect;
    }

    let (x, width) = clamp_axis(
        rect.x,
        rect.width,
        container.width,
        policy.margin,
        policy.min_size.width,
    );
    let (y, height) = clamp_axis(
        rect.y,
        rect.height,
        container.height,
        policy.margin,
        policy.min_size.height,
    );

    Rect {
        x,
        y,
        width,
        height,
    }
}

/// One-dimensional clamp returning `(origin, extent)`
fn clamp_axis(
    origin: f32,
    extent: f32,
    container: f32,
    margin: f32,
    min_extent: f32,
) -> (f32, f32) {
    let mut extent = extent.max(min_extent);
    let available = (container - 2.0 * margin).max(0.0);
    if extent > available {
        extent = available;
    }

    let mut origin = origin;
    let far_limit = container - margin;
    if origin + extent > far_limit {
        origin = far_limit - extent;
    }
    if origin < margin {
        origin = margin;
    }

    (origin, extent)
}
