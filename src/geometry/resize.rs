//! Re-fitting the ROI when its container changes size

use tracing::debug;

use super::{clamp_rect, ClampPolicy, Rect, Size};

/// Scale `rect` from `from` to `to` and re-clamp it against `to`.
///
/// Width and height ratios are applied independently since a rotation
/// changes the aspect ratio. Returns `rect` unchanged when either size is
/// degenerate, which happens before the first layout pass.
pub fn remap_rect(rect: Rect, from: Size, to: Size, policy: &ClampPolicy) -> Rect {
    if from.is_degenerate() || to.is_degenerate() {
        debug!(?from, ?to, "container not measured yet, keeping ROI");
        return rect;
    }

    let sx = to.width / from.width;
    let sy = to.height / from.height;
    let scaled = Rect {
        x: rect.x * sx,
        y: rect.y * sy,
        width: rect.width * sx,
        height: rect.height * sy,
    };

    let remapped = clamp_rect(scaled, to, policy);
    debug!(?rect, ?remapped, "remapped ROI {:?} -> {:?}", from, to);
    remapped
}
