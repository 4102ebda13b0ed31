//! Screen ROI to recognition-space conversion
//!
//! Screen space has a top-left origin with y down. The recognition back end
//! wants regions normalized to [0, 1] with a bottom-left origin and y up.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::geometry::{Rect, Size};

/// Inward inset applied to the ROI before it is handed to recognition
pub const DEFAULT_CROP_INSET: f32 = 4.0;
/// Smallest inset ROI side, in screen units, worth recognizing
pub const DEFAULT_MIN_CROP_DIMENSION: f32 = 10.0;

/// Region in [0, 1] x [0, 1] with a bottom-left origin
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRegion {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl NormalizedRegion {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Integer crop rectangle in image pixels, top-left origin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Convert a screen-space ROI into a normalized, y-flipped region.
///
/// Origins are clamped before extents, and shrinking an extent never moves
/// the origin. A degenerate screen yields [`NormalizedRegion::ZERO`].
pub fn to_normalized(roi: &Rect, screen: Size) -> NormalizedRegion {
    if screen.is_degenerate() || !roi.is_finite() {
        return NormalizedRegion::ZERO;
    }

    let mut x = roi.x / screen.width;
    let mut width = roi.width / screen.width;
    // Bottom edge of the ROI becomes the origin once y points up
    let mut y = 1.0 - (roi.y + roi.height) / screen.height;
    let mut height = roi.height / screen.height;

    x = x.clamp(0.0, 1.0);
    y = y.clamp(0.0, 1.0);
    if x + width > 1.0 {
        width = 1.0 - x;
    }
    if y + height > 1.0 {
        height = 1.0 - y;
    }
    width = width.max(0.0);
    height = height.max(0.0);

    NormalizedRegion { x, y, width, height }
}

/// Shrink the ROI by `inset` on every side before recognition.
///
/// Returns `None` when either side ends up under `min_dimension`; the caller
/// skips recognition for that frame.
pub fn inset_for_recognition(roi: &Rect, inset: f32, min_dimension: f32) -> Option<Rect> {
    let inset_rect = roi.inset_by(inset);
    if !inset_rect.is_finite()
        || inset_rect.width < min_dimension
        || inset_rect.height < min_dimension
    {
        trace!(?roi, "ROI too small after inset, skipping recognition");
        return None;
    }
    Some(inset_rect)
}

/// Map a normalized region back into top-left screen space
pub fn normalized_to_screen(region: &NormalizedRegion, screen: Size) -> Rect {
    Rect {
        x: region.x * screen.width,
        y: (1.0 - region.y - region.height) * screen.height,
        width: region.width * screen.width,
        height: region.height * screen.height,
    }
}

/// Pixel crop of an `image_width` x `image_height` image covered by `region`.
///
/// The crop is widened to whole pixels. Returns `None` for an empty crop.
pub fn normalized_to_pixels(
    region: &NormalizedRegion,
    image_width: u32,
    image_height: u32,
) -> Option<PixelRect> {
    if region.is_empty() || image_width == 0 || image_height == 0 {
        return None;
    }

    let w = image_width as f32;
    let h = image_height as f32;
    let top = 1.0 - (region.y + region.height);

    let x0 = (region.x * w).floor().clamp(0.0, w) as u32;
    let y0 = (top * h).floor().clamp(0.0, h) as u32;
    let x1 = ((region.x + region.width) * w).ceil().clamp(0.0, w) as u32;
    let y1 = ((top + region.height) * h).ceil().clamp(0.0, h) as u32;

    if x1 <= x0 || y1 <= y0 {
        return None;
    }

    Some(PixelRect {
        x: x0,
        y: y0,
        width: x1 - x0,
        height: y1 - y0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_y_flip_literal_values() {
        let screen = Size::new(400.0, 800.0);
        let roi = Rect::new(100.0, 100.0, 200.0, 200.0);

        let region = to_normalized(&roi, screen);
        assert!(close(region.x, 0.25));
        assert!(close(region.width, 0.5));
        assert!(close(region.y, 0.625));
        assert!(close(region.height, 0.25));
    }

    #[test]
    fn test_roi_at_screen_top_maps_to_region_top() {
        let screen = Size::new(1000.0, 1000.0);
        let roi = Rect::new(0.0, 0.0, 1000.0, 100.0);
        let region = to_normalized(&roi, screen);
        assert!(close(region.y, 0.9));
        assert!(close(region.y + region.height, 1.0));
    }

    #[test]
    fn test_negative_origin_clamped_before_extent() {
        let screen = Size::new(100.0, 100.0);
        let roi = Rect::new(-20.0, 50.0, 60.0, 70.0);
        let region = to_normalized(&roi, screen);

        assert_eq!(region.x, 0.0);
        assert!(close(region.width, 0.6));
        // bottom edge at 120 lies below the screen
        assert_eq!(region.y, 0.0);
        assert!(close(region.height, 0.7));
    }

    #[test]
    fn test_extent_shrinks_without_moving_origin() {
        let screen = Size::new(100.0, 100.0);
        let roi = Rect::new(80.0, -30.0, 50.0, 50.0);
        let region = to_normalized(&roi, screen);

        assert!(close(region.x, 0.8));
        assert!(close(region.width, 0.2));
        assert!(close(region.y, 0.8));
        assert!(close(region.height, 0.2));
    }

    #[test]
    fn test_normalized_bounds_hold() {
        let screens = [Size::new(400.0, 800.0), Size::new(1.0, 1.0), Size::new(2732.0, 2048.0)];
        let rois = [
            Rect::new(-1000.0, -1000.0, 5000.0, 5000.0),
            Rect::new(3000.0, 3000.0, 10.0, 10.0),
            Rect::new(10.0, 10.0, -50.0, -50.0),
            Rect::new(0.0, 0.0, 0.0, 0.0),
            Rect::new(200.0, 300.0, 150.0, 100.0),
        ];
        for screen in screens {
            for roi in rois {
                let r = to_normalized(&roi, screen);
                assert!(r.x >= 0.0 && r.y >= 0.0, "{roi:?} {r:?}");
                assert!(r.x + r.width <= 1.0 + 1e-6, "{roi:?} {r:?}");
                assert!(r.y + r.height <= 1.0 + 1e-6, "{roi:?} {r:?}");
            }
        }
    }

    #[test]
    fn test_degenerate_screen_gives_zero_region() {
        let roi = Rect::new(10.0, 10.0, 100.0, 100.0);
        assert_eq!(to_normalized(&roi, Size::new(0.0, 800.0)), NormalizedRegion::ZERO);
    }

    #[test]
    fn test_inset_shrinks_each_side() {
        let roi = Rect::new(100.0, 100.0, 200.0, 200.0);
        let inset = inset_for_recognition(&roi, 4.0, 10.0);
        assert_eq!(inset, Some(Rect::new(104.0, 104.0, 192.0, 192.0)));
    }

    #[test]
    fn test_inset_below_minimum_skips() {
        let roi = Rect::new(100.0, 100.0, 17.0, 200.0);
        assert_eq!(inset_for_recognition(&roi, 4.0, 10.0), None);

        let roi = Rect::new(100.0, 100.0, 18.0, 18.0);
        assert!(inset_for_recognition(&roi, 4.0, 10.0).is_some());
    }

    #[test]
    fn test_normalized_to_screen_inverts() {
        let screen = Size::new(400.0, 800.0);
        let roi = Rect::new(100.0, 100.0, 200.0, 200.0);
        let back = normalized_to_screen(&to_normalized(&roi, screen), screen);
        assert!((back.x - roi.x).abs() < 1e-3);
        assert!((back.y - roi.y).abs() < 1e-3);
        assert!((back.width - roi.width).abs() < 1e-3);
        assert!((back.height - roi.height).abs() < 1e-3);
    }

    #[test]
    fn test_normalized_to_pixels_flips_rows() {
        let region = NormalizedRegion {
            x: 0.25,
            y: 0.625,
            width: 0.5,
            height: 0.25,
        };
        let crop = normalized_to_pixels(&region, 400, 800).unwrap();
        assert_eq!(
            crop,
            PixelRect {
                x: 100,
                y: 100,
                width: 200,
                height: 200
            }
        );
    }

    #[test]
    fn test_normalized_to_pixels_empty() {
        assert_eq!(normalized_to_pixels(&NormalizedRegion::ZERO, 100, 100), None);
    }
}
