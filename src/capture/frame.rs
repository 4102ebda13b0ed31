//! Frame data structures for camera content

use image::{imageops, RgbaImage};
use std::borrow::Cow;
use std::time::Instant;

use super::orientation::{DeviceOrientation, ExifOrientation};

/// A captured camera frame
#[derive(Debug, Clone)]
pub struct CameraFrame {
    /// RGBA pixels in sensor orientation; see [`CameraFrame::upright_image`]
    pub image: RgbaImage,
    /// Device orientation when the frame was captured
    pub orientation: DeviceOrientation,
    /// Monotonic frame counter from the session
    pub sequence: u64,
    /// Timestamp when frame was captured
    pub timestamp: Instant,
}

impl CameraFrame {
    /// Create a new frame
    pub fn new(image: RgbaImage, orientation: DeviceOrientation, sequence: u64) -> Self {
        Self {
            image,
            orientation,
            sequence,
            timestamp: Instant::now(),
        }
    }

    /// Get frame dimensions as (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// EXIF-style orientation code for the recognition back end
    pub fn exif_orientation(&self) -> ExifOrientation {
        ExifOrientation::from_device(self.orientation)
    }

    /// Pixels turned into display orientation, matching screen space
    pub fn upright_image(&self) -> Cow<'_, RgbaImage> {
        let image = &self.image;
        match self.exif_orientation() {
            ExifOrientation::Up => Cow::Borrowed(image),
            ExifOrientation::UpMirrored => Cow::Owned(imageops::flip_horizontal(image)),
            ExifOrientation::Down => Cow::Owned(imageops::rotate180(image)),
            ExifOrientation::DownMirrored => Cow::Owned(imageops::flip_vertical(image)),
            ExifOrientation::LeftMirrored => {
                Cow::Owned(imageops::flip_horizontal(&imageops::rotate90(image)))
            }
            ExifOrientation::Right => Cow::Owned(imageops::rotate90(image)),
            ExifOrientation::RightMirrored => {
                Cow::Owned(imageops::flip_horizontal(&imageops::rotate270(image)))
            }
            ExifOrientation::Left => Cow::Owned(imageops::rotate270(image)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_dimensions() {
        let frame = CameraFrame::new(RgbaImage::new(64, 48), DeviceOrientation::Portrait, 7);
        assert_eq!(frame.dimensions(), (64, 48));
        assert_eq!(frame.exif_orientation(), ExifOrientation::Right);
    }

    #[test]
    fn test_portrait_frame_turned_upright() {
        let mut image = RgbaImage::new(4, 2);
        // top-left sensor pixel ends up top-right once turned clockwise
        image.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        let frame = CameraFrame::new(image, DeviceOrientation::Portrait, 1);

        let upright = frame.upright_image();
        assert_eq!(upright.dimensions(), (2, 4));
        assert_eq!(upright.get_pixel(1, 0).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_landscape_left_frame_is_borrowed() {
        let frame = CameraFrame::new(RgbaImage::new(4, 2), DeviceOrientation::LandscapeLeft, 1);
        assert!(matches!(frame.upright_image(), Cow::Borrowed(_)));
    }

    #[test]
    fn test_upside_down_frame_turned_counter_clockwise() {
        let frame =
            CameraFrame::new(RgbaImage::new(4, 2), DeviceOrientation::PortraitUpsideDown, 1);
        assert_eq!(frame.upright_image().dimensions(), (2, 4));
    }
}
