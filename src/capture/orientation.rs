//! Device orientation to image orientation mapping

use serde::{Deserialize, Serialize};

/// Physical orientation reported by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceOrientation {
    #[default]
    Portrait,
    PortraitUpsideDown,
    /// Home button / bottom edge on the right
    LandscapeLeft,
    /// Home button / bottom edge on the left
    LandscapeRight,
    FaceUp,
    FaceDown,
    Unknown,
}

/// EXIF orientation tag values (1-8)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExifOrientation {
    Up = 1,
    UpMirrored = 2,
    Down = 3,
    DownMirrored = 4,
    LeftMirrored = 5,
    Right = 6,
    RightMirrored = 7,
    Left = 8,
}

impl ExifOrientation {
    /// Orientation of the back camera's buffer for a given device orientation.
    ///
    /// The sensor is mounted landscape, so portrait frames need a quarter turn.
    /// Flat and unknown orientations fall back to portrait.
    pub fn from_device(orientation: DeviceOrientation) -> Self {
        match orientation {
            DeviceOrientation::PortraitUpsideDown => ExifOrientation::Left,
            DeviceOrientation::LandscapeLeft => ExifOrientation::Up,
            DeviceOrientation::LandscapeRight => ExifOrientation::Down,
            DeviceOrientation::Portrait
            | DeviceOrientation::FaceUp
            | DeviceOrientation::FaceDown
            | DeviceOrientation::Unknown => ExifOrientation::Right,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_back_camera_mapping() {
        assert_eq!(ExifOrientation::from_device(DeviceOrientation::Portrait).code(), 6);
        assert_eq!(ExifOrientation::from_device(DeviceOrientation::PortraitUpsideDown).code(), 8);
        assert_eq!(ExifOrientation::from_device(DeviceOrientation::LandscapeLeft).code(), 1);
        assert_eq!(ExifOrientation::from_device(DeviceOrientation::LandscapeRight).code(), 3);
    }

    #[test]
    fn test_unknown_falls_back_to_portrait() {
        assert_eq!(
            ExifOrientation::from_device(DeviceOrientation::Unknown),
            ExifOrientation::Right
        );
        assert_eq!(
            ExifOrientation::from_device(DeviceOrientation::FaceUp),
            ExifOrientation::Right
        );
    }
}
