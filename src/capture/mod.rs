//! Camera Frame Layer
//!
//! Frames arrive from the AR session's camera feed. This layer only carries
//! the pixels and the orientation metadata recognition needs.

pub mod frame;
pub mod orientation;

pub use frame::CameraFrame;
pub use orientation::{DeviceOrientation, ExifOrientation};
