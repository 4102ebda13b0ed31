//! Message types for communication between the UI thread and the recognition worker

use crate::capture::CameraFrame;
use crate::geometry::{Rect, Size};
use crate::vision::RecognitionOutcome;

/// Messages sent from the UI thread to the recognition worker
#[derive(Debug)]
pub enum WorkerRequest {
    /// Recognize whatever is inside `roi` on `frame`
    Recognize {
        frame: CameraFrame,
        /// ROI as displayed when the frame was submitted
        roi: Rect,
        /// Screen size the ROI is expressed in
        screen: Size,
    },
    /// Request the worker to shutdown
    Shutdown,
}

/// Messages sent from the recognition worker back to the UI thread
#[derive(Debug, Clone)]
pub enum WorkerEvent {
    /// Recognition finished for frame `sequence`
    Recognized { sequence: u64, outcome: RecognitionOutcome },
    /// Worker has stopped
    Stopped,
}
