//! Shared session state and messaging
//!
//! The UI thread owns the ROI and annotations; the recognition worker only
//! ever receives copies through [`messages`].

pub mod messages;
pub mod state;

pub use messages::{WorkerEvent, WorkerRequest};
pub use state::{RuntimeState, SessionState};
