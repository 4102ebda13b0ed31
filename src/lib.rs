//! LexiLens - region-of-interest geometry and AR annotation placement
//!
//! The core behind a camera vocabulary app: the user positions a detection
//! box on screen, the box is mapped into recognition space every frame, and
//! detected labels are anchored in the AR scene where the box centre meets a
//! surface. Recognition and the AR session are external collaborators.

pub mod app;
pub mod ar;
pub mod capture;
pub mod config;
pub mod geometry;
pub mod overlay;
pub mod replay;
pub mod shared;
pub mod storage;
pub mod vision;

pub use app::LexiconApp;
pub use config::AppConfig;
