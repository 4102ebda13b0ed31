//! Replaying recorded gesture scripts against a session

use tracing::{debug, info};

use crate::config::AppConfig;
use crate::geometry::{Rect, Size, Translation};
use crate::overlay::{DragTrack, GestureEvent};
use crate::shared::SessionState;
use crate::storage::scripts::{GestureScript, ScriptStep};
use crate::vision::{to_normalized, NormalizedRegion};

/// ROI after one replayed step
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayFrame {
    /// 0 is the starting state
    pub step: usize,
    pub description: String,
    pub container: Size,
    pub roi: Rect,
    /// `roi` as the recognizer would see it
    pub region: NormalizedRegion,
}

/// Run every step of `script` and report the ROI after each one
pub fn replay(script: &GestureScript, config: &AppConfig) -> Vec<ReplayFrame> {
    let mut state = match script.roi {
        Some(roi) => SessionState::with_roi(config.clone(), script.container, roi),
        None => {
            let mut state = SessionState::new(config.clone());
            state.observe_container_size(script.container);
            state
        }
    };

    let mut frames = vec![snapshot(&state, 0, "initial".to_string())];

    for (index, step) in script.steps.iter().enumerate() {
        let description = match step {
            ScriptStep::BoxDrag { translations, cancel } => {
                drive(&mut state, DragTrack::Box, translations, *cancel);
                format!("box drag ({} updates{})", translations.len(), cancel_suffix(*cancel))
            }
            ScriptStep::HandleDrag {
                handle,
                translations,
                cancel,
            } => {
                drive(&mut state, DragTrack::Handle(*handle), translations, *cancel);
                format!("{:?} handle drag{}", handle, cancel_suffix(*cancel))
            }
            ScriptStep::Touch { start, translations } => match state.track_for_touch(*start) {
                Some(track) => {
                    drive(&mut state, track, translations, false);
                    format!("touch at ({}, {}) -> {:?}", start.x, start.y, track)
                }
                None => format!("touch at ({}, {}) missed the box", start.x, start.y),
            },
            ScriptStep::Resize { to } => {
                state.observe_container_size(*to);
                format!("resize to {}x{}", to.width, to.height)
            }
        };
        debug!("step {}: {}", index + 1, description);
        frames.push(snapshot(&state, index + 1, description));
    }

    info!("Replayed {} steps", script.steps.len());
    frames
}

fn drive(state: &mut SessionState, track: DragTrack, translations: &[Translation], cancel: bool) {
    state.on_gesture(track, GestureEvent::began());
    for t in translations {
        state.on_gesture(track, GestureEvent::changed(t.dx, t.dy));
    }
    let end = if cancel {
        GestureEvent::cancelled()
    } else {
        let last = translations.last().copied().unwrap_or(Translation::ZERO);
        GestureEvent::ended(last.dx, last.dy)
    };
    state.on_gesture(track, end);
}

fn cancel_suffix(cancel: bool) -> &'static str {
    if cancel {
        ", cancelled"
    } else {
        ""
    }
}

fn snapshot(state: &SessionState, step: usize, description: String) -> ReplayFrame {
    let container = state.container().unwrap_or_default();
    let roi = state.roi();
    ReplayFrame {
        step,
        description,
        container,
        roi,
        region: to_normalized(&roi, container),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::overlay::HandlePosition;

    #[test]
    fn test_end_to_end_scenarios() {
        let script = GestureScript {
            container: Size::new(800.0, 1200.0),
            roi: Some(Rect::new(300.0, 500.0, 200.0, 200.0)),
            steps: vec![
                ScriptStep::BoxDrag {
                    translations: vec![Translation::new(-400.0, -600.0)],
                    cancel: false,
                },
                ScriptStep::BoxDrag {
                    translations: vec![Translation::new(284.0, 484.0)],
                    cancel: false,
                },
                ScriptStep::HandleDrag {
                    handle: HandlePosition::BottomRight,
                    translations: vec![Translation::new(-150.0, -150.0)],
                    cancel: false,
                },
            ],
        };

        let frames = replay(&script, &AppConfig::default());
        assert_eq!(frames.len(), 4);
        assert_eq!(frames[1].roi, Rect::new(16.0, 16.0, 200.0, 200.0));
        assert_eq!(frames[2].roi, Rect::new(300.0, 500.0, 200.0, 200.0));
        assert_eq!(frames[3].roi, Rect::new(300.0, 500.0, 100.0, 100.0));
    }

    #[test]
    fn test_touch_and_resize_steps() {
        let script = GestureScript {
            container: Size::new(400.0, 800.0),
            roi: None,
            steps: vec![
                ScriptStep::Touch {
                    start: Point::new(5.0, 5.0),
                    translations: vec![Translation::new(50.0, 50.0)],
                },
                ScriptStep::Resize {
                    to: Size::new(800.0, 400.0),
                },
            ],
        };

        let frames = replay(&script, &AppConfig::default());
        assert_eq!(frames[0].roi, Rect::new(100.0, 300.0, 200.0, 200.0));
        assert!(frames[1].description.contains("missed"));
        assert_eq!(frames[1].roi, frames[0].roi);
        assert_eq!(frames[2].container, Size::new(800.0, 400.0));
        assert_eq!(frames[2].roi, Rect::new(200.0, 150.0, 400.0, 100.0));
        assert!((frames[0].region.y - 0.375).abs() < 1e-6);
    }

    #[test]
    fn test_cancelled_drag_still_commits_clamped() {
        let script = GestureScript {
            container: Size::new(800.0, 1200.0),
            roi: Some(Rect::new(300.0, 500.0, 200.0, 200.0)),
            steps: vec![ScriptStep::HandleDrag {
                handle: HandlePosition::TopLeft,
                translations: vec![Translation::new(500.0, 500.0)],
                cancel: true,
            }],
        };

        let frames = replay(&script, &AppConfig::default());
        assert_eq!(frames[1].roi, Rect::new(400.0, 600.0, 100.0, 100.0));
    }
}
