//! Gesture script storage and loading
//!
//! A script is a recorded sequence of ROI interactions, stored as JSON, that
//! can be replayed against the geometry core without a camera.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::geometry::{Point, Rect, Size, Translation};
use crate::overlay::HandlePosition;

/// A recorded interaction session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureScript {
    /// Screen size at the start of the session
    pub container: Size,
    /// Starting ROI; centred default when absent
    #[serde(default)]
    pub roi: Option<Rect>,
    /// Steps to replay in order
    pub steps: Vec<ScriptStep>,
}

/// One recorded interaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScriptStep {
    /// Drag the whole box through cumulative translations
    BoxDrag {
        translations: Vec<Translation>,
        /// End with a cancellation instead of a normal end
        #[serde(default)]
        cancel: bool,
    },
    /// Drag one corner handle through cumulative translations
    HandleDrag {
        handle: HandlePosition,
        translations: Vec<Translation>,
        #[serde(default)]
        cancel: bool,
    },
    /// Touch-and-drag starting at `start`; the track is chosen by hit-testing
    Touch {
        start: Point,
        translations: Vec<Translation>,
    },
    /// The container changed size, e.g. on rotation
    Resize { to: Size },
}

/// Load a gesture script from file
pub fn load_script(path: &Path) -> Result<GestureScript> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {:?}", path))?;
    let script: GestureScript = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse script {:?}", path))?;
    Ok(script)
}

/// Save a gesture script to file
pub fn save_script(script: &GestureScript, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(script)?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_handwritten_script() {
        let json = r#"{
            "container": { "width": 800, "height": 1200 },
            "steps": [
                { "kind": "box_drag", "translations": [{ "dx": -400, "dy": -600 }] },
                {
                    "kind": "handle_drag",
                    "handle": "bottom_right",
                    "translations": [{ "dx": 10, "dy": 10 }],
                    "cancel": true
                },
                { "kind": "touch", "start": { "x": 100, "y": 100 }, "translations": [] },
                { "kind": "resize", "to": { "width": 1200, "height": 800 } }
            ]
        }"#;

        let script: GestureScript = serde_json::from_str(json).unwrap();
        assert_eq!(script.container, Size::new(800.0, 1200.0));
        assert!(script.roi.is_none());
        assert_eq!(script.steps.len(), 4);
        assert_eq!(
            script.steps[0],
            ScriptStep::BoxDrag {
                translations: vec![Translation::new(-400.0, -600.0)],
                cancel: false,
            }
        );
        assert!(matches!(
            script.steps[1],
            ScriptStep::HandleDrag {
                handle: HandlePosition::BottomRight,
                cancel: true,
                ..
            }
        ));
    }

    #[test]
    fn test_save_and_load_script() {
        let script = GestureScript {
            container: Size::new(390.0, 844.0),
            roi: Some(Rect::new(95.0, 322.0, 200.0, 200.0)),
            steps: vec![ScriptStep::Resize {
                to: Size::new(844.0, 390.0),
            }],
        };
        let temp_file = NamedTempFile::new().unwrap();

        save_script(&script, temp_file.path()).unwrap();
        assert_eq!(load_script(temp_file.path()).unwrap(), script);
    }

    #[test]
    fn test_unknown_step_kind_rejected() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"{{ "container": {{ "width": 1, "height": 1 }}, "steps": [{{ "kind": "pinch" }}] }}"#
        )
        .unwrap();
        assert!(load_script(temp_file.path()).is_err());
    }
}
