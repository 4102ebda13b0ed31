//! Choosing which gesture track a touch starts

use crate::geometry::{Point, Rect};
use crate::overlay::bounding_box::{DragTrack, HandlePosition};

/// Hit-test a touch at `point` against `rect`.
///
/// Corner handles take priority over the box body: the closest corner within
/// `handle_radius` wins. A touch inside the box starts a whole-box drag.
pub fn hit_test(rect: &Rect, point: Point, handle_radius: f32) -> Option<DragTrack> {
    let radius2 = handle_radius * handle_radius;

    let nearest = HandlePosition::ALL
        .iter()
        .map(|&handle| (handle, distance2(handle.corner_of(rect), point)))
        .filter(|&(_, d2)| d2 <= radius2)
        .min_by(|a, b| a.1.total_cmp(&b.1));

    if let Some((handle, _)) = nearest {
        return Some(DragTrack::Handle(handle));
    }

    if rect.contains(point) {
        Some(DragTrack::Box)
    } else {
        None
    }
}

fn distance2(a: Point, b: Point) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}
