//! Pie drag gesture.
//!
//! Angles are radians clockwise from 12 o'clock, in `[0, 2π)`. Wedge `k` spans
//! from the running total of wedges `0..k` to that total plus its own value,
//! scaled to the full circle.
//!
//! A drag grabs the boundary nearest the pointer. The wedge before the
//! boundary (clockwise) gains what the pointer sweeps; the wedge after it
//! loses the same amount. Every move is computed from the values at drag
//! start, so returning the pointer restores them exactly.

use std::f64::consts::{PI, TAU};

use crate::sync::Edit;

/// Edge between two adjacent wedges: the end of `left`, the start of `right`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boundary {
    pub left: usize,
    pub right: usize,
}

#[derive(Debug, Clone, PartialEq)]
struct Drag {
    origin: f64,
    base: Vec<u32>,
    boundary: Boundary,
    last_delta: i32,
}

/// Transient drag state. Exists between pointer-down and pointer-up only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PieGesture {
    drag: Option<Drag>,
}

impl PieGesture {
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    #[must_use]
    pub fn boundary(&self) -> Option<Boundary> {
        self.drag.as_ref().map(|d| d.boundary)
    }

    /// Start a drag at `angle` over `values`. Returns `false` when there is
    /// nothing to grab (no wedges, or a single sector).
    pub fn pointer_down(&mut self, angle: f64, values: &[u32]) -> bool {
        let Some(boundary) = nearest_boundary(values, angle) else {
            self.drag = None;
            return false;
        };
        tracing::debug!(?boundary, angle, "Pie drag started");
        self.drag = Some(Drag {
            origin: normalize_angle(angle),
            base: values.to_vec(),
            boundary,
            last_delta: 0,
        });
        true
    }

    /// Pointer moved to `angle`. Yields an edit when the swept amount changed.
    pub fn pointer_move(&mut self, angle: f64) -> Option<Edit> {
        let drag = self.drag.as_mut()?;
        let delta = percent_for(wrapped_delta(drag.origin, angle));
        if delta == drag.last_delta {
            return None;
        }
        drag.last_delta = delta;
        Some(Edit::Pie {
            base: drag.base.clone(),
            gain: drag.boundary.left,
            lose: drag.boundary.right,
            delta,
        })
    }

    /// Pointer released. Applies the final position (if given) and ends the drag.
    pub fn pointer_up(&mut self, angle: Option<f64>) -> Option<Edit> {
        let edit = angle.and_then(|a| self.pointer_move(a));
        if self.drag.take().is_some() {
            tracing::debug!("Pie drag ended");
        }
        edit
    }

    /// Abandon the drag. The draft keeps whatever was last applied.
    pub fn cancel(&mut self) {
        self.drag = None;
    }
}

/// Wedge index under `angle`. Zero-width wedges are never hit.
#[must_use]
pub fn wedge_at(values: &[u32], angle: f64) -> Option<usize> {
    let spans = wedge_spans(values)?;
    let angle = normalize_angle(angle);
    spans
        .iter()
        .position(|(start, end)| end > start && angle >= *start && angle < *end)
        .or_else(|| spans.iter().rposition(|(start, end)| end > start))
}

/// Boundary closest to `angle` on the wedge it falls in.
#[must_use]
pub fn nearest_boundary(values: &[u32], angle: f64) -> Option<Boundary> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let k = wedge_at(values, angle)?;
    let (start, end) = wedge_spans(values)?[k];
    let angle = normalize_angle(angle);
    let boundary = if angle - start < end - angle {
        Boundary {
            left: (k + n - 1) % n,
            right: k,
        }
    } else {
        Boundary {
            left: k,
            right: (k + 1) % n,
        }
    };
    Some(boundary)
}

/// `(start, end)` angle of each wedge. `None` when every value is zero.
#[must_use]
pub fn wedge_spans(values: &[u32]) -> Option<Vec<(f64, f64)>> {
    let total: u32 = values.iter().sum();
    if total == 0 {
        return None;
    }
    let mut acc = 0u32;
    let spans = values
        .iter()
        .map(|v| {
            let start = f64::from(acc) / f64::from(total) * TAU;
            acc += v;
            let end = f64::from(acc) / f64::from(total) * TAU;
            (start, end)
        })
        .collect();
    Some(spans)
}

fn normalize_angle(angle: f64) -> f64 {
    if angle.is_finite() {
        angle.rem_euclid(TAU)
    } else {
        0.0
    }
}

/// Signed sweep from `origin` to `current`, wrapped to `(-π, π]`.
fn wrapped_delta(origin: f64, current: f64) -> f64 {
    let delta = (normalize_angle(current) - origin).rem_euclid(TAU);
    if delta > PI { delta - TAU } else { delta }
}

fn percent_for(sweep: f64) -> i32 {
    (sweep / TAU * 100.0).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    const CITY: [u32; 6] = [34, 12, 29, 10, 12, 3];

    fn at(percent: f64) -> f64 {
        percent / 100.0 * TAU
    }

    #[test]
    fn wedge_lookup_follows_cumulative_shares() {
        assert_eq!(wedge_at(&CITY, at(0.5)), Some(0));
        assert_eq!(wedge_at(&CITY, at(40.0)), Some(1));
        assert_eq!(wedge_at(&CITY, at(99.0)), Some(5));
        assert_eq!(wedge_at(&[0, 0], 1.0), None);
    }

    #[test]
    fn zero_wedges_are_skipped() {
        assert_eq!(wedge_at(&[50, 0, 50], at(50.0)), Some(2));
    }

    #[test]
    fn boundary_picks_nearest_edge() {
        assert_eq!(
            nearest_boundary(&CITY, at(33.0)),
            Some(Boundary { left: 0, right: 1 })
        );
        assert_eq!(
            nearest_boundary(&CITY, at(35.0)),
            Some(Boundary { left: 0, right: 1 })
        );
        // Start edge of wedge 0 borders the last wedge.
        assert_eq!(
            nearest_boundary(&CITY, at(1.0)),
            Some(Boundary { left: 5, right: 0 })
        );
        assert_eq!(nearest_boundary(&[100], 0.5), None);
    }

    #[test]
    fn drag_ten_points_clockwise() {
        let mut gesture = PieGesture::default();
        assert!(gesture.pointer_down(at(33.0), &CITY));
        let edit = gesture.pointer_move(at(43.0)).unwrap();
        assert_eq!(
            edit,
            Edit::Pie {
                base: CITY.to_vec(),
                gain: 0,
                lose: 1,
                delta: 10
            }
        );
    }

    #[test]
    fn drag_back_returns_to_start() {
        let mut gesture = PieGesture::default();
        gesture.pointer_down(at(33.0), &CITY);
        gesture.pointer_move(at(50.0));
        let edit = gesture.pointer_up(Some(at(33.0))).unwrap();
        assert!(matches!(edit, Edit::Pie { delta: 0, .. }));
        assert!(!gesture.is_dragging());
    }

    #[test]
    fn drag_across_twelve_wraps() {
        let mut gesture = PieGesture::default();
        gesture.pointer_down(at(99.0), &CITY);
        let edit = gesture.pointer_move(at(2.0)).unwrap();
        assert!(matches!(edit, Edit::Pie { gain: 5, lose: 0, delta: 3, .. }));
    }

    #[test]
    fn unchanged_sweep_yields_nothing() {
        let mut gesture = PieGesture::default();
        gesture.pointer_down(at(33.0), &CITY);
        assert!(gesture.pointer_move(at(33.2)).is_none());
    }

    #[test]
    fn cancel_and_move_without_drag() {
        let mut gesture = PieGesture::default();
        assert!(gesture.pointer_move(1.0).is_none());
        gesture.pointer_down(at(33.0), &CITY);
        gesture.cancel();
        assert!(gesture.pointer_up(Some(at(40.0))).is_none());
    }
}
