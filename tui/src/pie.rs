//! Pie chart on a ratatui canvas.
//!
//! The canvas maps `[-1, 1]` on both axes onto the inner area, the same
//! scaling `Region::angle_of` uses to map pointer cells back to angles, so
//! what is drawn under a cell is what a click on that cell grabs.

use std::f64::consts::TAU;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine, Points};
use ratatui::widgets::{Block, BorderType, Borders};

use civic_engine::wedge_spans;

use crate::theme::{Glyphs, Palette};

/// What to draw: wedge values plus an optional highlighted wedge whose end
/// edge gets a marker line.
pub(crate) struct PieSpec<'a> {
    pub(crate) title: &'a str,
    pub(crate) values: &'a [u32],
    pub(crate) highlight: Option<usize>,
    pub(crate) active: bool,
}

/// Sample points inside the unit circle, bucketed by wedge.
///
/// `columns` x `rows` is the sampling grid. With every value zero the result
/// is a single bucket tracing the rim.
pub(crate) fn wedge_points(values: &[u32], columns: u16, rows: u16) -> Vec<Vec<(f64, f64)>> {
    let columns = columns.max(1);
    let rows = rows.max(1);
    let Some(spans) = wedge_spans(values) else {
        return vec![rim_points(u32::from(columns) * 2)];
    };

    let mut buckets = vec![Vec::new(); values.len()];
    for row in 0..rows {
        let y = 1.0 - (f64::from(row) + 0.5) / f64::from(rows) * 2.0;
        for column in 0..columns {
            let x = (f64::from(column) + 0.5) / f64::from(columns) * 2.0 - 1.0;
            if x * x + y * y > 1.0 {
                continue;
            }
            let angle = x.atan2(y).rem_euclid(TAU);
            let hit = spans
                .iter()
                .position(|(start, end)| end > start && angle >= *start && angle < *end);
            if let Some(k) = hit {
                buckets[k].push((x, y));
            }
        }
    }
    buckets
}

fn rim_points(samples: u32) -> Vec<(f64, f64)> {
    let samples = samples.max(8);
    (0..samples)
        .map(|i| {
            let angle = f64::from(i) / f64::from(samples) * TAU;
            (angle.sin(), angle.cos())
        })
        .collect()
}

/// End angle of wedge `index`, clockwise from 12 o'clock.
fn edge_angle(values: &[u32], index: usize) -> Option<f64> {
    wedge_spans(values)?.get(index).map(|(_, end)| *end)
}

/// Draw the pie framed in a block and return the inner area for hit-testing.
pub(crate) fn render_pie(
    frame: &mut Frame,
    area: Rect,
    spec: &PieSpec<'_>,
    palette: &Palette,
    glyphs: &Glyphs,
) -> Rect {
    let border = if spec.active {
        palette.accent
    } else {
        palette.bg_border
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .title(format!(" {} ", spec.title));
    let inner = block.inner(area);

    // Braille packs 2x4 dots per cell; sample at that density.
    let buckets = wedge_points(
        spec.values,
        inner.width.saturating_mul(2),
        inner.height.saturating_mul(4),
    );
    let empty = wedge_spans(spec.values).is_none();
    let edge = spec
        .highlight
        .and_then(|index| edge_angle(spec.values, index));
    let colors: Vec<Color> = (0..buckets.len())
        .map(|k| {
            if empty {
                palette.text_muted
            } else {
                palette.sector(k)
            }
        })
        .collect();
    let marker_color = palette.text_primary;

    let canvas = Canvas::default()
        .block(block)
        .marker(glyphs.canvas_marker)
        .background_color(palette.bg_dark)
        .x_bounds([-1.0, 1.0])
        .y_bounds([-1.0, 1.0])
        .paint(move |ctx| {
            for (coords, color) in buckets.iter().zip(&colors) {
                ctx.draw(&Points {
                    coords,
                    color: *color,
                });
            }
            if let Some(angle) = edge {
                ctx.layer();
                ctx.draw(&CanvasLine {
                    x1: 0.0,
                    y1: 0.0,
                    x2: angle.sin(),
                    y2: angle.cos(),
                    color: marker_color,
                });
            }
        });
    frame.render_widget(canvas, area);
    inner
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_land_in_their_wedges() {
        let buckets = wedge_points(&[50, 50], 40, 40);
        assert_eq!(buckets.len(), 2);
        // First half of the circle is the right-hand side.
        assert!(buckets[0].iter().all(|(x, _)| *x > 0.0));
        assert!(buckets[1].iter().all(|(x, _)| *x < 0.0));
        assert!(!buckets[0].is_empty());
    }

    #[test]
    fn zero_wedges_get_no_points() {
        let buckets = wedge_points(&[100, 0, 0], 20, 20);
        assert!(!buckets[0].is_empty());
        assert!(buckets[1].is_empty());
        assert!(buckets[2].is_empty());
    }

    #[test]
    fn empty_allocation_draws_the_rim() {
        let buckets = wedge_points(&[0, 0, 0], 20, 20);
        assert_eq!(buckets.len(), 1);
        assert!(
            buckets[0]
                .iter()
                .all(|(x, y)| ((x * x + y * y).sqrt() - 1.0).abs() < 1e-9)
        );
    }

    #[test]
    fn highlight_edge_is_wedge_end() {
        let angle = edge_angle(&[25, 75], 0).unwrap();
        assert!((angle - TAU / 4.0).abs() < 1e-9);
        assert_eq!(edge_angle(&[0, 0], 0), None);
    }
}
