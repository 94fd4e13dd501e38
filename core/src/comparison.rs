//! Comparison report: per-sector table, chart series, and the two metrics.

use civic_types::ui::CompareView;
use civic_types::{Layer, Phase, SectorRegistry, alignment, awareness};

use crate::store::PlayerState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonRow {
    pub name: String,
    pub icon: String,
    pub blind: u32,
    pub adjusted: u32,
    pub city: u32,
}

/// A labelled bar series, in registry order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Series {
    pub label: String,
    pub values: Vec<u32>,
}

impl Series {
    fn new(label: impl Into<String>, values: Vec<u32>) -> Self {
        Self {
            label: label.into(),
            values,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonReport {
    pub layer: Layer,
    pub rows: Vec<ComparisonRow>,
    pub awareness: f64,
    pub alignment: f64,
}

impl ComparisonReport {
    /// Build the table and metrics for `layer`. Missing submissions count as zeros.
    #[must_use]
    pub fn build(registry: &SectorRegistry, state: &PlayerState, layer: Layer) -> Self {
        let blind = state.values_or_zero(Phase::Blind, layer);
        let adjusted = state.values_or_zero(Phase::Adjusted, layer);
        let city = registry.reference_vector(layer);

        let rows = registry
            .iter()
            .enumerate()
            .map(|(i, sector)| ComparisonRow {
                name: sector.name().to_string(),
                icon: sector.icon().to_string(),
                blind: blind[i],
                adjusted: adjusted[i],
                city: city[i],
            })
            .collect();

        Self {
            layer,
            rows,
            awareness: awareness(&blind, &adjusted),
            alignment: alignment(&adjusted, &city),
        }
    }

    #[must_use]
    pub fn awareness_label(&self) -> String {
        format!("{:.1}%", self.awareness)
    }

    #[must_use]
    pub fn alignment_label(&self) -> String {
        format!("{:.1}%", self.alignment)
    }
}

/// Bar series for the comparison chart.
///
/// Per-layer views show City, Blind, and Adjusted for that layer. The combined
/// view shows both city splits next to the operating submissions.
#[must_use]
pub fn chart_series(
    registry: &SectorRegistry,
    state: &PlayerState,
    view: CompareView,
) -> Vec<Series> {
    match view.layer() {
        Some(layer) => vec![
            Series::new("City", registry.reference_vector(layer)),
            Series::new("Blind", state.values_or_zero(Phase::Blind, layer)),
            Series::new("Adjusted", state.values_or_zero(Phase::Adjusted, layer)),
        ],
        None => vec![
            Series::new("City-Operating", registry.reference_vector(Layer::Operating)),
            Series::new("City-Capital", registry.reference_vector(Layer::Capital)),
            Series::new("Blind", state.values_or_zero(Phase::Blind, Layer::Operating)),
            Series::new("Adjusted", state.values_or_zero(Phase::Adjusted, Layer::Operating)),
        ],
    }
}

#[cfg(test)]
mod tests {
    use civic_types::Allocation;

    use super::*;

    fn state_with(blind: &[u32], adjusted: &[u32]) -> PlayerState {
        let mut state = PlayerState::new(6);
        state
            .store(
                Phase::Blind,
                Layer::Operating,
                Allocation::new(blind.to_vec()).unwrap(),
            )
            .unwrap();
        state
            .store(
                Phase::Adjusted,
                Layer::Operating,
                Allocation::new(adjusted.to_vec()).unwrap(),
            )
            .unwrap();
        state
    }

    #[test]
    fn report_for_city_match() {
        let registry = SectorRegistry::ottawa_2025();
        let city = [34, 12, 29, 10, 12, 3];
        let state = state_with(&[20, 16, 16, 16, 16, 16], &city);
        let report = ComparisonReport::build(&registry, &state, Layer::Operating);

        assert_eq!(report.rows.len(), 6);
        assert_eq!(report.rows[0].name, "Transit");
        assert_eq!(report.rows[0].blind, 20);
        assert_eq!(report.rows[0].city, 34);
        assert_eq!(report.awareness_label(), "9.0%");
        assert_eq!(report.alignment_label(), "100.0%");
    }

    #[test]
    fn missing_submissions_count_as_zero() {
        let registry = SectorRegistry::ottawa_2025();
        let state = PlayerState::new(6);
        let report = ComparisonReport::build(&registry, &state, Layer::Capital);
        assert!(report.awareness.abs() < f64::EPSILON);
        // mean |0 - city| = 100 / 6
        assert!((report.alignment - (100.0 - 100.0 / 6.0)).abs() < 1e-9);
    }

    #[test]
    fn combined_view_uses_operating_submissions() {
        let registry = SectorRegistry::ottawa_2025();
        let state = state_with(&[20, 16, 16, 16, 16, 16], &[34, 12, 29, 10, 12, 3]);
        let series = chart_series(&registry, &state, CompareView::Combined);
        let labels: Vec<&str> = series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["City-Operating", "City-Capital", "Blind", "Adjusted"]);
        assert_eq!(series[1].values, vec![68, 4, 3, 1, 22, 2]);
        assert_eq!(series[2].values[0], 20);
    }

    #[test]
    fn layer_view_has_three_series() {
        let registry = SectorRegistry::ottawa_2025();
        let state = PlayerState::new(6);
        let series = chart_series(&registry, &state, CompareView::Capital);
        assert_eq!(series.len(), 3);
        assert_eq!(series[0].values, vec![68, 4, 3, 1, 22, 2]);
        assert_eq!(series[1].values, vec![0; 6]);
    }
}
