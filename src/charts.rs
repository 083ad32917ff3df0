use crate::models::{AnalysisKind, ChartData, ChartKind, ChartPair, ChartSpec, VizPreference};

/// Label count above which a distribution chart switches from pie to bar.
pub const PIE_LABEL_LIMIT: usize = 8;
/// Slices on the fixed secondary doughnut.
pub const SECONDARY_SLICES: usize = 3;

/// Chart-type decision table. An explicit preference wins; auto keys off
/// the analysis kind.
pub fn resolve_chart_kind(viz: VizPreference, kind: AnalysisKind, label_count: usize) -> ChartKind {
    match viz {
        VizPreference::Distribution => {
            if label_count > PIE_LABEL_LIMIT {
                ChartKind::Bar
            } else {
                ChartKind::Pie
            }
        }
        VizPreference::Relational => ChartKind::Line,
        VizPreference::Hierarchical => ChartKind::PolarArea,
        VizPreference::Categorical => ChartKind::Bar,
        VizPreference::Auto => match kind {
            AnalysisKind::Prediction | AnalysisKind::Trend => ChartKind::Line,
            AnalysisKind::Clustering => ChartKind::Doughnut,
            _ => ChartKind::Bar,
        },
    }
}

/// Resolve the primary chart and attach the fixed secondary doughnut of the
/// leading slices.
pub fn build_charts(viz: VizPreference, kind: AnalysisKind, data: &ChartData) -> ChartPair {
    let primary = ChartSpec {
        kind: resolve_chart_kind(viz, kind, data.labels.len()),
        labels: data.labels.clone(),
        values: data.values.clone(),
    };
    let secondary = ChartSpec {
        kind: ChartKind::Doughnut,
        labels: data.labels.iter().take(SECONDARY_SLICES).cloned().collect(),
        values: data.values.iter().take(SECONDARY_SLICES).copied().collect(),
    };
    ChartPair { primary, secondary }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(n: usize) -> ChartData {
        ChartData {
            labels: (0..n).map(|i| format!("L{i}")).collect(),
            values: (0..n).map(|i| i as f64).collect(),
        }
    }

    #[test]
    fn distribution_switches_on_label_count() {
        let kind = AnalysisKind::Descriptive;
        assert_eq!(
            resolve_chart_kind(VizPreference::Distribution, kind, 9),
            ChartKind::Bar
        );
        assert_eq!(
            resolve_chart_kind(VizPreference::Distribution, kind, 8),
            ChartKind::Pie
        );
        assert_eq!(
            resolve_chart_kind(VizPreference::Distribution, kind, 0),
            ChartKind::Pie
        );
    }

    #[test]
    fn fixed_preferences_ignore_analysis_kind() {
        for kind in [
            AnalysisKind::Descriptive,
            AnalysisKind::Clustering,
            AnalysisKind::Prediction,
        ] {
            assert_eq!(
                resolve_chart_kind(VizPreference::Relational, kind, 2),
                ChartKind::Line
            );
            assert_eq!(
                resolve_chart_kind(VizPreference::Hierarchical, kind, 2),
                ChartKind::PolarArea
            );
            assert_eq!(
                resolve_chart_kind(VizPreference::Categorical, kind, 2),
                ChartKind::Bar
            );
        }
    }

    #[test]
    fn auto_follows_analysis_kind() {
        let auto = VizPreference::Auto;
        assert_eq!(
            resolve_chart_kind(auto, AnalysisKind::Prediction, 2),
            ChartKind::Line
        );
        assert_eq!(
            resolve_chart_kind(auto, AnalysisKind::Trend, 2),
            ChartKind::Line
        );
        assert_eq!(
            resolve_chart_kind(auto, AnalysisKind::Clustering, 2),
            ChartKind::Doughnut
        );
        assert_eq!(
            resolve_chart_kind(auto, AnalysisKind::Descriptive, 2),
            ChartKind::Bar
        );
        assert_eq!(
            resolve_chart_kind(auto, AnalysisKind::Correlation, 2),
            ChartKind::Bar
        );
    }

    #[test]
    fn secondary_takes_first_three_pairs() {
        let charts = build_charts(VizPreference::Auto, AnalysisKind::Descriptive, &data(5));
        assert_eq!(charts.secondary.kind, ChartKind::Doughnut);
        assert_eq!(charts.secondary.labels, vec!["L0", "L1", "L2"]);
        assert_eq!(charts.secondary.values, vec![0.0, 1.0, 2.0]);
        assert_eq!(charts.primary.labels.len(), 5);
    }

    #[test]
    fn secondary_handles_short_input() {
        let charts = build_charts(VizPreference::Auto, AnalysisKind::Descriptive, &data(2));
        assert_eq!(charts.secondary.labels.len(), 2);
        assert_eq!(charts.secondary.values.len(), 2);
    }

    #[test]
    fn polar_area_serializes_with_hyphen() {
        let charts = build_charts(VizPreference::Hierarchical, AnalysisKind::Descriptive, &data(4));
        let json = serde_json::to_value(&charts).unwrap();
        assert_eq!(json["primary"]["kind"], "polar-area");
        assert_eq!(json["secondary"]["kind"], "doughnut");
    }
}
