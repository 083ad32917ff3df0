use crate::dataset::{Dataset, NumericFrame};
use crate::models::{Analysis, AnalysisKind, ChartData, Insight, VizPreference};

/// Rows shown on the prediction chart.
pub const PREDICTION_POINTS: usize = 10;
/// Columns shown on the mean chart.
pub const MEAN_COLUMNS: usize = 5;
/// Cluster count cap; fewer rows than this means fewer clusters.
pub const MAX_CLUSTERS: usize = 3;

const KMEANS_MAX_ITER: usize = 100;

/// Run one analysis pass over the dataset. Branches that cannot run on the
/// numeric view either warn or drop through to the descriptive fallback;
/// warnings count as insights and therefore suppress the fallback.
pub fn run_analysis(kind: AnalysisKind, viz: VizPreference, dataset: &Dataset) -> Analysis {
    let frame = NumericFrame::from_dataset(dataset);
    let mut insights = Vec::new();
    let mut chart_data = ChartData::default();

    match kind {
        AnalysisKind::Clustering if !frame.is_empty() => {
            if frame.len() < 2 {
                insights.push(Insight::warning(
                    "Insufficient data for clustering (need >= 2 rows).",
                ));
            } else {
                let counts = cluster_counts(&frame);
                chart_data = ChartData {
                    labels: (1..=counts.len()).map(|i| format!("Cluster {i}")).collect(),
                    values: counts.iter().map(|&c| c as f64).collect(),
                };
                insights.push(Insight::ml(format!(
                    "K-Means identified {} patterns in the numeric data.",
                    counts.len()
                )));
            }
        }
        AnalysisKind::Prediction if frame.width() >= 1 => {
            if frame.len() < 5 {
                insights.push(Insight::warning(
                    "Predictive modeling requires more data points for accuracy.",
                ));
            } else {
                let y = frame.column(0);
                let score = regression_r2(&y);
                chart_data = ChartData {
                    labels: (0..y.len().min(PREDICTION_POINTS))
                        .map(|i| format!("Row {i}"))
                        .collect(),
                    values: y.iter().take(PREDICTION_POINTS).copied().collect(),
                };
                insights.push(Insight::ml(format!(
                    "Linear Regression fit achieved (R²={score:.2})."
                )));
            }
        }
        AnalysisKind::Correlation if !frame.is_empty() => {
            if let Some(pair) = strongest_correlation(&frame) {
                insights.push(Insight::stat(format!(
                    "Strong correlation between '{}' and '{}' (r={:.2}).",
                    pair.first, pair.second, pair.r
                )));
            }
            chart_data = mean_chart(&frame);
        }
        _ => {}
    }

    if insights.is_empty() {
        insights.push(Insight::stat(format!(
            "Summary check: Found {} rows and {} features.",
            dataset.rows(),
            dataset.width()
        )));
        if !frame.is_empty() {
            chart_data = mean_chart(&frame);
        }
    }

    Analysis {
        kind: kind.as_str(),
        viz_preference: viz.as_str(),
        insights,
        chart_data,
    }
}

/// Cluster the standardized rows and count members per label. The counts
/// vector runs to the highest assigned label, so emptied clusters still
/// report zero.
fn cluster_counts(frame: &NumericFrame) -> Vec<usize> {
    let points = standardize(&frame.rows);
    let k = MAX_CLUSTERS.min(points.len());
    let labels = k_means(&points, k);
    let max_label = labels.iter().copied().max().unwrap_or(0);
    let mut counts = vec![0usize; max_label + 1];
    for &label in &labels {
        counts[label] += 1;
    }
    counts
}

/// Per-column z-scores over the population. A zero-variance column maps
/// to all zeros.
fn standardize(rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let width = rows.first().map_or(0, Vec::len);
    let len = rows.len() as f64;
    let mut means = vec![0.0; width];
    for row in rows {
        for (idx, value) in row.iter().enumerate() {
            means[idx] += value;
        }
    }
    for mean in &mut means {
        *mean /= len;
    }
    let mut stds = vec![0.0; width];
    for row in rows {
        for (idx, value) in row.iter().enumerate() {
            let diff = value - means[idx];
            stds[idx] += diff * diff;
        }
    }
    for std in &mut stds {
        *std = (*std / len).sqrt();
    }
    rows.iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(idx, value)| {
                    if stds[idx] == 0.0 {
                        0.0
                    } else {
                        (value - means[idx]) / stds[idx]
                    }
                })
                .collect()
        })
        .collect()
}

/// Lloyd iteration seeded with evenly spaced rows, so runs are
/// deterministic. An emptied cluster keeps its previous centroid.
fn k_means(points: &[Vec<f64>], k: usize) -> Vec<usize> {
    let mut centroids: Vec<Vec<f64>> = (0..k)
        .map(|i| points[i * points.len() / k].clone())
        .collect();
    let mut labels = vec![0usize; points.len()];
    for _ in 0..KMEANS_MAX_ITER {
        let next: Vec<usize> = points.iter().map(|p| nearest(p, &centroids)).collect();
        if next == labels {
            break;
        }
        labels = next;
        for (idx, centroid) in centroids.iter_mut().enumerate() {
            let members: Vec<&Vec<f64>> = points
                .iter()
                .zip(&labels)
                .filter(|&(_, &label)| label == idx)
                .map(|(p, _)| p)
                .collect();
            if members.is_empty() {
                continue;
            }
            for (dim, slot) in centroid.iter_mut().enumerate() {
                *slot = members.iter().map(|p| p[dim]).sum::<f64>() / members.len() as f64;
            }
        }
    }
    labels
}

fn nearest(point: &[f64], centroids: &[Vec<f64>]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (idx, centroid) in centroids.iter().enumerate() {
        let dist: f64 = point
            .iter()
            .zip(centroid)
            .map(|(a, b)| (a - b) * (a - b))
            .sum();
        if dist < best_dist {
            best = idx;
            best_dist = dist;
        }
    }
    best
}

/// R² of a least-squares line fit of the series against its row index.
/// A constant series is a perfect fit.
fn regression_r2(y: &[f64]) -> f64 {
    let n = y.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = y.iter().sum::<f64>() / n;
    let mut sxx = 0.0;
    let mut sxy = 0.0;
    let mut syy = 0.0;
    for (i, value) in y.iter().enumerate() {
        let dx = i as f64 - x_mean;
        let dy = value - y_mean;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }
    if syy == 0.0 {
        return 1.0;
    }
    (sxy * sxy) / (sxx * syy)
}

struct CorrelationPair {
    first: String,
    second: String,
    r: f64,
}

/// Most positive pairwise Pearson coefficient strictly below 1. Undefined
/// coefficients (zero variance, too few rows) are skipped.
fn strongest_correlation(frame: &NumericFrame) -> Option<CorrelationPair> {
    let mut best: Option<CorrelationPair> = None;
    for i in 0..frame.width() {
        for j in (i + 1)..frame.width() {
            let r = pearson(&frame.column(i), &frame.column(j));
            if !r.is_finite() || r >= 1.0 {
                continue;
            }
            if best.as_ref().map_or(true, |b| r > b.r) {
                best = Some(CorrelationPair {
                    first: frame.names[i].clone(),
                    second: frame.names[j].clone(),
                    r,
                });
            }
        }
    }
    best
}

fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len() as f64;
    let mean_a = a.iter().sum::<f64>() / n;
    let mean_b = b.iter().sum::<f64>() / n;
    let mut saa = 0.0;
    let mut sbb = 0.0;
    let mut sab = 0.0;
    for (x, y) in a.iter().zip(b) {
        let da = x - mean_a;
        let db = y - mean_b;
        saa += da * da;
        sbb += db * db;
        sab += da * db;
    }
    sab / (saa * sbb).sqrt()
}

fn mean_chart(frame: &NumericFrame) -> ChartData {
    ChartData {
        labels: frame.names.iter().take(MEAN_COLUMNS).cloned().collect(),
        values: frame.column_means().into_iter().take(MEAN_COLUMNS).collect(),
    }
}
