use std::collections::BTreeMap;

use super::filter::FilteredView;
use super::model::Dimension;
use super::scoring::mean_present;

// ---------------------------------------------------------------------------
// Summary statistics
// ---------------------------------------------------------------------------

/// Aggregates of one dimension over a view. `None` means undefined: no
/// present values (or, for `std_dev`, fewer than two).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DimensionSummary {
    /// Number of present values.
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (n − 1).
    pub std_dev: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

pub type Summary = BTreeMap<Dimension, DimensionSummary>;

/// Describe a slice of present values.
pub fn describe(values: &[f64]) -> DimensionSummary {
    if values.is_empty() {
        return DimensionSummary::default();
    }
    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;
    let std_dev = (n > 1).then(|| {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (n - 1) as f64).sqrt()
    });
    DimensionSummary {
        count: n,
        mean: Some(mean),
        std_dev,
        min: values.iter().copied().reduce(f64::min),
        max: values.iter().copied().reduce(f64::max),
    }
}

/// Present scores of `dim` across the view, in row order.
pub fn dimension_values(view: FilteredView<'_>, dim: Dimension) -> Vec<f64> {
    view.respondents().filter_map(|r| r.score(dim)).collect()
}

/// Mean, standard deviation, min and max per dimension.
pub fn summarize(view: FilteredView<'_>, dims: &[Dimension]) -> Summary {
    dims.iter()
        .map(|&dim| (dim, describe(&dimension_values(view, dim))))
        .collect()
}

// ---------------------------------------------------------------------------
// Radar series
// ---------------------------------------------------------------------------

/// One respondent's polygon on the radar chart.
#[derive(Debug, Clone, PartialEq)]
pub struct RadarTrace {
    pub id: String,
    /// Scores in the order of [`RadarSeries::dims`]; missing passes through.
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadarSeries {
    pub dims: Vec<Dimension>,
    /// One trace per respondent, in view order.
    pub rows: Vec<RadarTrace>,
    /// Per-dimension mean over present values.
    pub average: Vec<Option<f64>>,
}

pub fn radar_series(view: FilteredView<'_>, dims: &[Dimension]) -> RadarSeries {
    let rows = view
        .respondents()
        .map(|r| RadarTrace {
            id: r.id.clone(),
            values: dims.iter().map(|&d| r.score(d)).collect(),
        })
        .collect();
    let average = dims
        .iter()
        .map(|&d| mean_present(view.respondents().map(|r| r.score(d))))
        .collect();
    RadarSeries {
        dims: dims.to_vec(),
        rows,
        average,
    }
}

// ---------------------------------------------------------------------------
// Distribution (box plot input)
// ---------------------------------------------------------------------------

/// Five-number summary plus mean and standard deviation overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxStats {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    pub dim: Dimension,
    /// Present values in row order.
    pub values: Vec<f64>,
    /// `None` when there are no present values.
    pub box_stats: Option<BoxStats>,
}

/// Quantile of already sorted data, linear interpolation between
/// closest ranks.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let pos = q.clamp(0.0, 1.0) * last as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

pub fn box_stats(values: &[f64]) -> Option<BoxStats> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let summary = describe(&sorted);
    Some(BoxStats {
        min: *sorted.first()?,
        q1: quantile(&sorted, 0.25)?,
        median: quantile(&sorted, 0.5)?,
        q3: quantile(&sorted, 0.75)?,
        max: *sorted.last()?,
        mean: summary.mean?,
        std_dev: summary.std_dev,
    })
}

pub fn distribution(view: FilteredView<'_>, dim: Dimension) -> Distribution {
    let values = dimension_values(view, dim);
    let box_stats = box_stats(&values);
    Distribution {
        dim,
        values,
        box_stats,
    }
}
