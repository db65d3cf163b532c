use serde::{Deserialize, Serialize};

/// Quantile of an ascending slice using linear interpolation between order
/// statistics (numpy/pandas default). `p` is clamped to `[0, 1]`.
///
/// Returns `None` for an empty slice.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let h = (n - 1) as f64 * p.clamp(0.0, 1.0);
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    Some(sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo]))
}

fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut v: Vec<f64> = values.iter().copied().filter(|x| x.is_finite()).collect();
    v.sort_by(f64::total_cmp);
    v
}

/// Equal-width histogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// `bins + 1` ascending edges.
    pub edges: Vec<f64>,
    /// Count per bin. The last bin is closed on the right.
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Total number of binned values.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Bin finite `values` into `bins` equal-width bins spanning their range.
///
/// A degenerate range `[v, v]` is widened to `[v - 0.5, v + 0.5]`. Returns
/// `None` when there are no finite values or `bins == 0`.
pub fn histogram(values: &[f64], bins: usize) -> Option<Histogram> {
    let v = sorted_copy(values);
    if v.is_empty() || bins == 0 {
        return None;
    }
    let (mut lo, mut hi) = (v[0], v[v.len() - 1]);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;
    let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();
    let mut counts = vec![0usize; bins];
    for x in v {
        let idx = (((x - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }
    Some(Histogram { edges, counts })
}

/// Boxplot statistics (Tukey whiskers at 1.5 IQR, McGill notches).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxStats {
    /// Number of values.
    pub n: usize,
    /// Smallest value.
    pub min: f64,
    /// First quartile.
    pub q1: f64,
    /// Median.
    pub median: f64,
    /// Third quartile.
    pub q3: f64,
    /// Largest value.
    pub max: f64,
    /// Lowest value within `q1 - 1.5 IQR`.
    pub whisker_lo: f64,
    /// Highest value within `q3 + 1.5 IQR`.
    pub whisker_hi: f64,
    /// Lower notch: `median - 1.57 IQR / sqrt(n)`.
    pub notch_lo: f64,
    /// Upper notch: `median + 1.57 IQR / sqrt(n)`.
    pub notch_hi: f64,
    /// Values outside the whiskers.
    pub outliers: Vec<f64>,
}

impl BoxStats {
    /// Compute boxplot statistics; `None` when there are no finite values.
    pub fn compute(values: &[f64]) -> Option<Self> {
        let v = sorted_copy(values);
        let n = v.len();
        let q1 = quantile_sorted(&v, 0.25)?;
        let median = quantile_sorted(&v, 0.5)?;
        let q3 = quantile_sorted(&v, 0.75)?;
        let iqr = q3 - q1;
        let lo_fence = q1 - 1.5 * iqr;
        let hi_fence = q3 + 1.5 * iqr;
        let whisker_lo = v.iter().copied().find(|&x| x >= lo_fence).unwrap_or(q1);
        let whisker_hi = v.iter().rev().copied().find(|&x| x <= hi_fence).unwrap_or(q3);
        let outliers = v.iter().copied().filter(|&x| x < lo_fence || x > hi_fence).collect();
        let half_notch = 1.57 * iqr / (n as f64).sqrt();
        Some(Self {
            n,
            min: v[0],
            q1,
            median,
            q3,
            max: v[n - 1],
            whisker_lo,
            whisker_hi,
            notch_lo: median - half_notch,
            notch_hi: median + half_notch,
            outliers,
        })
    }
}

/// Pearson correlation over rows where both columns are present.
///
/// `None` when fewer than two complete pairs exist or either side is constant.
pub fn pairwise_correlation(a: &[Option<f64>], b: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> =
        a.iter().zip(b).filter_map(|(x, y)| Some(((*x)?, (*y)?))).collect();
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mx = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let my = pairs.iter().map(|p| p.1).sum::<f64>() / n;
    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        sxx += (x - mx) * (x - mx);
        syy += (y - my) * (y - my);
        sxy += (x - mx) * (y - my);
    }
    if sxx <= 0.0 || syy <= 0.0 {
        return None;
    }
    Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

/// Pairwise-complete correlation matrix (pandas `DataFrame.corr()` semantics).
pub fn correlation_matrix(columns: &[&[Option<f64>]]) -> Vec<Vec<Option<f64>>> {
    let k = columns.len();
    let mut out = vec![vec![None; k]; k];
    for i in 0..k {
        for j in i..k {
            let c = pairwise_correlation(columns[i], columns[j]);
            out[i][j] = c;
            out[j][i] = c;
        }
    }
    out
}
