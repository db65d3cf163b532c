//! Ordinary least squares with a single predictor.
//!
//! Solves the normal equations `beta = (X'X)^{-1} X'y` for the design matrix
//! `X = [1, x]` and reports the same statistics as `scipy.stats.linregress`:
//! correlation coefficient, two-sided p-value for `slope = 0` (Student t with
//! `n - 2` degrees of freedom), and standard errors of slope and intercept.

use nalgebra::{DMatrix, DVector};
use statrs::distribution::{ContinuousCDF, StudentsT};
use thiserror::Error;

/// Smallest sample for which the slope standard error is defined (`n - 2 >= 1`).
pub const MIN_OBSERVATIONS: usize = 3;

/// Why a single-predictor fit could not be produced.
///
/// These are per-feature conditions: callers record them and move on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    /// The predictor column holds text.
    #[error("non-numeric values in {count} row(s)")]
    NonNumeric {
        /// Number of non-numeric cells.
        count: usize,
    },
    /// Too few complete (x, y) pairs.
    #[error("insufficient data: {n} complete observation(s), need at least {min}")]
    InsufficientData {
        /// Complete pairs available.
        n: usize,
        /// Required minimum.
        min: usize,
    },
    /// Every predictor value is identical, so the slope is undefined.
    #[error("zero variance: every value equals {value}")]
    ZeroVariance {
        /// The constant value.
        value: f64,
    },
    /// `X'X` could not be inverted.
    #[error("singular design matrix")]
    Singular,
}

/// Result of a single-predictor least-squares fit.
#[derive(Debug, Clone)]
pub struct LinearFit {
    /// Slope coefficient.
    pub slope: f64,
    /// Intercept.
    pub intercept: f64,
    /// Pearson correlation coefficient of (x, y). 0 when y is constant.
    pub r: f64,
    /// Coefficient of determination `1 - RSS/TSS`. 0 when y is constant.
    pub r_squared: f64,
    /// Two-sided p-value of the slope t-test.
    pub p_value: f64,
    /// Standard error of the slope.
    pub slope_stderr: f64,
    /// Standard error of the intercept.
    pub intercept_stderr: f64,
    /// Source row index of each pair used in the fit.
    pub rows: Vec<usize>,
    /// Predictor values used.
    pub x: Vec<f64>,
    /// Response values used.
    pub y: Vec<f64>,
    /// Fitted values `intercept + slope * x`.
    pub fitted: Vec<f64>,
    /// Residuals `y - fitted`.
    pub residuals: Vec<f64>,
}

impl LinearFit {
    /// Number of observations used.
    pub fn n(&self) -> usize {
        self.x.len()
    }
}

/// Fit `y = intercept + slope * x` on complete slices.
pub fn linregress(x: &[f64], y: &[f64]) -> Result<LinearFit, FitError> {
    let xs: Vec<Option<f64>> = x.iter().map(|&v| v.is_finite().then_some(v)).collect();
    let ys: Vec<Option<f64>> = y.iter().map(|&v| v.is_finite().then_some(v)).collect();
    linregress_pairs(&xs, &ys)
}

/// Fit on row-aligned optional columns, dropping rows where either side is missing.
///
/// Rows are paired by index; if the slices differ in length the extra tail is
/// ignored.
pub fn linregress_pairs(x: &[Option<f64>], y: &[Option<f64>]) -> Result<LinearFit, FitError> {
    let mut rows = Vec::with_capacity(x.len());
    let mut xv = Vec::with_capacity(x.len());
    let mut yv = Vec::with_capacity(x.len());
    for (i, (xi, yi)) in x.iter().zip(y).enumerate() {
        if let (Some(a), Some(b)) = (xi, yi) {
            rows.push(i);
            xv.push(*a);
            yv.push(*b);
        }
    }

    let n = xv.len();
    if n < MIN_OBSERVATIONS {
        return Err(FitError::InsufficientData { n, min: MIN_OBSERVATIONS });
    }
    let (x_min, x_max) = xv.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
        (lo.min(v), hi.max(v))
    });
    if x_max == x_min {
        return Err(FitError::ZeroVariance { value: x_min });
    }

    // Design matrix [1, x]
    let design = DMatrix::from_fn(n, 2, |i, j| if j == 0 { 1.0 } else { xv[i] });
    let y_vec = DVector::from_column_slice(&yv);

    let xtx = design.transpose() * &design;
    let xty = design.transpose() * &y_vec;
    let xtx_inv = xtx.try_inverse().ok_or(FitError::Singular)?;
    let beta = &xtx_inv * xty;
    let (intercept, slope) = (beta[0], beta[1]);
    if !intercept.is_finite() || !slope.is_finite() {
        return Err(FitError::Singular);
    }

    let fitted: Vec<f64> = xv.iter().map(|&xi| intercept + slope * xi).collect();
    let residuals: Vec<f64> = yv.iter().zip(&fitted).map(|(yi, fi)| yi - fi).collect();
    let rss: f64 = residuals.iter().map(|r| r * r).sum();

    let nf = n as f64;
    let x_mean = xv.iter().sum::<f64>() / nf;
    let y_mean = yv.iter().sum::<f64>() / nf;
    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (xi, yi) in xv.iter().zip(&yv) {
        let dx = xi - x_mean;
        let dy = yi - y_mean;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }
    let (r, r_squared) = if syy > 0.0 {
        let r = (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0);
        (r, (1.0 - rss / syy).clamp(0.0, 1.0))
    } else {
        (0.0, 0.0)
    };

    // sigma^2 = RSS / (n - 2)
    let dof = nf - 2.0;
    let sigma2 = rss / dof;
    let intercept_stderr = (sigma2 * xtx_inv[(0, 0)]).max(0.0).sqrt();
    let slope_stderr = (sigma2 * xtx_inv[(1, 1)]).max(0.0).sqrt();
    let p_value = slope_p_value(slope, slope_stderr, dof);

    Ok(LinearFit {
        slope,
        intercept,
        r,
        r_squared,
        p_value,
        slope_stderr,
        intercept_stderr,
        rows,
        x: xv,
        y: yv,
        fitted,
        residuals,
    })
}

fn slope_p_value(slope: f64, stderr: f64, dof: f64) -> f64 {
    if stderr == 0.0 {
        // Exact fit: any nonzero slope is infinitely significant.
        return if slope == 0.0 { 1.0 } else { 0.0 };
    }
    let t = (slope / stderr).abs();
    match StudentsT::new(0.0, 1.0, dof) {
        Ok(dist) => (2.0 * (1.0 - dist.cdf(t))).clamp(0.0, 1.0),
        Err(_) => f64::NAN,
    }
}
