//! `vanstat diagnostics`: per-feature regression plots plus a report.
//!
//! Every feature is fitted twice against the target: once on the raw target
//! and once on its natural log. A feature whose fit cannot be produced is
//! recorded as skipped with its [`FitError`]; it never aborts the run.
//! Input problems (unreadable file, missing columns, text in the target)
//! abort before anything is written.
//!
//! Plot files are named after [`file_stem`] of the column, so any header
//! text maps to a writable name.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use vs_core::ObservationTable;
use vs_core::reader::read_table;
use vs_inference::{FitError, LinearFit, LogTarget, MIN_OBSERVATIONS, linregress_pairs};
use vs_viz::{BoxplotArtifact, CorrArtifact, HistogramArtifact, ScatterFitArtifact};
use vs_viz_render::config::VizConfig;
use vs_viz_render::output::ImageFormat;
use vs_viz_render::{SvgPlot, write_plot};

use crate::report::{self, DiagnosticsSummary};

pub const DEFAULT_TARGET: &str = "crime_rate";
pub const DEFAULT_NAME: &str = "van";
pub const DEFAULT_FEATURES: [&str; 10] = [
    "pop_density",
    "dropouts_to_grads",
    "one_parent_to_two",
    "crowded_to_not",
    "children_to_adults",
    "non_minority_to_minority",
    "male_to_female",
    "divorce_rate",
    "home_renters_to_owners",
    "low_income_status_pct",
];

/// Resolved inputs for one diagnostics run.
#[derive(Debug, Clone)]
pub struct DiagnosticsPlan {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub target: String,
    pub features: Vec<String>,
    /// City/dataset tag used in summary plot names and titles.
    pub name: String,
    pub format: ImageFormat,
    /// Worker threads for the fitting stage (0 = rayon default).
    pub threads: usize,
}

/// Both fits for one feature.
#[derive(Debug, Clone)]
pub struct FeatureFit {
    pub feature: String,
    pub raw: LinearFit,
    pub log: LinearFit,
}

/// A feature that produced no fit, and why.
#[derive(Debug, Clone)]
pub struct SkippedFeature {
    pub feature: String,
    /// Response of the failing fit (`crime_rate` or `log_crime_rate`).
    pub target: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SkipReason {
    #[error(transparent)]
    Fit(#[from] FitError),
    /// Two feature names map to the same plot file names.
    #[error("output file stem '{stem}' is already used by feature '{other}'")]
    StemCollision { stem: String, other: String },
}

/// File-name stem for a column name. Path separators, characters reserved on
/// common filesystems, and control characters become `_`.
pub fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// Stem per feature, in feature order. A feature whose stem was claimed by
/// an earlier one is skipped.
fn claim_stems(features: &[String], target: &str) -> Vec<Result<String, SkippedFeature>> {
    let mut claimed: HashMap<String, &str> = HashMap::new();
    features
        .iter()
        .map(|feature| {
            let stem = file_stem(feature);
            if let Some(other) = claimed.get(&stem) {
                return Err(SkippedFeature {
                    feature: feature.clone(),
                    target: target.to_string(),
                    reason: SkipReason::StemCollision { stem, other: other.to_string() },
                });
            }
            claimed.insert(stem.clone(), feature);
            Ok(stem)
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct DiagnosticsOutcome {
    pub log_target: LogTarget,
    /// Successful features, in feature order.
    pub fits: Vec<FeatureFit>,
    /// Failed features, in feature order.
    pub skipped: Vec<SkippedFeature>,
    /// Plot files written, in write order.
    pub plots: Vec<PathBuf>,
    /// `linregress_report.txt` and `summary.json`.
    pub reports: Vec<PathBuf>,
}

/// Fit `feature` against the raw target column and against `log_target`.
///
/// Rows are paired by pairwise deletion. A feature column holding text
/// fails with [`FitError::NonNumeric`] before any arithmetic.
pub fn fit_feature(
    table: &ObservationTable,
    feature: &str,
    target: &str,
    log_target: &LogTarget,
) -> std::result::Result<FeatureFit, SkippedFeature> {
    let skip = |response: &str, reason: FitError| SkippedFeature {
        feature: feature.to_string(),
        target: response.to_string(),
        reason: reason.into(),
    };
    let absent = FitError::InsufficientData { n: 0, min: MIN_OBSERVATIONS };

    let x = table.column(feature).ok_or_else(|| skip(target, absent.clone()))?;
    if x.non_numeric > 0 {
        return Err(skip(target, FitError::NonNumeric { count: x.non_numeric }));
    }
    let y = table.column(target).ok_or_else(|| skip(target, absent))?;

    let raw = linregress_pairs(&x.values, &y.values).map_err(|e| skip(target, e))?;
    let log =
        linregress_pairs(&x.values, &log_target.values).map_err(|e| skip(&log_target.name, e))?;
    Ok(FeatureFit { feature: feature.to_string(), raw, log })
}

fn emit<P: SvgPlot>(
    plot: &P,
    dir: &Path,
    stem: &str,
    plan: &DiagnosticsPlan,
    viz: &VizConfig,
    written: &mut Vec<PathBuf>,
) -> Result<()> {
    let path = dir.join(format!("{stem}.{}", plan.format.extension()));
    write_plot(plot, &path, viz).with_context(|| format!("failed to write {}", path.display()))?;
    written.push(path);
    Ok(())
}

fn emit_feature_plots(
    fit: &FeatureFit,
    stem: &str,
    plan: &DiagnosticsPlan,
    log_name: &str,
    viz: &VizConfig,
    written: &mut Vec<PathBuf>,
) -> Result<()> {
    let (x, y, dir) = (fit.feature.as_str(), plan.target.as_str(), plan.output_dir.as_path());

    let raw = ScatterFitArtifact::from_fit(&fit.raw, x, y, format!("Scatter Plot for ({x}, {y})"));
    emit(&raw, dir, &format!("{stem}_scatter"), plan, viz, written)?;

    let log = ScatterFitArtifact::from_fit(
        &fit.log,
        x,
        log_name,
        format!("Scatter Plot for ({x}, log({y}))"),
    );
    emit(&log, dir, &format!("{stem}_logcrime_scatter"), plan, viz, written)?;

    if let Some(hist) = HistogramArtifact::from_values(
        &fit.log.residuals,
        viz.histogram.bins,
        &format!("residual of {log_name}"),
        format!("Residuals for ({x}, log({y}))"),
    ) {
        emit(&hist, dir, &format!("{stem}_residuals_hist"), plan, viz, written)?;
    }
    Ok(())
}

fn emit_summary_plots(
    table: &ObservationTable,
    plan: &DiagnosticsPlan,
    log_target: &LogTarget,
    viz: &VizConfig,
    written: &mut Vec<PathBuf>,
) -> Result<()> {
    let (name, dir, log_name) = (&plan.name, plan.output_dir.as_path(), &log_target.name);
    let stem = file_stem(name);
    let values = log_target.valid_values();

    match HistogramArtifact::from_values(
        &values,
        viz.histogram.bins,
        log_name,
        format!("Histogram for {log_name} in {name}"),
    ) {
        Some(hist) => emit(&hist, dir, &format!("{stem}_log_hist"), plan, viz, written)?,
        None => tracing::warn!(column = %log_name, "no positive target values; skipping histogram"),
    }

    match BoxplotArtifact::from_values(
        &values,
        log_name,
        format!("Box Plot for {log_name} in {name}"),
        true,
    ) {
        Some(bp) => emit(&bp, dir, &format!("{stem}_log_boxplot"), plan, viz, written)?,
        None => tracing::warn!(column = %log_name, "no positive target values; skipping boxplot"),
    }

    let numeric: Vec<String> = plan
        .features
        .iter()
        .filter(|f| table.column(f).is_some_and(|c| c.is_numeric()))
        .cloned()
        .collect();
    let corr = CorrArtifact::from_table(
        table,
        log_target,
        &numeric,
        format!("Correlation matrix for {name}"),
    );
    emit(&corr, dir, &format!("{stem}_correlation_matrix"), plan, viz, written)
}

/// Run the whole pipeline: load, validate, fit, plot, report.
pub fn run_diagnostics(plan: &DiagnosticsPlan, viz: &VizConfig) -> Result<DiagnosticsOutcome> {
    let table = read_table(&plan.input)
        .with_context(|| format!("failed to read {}", plan.input.display()))?;

    let mut required: Vec<&str> = vec![plan.target.as_str()];
    required.extend(plan.features.iter().map(String::as_str));
    table.require_columns(&plan.input.display().to_string(), &required)?;

    let Some(target) = table.column(&plan.target) else {
        bail!("target column '{}' not found", plan.target);
    };
    if !target.is_numeric() {
        bail!(
            "target column '{}' has {} non-numeric value(s)",
            plan.target,
            target.non_numeric
        );
    }

    let log_target = LogTarget::from_column(target);
    if log_target.excluded_nonpositive > 0 || log_target.missing > 0 {
        tracing::warn!(
            column = %plan.target,
            excluded_nonpositive = log_target.excluded_nonpositive,
            missing = log_target.missing,
            "rows dropped from {}",
            log_target.name
        );
    }

    std::fs::create_dir_all(&plan.output_dir)
        .with_context(|| format!("failed to create {}", plan.output_dir.display()))?;

    if plan.threads > 0 {
        // Ignore error if the global pool is already initialized.
        let _ = rayon::ThreadPoolBuilder::new().num_threads(plan.threads).build_global();
    }

    let stems = claim_stems(&plan.features, &plan.target);
    let results: Vec<_> = plan
        .features
        .par_iter()
        .zip(stems.into_par_iter())
        .map(|(f, stem)| match stem {
            Ok(stem) => fit_feature(&table, f, &plan.target, &log_target).map(|fit| (stem, fit)),
            Err(collision) => Err(collision),
        })
        .collect();

    let mut fits = Vec::new();
    let mut skipped = Vec::new();
    let mut plots = Vec::new();
    for result in results {
        match result {
            Ok((stem, fit)) => {
                tracing::info!(
                    feature = %fit.feature,
                    slope = fit.raw.slope,
                    log_slope = fit.log.slope,
                    n = fit.raw.n(),
                    "fit complete"
                );
                emit_feature_plots(&fit, &stem, plan, &log_target.name, viz, &mut plots)?;
                fits.push(fit);
            }
            Err(s) => {
                tracing::warn!(
                    feature = %s.feature,
                    target = %s.target,
                    reason = %s.reason,
                    "skipping feature"
                );
                skipped.push(s);
            }
        }
    }

    emit_summary_plots(&table, plan, &log_target, viz, &mut plots)?;

    let mut outcome = DiagnosticsOutcome { log_target, fits, skipped, plots, reports: Vec::new() };
    let summary = DiagnosticsSummary::new(plan, &outcome);
    outcome.reports = report::write_report(&plan.output_dir, &summary)?.to_vec();
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use vs_core::Column;

    fn table(cols: Vec<Column>) -> ObservationTable {
        ObservationTable::from_columns(cols).unwrap()
    }

    fn log_of(t: &ObservationTable, name: &str) -> LogTarget {
        LogTarget::from_column(t.column(name).unwrap())
    }

    #[test]
    fn fits_raw_and_log_targets() {
        let t = table(vec![
            Column::from_values("crime_rate", &[10.0, 20.0, 40.0]),
            Column::from_values("income", &[1.0, 2.0, 4.0]),
        ]);
        let log = log_of(&t, "crime_rate");
        let fit = fit_feature(&t, "income", "crime_rate", &log).unwrap();
        assert_relative_eq!(fit.raw.slope, 10.0, epsilon = 1e-9);
        assert_relative_eq!(fit.raw.intercept, 0.0, epsilon = 1e-9);
        assert!(fit.log.slope > 0.0);
        assert_eq!(fit.log.residuals.len(), 3);
    }

    #[test]
    fn zero_variance_names_the_raw_target() {
        let t = table(vec![
            Column::from_values("crime_rate", &[1.0, 2.0, 3.0]),
            Column::from_values("flat", &[5.0, 5.0, 5.0]),
        ]);
        let log = log_of(&t, "crime_rate");
        let s = fit_feature(&t, "flat", "crime_rate", &log).unwrap_err();
        assert_eq!(s.feature, "flat");
        assert_eq!(s.target, "crime_rate");
        assert!(matches!(s.reason, SkipReason::Fit(FitError::ZeroVariance { .. })));
    }

    #[test]
    fn log_fit_can_fail_alone() {
        // Only one row has a positive target, so the log fit is short of data.
        let t = table(vec![
            Column::from_values("crime_rate", &[0.0, -1.0, 3.0, 0.0]),
            Column::from_values("x", &[1.0, 2.0, 3.0, 4.0]),
        ]);
        let log = log_of(&t, "crime_rate");
        let s = fit_feature(&t, "x", "crime_rate", &log).unwrap_err();
        assert_eq!(s.target, "log_crime_rate");
        let short = FitError::InsufficientData { n: 1, min: MIN_OBSERVATIONS };
        assert_eq!(s.reason, SkipReason::Fit(short));
    }

    #[test]
    fn text_feature_is_non_numeric() {
        let headers = vec!["crime_rate".to_string(), "label".to_string()];
        let rows = vec![
            vec!["1".to_string(), "a".to_string()],
            vec!["2".to_string(), "b".to_string()],
            vec!["3".to_string(), "4".to_string()],
        ];
        let t = ObservationTable::from_records(headers, rows).unwrap();
        let log = log_of(&t, "crime_rate");
        let s = fit_feature(&t, "label", "crime_rate", &log).unwrap_err();
        assert_eq!(s.reason, SkipReason::Fit(FitError::NonNumeric { count: 2 }));
    }

    #[test]
    fn stems_replace_path_and_reserved_characters() {
        assert_eq!(file_stem("crimes/1000"), "crimes_1000");
        assert_eq!(file_stem(r"a\b:c*d?e"), "a_b_c_d_e");
        assert_eq!(file_stem("nul\0tab\t"), "nul_tab_");
        assert_eq!(file_stem("pop_density"), "pop_density");
    }

    #[test]
    fn colliding_stem_skips_the_later_feature() {
        let features: Vec<String> =
            ["crimes/1000", "income", "crimes:1000"].iter().map(|s| s.to_string()).collect();
        let stems = claim_stems(&features, "crime_rate");
        assert_eq!(stems[0].as_ref().unwrap(), "crimes_1000");
        assert_eq!(stems[1].as_ref().unwrap(), "income");
        let s = stems[2].as_ref().unwrap_err();
        assert_eq!(s.feature, "crimes:1000");
        assert_eq!(
            s.reason,
            SkipReason::StemCollision { stem: "crimes_1000".into(), other: "crimes/1000".into() }
        );
    }
}
