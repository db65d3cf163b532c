//! Diagnostics report: `linregress_report.txt` and `summary.json`.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use vs_inference::LinearFit;
use vs_viz::ArtifactMeta;

use crate::diagnostics::{DiagnosticsOutcome, DiagnosticsPlan};

pub const REPORT_FILE: &str = "linregress_report.txt";
pub const SUMMARY_FILE: &str = "summary.json";

const SCHEMA_VERSION: &str = "vanstat_diagnostics_summary_v1";

#[derive(Debug, Clone, Serialize)]
pub struct FitStats {
    pub n: usize,
    pub slope: f64,
    pub intercept: f64,
    pub r: f64,
    pub r_squared: f64,
    pub p_value: f64,
    pub slope_stderr: f64,
    pub intercept_stderr: f64,
}

impl From<&LinearFit> for FitStats {
    fn from(fit: &LinearFit) -> Self {
        Self {
            n: fit.n(),
            slope: fit.slope,
            intercept: fit.intercept,
            r: fit.r,
            r_squared: fit.r_squared,
            p_value: fit.p_value,
            slope_stderr: fit.slope_stderr,
            intercept_stderr: fit.intercept_stderr,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FeatureSummary {
    pub feature: String,
    pub raw: FitStats,
    pub log: FitStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkipSummary {
    pub feature: String,
    /// Response of the fit that failed.
    pub target: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogTargetSummary {
    pub name: String,
    pub used: usize,
    pub excluded_nonpositive: usize,
    pub missing: usize,
}

/// Machine-readable twin of the text report.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticsSummary {
    pub schema_version: String,
    pub meta: ArtifactMeta,
    pub input: String,
    pub name: String,
    pub target: String,
    pub log_target: LogTargetSummary,
    pub total_features: usize,
    pub fitted: Vec<FeatureSummary>,
    pub skipped: Vec<SkipSummary>,
    /// Plot files, relative to the output directory.
    pub plots: Vec<String>,
}

impl DiagnosticsSummary {
    pub fn new(plan: &DiagnosticsPlan, outcome: &DiagnosticsOutcome) -> Self {
        let log = &outcome.log_target;
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            meta: ArtifactMeta::default(),
            input: plan.input.display().to_string(),
            name: plan.name.clone(),
            target: plan.target.clone(),
            log_target: LogTargetSummary {
                name: log.name.clone(),
                used: log.n_valid(),
                excluded_nonpositive: log.excluded_nonpositive,
                missing: log.missing,
            },
            total_features: plan.features.len(),
            fitted: outcome
                .fits
                .iter()
                .map(|f| FeatureSummary {
                    feature: f.feature.clone(),
                    raw: FitStats::from(&f.raw),
                    log: FitStats::from(&f.log),
                })
                .collect(),
            skipped: outcome
                .skipped
                .iter()
                .map(|s| SkipSummary {
                    feature: s.feature.clone(),
                    target: s.target.clone(),
                    reason: s.reason.to_string(),
                })
                .collect(),
            plots: outcome
                .plots
                .iter()
                .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
                .collect(),
        }
    }
}

fn stat_line(out: &mut String, label: &str, value: f64) {
    let _ = writeln!(out, "{label:<25}{value:>10.6}");
}

fn fit_section(out: &mut String, x: &str, y: &str, s: &FitStats) {
    let _ = writeln!(out, "Information we get from the linear regression for ({x}, {y})");
    let _ = writeln!(out, "{:<25}{:>10}", "Observations:", s.n);
    stat_line(out, "Slope:", s.slope);
    stat_line(out, "Intercept:", s.intercept);
    stat_line(out, "Correlation coefficient:", s.r);
    stat_line(out, "R-squared:", s.r_squared);
    stat_line(out, "p-value:", s.p_value);
    stat_line(out, "Error of slope:", s.slope_stderr);
    stat_line(out, "Error of intercept:", s.intercept_stderr);
}

/// Fixed-width text report, one section per fitted feature, skips last.
pub fn render_text(summary: &DiagnosticsSummary) -> String {
    let mut out = String::new();
    let target = &summary.target;
    let _ = writeln!(out, "Regression diagnostics for {target} in {}", summary.name);
    let _ = writeln!(out, "Input: {}", summary.input);
    let _ = writeln!(
        out,
        "Features: {} total, {} fitted, {} skipped",
        summary.total_features,
        summary.fitted.len(),
        summary.skipped.len()
    );
    let lt = &summary.log_target;
    let _ = writeln!(
        out,
        "{}: {} row(s) used, {} excluded ({target} <= 0), {} missing",
        lt.name, lt.used, lt.excluded_nonpositive, lt.missing
    );

    for f in &summary.fitted {
        let _ = writeln!(out, "\n== {} ==", f.feature);
        fit_section(&mut out, &f.feature, target, &f.raw);
        out.push('\n');
        fit_section(&mut out, &f.feature, &format!("log({target})"), &f.log);
    }

    if !summary.skipped.is_empty() {
        let _ = writeln!(out, "\n== skipped ==");
        for s in &summary.skipped {
            let _ = writeln!(out, "{} (vs {}): {}", s.feature, s.target, s.reason);
        }
    }
    out
}

/// Write both report files into `dir`; returns their paths.
pub fn write_report(dir: &Path, summary: &DiagnosticsSummary) -> Result<[PathBuf; 2]> {
    let text_path = dir.join(REPORT_FILE);
    std::fs::write(&text_path, render_text(summary))
        .with_context(|| format!("failed to write {}", text_path.display()))?;

    let json_path = dir.join(SUMMARY_FILE);
    std::fs::write(&json_path, serde_json::to_string_pretty(summary)?)
        .with_context(|| format!("failed to write {}", json_path.display()))?;

    tracing::info!(
        report = %text_path.display(),
        fitted = summary.fitted.len(),
        skipped = summary.skipped.len(),
        "wrote diagnostics report"
    );
    Ok([text_path, json_path])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(slope: f64) -> FitStats {
        FitStats {
            n: 3,
            slope,
            intercept: 1.0,
            r: 0.5,
            r_squared: 0.25,
            p_value: 0.01,
            slope_stderr: 0.1,
            intercept_stderr: 0.2,
        }
    }

    fn summary() -> DiagnosticsSummary {
        DiagnosticsSummary {
            schema_version: SCHEMA_VERSION.into(),
            meta: ArtifactMeta::default(),
            input: "census.csv".into(),
            name: "van".into(),
            target: "crime_rate".into(),
            log_target: LogTargetSummary {
                name: "log_crime_rate".into(),
                used: 3,
                excluded_nonpositive: 1,
                missing: 0,
            },
            total_features: 2,
            fitted: vec![FeatureSummary {
                feature: "income".into(),
                raw: stats(2.0),
                log: stats(0.3),
            }],
            skipped: vec![SkipSummary {
                feature: "flat".into(),
                target: "crime_rate".into(),
                reason: "zero variance: every value equals 5".into(),
            }],
            plots: vec![],
        }
    }

    #[test]
    fn text_uses_fixed_width_columns() {
        let text = render_text(&summary());
        assert!(
            text.contains("Information we get from the linear regression for (income, crime_rate)")
        );
        assert!(text.contains("for (income, log(crime_rate))"));
        assert!(text.contains("Slope:                     2.000000\n"));
        assert!(text.contains("p-value:                   0.010000\n"));
        assert!(text.contains("Observations:                     3\n"));
        assert!(text.contains("1 excluded (crime_rate <= 0)"));
    }

    #[test]
    fn skipped_features_listed_with_reason() {
        let text = render_text(&summary());
        assert!(text.contains("Features: 2 total, 1 fitted, 1 skipped"));
        assert!(text.contains("flat (vs crime_rate): zero variance"));
    }

    #[test]
    fn writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let [txt, json] = write_report(dir.path(), &summary()).unwrap();
        assert!(txt.ends_with(REPORT_FILE));
        let v: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(json).unwrap()).unwrap();
        assert_eq!(v["schema_version"], SCHEMA_VERSION);
        assert_eq!(v["fitted"][0]["raw"]["slope"], 2.0);
        assert_eq!(v["skipped"][0]["feature"], "flat");
    }
}
