use serde::{Deserialize, Serialize};
use vs_inference::LinearFit;

use crate::ArtifactMeta;

/// Fitted line drawn over a scatter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitLine {
    /// Slope.
    pub slope: f64,
    /// Intercept.
    pub intercept: f64,
    /// Coefficient of determination.
    pub r_squared: f64,
}

/// Scatter of (x, y) pairs with an optional least-squares line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScatterFitArtifact {
    /// Schema tag.
    pub schema_version: String,
    /// Provenance.
    pub meta: ArtifactMeta,
    /// Plot title.
    pub title: String,
    /// X-axis label (the feature).
    pub x_label: String,
    /// Y-axis label (the target).
    pub y_label: String,
    /// Predictor values.
    pub x: Vec<f64>,
    /// Response values aligned with `x`.
    pub y: Vec<f64>,
    /// Regression line, if one was fitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fit: Option<FitLine>,
}

impl ScatterFitArtifact {
    /// Build from a completed fit; the points are exactly the pairs the fit used.
    pub fn from_fit(fit: &LinearFit, x_label: &str, y_label: &str, title: String) -> Self {
        Self {
            schema_version: "vanstat_scatter_fit_v1".to_string(),
            meta: ArtifactMeta::default(),
            title,
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            x: fit.x.clone(),
            y: fit.y.clone(),
            fit: Some(FitLine {
                slope: fit.slope,
                intercept: fit.intercept,
                r_squared: fit.r_squared,
            }),
        }
    }

    /// Endpoints of the fitted line across the x-range of the data.
    pub fn line_endpoints(&self) -> Option<[(f64, f64); 2]> {
        let fit = self.fit.as_ref()?;
        let lo = self.x.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = self.x.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if !lo.is_finite() || !hi.is_finite() {
            return None;
        }
        let at = |x: f64| (x, fit.intercept + fit.slope * x);
        Some([at(lo), at(hi)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use vs_inference::linregress;

    #[test]
    fn artifact_carries_fit_and_points() {
        let fit = linregress(&[1.0, 2.0, 4.0], &[3.0, 5.0, 9.0]).unwrap();
        let art = ScatterFitArtifact::from_fit(&fit, "income", "crime_rate", "t".into());
        assert_eq!(art.x, vec![1.0, 2.0, 4.0]);
        let [(x0, y0), (x1, y1)] = art.line_endpoints().unwrap();
        assert_eq!((x0, x1), (1.0, 4.0));
        assert_relative_eq!(y0, 3.0, epsilon = 1e-10);
        assert_relative_eq!(y1, 9.0, epsilon = 1e-10);
        let json = serde_json::to_value(&art).unwrap();
        assert_eq!(json["schema_version"], "vanstat_scatter_fit_v1");
        assert!(json["fit"]["slope"].as_f64().unwrap() > 0.0);
    }
}
