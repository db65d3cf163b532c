use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use vs_core::{Error, Result};

/// GeoJSON FeatureCollection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureCollection {
    /// Always `"FeatureCollection"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Features in file order.
    pub features: Vec<Feature>,
}

/// GeoJSON Feature. Geometry is kept as raw JSON and passed through to the map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    /// Always `"Feature"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Attribute map.
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
    /// Geometry object.
    #[serde(default)]
    pub geometry: Option<Value>,
}

impl FeatureCollection {
    /// Load and validate a boundary file. Every feature must carry a Polygon or
    /// MultiPolygon geometry.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let fc: FeatureCollection = serde_json::from_str(&text)?;
        fc.validate().map_err(|e| match e {
            Error::Validation(msg) => Error::Validation(format!("{}: {msg}", path.display())),
            other => other,
        })?;
        tracing::debug!(path = %path.display(), features = fc.features.len(), "loaded boundaries");
        Ok(fc)
    }

    /// Check the collection type and that every geometry is areal.
    pub fn validate(&self) -> Result<()> {
        if self.kind != "FeatureCollection" {
            return Err(Error::Validation(format!(
                "expected a FeatureCollection, got '{}'",
                self.kind
            )));
        }
        for (i, f) in self.features.iter().enumerate() {
            match f.geometry_type() {
                Some("Polygon") | Some("MultiPolygon") => {}
                Some(other) => {
                    return Err(Error::Validation(format!(
                        "feature {i}: unsupported geometry type '{other}' (need Polygon or MultiPolygon)"
                    )));
                }
                None => {
                    return Err(Error::Validation(format!("feature {i}: missing geometry")));
                }
            }
        }
        Ok(())
    }

    /// Bounding box over every feature; `None` for an empty collection.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut b: Option<Bounds> = None;
        for f in &self.features {
            if let Some(g) = &f.geometry {
                collect_positions(g.get("coordinates").unwrap_or(&Value::Null), &mut |lon, lat| {
                    match b.as_mut() {
                        Some(b) => b.extend(lon, lat),
                        None => b = Some(Bounds::point(lon, lat)),
                    }
                });
            }
        }
        b
    }
}

impl Feature {
    /// `geometry.type`, if present.
    pub fn geometry_type(&self) -> Option<&str> {
        self.geometry.as_ref()?.get("type")?.as_str()
    }

    /// String form of a property (numbers are formatted, strings trimmed).
    pub fn property_string(&self, key: &str) -> Option<String> {
        match self.properties.as_ref()?.get(key)? {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

/// Walk nested coordinate arrays and report every `[lon, lat, ..]` position.
fn collect_positions(v: &Value, f: &mut impl FnMut(f64, f64)) {
    let Some(arr) = v.as_array() else { return };
    if let (Some(lon), Some(lat)) =
        (arr.first().and_then(Value::as_f64), arr.get(1).and_then(Value::as_f64))
    {
        f(lon, lat);
        return;
    }
    for child in arr {
        collect_positions(child, f);
    }
}

/// Axis-aligned lon/lat bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// West edge.
    pub min_lon: f64,
    /// South edge.
    pub min_lat: f64,
    /// East edge.
    pub max_lon: f64,
    /// North edge.
    pub max_lat: f64,
}

impl Bounds {
    /// Degenerate box around one point.
    pub fn point(lon: f64, lat: f64) -> Self {
        Self { min_lon: lon, min_lat: lat, max_lon: lon, max_lat: lat }
    }

    /// Grow to include a point.
    pub fn extend(&mut self, lon: f64, lat: f64) {
        self.min_lon = self.min_lon.min(lon);
        self.min_lat = self.min_lat.min(lat);
        self.max_lon = self.max_lon.max(lon);
        self.max_lat = self.max_lat.max(lat);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(name: &str, x0: f64, y0: f64) -> Value {
        serde_json::json!({
            "type": "Feature",
            "properties": {"name": name},
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[x0, y0], [x0 + 1.0, y0], [x0 + 1.0, y0 + 1.0], [x0, y0 + 1.0], [x0, y0]]]
            }
        })
    }

    #[test]
    fn bounds_cover_all_features() {
        let fc: FeatureCollection = serde_json::from_value(serde_json::json!({
            "type": "FeatureCollection",
            "features": [square("A", -123.2, 49.2), square("B", -123.0, 49.3)]
        }))
        .unwrap();
        fc.validate().unwrap();
        let b = fc.bounds().unwrap();
        assert_eq!(b.min_lon, -123.2);
        assert_eq!(b.max_lon, -122.0);
        assert_eq!(b.min_lat, 49.2);
        assert_eq!(b.max_lat, 50.3);
    }

    #[test]
    fn rejects_point_geometry() {
        let fc: FeatureCollection = serde_json::from_value(serde_json::json!({
            "type": "FeatureCollection",
            "features": [{"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [0.0, 0.0]}}]
        }))
        .unwrap();
        let err = fc.validate().unwrap_err();
        assert!(err.to_string().contains("Point"));
    }

    #[test]
    fn numeric_property_as_string() {
        let f: Feature = serde_json::from_value(serde_json::json!({
            "type": "Feature", "properties": {"id": 12, "name": " Kitsilano "}, "geometry": null
        }))
        .unwrap();
        assert_eq!(f.property_string("id").as_deref(), Some("12"));
        assert_eq!(f.property_string("name").as_deref(), Some("Kitsilano"));
        assert_eq!(f.property_string("missing"), None);
    }
}
