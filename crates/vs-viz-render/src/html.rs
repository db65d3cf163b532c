//! Self-contained Leaflet choropleth page.
//!
//! The page pulls Leaflet from a CDN and embeds the classified units as a
//! GeoJSON literal. Styles, tooltips, and the legend are resolved here so
//! the output is a pure function of the artifact and config.

use std::fmt::Write as FmtWrite;

use serde_json::Value;
use vs_geo::CountClass;
use vs_viz::ChoroplethArtifact;
use vs_viz::choropleth::class_key;

use crate::canvas::escape_xml;
use crate::color::{Color, ramp_sample};
use crate::config::VizConfig;

/// Map centre used when there is no geometry to fit (downtown Vancouver).
const FALLBACK_CENTER: [f64; 2] = [49.2827, -123.1207];
const FALLBACK_ZOOM: u8 = 12;

/// Fill colour per class.
pub struct ClassPalette {
    bins: Vec<Color>,
    zero: Color,
    no_data: Color,
}

impl ClassPalette {
    pub fn new(n_bins: usize, config: &VizConfig) -> Self {
        Self {
            bins: ramp_sample(&config.choropleth.ramp, n_bins),
            zero: config.choropleth.zero_color,
            no_data: config.choropleth.no_data_color,
        }
    }

    pub fn color(&self, class: CountClass) -> Color {
        match class {
            CountClass::NoData => self.no_data,
            CountClass::Zero => self.zero,
            CountClass::Bin(i) => {
                self.bins.get(i).or(self.bins.last()).copied().unwrap_or(self.zero)
            }
        }
    }
}

/// Count with thousands separators.
fn localize(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn tooltip_html(art: &ChoroplethArtifact, unit_id: &str, count: Option<u64>) -> String {
    let value = count.map(localize).unwrap_or_else(|| "no data".to_string());
    format!(
        "<table><tr><th>{}</th><td>{}</td></tr><tr><th>{}</th><td>{}</td></tr></table>",
        escape_xml(&art.id_alias),
        escape_xml(unit_id),
        escape_xml(&art.count_alias),
        value
    )
}

fn legend_html(art: &ChoroplethArtifact, palette: &ClassPalette) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        r#"<div class="legend"><div class="legend-title">{}</div>"#,
        escape_xml(&art.legend_name)
    );
    let row = |out: &mut String, class: &str, color: Color, label: &str| {
        let _ = write!(
            out,
            r#"<div class="legend-row"><span class="swatch {class}" style="background:{}"></span>{}</div>"#,
            color.to_hex(),
            escape_xml(label)
        );
    };
    for (i, label) in art.bin_labels().iter().enumerate() {
        let ln = match art.bins.breaks.as_slice() {
            [only] => format!("ln {only:.2}"),
            b => format!("ln {:.2} – {:.2}", b[i], b[i + 1]),
        };
        row(&mut out, "bin", palette.color(CountClass::Bin(i)), &format!("{label} ({ln})"));
    }
    row(&mut out, "zero", palette.color(CountClass::Zero), "0");
    row(&mut out, "no-data", palette.color(CountClass::NoData), "no data");
    out.push_str("</div>");
    out
}

fn unmapped_html(art: &ChoroplethArtifact) -> String {
    if art.unmatched.is_empty() {
        return String::new();
    }
    let mut out = String::from(r#"<div class="unmapped"><strong>Unmapped units</strong><ul>"#);
    for u in &art.unmatched {
        let _ = write!(out, "<li>{}</li>", escape_xml(u));
    }
    out.push_str("</ul></div>");
    out
}

/// JSON literal safe to embed inside a `<script>` element.
fn script_json(value: &Value) -> crate::Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

/// Render the artifact as a standalone HTML page.
pub fn render_choropleth_html(
    art: &ChoroplethArtifact,
    config: &VizConfig,
) -> crate::Result<String> {
    let cfg = &config.choropleth;
    let palette = ClassPalette::new(art.bins.n_bins(), config);

    let mut geojson = art.to_geojson();
    if let Some(features) = geojson.get_mut("features").and_then(|f| f.as_array_mut()) {
        for (feature, unit) in features.iter_mut().zip(&art.units) {
            if let Some(props) = feature.get_mut("properties").and_then(|p| p.as_object_mut()) {
                props.insert("fill".into(), palette.color(unit.class).to_hex().into());
                props.insert("tooltip".into(), tooltip_html(art, &unit.unit_id, unit.count).into());
            }
        }
    }

    let view = match art.bounds {
        Some(b) => format!(
            "map.fitBounds([[{:.6}, {:.6}], [{:.6}, {:.6}]]);",
            b.min_lat, b.min_lon, b.max_lat, b.max_lon
        ),
        None => format!(
            "map.setView([{:.4}, {:.4}], {FALLBACK_ZOOM});",
            FALLBACK_CENTER[0], FALLBACK_CENTER[1]
        ),
    };
    let no_data_key = class_key(CountClass::NoData);
    let leaflet = &cfg.leaflet_version;

    let mut out = String::with_capacity(64 * 1024);
    let _ = write!(
        out,
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@{leaflet}/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@{leaflet}/dist/leaflet.js"></script>
<style>
html, body, #map {{ height: 100%; margin: 0; }}
.legend, .unmapped {{ position: absolute; z-index: 1000; background: rgba(255,255,255,0.9); padding: 6px 10px; font: 12px sans-serif; border-radius: 4px; }}
.legend {{ right: 10px; bottom: 24px; }}
.legend-title {{ font-weight: bold; margin-bottom: 4px; }}
.legend-row {{ display: flex; align-items: center; gap: 6px; }}
.swatch {{ display: inline-block; width: 18px; height: 12px; opacity: {fill_opacity}; border: 1px solid rgba(0,0,0,0.3); }}
.swatch.no-data {{ border: 1px dashed #333; }}
.unmapped {{ left: 10px; bottom: 24px; max-width: 260px; }}
.unmapped ul {{ margin: 4px 0 0 16px; padding: 0; }}
</style>
</head>
<body>
<div id="map"></div>
{legend}
{unmapped}
<script>
const units = {data};
const map = L.map("map");
L.tileLayer({tiles}, {{ attribution: {attribution}, maxZoom: 19 }}).addTo(map);
L.geoJSON(units, {{
  style: function (feature) {{
    const noData = feature.properties.class === {no_data_key};
    return {{
      fillColor: feature.properties.fill,
      fillOpacity: {fill_opacity},
      color: {line_color},
      weight: noData ? 1.5 : 1,
      opacity: noData ? 0.8 : {line_opacity},
      dashArray: noData ? "4 4" : null
    }};
  }},
  onEachFeature: function (feature, layer) {{
    layer.bindTooltip(feature.properties.tooltip, {{ sticky: true }});
  }}
}}).addTo(map);
{view}
</script>
</body>
</html>
"#,
        title = escape_xml(&art.title),
        leaflet = leaflet,
        fill_opacity = cfg.fill_opacity,
        line_opacity = cfg.line_opacity,
        legend = legend_html(art, &palette),
        unmapped = unmapped_html(art),
        data = script_json(&geojson)?,
        tiles = script_json(&Value::from(cfg.tiles_url.as_str()))?,
        attribution = script_json(&Value::from(cfg.tiles_attribution.as_str()))?,
        no_data_key = script_json(&Value::from(no_data_key))?,
        line_color = script_json(&Value::from(cfg.line_color.to_hex()))?,
        view = view,
    );
    Ok(out)
}
