//! Self-contained HTML rendering of a heat bundle.
//!
//! One document, Leaflet plus the leaflet.heat plugin off public CDNs, with
//! the bundle's layers and markers embedded as JSON literals. Layout and
//! tuning follow the original field map: Rwanda-centered view, two
//! switchable heat layers, classified circle markers on the without layer,
//! a fixed legend.

use anyhow::Result;
use serde::Serialize;

use crate::heat::types::{HeatBundle, SiteFlag};

const MAP_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8"/>
  <meta name="viewport" content="width=device-width, initial-scale=1.0"/>
  <title>Symptom Heatmap</title>

  <!-- Leaflet 1.9.4 -->
  <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.9.4/leaflet.css" crossorigin="anonymous"
    referrerpolicy="no-referrer"/>
  <script src="https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.9.4/leaflet.js" crossorigin="anonymous"
    referrerpolicy="no-referrer"></script>

  <!-- Leaflet.heat 0.2.0 -->
  <script src="https://unpkg.com/leaflet.heat@0.2.0/dist/leaflet-heat.js"></script>

  <style>
    html, body { margin: 0; padding: 0; }
    #map { position: absolute; top: 40px; bottom: 0; left: 0; right: 0; }
    .map-title {
      margin: 8px 0;
      text-align: center;
      font-size: 20px;
      font-family: sans-serif;
    }
    .map-legend {
      position: fixed;
      bottom: 50px;
      left: 50px;
      width: 180px;
      height: 110px;
      background-color: white;
      border: 2px solid grey;
      z-index: 9999;
      font-size: 14px;
      font-family: sans-serif;
      padding: 10px;
    }
    .map-legend i {
      width: 15px;
      height: 15px;
      float: left;
      margin-right: 10px;
      opacity: 0.8;
    }
  </style>
</head>
<body>
  <h3 class="map-title"><b>Heatmap</b></h3>
  <div id="map"></div>
  <div class="map-legend">
    <b>Heatmap Legend</b><br>
    <i style="background:blue;"></i>No symptoms<br>
    <i style="background:lime;"></i>Moderate symptoms<br>
    <i style="background:red;"></i>High symptoms
  </div>

  <script>
    var map = L.map('map').setView([-1.9403, 29.8739], 8);

    L.tileLayer('https://tile.openstreetmap.org/{z}/{x}/{y}.png', {
      maxZoom: 19,
      attribution: '&copy; OpenStreetMap contributors'
    }).addTo(map);

    var withData = __WITH_DATA__;
    var withoutData = __WITHOUT_DATA__;
    var markerData = __MARKER_DATA__;

    var heatOptions = {
      radius: 15,
      blur: 10,
      maxZoom: 12,
      minOpacity: 0.5,
      max: 100,
      gradient: {0.2: 'blue', 0.6: 'lime', 1.0: 'red'}
    };

    var withLayer = L.heatLayer(withData, heatOptions);
    var withoutGroup = L.layerGroup([L.heatLayer(withoutData, heatOptions)]);

    markerData.forEach(function (m) {
      L.circleMarker([m.lat, m.lon], {
        radius: 7,
        color: m.color,
        fill: true,
        fillColor: m.color,
        fillOpacity: 0.7
      }).bindPopup(m.popup).addTo(withoutGroup);
    });

    withLayer.addTo(map);

    L.control.layers(null, {
      "With Water Filter": withLayer,
      "Without Water Filter": withoutGroup
    }, {collapsed: false}).addTo(map);
  </script>
</body>
</html>
"#;

#[derive(Serialize)]
struct MarkerData {
    lat: f64,
    lon: f64,
    color: &'static str,
    popup: String,
}

/// Renders the bundle as one self-contained HTML page.
///
/// The embedded arrays are exactly the pipeline's outputs: heat samples as
/// `[lat, lon, intensity]` triples and one marker object per classified
/// site. Labels are HTML-escaped before they reach a popup.
pub fn map_html(bundle: &HeatBundle) -> Result<String> {
    let with_data: Vec<[f64; 3]> = bundle
        .with_filter
        .points
        .iter()
        .map(|p| [p.latitude, p.longitude, p.intensity])
        .collect();

    let without_data: Vec<[f64; 3]> = bundle
        .without_filter
        .points
        .iter()
        .map(|p| [p.latitude, p.longitude, p.intensity])
        .collect();

    let markers: Vec<MarkerData> = bundle
        .markers
        .iter()
        .map(|m| MarkerData {
            lat: m.latitude,
            lon: m.longitude,
            color: match m.flag {
                SiteFlag::Flagged => "black",
                SiteFlag::Unflagged => "white",
            },
            popup: format!(
                "Name: {}<br>Intensity: {:.1}",
                escape_html(&m.label),
                m.intensity
            ),
        })
        .collect();

    let html = MAP_TEMPLATE
        .replace("__WITH_DATA__", &serde_json::to_string(&with_data)?)
        .replace("__WITHOUT_DATA__", &serde_json::to_string(&without_data)?)
        .replace("__MARKER_DATA__", &serde_json::to_string(&markers)?);

    Ok(html)
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heat::types::{HeatLayer, HeatPoint, RunReport, SiteMarker};

    fn point(site_row: usize, lat: f64, lon: f64, intensity: f64) -> HeatPoint {
        HeatPoint {
            site_row,
            latitude: lat,
            longitude: lon,
            intensity,
        }
    }

    fn bundle() -> HeatBundle {
        HeatBundle {
            with_filter: HeatLayer {
                points: vec![point(0, -1.9, 29.1, 0.0), point(2, -2.1, 29.3, 100.0)],
                ..Default::default()
            },
            without_filter: HeatLayer {
                points: vec![point(0, -1.9, 29.1, 62.5)],
                ..Default::default()
            },
            markers: vec![
                SiteMarker {
                    site_row: 0,
                    latitude: -1.9,
                    longitude: 29.1,
                    intensity: 62.5,
                    label: "No Filter Site".to_string(),
                    flag: SiteFlag::Flagged,
                },
                SiteMarker {
                    site_row: 2,
                    latitude: -2.1,
                    longitude: 29.3,
                    intensity: 10.0,
                    label: "Clean <b>Site</b>".to_string(),
                    flag: SiteFlag::Unflagged,
                },
            ],
            report: RunReport::default(),
        }
    }

    #[test]
    fn test_embeds_layer_data_arrays() {
        let html = map_html(&bundle()).unwrap();

        assert!(html.contains("[[-1.9,29.1,0.0],[-2.1,29.3,100.0]]"));
        assert!(html.contains("[[-1.9,29.1,62.5]]"));
        assert!(!html.contains("__WITH_DATA__"));
        assert!(!html.contains("__WITHOUT_DATA__"));
        assert!(!html.contains("__MARKER_DATA__"));
    }

    #[test]
    fn test_marker_colors_follow_flags() {
        let html = map_html(&bundle()).unwrap();

        assert!(html.contains(r#""color":"black""#));
        assert!(html.contains(r#""color":"white""#));
    }

    #[test]
    fn test_popup_formats_intensity_to_one_decimal() {
        let html = map_html(&bundle()).unwrap();

        assert!(html.contains("Name: No Filter Site<br>Intensity: 62.5"));
        assert!(html.contains("Intensity: 10.0"));
    }

    #[test]
    fn test_labels_are_html_escaped() {
        let html = map_html(&bundle()).unwrap();

        assert!(html.contains("Clean &lt;b&gt;Site&lt;/b&gt;"));
        assert!(!html.contains("Clean <b>Site</b>"));
    }

    #[test]
    fn test_layer_names_and_legend_present() {
        let html = map_html(&bundle()).unwrap();

        assert!(html.contains("With Water Filter"));
        assert!(html.contains("Without Water Filter"));
        assert!(html.contains("Heatmap Legend"));
        assert!(html.contains("No symptoms"));
        assert!(html.contains("Moderate symptoms"));
        assert!(html.contains("High symptoms"));
    }

    #[test]
    fn test_empty_bundle_renders() {
        let empty = HeatBundle {
            with_filter: HeatLayer::default(),
            without_filter: HeatLayer::default(),
            markers: Vec::new(),
            report: RunReport::default(),
        };

        let html = map_html(&empty).unwrap();
        assert!(html.contains("var withData = [];"));
        assert!(html.contains("var markerData = [];"));
    }
}
