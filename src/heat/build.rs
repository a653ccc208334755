//! Joins location rows with their scores into renderable heat points.

use std::collections::HashMap;

use tracing::debug;

use crate::geometry::parse_point;
use crate::heat::types::{HeatLayer, HeatPoint, RowScore, SiteRow};

/// Builds the heat layer for one measurement dataset.
///
/// Scores are looked up by row key, never by output position, so a dropped
/// site leaves every other pairing intact. A site whose geometry fails to
/// parse, or whose intensity is non-finite, is counted in `dropped` and
/// skipped; a site with no matching score is emitted with intensity 0 and
/// counted in `unscored`. Point order follows location order.
///
/// Holds for every input: `dropped + points.len() == sites.len()`.
pub fn build_layer(sites: &[SiteRow], scores: &[RowScore]) -> HeatLayer {
    let by_row: HashMap<usize, f64> = scores.iter().map(|s| (s.row, s.value)).collect();

    let mut layer = HeatLayer::default();

    for site in sites {
        let (longitude, latitude) = match parse_point(&site.geometry_text) {
            Ok(pair) => pair,
            Err(e) => {
                debug!(row = site.row, error = %e, "Dropping site with unparseable geometry");
                layer.dropped += 1;
                continue;
            }
        };

        let (intensity, scored) = match by_row.get(&site.row) {
            Some(&value) => (value, true),
            None => (0.0, false),
        };

        if !latitude.is_finite() || !longitude.is_finite() || !intensity.is_finite() {
            debug!(row = site.row, "Dropping site with non-finite heat values");
            layer.dropped += 1;
            continue;
        }

        if !scored {
            layer.unscored += 1;
        }

        layer.points.push(HeatPoint {
            site_row: site.row,
            latitude,
            longitude,
            intensity,
        });
    }

    layer
}
