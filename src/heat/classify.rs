//! Site classification from location labels.

use std::collections::HashMap;

use crate::heat::types::{HeatLayer, SiteFlag, SiteMarker, SiteRow};

/// Flags a site whose lowercased label contains both `"filter"` and `"no"`.
///
/// This is the upstream survey's naming convention for sites reporting no
/// working filter. Plain substring matching, so `"North Filter Station"`
/// flags too; the labels in real exports spell it out as `"No Filter"`.
pub fn classify_label(label: &str) -> SiteFlag {
    let lower = label.to_lowercase();
    if lower.contains("filter") && lower.contains("no") {
        SiteFlag::Flagged
    } else {
        SiteFlag::Unflagged
    }
}

/// Attaches label and flag to each surviving point of a layer.
///
/// Labels are looked up by the point's row key, so markers stay on the right
/// site even when earlier rows were dropped.
pub fn site_markers(sites: &[SiteRow], layer: &HeatLayer) -> Vec<SiteMarker> {
    let labels: HashMap<usize, &str> = sites.iter().map(|s| (s.row, s.label.as_str())).collect();

    layer
        .points
        .iter()
        .map(|point| {
            let label = labels.get(&point.site_row).copied().unwrap_or("");
            SiteMarker {
                site_row: point.site_row,
                latitude: point.latitude,
                longitude: point.longitude,
                intensity: point.intensity,
                label: label.to_string(),
                flag: classify_label(label),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heat::build::build_layer;
    use crate::heat::types::RowScore;

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify_label("No Filter Site"), SiteFlag::Flagged);
        assert_eq!(classify_label("no filter"), SiteFlag::Flagged);
        assert_eq!(classify_label("FILTER: NONE"), SiteFlag::Flagged);
        assert_eq!(classify_label("Clean Site"), SiteFlag::Unflagged);
        assert_eq!(classify_label("Filter OK"), SiteFlag::Unflagged);
        assert_eq!(classify_label("no water"), SiteFlag::Unflagged);
        assert_eq!(classify_label(""), SiteFlag::Unflagged);
    }

    #[test]
    fn test_classify_is_substring_based() {
        // "North" supplies the "no"; matches the survey convention as-is
        assert_eq!(classify_label("North Filter Station"), SiteFlag::Flagged);
    }

    #[test]
    fn test_markers_follow_row_keys_across_drops() {
        let sites = vec![
            SiteRow {
                row: 0,
                geometry_text: "not a point".to_string(),
                label: "Dropped Site".to_string(),
            },
            SiteRow {
                row: 1,
                geometry_text: "POINT(29.1 -1.9)".to_string(),
                label: "No Filter Village".to_string(),
            },
            SiteRow {
                row: 2,
                geometry_text: "POINT(29.3 -2.1)".to_string(),
                label: "Clean Village".to_string(),
            },
        ];
        let scores = vec![
            RowScore { row: 1, value: 40.0 },
            RowScore { row: 2, value: 80.0 },
        ];

        let layer = build_layer(&sites, &scores);
        let markers = site_markers(&sites, &layer);

        // Row 0 dropped; labels must not shift onto the wrong points
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].label, "No Filter Village");
        assert_eq!(markers[0].flag, SiteFlag::Flagged);
        assert_eq!(markers[0].intensity, 40.0);
        assert_eq!(markers[1].label, "Clean Village");
        assert_eq!(markers[1].flag, SiteFlag::Unflagged);
        assert_eq!(markers[1].intensity, 80.0);
    }
}
