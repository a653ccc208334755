//! Batch min-max normalization of raw scores.

use crate::heat::types::RowScore;

/// Rescales a batch of scores so its finite minimum maps to 0 and its finite
/// maximum to 100.
///
/// The scale comes from this batch alone; the two measurement datasets are
/// normalized independently. Non-finite values pass through untouched so the
/// rows that were bad stay bad without disturbing the rest, and when every
/// finite value is equal (including a single-element batch) they all become
/// exactly 50.0. An empty batch comes back empty.
pub fn min_max_scale(mut scores: Vec<RowScore>) -> Vec<RowScore> {
    let Some((min, max)) = finite_bounds(&scores) else {
        return scores;
    };

    if min == max {
        for score in &mut scores {
            if score.value.is_finite() {
                score.value = 50.0;
            }
        }
        return scores;
    }

    let range = max - min;
    for score in &mut scores {
        if score.value.is_finite() {
            score.value = (score.value - min) / range * 100.0;
        }
    }
    scores
}

fn finite_bounds(scores: &[RowScore]) -> Option<(f64, f64)> {
    let mut bounds = None;
    for score in scores {
        if !score.value.is_finite() {
            continue;
        }
        bounds = match bounds {
            None => Some((score.value, score.value)),
            Some((min, max)) => Some((f64::min(min, score.value), f64::max(max, score.value))),
        };
    }
    bounds
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(values: &[f64]) -> Vec<RowScore> {
        values
            .iter()
            .enumerate()
            .map(|(row, &value)| RowScore { row, value })
            .collect()
    }

    fn values(scores: &[RowScore]) -> Vec<f64> {
        scores.iter().map(|s| s.value).collect()
    }

    #[test]
    fn test_scales_to_0_100() {
        let out = min_max_scale(scores(&[10.0, 20.0, 30.0]));
        assert_eq!(values(&out), vec![0.0, 50.0, 100.0]);
    }

    #[test]
    fn test_preserves_row_keys() {
        let out = min_max_scale(vec![
            RowScore { row: 3, value: 1.0 },
            RowScore { row: 7, value: 2.0 },
        ]);
        assert_eq!(out[0].row, 3);
        assert_eq!(out[1].row, 7);
    }

    #[test]
    fn test_all_equal_becomes_50() {
        let out = min_max_scale(scores(&[4.2, 4.2, 4.2]));
        assert_eq!(values(&out), vec![50.0, 50.0, 50.0]);
    }

    #[test]
    fn test_single_value_becomes_50() {
        let out = min_max_scale(scores(&[123.0]));
        assert_eq!(values(&out), vec![50.0]);
    }

    #[test]
    fn test_empty_stays_empty() {
        assert!(min_max_scale(Vec::new()).is_empty());
    }

    #[test]
    fn test_nan_passes_through() {
        let out = min_max_scale(scores(&[10.0, f64::NAN, 30.0]));
        assert_eq!(out[0].value, 0.0);
        assert!(out[1].value.is_nan());
        assert_eq!(out[2].value, 100.0);
    }

    #[test]
    fn test_all_nan_unchanged() {
        let out = min_max_scale(scores(&[f64::NAN, f64::NAN]));
        assert!(out.iter().all(|s| s.value.is_nan()));
    }

    #[test]
    fn test_negative_range() {
        let out = min_max_scale(scores(&[-30.0, -20.0, -10.0]));
        assert_eq!(values(&out), vec![0.0, 50.0, 100.0]);
    }

    #[test]
    fn test_output_stays_in_range() {
        let out = min_max_scale(scores(&[3.0, 9.0, 4.5, 7.25, 3.0]));
        for score in &out {
            assert!(score.value >= 0.0 && score.value <= 100.0);
        }
    }
}
