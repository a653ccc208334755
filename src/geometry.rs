//! Point-geometry text parsing.
//!
//! Location exports carry coordinates as loose WKT-style text such as
//! `POINT (29.8739 -1.9403)`, sometimes prefixed with a `WKT` column label
//! or missing the parentheses entirely. Only the two leading numeric tokens
//! matter; everything else is noise to strip.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PointParseError {
    #[error("expected 2 coordinate tokens, found {found} in {text:?}")]
    TooFewTokens { text: String, found: usize },

    #[error("coordinate token {token:?} is not a finite number")]
    BadCoordinate { token: String },
}

/// Extracts `(longitude, latitude)` from a WKT-style point string.
///
/// Strips the literal markers `POINT`, `WKT`, `(` and `)`, then reads the
/// first two whitespace-separated tokens as longitude and latitude, in that
/// order. No range validation is done; the tokens only have to be finite
/// numbers.
///
/// # Errors
///
/// Returns an error if fewer than two tokens remain after stripping, or if
/// either token does not parse as a finite `f64` (`"nan"` and `"inf"` parse
/// in Rust, but are rejected here).
pub fn parse_point(text: &str) -> Result<(f64, f64), PointParseError> {
    let cleaned = text
        .replace("POINT", "")
        .replace("WKT", "")
        .replace('(', "")
        .replace(')', "");

    let mut tokens = cleaned.split_whitespace();
    let (lon_token, lat_token) = match (tokens.next(), tokens.next()) {
        (Some(lon), Some(lat)) => (lon, lat),
        (first, _) => {
            return Err(PointParseError::TooFewTokens {
                text: text.to_string(),
                found: first.map_or(0, |_| 1),
            });
        }
    };

    let lon = parse_finite(lon_token)?;
    let lat = parse_finite(lat_token)?;

    Ok((lon, lat))
}

fn parse_finite(token: &str) -> Result<f64, PointParseError> {
    match token.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(PointParseError::BadCoordinate {
            token: token.to_string(),
        }),
    }
}
