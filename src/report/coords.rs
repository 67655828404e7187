use regex::Regex;
use std::sync::LazyLock;

static LAT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Latitude:\s*(-?\d+(?:\.\d+)?)").expect("valid regex"));

static LON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Longitude:\s*(-?\d+(?:\.\d+)?)").expect("valid regex"));

/// Extract a `(lat, lon)` pair from a free-text location string.
///
/// The two labels are matched independently, so ordering and any
/// surrounding commentary are irrelevant; both must be present with a
/// numeric payload or the whole extraction fails. Values are passed
/// through without range validation (the rendering boundary culls
/// off-map points).
pub fn extract_coordinates(location: &str) -> Option<(f64, f64)> {
    let lat = LAT_RE.captures(location)?.get(1)?.as_str().parse().ok()?;
    let lon = LON_RE.captures(location)?.get(1)?.as_str().parse().ok()?;
    Some((lat, lon))
}
