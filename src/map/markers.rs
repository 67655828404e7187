use crate::map::projection::Viewport;
use crate::report::{extract_coordinates, resolve_style, DisasterStyle, Report};
use log::debug;

/// Smallest on-screen marker radius; keeps low-confidence reports
/// clickable at low zoom
const MIN_RADIUS_PX: i32 = 2;
/// Largest on-screen marker radius
const MAX_RADIUS_PX: i32 = 120;
/// Extra pixels of slack around a marker for hit testing
const HIT_SLOP_PX: i32 = 3;

/// A renderable map marker derived from one filtered report.
/// `report_idx` points back into the filtered collection so a click can
/// be relayed as a selection event.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
    pub style: DisasterStyle,
    pub report_idx: usize,
}

impl Marker {
    /// On-screen radius at the current viewport scale
    pub fn radius_pixels(&self, viewport: &Viewport) -> i32 {
        let px = (self.style.radius * viewport.pixels_per_meter(self.lat)).round() as i32;
        px.clamp(MIN_RADIUS_PX, MAX_RADIUS_PX)
    }
}

/// Build marker descriptors for a filtered report collection. Reports
/// whose location text yields no coordinates are excluded from the map
/// only; they stay in the list and analytics views.
pub fn build_markers(filtered: &[Report]) -> Vec<Marker> {
    filtered
        .iter()
        .enumerate()
        .filter_map(|(report_idx, report)| match extract_coordinates(&report.location) {
            Some((lat, lon)) => Some(Marker {
                id: report.id.clone(),
                lat,
                lon,
                style: resolve_style(&report.prediction, report.confidence),
                report_idx,
            }),
            None => {
                debug!(
                    "report {} excluded from map: no coordinates in location text",
                    report.id
                );
                None
            }
        })
        .collect()
}

/// Find the marker under a canvas pixel, preferring the nearest center
/// when circles overlap. Returns the index into the filtered collection.
pub fn hit_test(markers: &[Marker], viewport: &Viewport, px: i32, py: i32) -> Option<usize> {
    let mut best: Option<(i64, usize)> = None;

    for marker in markers {
        let (mx, my) = viewport.project(marker.lon, marker.lat);
        let reach = marker.radius_pixels(viewport) + HIT_SLOP_PX;
        let dx = i64::from(mx - px);
        let dy = i64::from(my - py);
        let dist2 = dx * dx + dy * dy;
        if dist2 <= i64::from(reach) * i64::from(reach)
            && best.is_none_or(|(best_dist2, _)| dist2 < best_dist2)
        {
            best = Some((dist2, marker.report_idx));
        }
    }

    best.map(|(_, idx)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::sample;

    fn located(id: &str, lat: f64, lon: f64) -> Report {
        sample(
            id,
            "fire",
            "",
            &format!("Latitude: {lat}, Longitude: {lon}"),
            "2024-01-01",
        )
    }

    #[test]
    fn test_unparseable_locations_are_excluded() {
        let reports = vec![
            located("1", 10.0, 20.0),
            sample("2", "flood", "", "no coordinates here", "2024-01-01"),
            located("3", -5.0, 30.0),
        ];
        let markers = build_markers(&reports);
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].id, "1");
        assert_eq!(markers[1].id, "3");
        // Indices still point at the full filtered collection
        assert_eq!(markers[1].report_idx, 2);
    }

    #[test]
    fn test_marker_carries_resolved_style() {
        let mut report = located("1", 10.0, 20.0);
        report.confidence = Some(0.5);
        let markers = build_markers(&[report]);
        assert_eq!(markers[0].style.radius, 2500.0); // fire base 5000 × 0.5
    }

    #[test]
    fn test_radius_is_clamped() {
        let viewport = Viewport::new(0.0, 0.0, 0.5, 100, 50);
        let markers = build_markers(&[located("1", 0.0, 0.0)]);
        assert_eq!(markers[0].radius_pixels(&viewport), MIN_RADIUS_PX);
    }

    #[test]
    fn test_hit_test_finds_marker_under_cursor() {
        let viewport = Viewport::new(0.0, 0.0, 4.0, 400, 200);
        let markers = build_markers(&[located("1", 0.0, 0.0), located("2", 40.0, 90.0)]);
        let (px, py) = viewport.project(0.0, 0.0);
        assert_eq!(hit_test(&markers, &viewport, px, py), Some(0));
    }

    #[test]
    fn test_hit_test_misses_empty_space() {
        let viewport = Viewport::new(0.0, 0.0, 4.0, 400, 200);
        let markers = build_markers(&[located("1", 40.0, 90.0)]);
        assert_eq!(hit_test(&markers, &viewport, 0, 0), None);
    }

    #[test]
    fn test_hit_test_prefers_nearest_overlapping_marker() {
        let viewport = Viewport::new(0.0, 0.0, 8.0, 400, 200);
        // Two flood markers close enough to overlap on screen
        let mut a = located("1", 0.0, 0.0);
        a.prediction = "flood".to_string();
        let mut b = located("2", 0.0, 0.2);
        b.prediction = "flood".to_string();
        let markers = build_markers(&[a, b]);
        let (px, py) = viewport.project(0.2, 0.0);
        assert_eq!(hit_test(&markers, &viewport, px, py), Some(1));
    }
}
