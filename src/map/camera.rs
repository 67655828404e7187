use crate::map::projection::{wrap_lon, Viewport};
use crate::report::{extract_coordinates, Report};
use log::debug;

/// Zoom the camera settles at after flying to a report
pub const FLY_TO_ZOOM: f64 = 24.0;
/// Seconds a fly-to transition takes
pub const FLY_TO_DURATION_SECS: f64 = 1.5;

/// An absolute camera move request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraCommand {
    pub lat: f64,
    pub lon: f64,
    pub zoom: f64,
    pub duration_secs: f64,
}

/// In-flight interpolation state for one command
#[derive(Clone)]
struct Flight {
    from_lat: f64,
    from_lon: f64,
    from_zoom: f64,
    to: CameraCommand,
    elapsed: f64,
}

/// Animates the viewport toward the most recent camera command. Issuing
/// a new command while a flight is in progress supersedes it; the latest
/// command always wins.
#[derive(Default)]
pub struct Camera {
    flight: Option<Flight>,
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or replace) a flight from the viewport's current position
    pub fn issue(&mut self, viewport: &Viewport, command: CameraCommand) {
        self.flight = Some(Flight {
            from_lat: viewport.center_lat,
            from_lon: viewport.center_lon,
            from_zoom: viewport.zoom,
            to: command,
            elapsed: 0.0,
        });
    }

    pub fn is_animating(&self) -> bool {
        self.flight.is_some()
    }

    /// Advance the active flight by `dt` seconds, moving the viewport
    /// along an eased path. A finished flight snaps to the target and
    /// clears itself.
    pub fn tick(&mut self, viewport: &mut Viewport, dt: f64) {
        let Some(flight) = self.flight.as_mut() else {
            return;
        };

        flight.elapsed += dt;
        let t = if flight.to.duration_secs > 0.0 {
            (flight.elapsed / flight.to.duration_secs).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let eased = smoothstep(t);

        // Shortest longitude path, wrapping across the antimeridian
        let mut dlon = flight.to.lon - flight.from_lon;
        if dlon > 180.0 {
            dlon -= 360.0;
        } else if dlon < -180.0 {
            dlon += 360.0;
        }

        let lat = flight.from_lat + (flight.to.lat - flight.from_lat) * eased;
        let lon = wrap_lon(flight.from_lon + dlon * eased);
        // Zoom interpolates geometrically so the motion feels uniform
        let zoom = flight.from_zoom * (flight.to.zoom / flight.from_zoom).powf(eased);

        viewport.set_camera(lat, lon, zoom);

        if t >= 1.0 {
            self.flight = None;
        }
    }
}

fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

/// Watches the "selected report" and turns each selection event into a
/// camera command. Selections without extractable coordinates are
/// skipped without error; re-selecting the same report flies again.
pub struct FlyToController {
    zoom: f64,
    duration_secs: f64,
}

impl FlyToController {
    pub fn new() -> Self {
        Self {
            zoom: FLY_TO_ZOOM,
            duration_secs: FLY_TO_DURATION_SECS,
        }
    }

    /// Handle a selection event. `None` (deselection) issues nothing.
    pub fn on_select(&self, report: Option<&Report>, camera: &mut Camera, viewport: &Viewport) {
        let Some(report) = report else {
            return;
        };
        match extract_coordinates(&report.location) {
            Some((lat, lon)) => camera.issue(
                viewport,
                CameraCommand {
                    lat,
                    lon,
                    zoom: self.zoom,
                    duration_secs: self.duration_secs,
                },
            ),
            None => debug!(
                "report {} selected but location has no coordinates; camera not moved",
                report.id
            ),
        }
    }
}

impl Default for FlyToController {
    fn default() -> Self {
        Self::new()
    }
}
