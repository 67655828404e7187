use std::f64::consts::PI;

pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 100.0;

/// Initial camera: centered over India, where the bulk of the report
/// pipeline operates
pub const HOME_LAT: f64 = 20.5937;
pub const HOME_LON: f64 = 78.9629;
pub const HOME_ZOOM: f64 = 3.0;

/// Viewport representing the visible map area and zoom level
/// (Web Mercator, Braille pixel space)
#[derive(Clone)]
pub struct Viewport {
    /// Center longitude (-180 to 180)
    pub center_lon: f64,
    /// Center latitude (-90 to 90)
    pub center_lat: f64,
    /// Zoom level (higher = more zoomed in)
    pub zoom: f64,
    /// Canvas pixel width
    pub width: usize,
    /// Canvas pixel height
    pub height: usize,
}

impl Viewport {
    pub fn new(center_lon: f64, center_lat: f64, zoom: f64, width: usize, height: usize) -> Self {
        Self {
            center_lon,
            center_lat,
            zoom,
            width,
            height,
        }
    }

    /// Create the startup view over the reporting region
    pub fn home(width: usize, height: usize) -> Self {
        Self::new(HOME_LON, HOME_LAT, HOME_ZOOM, width, height)
    }

    /// Move the camera to an absolute position (used by fly-to ticks)
    pub fn set_camera(&mut self, lat: f64, lon: f64, zoom: f64) {
        self.center_lat = lat.clamp(-85.0, 85.0);
        self.center_lon = wrap_lon(lon);
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Pan the viewport by pixel delta
    pub fn pan(&mut self, dx: i32, dy: i32) {
        let scale = 360.0 / (self.zoom * self.width as f64);
        self.center_lon = wrap_lon(self.center_lon + dx as f64 * scale);
        // Mercator distortion makes vertical degrees roughly half as tall
        self.center_lat = (self.center_lat - dy as f64 * scale * 0.5).clamp(-85.0, 85.0);
    }

    /// Zoom in by a fixed step
    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * 1.5).min(MAX_ZOOM);
    }

    /// Zoom out by a fixed step
    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / 1.5).max(MIN_ZOOM);
    }

    /// Zoom in towards a specific pixel location
    pub fn zoom_in_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, 1.5);
    }

    /// Zoom out from a specific pixel location
    pub fn zoom_out_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, 1.0 / 1.5);
    }

    /// Zoom by factor while keeping the point under the cursor fixed
    fn zoom_at(&mut self, px: i32, py: i32, factor: f64) {
        let (lon, lat) = self.unproject(px, py);

        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);

        // Where the anchor point lands after zooming, then pan it back
        // under the cursor
        let (new_px, new_py) = self.project(lon, lat);
        self.pan(new_px - px, new_py - py);
    }

    /// Unproject pixel coordinates back to geographic coordinates (lon, lat)
    pub fn unproject(&self, px: i32, py: i32) -> (f64, f64) {
        let scale = self.zoom * self.width as f64;

        let center_x = (self.center_lon + 180.0) / 360.0;
        let center_y = mercator_y(self.center_lat);

        let x = (px as f64 - self.width as f64 / 2.0) / scale + center_x;
        let y = (py as f64 - self.height as f64 / 2.0) / scale + center_y;

        let lon = x * 360.0 - 180.0;
        let lat = (PI * (1.0 - 2.0 * y)).sinh().atan() * 180.0 / PI;

        (lon, lat)
    }

    /// Project a geographic coordinate (lon, lat) to pixel coordinates
    pub fn project(&self, lon: f64, lat: f64) -> (i32, i32) {
        let x = (lon + 180.0) / 360.0;
        let y = mercator_y(lat);

        let center_x = (self.center_lon + 180.0) / 360.0;
        let center_y = mercator_y(self.center_lat);

        let scale = self.zoom * self.width as f64;

        let px = ((x - center_x) * scale + self.width as f64 / 2.0) as i32;
        let py = ((y - center_y) * scale + self.height as f64 / 2.0) as i32;

        (px, py)
    }

    /// Pixels per meter of ground distance at the given latitude
    /// (used to size marker radii)
    pub fn pixels_per_meter(&self, lat: f64) -> f64 {
        // One degree of longitude is ~111,320 m at the equator, shrinking
        // with cos(lat); the marker circle uses the horizontal scale.
        let px_per_degree = self.zoom * self.width as f64 / 360.0;
        let meters_per_degree = 111_320.0 * lat.to_radians().cos().max(0.01);
        px_per_degree / meters_per_degree
    }

    /// Check if a projected point is visible in the viewport
    /// (with `margin` pixels of slack)
    pub fn is_visible(&self, px: i32, py: i32, margin: i32) -> bool {
        px >= -margin
            && px < self.width as i32 + margin
            && py >= -margin
            && py < self.height as i32 + margin
    }

    /// Check if a line segment might be visible (rough bounding box check)
    pub fn line_might_be_visible(&self, p1: (i32, i32), p2: (i32, i32)) -> bool {
        let min_x = p1.0.min(p2.0);
        let max_x = p1.0.max(p2.0);
        let min_y = p1.1.min(p2.1);
        let max_y = p1.1.max(p2.1);

        max_x >= 0 && min_x < self.width as i32 && max_y >= 0 && min_y < self.height as i32
    }
}

/// Wrap longitude into [-180, 180]
pub fn wrap_lon(lon: f64) -> f64 {
    let mut lon = lon;
    if lon > 180.0 {
        lon -= 360.0;
    } else if lon < -180.0 {
        lon += 360.0;
    }
    lon
}

/// Normalized Web Mercator y for a latitude in degrees
fn mercator_y(lat: f64) -> f64 {
    let lat_rad = lat * PI / 180.0;
    (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_center() {
        let vp = Viewport::new(0.0, 0.0, 1.0, 100, 100);
        let (x, y) = vp.project(0.0, 0.0);
        assert_eq!(x, 50);
        assert_eq!(y, 50);
    }

    #[test]
    fn test_pan() {
        let mut vp = Viewport::new(0.0, 0.0, 1.0, 100, 100);
        vp.pan(10, 0);
        assert!(vp.center_lon > 0.0);
    }

    #[test]
    fn test_unproject_roundtrip() {
        let vp = Viewport::new(78.9629, 20.5937, 4.0, 200, 100);
        let (px, py) = vp.project(77.2, 28.6);
        let (lon, lat) = vp.unproject(px, py);
        assert!((lon - 77.2).abs() < 1.0);
        assert!((lat - 28.6).abs() < 1.0);
    }

    #[test]
    fn test_set_camera_clamps() {
        let mut vp = Viewport::home(100, 100);
        vp.set_camera(95.0, 200.0, 1000.0);
        assert_eq!(vp.center_lat, 85.0);
        assert!(vp.center_lon <= 180.0);
        assert_eq!(vp.zoom, MAX_ZOOM);
    }

    #[test]
    fn test_pixels_per_meter_grows_with_zoom() {
        let near = Viewport::new(0.0, 0.0, 10.0, 100, 100);
        let far = Viewport::new(0.0, 0.0, 1.0, 100, 100);
        assert!(near.pixels_per_meter(0.0) > far.pixels_per_meter(0.0));
    }
}
