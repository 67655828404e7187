use crate::braille::BrailleCanvas;
use crate::map::geometry::{draw_cross, draw_disc, draw_line, draw_ring};
use crate::map::markers::Marker;
use crate::map::projection::Viewport;
use crate::report::Rgb;

/// A geographic line (sequence of lon/lat coordinates)
pub type LineString = Vec<(f64, f64)>;

/// Level of detail for the background geometry
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Lod {
    Low,    // 110m - world view
    Medium, // 50m - continental
}

impl Lod {
    /// Select LOD based on zoom level
    pub fn from_zoom(zoom: f64) -> Self {
        if zoom < 4.0 {
            Lod::Low
        } else {
            Lod::Medium
        }
    }
}

/// One Braille layer of markers sharing a color
pub struct MarkerLayer {
    pub color: Rgb,
    pub canvas: BrailleCanvas,
}

/// Everything one frame of the map needs, split into layers so the UI
/// can assign each its own terminal color
pub struct RenderedMap {
    pub coastlines: BrailleCanvas,
    pub borders: BrailleCanvas,
    /// Marker interiors, one layer per flattened fill color
    pub fills: Vec<MarkerLayer>,
    /// Marker rims, one layer per stroke color
    pub rims: Vec<MarkerLayer>,
    /// Selection highlight (ring + crosshair)
    pub highlight: BrailleCanvas,
    /// Character-cell anchor to the right of the selected marker, for a
    /// text label overlay
    pub selected_anchor: Option<(u16, u16)>,
}

/// Renders background geography and report markers to per-color
/// Braille canvases
pub struct MapRenderer {
    coastlines_low: Vec<LineString>,
    coastlines_medium: Vec<LineString>,
    borders: Vec<LineString>,
}

impl MapRenderer {
    pub fn new() -> Self {
        Self {
            coastlines_low: Vec::new(),
            coastlines_medium: Vec::new(),
            borders: Vec::new(),
        }
    }

    /// Add coastline data at a specific LOD
    pub fn add_coastline(&mut self, line: LineString, lod: Lod) {
        match lod {
            Lod::Low => self.coastlines_low.push(line),
            Lod::Medium => self.coastlines_medium.push(line),
        }
    }

    /// Add a country border line
    pub fn add_border(&mut self, line: LineString) {
        self.borders.push(line);
    }

    /// Check if any background data is loaded
    pub fn has_data(&self) -> bool {
        !self.coastlines_low.is_empty() || !self.coastlines_medium.is_empty()
    }

    /// Get coastlines for the given LOD, falling back to coarser data
    fn coastlines(&self, lod: Lod) -> &Vec<LineString> {
        match lod {
            Lod::Medium if !self.coastlines_medium.is_empty() => &self.coastlines_medium,
            _ => &self.coastlines_low,
        }
    }

    /// Render one frame. `width`/`height` are character cells; the
    /// viewport is expected to carry the matching pixel dimensions.
    /// `selected` is the filtered-collection index of the selected
    /// report, if any.
    pub fn render(
        &self,
        width: usize,
        height: usize,
        viewport: &Viewport,
        markers: &[Marker],
        selected: Option<usize>,
    ) -> RenderedMap {
        let lod = Lod::from_zoom(viewport.zoom);

        let mut coastlines = BrailleCanvas::new(width, height);
        for line in self.coastlines(lod) {
            draw_linestring(&mut coastlines, line, viewport);
        }

        let mut borders = BrailleCanvas::new(width, height);
        for line in &self.borders {
            draw_linestring(&mut borders, line, viewport);
        }

        let mut fills: Vec<MarkerLayer> = Vec::new();
        let mut rims: Vec<MarkerLayer> = Vec::new();
        let mut highlight = BrailleCanvas::new(width, height);
        let mut selected_anchor = None;

        for marker in markers {
            let (px, py) = viewport.project(marker.lon, marker.lat);
            let radius = marker.radius_pixels(viewport);
            if !viewport.is_visible(px, py, radius + 2) {
                continue;
            }

            draw_disc(
                layer_canvas(&mut fills, marker.style.fill.flatten(), width, height),
                px,
                py,
                radius,
            );
            draw_ring(
                layer_canvas(&mut rims, marker.style.color, width, height),
                px,
                py,
                radius,
            );

            if selected == Some(marker.report_idx) {
                draw_ring(&mut highlight, px, py, radius + 2);
                draw_cross(&mut highlight, px, py, 2);
                if px >= 0 && py >= 0 {
                    let char_x = (px / 2) as u16;
                    let char_y = (py / 4) as u16;
                    selected_anchor = char_x.checked_add(2).map(|x| (x, char_y));
                }
            }
        }

        RenderedMap {
            coastlines,
            borders,
            fills,
            rims,
            highlight,
            selected_anchor,
        }
    }
}

impl Default for MapRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Canvas for the layer with this color, created on first use.
/// Insertion order keeps compositing deterministic.
fn layer_canvas(
    layers: &mut Vec<MarkerLayer>,
    color: Rgb,
    width: usize,
    height: usize,
) -> &mut BrailleCanvas {
    if let Some(idx) = layers.iter().position(|l| l.color == color) {
        return &mut layers[idx].canvas;
    }
    layers.push(MarkerLayer {
        color,
        canvas: BrailleCanvas::new(width, height),
    });
    let idx = layers.len() - 1;
    &mut layers[idx].canvas
}

/// Draw a linestring with viewport culling
fn draw_linestring(canvas: &mut BrailleCanvas, line: &LineString, viewport: &Viewport) {
    if line.len() < 2 {
        return;
    }

    let mut prev: Option<(i32, i32)> = None;

    for &(lon, lat) in line {
        let (px, py) = viewport.project(lon, lat);

        if let Some((prev_x, prev_y)) = prev {
            let dist = ((px - prev_x).abs() + (py - prev_y).abs()) as usize;
            if dist < viewport.width && viewport.line_might_be_visible((prev_x, prev_y), (px, py)) {
                draw_line(canvas, prev_x, prev_y, px, py);
            }
        }

        prev = Some((px, py));
    }
}
