use crate::map::{
    build_markers, hit_test, BasemapController, Camera, FlyToController, MapRenderer, Marker,
    Viewport,
};
use crate::report::{aggregate, filter_reports, AnalyticsSnapshot, FilterCriteria, Report};
use chrono::NaiveDate;
use log::warn;

/// Sidebar width in terminal columns (analytics panels need this much)
pub const SIDEBAR_WIDTH: u16 = 34;

/// What the keyboard is currently editing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    StartDate,
    EndDate,
}

/// Application state: the raw report collection plus every derived
/// structure (filtered set, analytics, markers), the camera, and the
/// interaction state. Derived fields are pure functions of the raw
/// collection and the current criteria, recomputed on every change.
pub struct App {
    pub reports: Vec<Report>,
    pub criteria: FilterCriteria,
    pub filtered: Vec<Report>,
    pub analytics: AnalyticsSnapshot,
    pub markers: Vec<Marker>,
    /// Index into `filtered` of the selected report
    pub selected: Option<usize>,
    pub viewport: Viewport,
    pub camera: Camera,
    pub fly_to: FlyToController,
    pub basemap: BasemapController,
    pub map_renderer: MapRenderer,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub should_quit: bool,
    /// Last mouse position for drag tracking
    pub last_mouse: Option<(u16, u16)>,
    /// Current mouse position for cursor marker
    pub mouse_pos: Option<(u16, u16)>,
    /// Whether the current mouse press has dragged (a press without a
    /// drag is a click)
    dragged: bool,
}

impl App {
    pub fn new(
        width: usize,
        height: usize,
        reports: Vec<Report>,
        basemap: BasemapController,
    ) -> Self {
        let (pixel_width, pixel_height) = map_pixel_size(width, height);

        let mut app = Self {
            reports,
            criteria: FilterCriteria::default(),
            filtered: Vec::new(),
            analytics: AnalyticsSnapshot::default(),
            markers: Vec::new(),
            selected: None,
            viewport: Viewport::home(pixel_width, pixel_height),
            camera: Camera::new(),
            fly_to: FlyToController::new(),
            basemap,
            map_renderer: MapRenderer::new(),
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            should_quit: false,
            last_mouse: None,
            mouse_pos: None,
            dragged: false,
        };
        app.recompute();
        app
    }

    /// Rebuild every derived structure from the raw collection and the
    /// current criteria. Selection is carried across by report id; a
    /// selected report that no longer survives the filter is dropped.
    pub fn recompute(&mut self) {
        let selected_id = self
            .selected
            .and_then(|i| self.filtered.get(i))
            .map(|r| r.id.clone());

        self.filtered = filter_reports(&self.reports, &self.criteria);
        self.analytics = aggregate(&self.filtered);
        self.markers = build_markers(&self.filtered);

        self.selected = selected_id.and_then(|id| self.filtered.iter().position(|r| r.id == id));
    }

    pub fn selected_report(&self) -> Option<&Report> {
        self.selected.and_then(|i| self.filtered.get(i))
    }

    /// Selection event: remember the choice and fly the camera to it.
    /// Fires on every event, so re-selecting the same report flies again.
    pub fn select(&mut self, idx: Option<usize>) {
        self.selected = idx.filter(|&i| i < self.filtered.len());
        let report = self.selected.and_then(|i| self.filtered.get(i));
        self.fly_to.on_select(report, &mut self.camera, &self.viewport);
    }

    pub fn select_next(&mut self) {
        if self.filtered.is_empty() {
            return;
        }
        let next = match self.selected {
            Some(i) => (i + 1) % self.filtered.len(),
            None => 0,
        };
        self.select(Some(next));
    }

    pub fn select_prev(&mut self) {
        if self.filtered.is_empty() {
            return;
        }
        let prev = match self.selected {
            Some(0) | None => self.filtered.len() - 1,
            Some(i) => i - 1,
        };
        self.select(Some(prev));
    }

    /// Mouse click on the map: select the marker under the cursor, if
    /// any. Clicks outside the map area are ignored.
    pub fn click(&mut self, col: u16, row: u16) {
        let (px, py) = terminal_to_pixel(col, row);
        if !self.viewport.is_visible(px, py, 0) {
            return;
        }
        if let Some(idx) = hit_test(&self.markers, &self.viewport, px, py) {
            self.select(Some(idx));
        }
    }

    // --- input editing -------------------------------------------------

    pub fn begin_input(&mut self, mode: InputMode) {
        self.input_buffer = match mode {
            InputMode::Normal => String::new(),
            InputMode::Search => self.criteria.search_term.clone(),
            InputMode::StartDate => date_buffer(self.criteria.start_date),
            InputMode::EndDate => date_buffer(self.criteria.end_date),
        };
        self.input_mode = mode;
    }

    pub fn push_input(&mut self, c: char) {
        self.input_buffer.push(c);
    }

    pub fn backspace_input(&mut self) {
        self.input_buffer.pop();
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
    }

    /// Commit the edit buffer into the criteria and recompute. An
    /// unparseable date is discarded (the previous bound stays); an
    /// empty buffer clears the bound.
    pub fn commit_input(&mut self) {
        match self.input_mode {
            InputMode::Normal => {}
            InputMode::Search => {
                self.criteria.search_term = self.input_buffer.trim().to_string();
                self.recompute();
            }
            InputMode::StartDate => {
                if let Some(bound) = parse_date_input(&self.input_buffer) {
                    self.criteria.start_date = bound;
                    self.recompute();
                }
            }
            InputMode::EndDate => {
                if let Some(bound) = parse_date_input(&self.input_buffer) {
                    self.criteria.end_date = bound;
                    self.recompute();
                }
            }
        }
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
    }

    pub fn clear_filters(&mut self) {
        self.criteria.clear();
        self.recompute();
    }

    pub fn toggle_basemap(&mut self) {
        self.basemap.toggle();
    }

    // --- camera and viewport -------------------------------------------

    /// Advance the fly-to animation by `dt` seconds
    pub fn tick(&mut self, dt: f64) {
        self.camera.tick(&mut self.viewport, dt);
    }

    /// Update viewport size when the terminal resizes
    pub fn resize(&mut self, width: usize, height: usize) {
        let (pixel_width, pixel_height) = map_pixel_size(width, height);
        self.viewport.width = pixel_width;
        self.viewport.height = pixel_height;
    }

    pub fn pan(&mut self, dx: i32, dy: i32) {
        self.viewport.pan(dx, dy);
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    /// Zoom in towards a screen position (terminal column/row)
    pub fn zoom_in_at(&mut self, col: u16, row: u16) {
        let (px, py) = terminal_to_pixel(col, row);
        self.viewport.zoom_in_at(px, py);
    }

    /// Zoom out from a screen position (terminal column/row)
    pub fn zoom_out_at(&mut self, col: u16, row: u16) {
        let (px, py) = terminal_to_pixel(col, row);
        self.viewport.zoom_out_at(px, py);
    }

    pub fn begin_drag(&mut self, col: u16, row: u16) {
        self.last_mouse = Some((col, row));
        self.dragged = false;
    }

    /// Handle mouse drag, scaled down when zoomed out
    pub fn handle_drag(&mut self, x: u16, y: u16) {
        if let Some((last_x, last_y)) = self.last_mouse {
            let dx = i32::from(last_x) - i32::from(x);
            let dy = i32::from(last_y) - i32::from(y);
            if dx != 0 || dy != 0 {
                self.dragged = true;
            }
            let scale = if self.viewport.zoom < 2.0 {
                2
            } else if self.viewport.zoom < 4.0 {
                3
            } else {
                4
            };
            self.pan(dx * scale, dy * scale);
        }
        self.last_mouse = Some((x, y));
    }

    /// Mouse button released: a press that never dragged is a click
    pub fn end_drag(&mut self, col: u16, row: u16) {
        let was_click = self.last_mouse.is_some() && !self.dragged;
        self.last_mouse = None;
        self.dragged = false;
        if was_click {
            self.click(col, row);
        }
    }

    /// Update mouse cursor position
    pub fn set_mouse_pos(&mut self, col: u16, row: u16) {
        self.mouse_pos = Some((col, row));
    }

    /// Get mouse position in Braille pixel coordinates (for rendering)
    pub fn mouse_pixel_pos(&self) -> Option<(i32, i32)> {
        self.mouse_pos.map(|(col, row)| terminal_to_pixel(col, row))
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Get current zoom level as a string
    pub fn zoom_level(&self) -> String {
        format!("{:.1}x", self.viewport.zoom)
    }
}

/// Braille pixel dimensions of the map area for a terminal size.
/// The sidebar takes a fixed column width; the map block spends two
/// columns/rows on its border and one row on the status bar.
fn map_pixel_size(width: usize, height: usize) -> (usize, usize) {
    let inner_width = width
        .saturating_sub(SIDEBAR_WIDTH as usize)
        .saturating_sub(2);
    let inner_height = height.saturating_sub(3);
    (inner_width * 2, inner_height * 4)
}

/// Terminal cell → Braille pixel inside the map block (1-cell border)
fn terminal_to_pixel(col: u16, row: u16) -> (i32, i32) {
    let px = i32::from(col.saturating_sub(1)) * 2;
    let py = i32::from(row.saturating_sub(1)) * 4;
    (px, py)
}

fn date_buffer(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_default()
}

/// Parse a date edit buffer: empty clears the bound, `YYYY-MM-DD` sets
/// it, anything else is discarded with a warning (returns `None`).
fn parse_date_input(raw: &str) -> Option<Option<NaiveDate>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(None);
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(Some(date)),
        Err(_) => {
            warn!("discarding unparseable date input {raw:?}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{Basemap, PreferenceStore};
    use crate::report::sample;

    struct NullStore;

    impl PreferenceStore for NullStore {
        fn load(&self) -> Option<String> {
            None
        }
        fn save(&mut self, _value: &str) {}
    }

    fn app_with(reports: Vec<Report>) -> App {
        App::new(
            120,
            40,
            reports,
            BasemapController::restore(Box::new(NullStore)),
        )
    }

    fn fixture() -> Vec<Report> {
        vec![
            sample(
                "1",
                "Fire",
                "smoke over the ridge",
                "Delhi, India - Latitude: 28.6, Longitude: 77.2",
                "2024-01-01",
            ),
            sample(
                "2",
                "Flood",
                "river breached the levee",
                "Mumbai, India - Latitude: 19.0, Longitude: 72.8",
                "2024-06-01",
            ),
            sample("3", "fallen_trees", "road blocked", "Pune, India", "2024-06-15"),
        ]
    }

    #[test]
    fn test_new_computes_derived_state() {
        let app = app_with(fixture());
        assert_eq!(app.filtered.len(), 3);
        assert_eq!(app.analytics.total, 3);
        // Report 3 has no coordinates: in analytics but not on the map
        assert_eq!(app.markers.len(), 2);
    }

    #[test]
    fn test_search_commit_filters_and_recomputes() {
        let mut app = app_with(fixture());
        app.begin_input(InputMode::Search);
        for c in "flood".chars() {
            app.push_input(c);
        }
        app.commit_input();
        assert_eq!(app.filtered.len(), 1);
        assert_eq!(app.analytics.total, 1);
        assert_eq!(app.markers.len(), 1);
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_selection_survives_recompute_by_id() {
        let mut app = app_with(fixture());
        app.select(Some(1)); // "2"
        app.begin_input(InputMode::StartDate);
        for c in "2024-03-01".chars() {
            app.push_input(c);
        }
        app.commit_input();
        // "1" is filtered out, "2" is now first
        assert_eq!(app.filtered[0].id, "2");
        assert_eq!(app.selected, Some(0));
    }

    #[test]
    fn test_selection_dropped_when_filtered_out() {
        let mut app = app_with(fixture());
        app.select(Some(0)); // "1", created 2024-01-01
        app.begin_input(InputMode::StartDate);
        for c in "2024-03-01".chars() {
            app.push_input(c);
        }
        app.commit_input();
        assert_eq!(app.selected, None);
    }

    #[test]
    fn test_invalid_date_input_is_discarded() {
        let mut app = app_with(fixture());
        app.begin_input(InputMode::StartDate);
        for c in "soon".chars() {
            app.push_input(c);
        }
        app.commit_input();
        assert_eq!(app.criteria.start_date, None);
        assert_eq!(app.filtered.len(), 3);
    }

    #[test]
    fn test_empty_date_input_clears_bound() {
        let mut app = app_with(fixture());
        app.criteria.start_date = NaiveDate::from_ymd_opt(2024, 3, 1);
        app.recompute();
        assert_eq!(app.filtered.len(), 2);
        app.begin_input(InputMode::StartDate);
        app.input_buffer.clear();
        app.commit_input();
        assert_eq!(app.criteria.start_date, None);
        assert_eq!(app.filtered.len(), 3);
    }

    #[test]
    fn test_clear_filters_restores_everything() {
        let mut app = app_with(fixture());
        app.criteria.search_term = "flood".to_string();
        app.criteria.end_date = NaiveDate::from_ymd_opt(2024, 12, 31);
        app.recompute();
        app.clear_filters();
        assert!(app.criteria.is_empty());
        assert_eq!(app.filtered.len(), 3);
    }

    #[test]
    fn test_select_flies_camera_when_coordinates_resolve() {
        let mut app = app_with(fixture());
        app.select(Some(0));
        assert!(app.camera.is_animating());
    }

    #[test]
    fn test_select_without_coordinates_is_silent() {
        let mut app = app_with(fixture());
        app.select(Some(2)); // "3" has no coordinates
        assert_eq!(app.selected, Some(2));
        assert!(!app.camera.is_animating());
    }

    #[test]
    fn test_select_cycling_wraps() {
        let mut app = app_with(fixture());
        app.select_next();
        assert_eq!(app.selected, Some(0));
        app.select_prev();
        assert_eq!(app.selected, Some(2));
        app.select_next();
        assert_eq!(app.selected, Some(0));
    }

    #[test]
    fn test_selection_on_empty_collection_is_a_no_op() {
        let mut app = app_with(Vec::new());
        app.select_next();
        assert_eq!(app.selected, None);
        app.select(Some(5));
        assert_eq!(app.selected, None);
    }

    #[test]
    fn test_toggle_basemap_cycles() {
        let mut app = app_with(Vec::new());
        assert_eq!(app.basemap.current(), Basemap::Satellite);
        app.toggle_basemap();
        assert_eq!(app.basemap.current(), Basemap::Street);
    }

    #[test]
    fn test_press_without_drag_is_a_click() {
        let mut app = app_with(fixture());
        // Find where marker 0 sits on screen and click there
        let (px, py) = app.viewport.project(77.2, 28.6);
        let col = (px / 2 + 1) as u16;
        let row = (py / 4 + 1) as u16;
        app.begin_drag(col, row);
        app.end_drag(col, row);
        assert_eq!(app.selected, Some(0));
    }

    #[test]
    fn test_drag_pans_instead_of_selecting() {
        let mut app = app_with(fixture());
        let before = app.viewport.center_lon;
        app.begin_drag(20, 10);
        app.handle_drag(10, 10);
        app.end_drag(10, 10);
        assert_eq!(app.selected, None);
        assert!(app.viewport.center_lon != before);
    }
}
