use crate::app::{App, InputMode, SIDEBAR_WIDTH};
use crate::braille::BrailleCanvas;
use crate::map::{Basemap, RenderedMap};
use crate::report::{chart_color, Rgb, LEGEND};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Sparkline, Widget},
    Frame,
};

fn tint(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Terminal colors for the background layers of one basemap
struct MapTheme {
    coastline: Color,
    border: Color,
}

fn theme(basemap: Basemap) -> MapTheme {
    match basemap {
        Basemap::Satellite => MapTheme {
            coastline: Color::Green,
            border: Color::Yellow,
        },
        Basemap::Street => MapTheme {
            coastline: Color::Cyan,
            border: Color::Gray,
        },
        Basemap::Dark => MapTheme {
            coastline: Color::DarkGray,
            border: Color::DarkGray,
        },
    }
}

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Map + sidebar above a one-line status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(SIDEBAR_WIDTH)])
        .split(chunks[0]);

    render_map(frame, app, main[0]);
    render_sidebar(frame, app, main[1]);
    render_status_bar(frame, app, chunks[1]);
}

fn render_map(frame: &mut Frame, app: &App, area: Rect) {
    let basemap = app.basemap.current();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " Disaster Watch ",
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Line::from(Span::styled(
            format!(" {} ", basemap.tile_source().attribution),
            Style::default().fg(Color::DarkGray),
        )));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Braille gives 2x4 resolution per character
    let mut viewport = app.viewport.clone();
    viewport.width = inner.width as usize * 2;
    viewport.height = inner.height as usize * 4;

    let rendered = app.map_renderer.render(
        inner.width as usize,
        inner.height as usize,
        &viewport,
        &app.markers,
        app.selected,
    );

    let cursor_pos = app.mouse_pixel_pos().and_then(|(px, py)| {
        let cx = (px / 2) as u16;
        let cy = (py / 4) as u16;
        (cx < inner.width && cy < inner.height).then_some((cx, cy))
    });

    let map_widget = MapWidget {
        rendered,
        theme: theme(basemap),
        cursor_pos,
        selected_label: app.selected_report().map(|r| r.display_category()),
    };
    frame.render_widget(map_widget, inner);
}

/// Custom widget that composites the Braille layers, the legend, the
/// selected-report label, and the mouse cursor
struct MapWidget {
    rendered: RenderedMap,
    theme: MapTheme,
    cursor_pos: Option<(u16, u16)>,
    selected_label: Option<String>,
}

impl MapWidget {
    /// Render a Braille canvas layer with a specific color
    fn render_layer(canvas: &BrailleCanvas, color: Color, area: Rect, buf: &mut Buffer) {
        let rows = canvas.height().min(area.height as usize);
        let cols = canvas.width().min(area.width as usize);
        for cy in 0..rows {
            for cx in 0..cols {
                if canvas.cell_is_empty(cx, cy) {
                    continue;
                }
                let x = area.x + cx as u16;
                let y = area.y + cy as u16;
                buf[(x, y)].set_char(canvas.cell_char(cx, cy)).set_fg(color);
            }
        }
    }
}

impl Widget for MapWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Back to front: background geography, marker fills, marker
        // rims, selection highlight
        Self::render_layer(&self.rendered.coastlines, self.theme.coastline, area, buf);
        Self::render_layer(&self.rendered.borders, self.theme.border, area, buf);
        for layer in &self.rendered.fills {
            Self::render_layer(&layer.canvas, tint(layer.color), area, buf);
        }
        for layer in &self.rendered.rims {
            Self::render_layer(&layer.canvas, tint(layer.color), area, buf);
        }
        Self::render_layer(&self.rendered.highlight, Color::White, area, buf);

        // Category label next to the selected marker
        if let (Some((lx, ly)), Some(label)) = (self.rendered.selected_anchor, &self.selected_label)
        {
            if lx < area.width && ly < area.height {
                let max_len = (area.width - lx) as usize;
                let text: String = label.chars().take(max_len.min(24)).collect();
                buf.set_string(
                    area.x + lx,
                    area.y + ly,
                    text,
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                );
            }
        }

        // Legend in the bottom-left corner
        let legend_height = LEGEND.len() as u16;
        if area.height > legend_height + 1 && area.width > 24 {
            let top = area.y + area.height - legend_height;
            for (i, (label, color)) in LEGEND.iter().enumerate() {
                let y = top + i as u16;
                buf.set_string(area.x + 1, y, "●", Style::default().fg(tint(*color)));
                buf.set_string(
                    area.x + 3,
                    y,
                    *label,
                    Style::default().fg(Color::Gray),
                );
            }
        }

        // Mouse cursor marker
        if let Some((cx, cy)) = self.cursor_pos {
            if cx < area.width && cy < area.height {
                buf[(area.x + cx, area.y + cy)]
                    .set_char('╋')
                    .set_fg(Color::Red);
            }
        }
    }
}

fn render_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(6),
            Constraint::Length(9),
            Constraint::Length(5),
            Constraint::Length(8),
        ])
        .split(area);

    render_summary(frame, app, chunks[0]);
    render_report_list(frame, app, chunks[1]);
    render_category_chart(frame, app, chunks[2]);
    render_time_series(frame, app, chunks[3]);
    render_top_regions(frame, app, chunks[4]);
}

fn render_summary(frame: &mut Frame, app: &App, area: Rect) {
    let block = sidebar_block(" Summary ");
    let lines = vec![
        Line::from(vec![
            Span::styled("Total Reports: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                app.analytics.total.to_string(),
                Style::default().fg(Color::White),
            ),
        ]),
        Line::from(vec![
            Span::styled("Most Common:   ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                app.analytics.most_common_label(),
                Style::default().fg(Color::Red),
            ),
        ]),
        Line::from(vec![
            Span::styled("Latest Report: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                app.analytics.latest_label(),
                Style::default().fg(Color::White),
            ),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_report_list(frame: &mut Frame, app: &App, area: Rect) {
    let block = sidebar_block(&format!(" Reports ({}) ", app.filtered.len()));
    let inner_height = area.height.saturating_sub(2) as usize;

    // Keep the selected entry visible
    let offset = match app.selected {
        Some(sel) if inner_height > 0 => sel.saturating_sub(inner_height / 2),
        _ => 0,
    };

    let lines: Vec<Line> = app
        .filtered
        .iter()
        .enumerate()
        .skip(offset)
        .take(inner_height)
        .map(|(idx, report)| {
            // The selected entry also shows its media reference (which
            // degrades to a placeholder when the report had no photo)
            let (style, text) = if app.selected == Some(idx) {
                (
                    Style::default().bg(Color::Red).fg(Color::White),
                    format!(
                        "{}: {} [{}]",
                        report.display_category(),
                        report.note,
                        report.image_url()
                    ),
                )
            } else {
                (
                    Style::default().fg(Color::Gray),
                    format!("{}: {}", report.display_category(), report.note),
                )
            };
            Line::from(Span::styled(text, style))
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_category_chart(frame: &mut Frame, app: &App, area: Rect) {
    let block = sidebar_block(" Disaster Types ");
    let bars: Vec<Bar> = app
        .analytics
        .category_counts
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            Bar::default()
                .value(entry.count)
                .label(Line::from(entry.label()))
                .style(Style::default().fg(tint(chart_color(i))))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(chart, area);
}

fn render_time_series(frame: &mut Frame, app: &App, area: Rect) {
    let block = sidebar_block(" Reports Over Time ");
    let sparkline = Sparkline::default()
        .block(block)
        .style(Style::default().fg(Color::Red))
        .data(app.analytics.series.iter().map(|d| d.count));
    frame.render_widget(sparkline, area);
}

fn render_top_regions(frame: &mut Frame, app: &App, area: Rect) {
    let block = sidebar_block(" Top Affected Regions ");
    let lines: Vec<Line> = if app.analytics.top_regions.is_empty() {
        vec![Line::from(Span::styled(
            "No regional data available",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ))]
    } else {
        app.analytics
            .top_regions
            .iter()
            .map(|entry| {
                let width = area.width.saturating_sub(2) as usize;
                let count = entry.count.to_string();
                let name_width = width.saturating_sub(count.len() + 1);
                let name: String = entry.region.chars().take(name_width).collect();
                Line::from(vec![
                    Span::styled(
                        format!("{name:<name_width$} "),
                        Style::default().fg(Color::Gray),
                    ),
                    Span::styled(count, Style::default().fg(Color::Red)),
                ])
            })
            .collect()
    };
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn sidebar_block(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            title.to_string(),
            Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
        ))
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = match app.input_mode {
        InputMode::Search => editing_line("Search", &app.input_buffer),
        InputMode::StartDate => editing_line("Start date (YYYY-MM-DD)", &app.input_buffer),
        InputMode::EndDate => editing_line("End date (YYYY-MM-DD)", &app.input_buffer),
        InputMode::Normal => normal_status(app),
    };
    frame.render_widget(Paragraph::new(status), area);
}

fn editing_line<'a>(label: &str, buffer: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(
            format!(" {label}: "),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::styled(buffer, Style::default().fg(Color::White)),
        Span::styled("█", Style::default().fg(Color::White)),
        Span::styled(
            "  (Enter: apply, Esc: cancel)",
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

fn normal_status(app: &App) -> Line<'_> {
    let criteria = &app.criteria;
    let search = if criteria.search_term.is_empty() {
        "-".to_string()
    } else {
        criteria.search_term.clone()
    };
    let date = |bound: Option<chrono::NaiveDate>| {
        bound.map_or_else(|| "-".to_string(), |d| d.to_string())
    };

    Line::from(vec![
        Span::styled(" Zoom: ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.zoom_level(), Style::default().fg(Color::Yellow)),
        Span::styled(" | Basemap: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            app.basemap.current().tag(),
            Style::default().fg(Color::Green),
        ),
        Span::styled(" | Search: ", Style::default().fg(Color::DarkGray)),
        Span::styled(search, Style::default().fg(Color::White)),
        Span::styled(" From: ", Style::default().fg(Color::DarkGray)),
        Span::styled(date(criteria.start_date), Style::default().fg(Color::White)),
        Span::styled(" To: ", Style::default().fg(Color::DarkGray)),
        Span::styled(date(criteria.end_date), Style::default().fg(Color::White)),
        Span::styled(
            " | /:search s,e:dates c:clear b:basemap Tab:select q:quit",
            Style::default().fg(Color::DarkGray),
        ),
    ])
}
