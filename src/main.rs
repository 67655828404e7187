use anyhow::Result;
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use disaster_watch::app::{App, InputMode};
use disaster_watch::map::{default_preference_path, BasemapController, FilePreferences};
use disaster_watch::{data, ui};
use ratatui::DefaultTerminal;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "disaster-watch")]
#[command(about = "Terminal dashboard for crowd-sourced disaster sighting reports")]
struct Cli {
    /// Path to the report collection (JSON array exported by the backend)
    #[arg(long, default_value = "data/reports.json")]
    reports: PathBuf,

    /// Directory with Natural Earth GeoJSON background data
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Basemap preference file (defaults to the user config directory)
    #[arg(long)]
    prefs: Option<PathBuf>,
}

fn main() -> Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    // Load everything fallible before touching the terminal
    let reports = data::load_reports(&cli.reports)?;
    let prefs_path = cli.prefs.unwrap_or_else(default_preference_path);
    let basemap = BasemapController::restore(Box::new(FilePreferences::new(prefs_path)));

    let mut terminal = ratatui::init();
    terminal.clear()?;
    execute!(std::io::stdout(), EnableMouseCapture)?;

    let result = run(&mut terminal, reports, basemap, &cli.data_dir);

    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

fn run(
    terminal: &mut DefaultTerminal,
    reports: Vec<disaster_watch::report::Report>,
    basemap: BasemapController,
    data_dir: &std::path::Path,
) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(size.width as usize, size.height as usize, reports, basemap);

    let _ = data::load_basemap(&mut app.map_renderer, data_dir);
    if !app.map_renderer.has_data() {
        data::generate_simple_world(&mut app.map_renderer);
    }

    let mut last_frame = Instant::now();

    loop {
        terminal.draw(|frame| ui::render(frame, &app))?;

        // ~60fps event poll
        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    handle_key(&mut app, key);
                }
                Event::Mouse(mouse) => {
                    handle_mouse(&mut app, mouse);
                }
                Event::Resize(width, height) => {
                    app.resize(width as usize, height as usize);
                }
                _ => {}
            }
        }

        // Advance the fly-to animation by the real elapsed time
        let now = Instant::now();
        app.tick(now.duration_since(last_frame).as_secs_f64());
        last_frame = now;

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if app.input_mode != InputMode::Normal {
        match key.code {
            KeyCode::Enter => app.commit_input(),
            KeyCode::Esc => app.cancel_input(),
            KeyCode::Backspace => app.backspace_input(),
            KeyCode::Char(c) => app.push_input(c),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Esc => {
            if app.selected.is_some() {
                app.select(None);
            } else {
                app.quit();
            }
        }

        // Pan with hjkl or arrow keys
        KeyCode::Left | KeyCode::Char('h') => app.pan(-10, 0),
        KeyCode::Right | KeyCode::Char('l') => app.pan(10, 0),
        KeyCode::Up | KeyCode::Char('k') => app.pan(0, -6),
        KeyCode::Down | KeyCode::Char('j') => app.pan(0, 6),

        // Zoom
        KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
        KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),

        // Basemap cycle
        KeyCode::Char('b') | KeyCode::Char('B') => app.toggle_basemap(),

        // Filters
        KeyCode::Char('/') => app.begin_input(InputMode::Search),
        KeyCode::Char('s') => app.begin_input(InputMode::StartDate),
        KeyCode::Char('e') => app.begin_input(InputMode::EndDate),
        KeyCode::Char('c') => app.clear_filters(),

        // Selection cycling
        KeyCode::Tab | KeyCode::Char('n') => app.select_next(),
        KeyCode::BackTab | KeyCode::Char('N') => app.select_prev(),

        _ => {}
    }
}

/// Handle mouse events for panning, zooming, and marker selection
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    // Always track mouse position for the cursor marker
    app.set_mouse_pos(mouse.column, mouse.row);

    match mouse.kind {
        // Scroll wheel zooms towards the mouse position
        MouseEventKind::ScrollUp => app.zoom_in_at(mouse.column, mouse.row),
        MouseEventKind::ScrollDown => app.zoom_out_at(mouse.column, mouse.row),
        // Horizontal scroll pans (trackpad two-finger swipe)
        MouseEventKind::ScrollLeft => app.pan(-15, 0),
        MouseEventKind::ScrollRight => app.pan(15, 0),
        // Press-drag pans; a press without a drag selects the marker
        // under the cursor on release
        MouseEventKind::Down(MouseButton::Left) => {
            app.begin_drag(mouse.column, mouse.row);
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            app.handle_drag(mouse.column, mouse.row);
        }
        MouseEventKind::Up(MouseButton::Left) => {
            app.end_drag(mouse.column, mouse.row);
        }
        _ => {}
    }
}
