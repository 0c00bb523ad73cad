//! TUI application for the interactive discovery session.
//!
//! The `run` command acts as a thin front controller that wires the
//! session and delegates here:
//!
//! - `run_tui()` - interactive terminal UI with live results
//! - `run_headless()` - simple wait loop for non-TTY environments
//!
//! The event loop never talks to the backend: keystrokes become
//! `set_query`/`select_shop` calls on the session, and every tick renders
//! from the session's latest state snapshot.

use std::io::{self, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    widgets::ListState,
    Terminal,
};

use barbermap::map::SnapshotMapWidget;
use barbermap::session::DiscoverySession;

use crate::error::CliError;
use crate::ui::{ShopListWidget, StatusWidget};

/// Configuration for starting the TUI application.
pub struct TuiAppConfig<'a> {
    /// The running discovery session.
    pub session: &'a DiscoverySession<SnapshotMapWidget>,
    /// Shutdown signal from the signal handler.
    pub shutdown: Arc<AtomicBool>,
    /// Runtime driving the session (snapshot renders are dispatched here).
    pub runtime: &'a tokio::runtime::Runtime,
    /// Query to pre-fill the search box with.
    pub initial_query: String,
    /// Where snapshot renders are written (for the status line).
    pub snapshot_path: String,
}

/// Run the interactive TUI until the user quits.
pub fn run_tui(config: TuiAppConfig) -> Result<(), CliError> {
    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, config);
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    config: TuiAppConfig,
) -> Result<(), CliError> {
    let TuiAppConfig {
        session,
        shutdown,
        runtime,
        initial_query,
        snapshot_path,
    } = config;

    let mut query = initial_query;
    let mut list_state = ListState::default();
    // Status messages can come from the snapshot task, so they go through
    // a shared cell.
    let status = Arc::new(Mutex::new(String::new()));

    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    loop {
        if shutdown.load(Ordering::SeqCst) {
            break;
        }

        // Poll for keyboard events (non-blocking)
        if event::poll(Duration::from_millis(10)).map_err(CliError::Terminal)? {
            if let Event::Key(key) = event::read().map_err(CliError::Terminal)? {
                if key.kind == KeyEventKind::Press {
                    match (key.code, key.modifiers) {
                        (KeyCode::Esc, _) => break,
                        (KeyCode::Char('c'), KeyModifiers::CONTROL) => break,
                        (KeyCode::Char('s'), KeyModifiers::CONTROL) => {
                            spawn_snapshot(session, runtime, &status, &snapshot_path);
                        }
                        (KeyCode::Char(c), _) => {
                            query.push(c);
                            session.set_query(query.clone());
                        }
                        (KeyCode::Backspace, _) => {
                            query.pop();
                            session.set_query(query.clone());
                        }
                        (KeyCode::Up, _) => {
                            let count = session.state().results.len();
                            move_selection(&mut list_state, count, -1);
                        }
                        (KeyCode::Down, _) => {
                            let count = session.state().results.len();
                            move_selection(&mut list_state, count, 1);
                        }
                        (KeyCode::Enter, _) => {
                            let state = session.state();
                            if let Some(index) = list_state.selected() {
                                if let Some(shop) = state.results.get(index) {
                                    match session.select_shop(shop) {
                                        Ok(()) => {
                                            *status.lock().unwrap() =
                                                format!("Centered on {}", shop.name);
                                        }
                                        Err(e) => {
                                            *status.lock().unwrap() = format!("{}", e);
                                        }
                                    }
                                }
                            }
                        }
                        _ => {}
                    }
                }
            }
        }

        // Draw at tick rate
        if last_tick.elapsed() >= tick_rate {
            let state = session.state();

            // Result set may have shrunk under the cursor
            clamp_selection(&mut list_state, state.results.len());

            let message = status.lock().unwrap().clone();
            terminal
                .draw(|frame| {
                    let chunks = Layout::default()
                        .direction(Direction::Vertical)
                        .constraints([Constraint::Length(6), Constraint::Min(3)])
                        .split(frame.area());

                    frame.render_widget(StatusWidget::new(&state, &message), chunks[0]);
                    frame.render_stateful_widget(
                        ShopListWidget::new(&state.results),
                        chunks[1],
                        &mut list_state,
                    );
                })
                .map_err(CliError::Terminal)?;
            last_tick = Instant::now();
        }
    }

    Ok(())
}

/// Dispatch a snapshot render off the UI thread.
///
/// The render fetches map tiles synchronously, so it runs on the blocking
/// pool; the status cell reports completion.
fn spawn_snapshot(
    session: &DiscoverySession<SnapshotMapWidget>,
    runtime: &tokio::runtime::Runtime,
    status: &Arc<Mutex<String>>,
    snapshot_path: &str,
) {
    *status.lock().unwrap() = "Rendering snapshot...".to_string();

    let surface = Arc::clone(session.surface());
    let status = Arc::clone(status);
    let path = snapshot_path.to_string();
    runtime.spawn_blocking(move || {
        let message = match surface.render() {
            Ok(()) => format!("Snapshot saved: {}", path),
            Err(e) => format!("Snapshot failed: {}", e),
        };
        *status.lock().unwrap() = message;
    });
}

fn move_selection(list_state: &mut ListState, count: usize, delta: isize) {
    if count == 0 {
        list_state.select(None);
        return;
    }
    let current = list_state.selected().unwrap_or(0) as isize;
    let next = (current + delta).rem_euclid(count as isize) as usize;
    list_state.select(Some(next));
}

fn clamp_selection(list_state: &mut ListState, count: usize) {
    match list_state.selected() {
        Some(_) if count == 0 => list_state.select(None),
        Some(index) if index >= count => list_state.select(Some(count - 1)),
        _ => {}
    }
}

/// Run in headless mode (non-TTY environments).
///
/// A simple wait loop that prints the result count whenever it changes,
/// until the shutdown signal is received.
pub fn run_headless(
    session: &DiscoverySession<SnapshotMapWidget>,
    shutdown: Arc<AtomicBool>,
) -> Result<(), CliError> {
    println!("barbermap v{} (headless)", barbermap::VERSION);
    println!("Press Ctrl+C to stop.");
    println!();

    let mut last_count: Option<usize> = None;

    while !shutdown.load(Ordering::SeqCst) {
        std::thread::sleep(Duration::from_millis(100));

        let state = session.state();
        if !state.loading && last_count != Some(state.results.len()) {
            println!(
                "{} barbershop(s) near {}",
                state.results.len(),
                state.coordinates
            );
            last_count = Some(state.results.len());
        }
    }

    Ok(())
}
