//! TUI front-end entry (Ratatui + Crossterm)
//! - Opens the SQLite budget store and starts the alert engine
//! - Sets up terminal and runs the draw/input loop

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::{backend::CrosstermBackend, Terminal};
use sqlx::{Pool, Sqlite};

use crate::alerts::{AlertEngine, Scope};
use crate::config::AlertConfig;
use crate::database::SqliteBudgetStore;

pub mod state;
pub mod ui;

pub async fn run(pool: Pool<Sqlite>, alerts: AlertConfig) -> Result<()> {
    let mut app = init_app(pool, alerts)?;

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // The loop blocks on terminal input; let the runtime move fetch tasks elsewhere.
    let result = tokio::task::block_in_place(|| event_loop(&mut terminal, &mut app));

    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    result
}

fn event_loop(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, app: &mut state::App) -> Result<()> {
    // Redraw cadence; engine updates land between ticks.
    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if let Err(e) = app.handle_key(key) {
                    tracing::warn!("Key handling failed: {}", e);
                    app.status = format!("Error: {e}");
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.quit {
            return Ok(());
        }
    }
}

pub fn init_app(pool: Pool<Sqlite>, alerts: AlertConfig) -> Result<state::App> {
    let store = Arc::new(SqliteBudgetStore::new(pool));
    let engine = AlertEngine::new(store, alerts);

    let mut app = state::App::new(engine, Scope::current());
    app.start()?;

    Ok(app)
}
