use crate::app::App;
use crate::ui;
use anyhow::Result;
use crossterm::event::{self, Event};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tokio::sync::watch;
use typeahead::TypeaheadState;

const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(50);

pub async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    mut updates: watch::Receiver<TypeaheadState>,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(INPUT_POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        // Controller tasks publish through the watch channel; pick up the newest snapshot.
        if updates.has_changed().unwrap_or(false) {
            let state = updates.borrow_and_update().clone();
            app.sync_state(state);
        }

        if !app.running {
            break;
        }

        tokio::task::yield_now().await;
    }

    Ok(())
}
