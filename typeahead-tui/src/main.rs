mod app;
mod bootstrap;
mod cli;
mod config;
mod logging;
mod runtime;
mod ui;

use crate::app::{App, Selection};
use crate::cli::{Cli, Commands};
use crate::config::AppConfig;
use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use typeahead::{CancellationToken, SuggestionFetcher, TypeaheadController};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run => run().await,
        Commands::Query { term, limit } => query(&term, limit).await,
        Commands::ConfigPath => {
            let path = AppConfig::write_default_if_missing()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

async fn run() -> Result<()> {
    let config = AppConfig::load()?;
    let log_path = config.log_path()?;
    logging::init_file(&log_path, config.debug_suggestions)?;

    let fetcher = bootstrap::build_fetcher(&config)?;
    let controller = TypeaheadController::new(fetcher, config.typeahead.clone());
    let updates = controller.subscribe();
    let mut app = App::new(controller);
    tracing::info!(site_url = %config.site_url, graph = config.graph.enabled, "Search box started");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = runtime::run_app(&mut terminal, &mut app, updates).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;

    match app.selection {
        Some(Selection::Opened { path, .. }) => println!("{}", path),
        Some(Selection::Submitted(query)) => println!("Search: {}", query),
        None => {}
    }
    Ok(())
}

async fn query(term: &str, limit: Option<usize>) -> Result<()> {
    let config = AppConfig::load()?;
    logging::init_stderr(config.debug_suggestions);

    let fetcher = bootstrap::build_fetcher(&config)?;
    let limit = limit.unwrap_or_else(|| config.typeahead.effective_limit());
    let cancel = CancellationToken::new();

    let fetch = fetcher.fetch(term.trim(), &cancel, limit);
    let items = match config.typeahead.request_timeout() {
        Some(timeout) => tokio::time::timeout(timeout, fetch)
            .await
            .with_context(|| format!("No suggestions within {} ms", timeout.as_millis()))?,
        None => fetch.await,
    }
    .with_context(|| format!("Failed to fetch suggestions for \"{}\"", term))?;

    if items.is_empty() {
        println!("No suggestions for \"{}\"", term);
        return Ok(());
    }
    for item in items {
        println!("{}", item.title);
        if !item.subtitle.is_empty() {
            println!("    {}", item.subtitle);
        }
        if item.has_path() {
            println!("    {}", item.path);
        }
    }
    Ok(())
}
