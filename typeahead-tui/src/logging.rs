use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const PIPELINE_CRATES: [&str; 4] = ["typeahead", "sp_search", "graph_search", "typeahead_tui"];

/// Directives used when `RUST_LOG` is not set.
fn default_directives(debug_suggestions: bool) -> String {
    if debug_suggestions {
        let pipeline = PIPELINE_CRATES
            .iter()
            .map(|krate| format!("{krate}=debug"))
            .collect::<Vec<_>>()
            .join(",");
        format!("info,{pipeline}")
    } else {
        "info".to_string()
    }
}

fn env_filter(debug_suggestions: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(debug_suggestions)))
}

/// Log to stderr. Used by the one-shot commands.
pub fn init_stderr(debug_suggestions: bool) {
    tracing_subscriber::registry()
        .with(env_filter(debug_suggestions))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Log to `path`, appending. The terminal is in raw mode while the search box runs.
pub fn init_file(path: &Path, debug_suggestions: bool) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(env_filter(debug_suggestions))
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .init();
    Ok(())
}
