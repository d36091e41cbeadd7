use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "sp-typeahead")]
#[command(about = "Type-ahead search over SharePoint and Microsoft Graph")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Open the interactive search box
    Run,
    /// Fetch suggestions for a single term and print them
    Query {
        term: String,
        /// Maximum number of suggestions (defaults to the configured limit)
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Print config path and create default file if missing
    ConfigPath,
}
