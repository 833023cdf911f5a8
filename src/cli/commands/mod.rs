//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.
//! Running without a subcommand starts the interactive menus.

mod analysis;
mod ask;
mod key;
mod resources;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::interactive;
use super::session::Session;
use crate::analysis::TokenizerMode;
use crate::config::{load_settings, LoadOptions};
use crate::history::RECENT_ENTRIES;

pub(crate) use analysis::export_with;

#[derive(Parser)]
#[command(name = "doclens")]
#[command(about = "Analyze PDF and text documents locally or ask questions about them")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory containing the documents to analyze
    #[arg(short, long, global = true, env = "DOCLENS_INPUTS_DIR")]
    inputs: Option<PathBuf>,

    /// Tokenizer used for local analysis
    #[arg(long, global = true, value_enum)]
    tokenizer: Option<TokenizerMode>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// List PDF and text files in the inputs directory
    Ls,

    /// Sentence and word counts, lexical density and page previews
    Summary {
        /// File name in the inputs directory, or a path
        file: String,
    },

    /// Find a term and show the text around each occurrence
    Search {
        file: String,
        /// Term to search for (case-insensitive, literal)
        term: String,
    },

    /// Most frequent content words and long technical terms
    Keywords { file: String },

    /// Sentence length and word length statistics
    Stats { file: String },

    /// Compare how often two words occur
    Compare {
        file: String,
        first: String,
        second: String,
    },

    /// Show document metadata and basic counts
    Metadata { file: String },

    /// Write the analysis to analysis_<name>.json
    Export {
        file: String,
        /// Output directory (defaults to the configured export directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Ask questions about a document using a language model
    Ask {
        file: String,
        /// Question to ask (starts an interactive session if omitted)
        question: Option<String>,
    },

    /// Show recent conversations
    History {
        /// Number of entries to show
        #[arg(short, long, default_value_t = RECENT_ENTRIES)]
        limit: usize,
    },

    /// Manage the stored OpenAI API key
    Key {
        #[command(subcommand)]
        command: KeyCommands,
    },

    /// Manage stopword lists for the linguistic tokenizer
    Resources {
        #[command(subcommand)]
        command: ResourceCommands,
    },
}

#[derive(Subcommand)]
enum KeyCommands {
    /// Show whether a key is configured
    Status,
    /// Store a key (prompts when omitted)
    Set { key: Option<String> },
    /// Remove the stored key
    Remove {
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ResourceCommands {
    /// Write the bundled stopword lists to the resources directory
    Install,
    /// Report stopword list, PDF tool and language model availability
    Check,
}

/// Parse arguments, load settings and run the selected command.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = LoadOptions {
        config_path: cli.config,
        inputs: cli.inputs,
        tokenizer: cli.tokenizer,
    };
    let settings = load_settings(&options).await?;
    let mut session = Session::new(settings);

    let Some(command) = cli.command else {
        return interactive::run(&mut session).await;
    };

    match command {
        Commands::Ls => analysis::cmd_ls(&session),
        Commands::Summary { file } => analysis::cmd_summary(&session, &file),
        Commands::Search { file, term } => analysis::cmd_search(&session, &file, &term),
        Commands::Keywords { file } => analysis::cmd_keywords(&session, &file),
        Commands::Stats { file } => analysis::cmd_stats(&session, &file),
        Commands::Compare {
            file,
            first,
            second,
        } => analysis::cmd_compare(&session, &file, &first, &second),
        Commands::Metadata { file } => analysis::cmd_metadata(&session, &file),
        Commands::Export { file, output } => {
            analysis::cmd_export(&session, &file, output.as_deref())
        }
        Commands::Ask { file, question } => {
            ask::cmd_ask(&mut session, &file, question.as_deref()).await
        }
        Commands::History { limit } => ask::cmd_history(&session, limit),
        Commands::Key { command } => match command {
            KeyCommands::Status => key::cmd_key_status(&session),
            KeyCommands::Set { key } => key::cmd_key_set(&mut session, key.as_deref()),
            KeyCommands::Remove { yes } => key::cmd_key_remove(&mut session, yes),
        },
        Commands::Resources { command } => match command {
            ResourceCommands::Install => resources::cmd_resources_install(&session),
            ResourceCommands::Check => resources::cmd_resources_check(&session).await,
        },
    }
}
