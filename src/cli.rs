//! Command-line interface for scratchpad.
//!
//! Each invocation restores the stored session, applies one command, and
//! flushes the result back to the session store.

use crate::session::{SessionManager, SessionStore};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// scratchpad - A multi-tab text scratchpad with a persistent session
#[derive(Parser, Debug)]
#[command(name = "scratchpad")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Use this config file instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set debug log level (overrides config and RUST_LOG)
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevelArg>,
}

/// Log level argument for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevelArg {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevelArg::Off => log::LevelFilter::Off,
            LogLevelArg::Error => log::LevelFilter::Error,
            LogLevelArg::Warn => log::LevelFilter::Warn,
            LogLevelArg::Info => log::LevelFilter::Info,
            LogLevelArg::Debug => log::LevelFilter::Debug,
            LogLevelArg::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List open tabs (default)
    List,

    /// Print the active tab's content
    Show,

    /// Open a new tab and switch to it
    New {
        /// Tab name (defaults to the numbered template)
        #[arg(long)]
        name: Option<String>,

        /// Initial content
        #[arg(long)]
        content: Option<String>,
    },

    /// Switch to the tab at INDEX (0-based)
    Switch { index: usize },

    /// Close the tab at INDEX (0-based)
    Close { index: usize },

    /// Append TEXT to the active tab
    Append { text: String },

    /// Load a file into the active tab
    Open { path: PathBuf },

    /// Write the active tab to PATH and mark it saved
    Export { path: PathBuf },

    /// Mark the active tab as saved
    Save,

    /// Discard the stored session
    Reset,
}

/// Apply `command` to a restored session and return the text to print
pub async fn execute<S: SessionStore>(
    manager: &mut SessionManager<S>,
    command: &Commands,
) -> Result<String> {
    match command {
        Commands::List => {}
        Commands::Show => return Ok(manager.active_text().unwrap_or_default()),
        Commands::New { name, content } => {
            if name.is_none() && content.is_none() {
                manager.new_tab();
            } else {
                let id = manager.create_tab(name.as_deref(), content.as_deref());
                manager.switch_to(id);
            }
        }
        Commands::Switch { index } => {
            if !manager.switch_to_index(*index) {
                log::warn!("No tab at index {}", index);
            }
        }
        Commands::Close { index } => {
            if !manager.close_tab_at(*index) {
                log::warn!("Tab at index {} was not closed", index);
            }
        }
        Commands::Append { text } => {
            manager.edit_active(|doc| doc.append(text));
        }
        Commands::Open { path } => {
            if manager.needs_discard_confirmation() {
                log::info!("Discarding unsaved changes in {}", manager.window_title());
            }
            manager
                .load_file(path)
                .await
                .with_context(|| format!("Failed to open {}", path.display()))?;
        }
        Commands::Export { path } => {
            manager
                .export_active_to(path)
                .await
                .with_context(|| format!("Failed to export to {}", path.display()))?;
        }
        Commands::Save => {
            manager.handle_signal(crate::session::InboundSignal::SaveConfirmed { filename: None });
        }
        Commands::Reset => {
            manager
                .clear_stored_session()
                .await
                .context("Failed to reset session")?;
            return Ok(String::new());
        }
    }

    manager.flush().await.context("Failed to save session")?;
    Ok(render_tab_list(manager))
}

/// Tab strip as text: one line per tab, active tab marked with `>`
pub fn render_tab_list<S: SessionStore>(manager: &SessionManager<S>) -> String {
    let mut out = String::new();
    for summary in manager.tab_summaries() {
        out.push_str(&format!(
            "{} {:>2}  {}\n",
            if summary.active { ">" } else { " " },
            summary.index,
            summary.label
        ));
    }
    out
}
