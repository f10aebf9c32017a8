use anyhow::Result;
use clap::Parser;
use scratchpad::cli::{self, Cli, Commands};
use scratchpad::config::Config;
use scratchpad::session::{FileStore, SessionManager};
use std::sync::Arc;
use tokio::runtime::Runtime;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // CLI --log-level flag takes highest precedence, then RUST_LOG, then config.
    scratchpad::debug::init_log_bridge(cli.log_level.map(|l| l.to_level_filter()));

    log::info!("Starting scratchpad {}", scratchpad::VERSION);

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    scratchpad::debug::set_log_level(config.log_level.to_level_filter());

    let runtime = Runtime::new()?;
    let result = runtime.block_on(run(config, cli.command.unwrap_or(Commands::List)));

    log::info!("Shutting down runtime");
    runtime.shutdown_timeout(std::time::Duration::from_secs(2));

    match result {
        Ok(output) => {
            print!("{output}");
            Ok(())
        }
        Err(e) => {
            eprintln!("scratchpad: error: {e:#}");
            Err(e)
        }
    }
}

async fn run(config: Config, command: Commands) -> Result<String> {
    let store = Arc::new(FileStore::new(config.session_store_dir()));
    log::info!("Session store: {:?}", store.dir());

    let mut manager = SessionManager::new(config, store, tokio::runtime::Handle::current());
    let outcome = manager.restore().await;
    log::debug!("Restore outcome: {:?}", outcome);

    cli::execute(&mut manager, &command).await
}
