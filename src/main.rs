// Entrypoint for the CLI application.
// - Keeps `main` small: read the configuration, set up logging, create an
//   API client and hand it to the UI loop.
// - Logs go to stderr so they never mix with the menus on stdout.

use clap::Parser;
use fiordispino_cli::api::ApiClient;
use fiordispino_cli::config::Config;
use fiordispino_cli::console::StdConsole;
use fiordispino_cli::ui::{self, Context, Settings};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(api_url = %config.api_url, "starting");
    let api = ApiClient::new(&config.api_url)?;
    let mut ctx = Context::new(StdConsole::new(), api, Settings::from(&config));

    // Blocks until the user exits or stdin is closed.
    ui::run(&mut ctx)?;
    Ok(())
}
