// FocusFlow client
// Main entry point

use anyhow::Result;
use clap::Parser;

use focusflow::api::ApiClient;
use focusflow::cli::{self, Cli};
use focusflow::config::load_settings;
use focusflow::session::SessionStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("focusflow=info")),
        )
        .init();

    let cli = Cli::parse();

    // Load configuration; a --api-url flag wins over file and environment.
    let mut settings = load_settings()?;
    if let Some(api_url) = &cli.api_url {
        settings.api_url = api_url.clone();
    }

    let session = SessionStore::new()?;
    let api = ApiClient::new(&settings, session)?;

    let code = cli::run(cli, settings, api).await?;
    std::process::exit(code);
}
