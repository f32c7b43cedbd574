use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use ym_playlist::{Config, PlaylistResolver};

#[derive(Parser)]
#[command(name = "ym-playlist-cli")]
#[command(about = "Resolve a Yandex Music playlist link into normalized JSON", long_about = None)]
struct Cli {
    /// Playlist link to resolve
    link: String,

    /// Path to the JSON config file
    #[arg(short, long, default_value = ym_playlist::config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Session cookie for the legacy endpoint (overrides the config file)
    #[arg(long, env = "YM_SESSION_ID", hide_env_values = true)]
    session_id: Option<String>,

    /// Retries after the first attempt (overrides the config file)
    #[arg(long)]
    max_retries: Option<u32>,

    /// Per-attempt timeout in seconds (overrides the config file)
    #[arg(long)]
    timeout: Option<f64>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Print compact JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,
}

/// Load the config file, falling back to defaults when only a session id is given.
fn load_config(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if cli.config.exists() {
        Config::from_file(&cli.config)?
    } else if let Some(session_id) = &cli.session_id {
        debug!("{} not found, using defaults", cli.config.display());
        Config::new(session_id.as_str())
    } else {
        return Err(format!(
            "config file {} not found and no --session-id given",
            cli.config.display()
        )
        .into());
    };

    if let Some(session_id) = &cli.session_id {
        config.requester.session_id = session_id.clone();
    }
    if let Some(max_retries) = cli.max_retries {
        config.requester.max_retries = max_retries;
    }
    if let Some(timeout) = cli.timeout {
        config.requester.timeout = timeout;
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries only the JSON document.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load_config(&cli)?;
    info!(
        "Configuration loaded (max_retries={}, timeout={}s)",
        config.requester.max_retries, config.requester.timeout
    );

    let resolver = PlaylistResolver::new(config)?;
    let outcome = resolver.resolve(&cli.link).await;

    let json = if cli.compact {
        serde_json::to_string(&outcome)?
    } else {
        serde_json::to_string_pretty(&outcome)?
    };
    println!("{}", json);

    if outcome.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
