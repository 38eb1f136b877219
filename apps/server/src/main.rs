use anyhow::Context;
use clap::{Parser, Subcommand};
use relink_config::load as load_config;
use relink_discord::{parse_link, AttachmentRefresher, DiscordRefreshClient};
use relink_gateway::{build_router, GatewayState};
use relink_runtime::telemetry;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

#[derive(Parser)]
#[command(name = "relink")]
#[command(about = "Redirects expired Discord attachment links to freshly signed ones")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve,
    /// Parse an attachment URL and print its identity
    Parse {
        /// Attachment URL or `channel/file/name.ext` path, already decoded
        url: String,
    },
    /// Refresh a single attachment URL and print the result
    Refresh {
        /// Attachment URL or `channel/file/name.ext` path, already decoded
        url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server().await,
        Commands::Parse { url } => print_link(&url),
        Commands::Refresh { url } => refresh_once(&url).await,
    }
}

/// Populate the process environment from `.env` before configuration is read.
fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => debug!(path = %path.display(), "loaded environment file"),
        Err(error) if error.not_found() => {
            info!("no .env file found, using system environment variables")
        }
        Err(error) => warn!(%error, "failed to read .env file"),
    }
}

async fn run_server() -> anyhow::Result<()> {
    telemetry::init_tracing().context("failed to initialise tracing")?;
    load_dotenv();

    info!("starting relink");

    let config = load_config().context("failed to load configuration")?;

    let state = GatewayState::from_config(&config).context("failed to build refresh client")?;
    let app = build_router(state);

    let address = format!("{}:{}", config.http.address, config.http.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind http listener on {address}"))?;

    info!(%address, "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(relink_runtime::shutdown_signal())
        .await
        .context("http server error")?;

    info!("relink shut down");
    Ok(())
}

fn print_link(url: &str) -> anyhow::Result<()> {
    let link = parse_link(url).with_context(|| format!("cannot parse {url:?}"))?;

    println!("{}", serde_json::to_string_pretty(&link)?);
    println!("{}", link.cdn_url());
    Ok(())
}

async fn refresh_once(url: &str) -> anyhow::Result<()> {
    telemetry::init_tracing().context("failed to initialise tracing")?;
    load_dotenv();

    let config = load_config().context("failed to load configuration")?;
    let link = parse_link(url).with_context(|| format!("cannot parse {url:?}"))?;

    let client =
        DiscordRefreshClient::from_config(&config.discord).context("failed to build client")?;
    let refreshed = client
        .refresh(&link.cdn_url_with_base(&config.discord.cdn_base_url), &config.token)
        .await
        .context("failed to refresh URL")?;

    println!("{refreshed}");
    Ok(())
}
