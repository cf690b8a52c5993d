use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use psyllid_gateway::connector::GatewaySetup;
use psyllid_gateway::{dotenv, health, routes};
use psyllid_gateway_configuration::environment::ProcessEnvironment;
use psyllid_gateway_configuration::{write_parsed_configuration, ParsedConfiguration};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
    #[command(flatten)]
    options: ServerOptions,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP API (the default).
    Serve,
    /// Run `SELECT 1` against the warehouse to check credentials and permissions.
    Check,
    /// Write an initial configuration file that reads everything from the environment.
    Initialize {
        #[arg(long, value_name = "DIR", default_value = ".")]
        out_dir: PathBuf,
    },
}

#[derive(clap::Args)]
struct ServerOptions {
    #[arg(long, global = true, env = "HOST", default_value = "0.0.0.0")]
    host: String,
    #[arg(long, global = true, env = "PORT", default_value_t = 5000)]
    port: u16,
    /// Directory containing `configuration.json`. Defaults to reading the environment.
    #[arg(long, global = true, env = "GATEWAY_CONFIGURATION", value_name = "DIR")]
    configuration: Option<PathBuf>,
    /// Directory the KML overlays are served from.
    #[arg(long, global = true, env = "KML_DIR", value_name = "DIR")]
    kml_directory: Option<PathBuf>,
}

#[tokio::main]
pub async fn main() -> ExitCode {
    let dotenv = dotenv::load();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = dotenv {
        tracing::warn!(error = %err, "unable to load the .env file");
    }

    let cli = Cli::parse();
    let result = match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(cli.options).await,
        Command::Check => check(cli.options).await,
        Command::Initialize { out_dir } => initialize(out_dir).await,
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("{error:#}");
            ExitCode::FAILURE
        }
    }
}

async fn serve(options: ServerOptions) -> anyhow::Result<()> {
    let setup = GatewaySetup::new(ProcessEnvironment);
    let configuration = setup
        .parse_configuration(options.configuration.as_deref(), options.kml_directory)
        .await?;
    let state = setup.try_init_state(&configuration).await?;

    let router = routes::create_router(state);
    let address: SocketAddr = format!("{}:{}", options.host, options.port).parse()?;

    tracing::info!(
        %address,
        project_id = %configuration.project_id,
        dataset_id = %configuration.dataset_id,
        kml_directory = %configuration.kml_directory.display(),
        "Starting server"
    );

    axum::Server::bind(&address)
        .serve(router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn check(options: ServerOptions) -> anyhow::Result<()> {
    let setup = GatewaySetup::new(ProcessEnvironment);
    let configuration = setup
        .parse_configuration(options.configuration.as_deref(), options.kml_directory)
        .await?;
    let state = setup.try_init_state(&configuration).await?;

    health::health_check(state.warehouse.as_ref(), &state.metrics).await?;

    tracing::info!(
        project_id = %configuration.project_id,
        location = configuration.location.as_deref().unwrap_or("default"),
        "OK: the service account can run query jobs"
    );
    Ok(())
}

async fn initialize(out_dir: PathBuf) -> anyhow::Result<()> {
    write_parsed_configuration(&ParsedConfiguration::initial(), &out_dir).await?;
    tracing::info!(out_dir = %out_dir.display(), "Wrote configuration");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "unable to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
