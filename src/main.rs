//! Greeting and health-probe service entry point.

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use utoipa::OpenApi;

use minikube_probe::api::{create_app, ApiDoc};
use minikube_probe::config::{Config, LOG_FORMAT_JSON};
use minikube_probe::metrics;
use minikube_probe::utils::shutdown_signal;

/// Greeting and Kubernetes probe HTTP service.
#[derive(Parser, Debug)]
#[command(name = "minikube-probe")]
#[command(about = "Serves a greeting plus /ready and /health probe endpoints")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

/// Listener overrides; unset flags fall back to the environment.
#[derive(clap::Args, Debug, Default)]
struct ServeArgs {
    /// Interface to bind.
    #[arg(long)]
    host: Option<String>,

    /// HTTP server port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Prometheus exporter port.
    #[arg(long)]
    metrics_port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve(ServeArgs),

    /// Check configuration validity.
    CheckConfig,

    /// Print the OpenAPI document as JSON.
    Openapi,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Configuration failures are reported after logging is up
    let config = Config::load();
    init_logging(&args, config.as_ref().ok());

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(config?),
        Some(Command::Openapi) => cmd_openapi(),
        Some(Command::Serve(serve)) => cmd_serve(config?, serve).await,
        None => cmd_serve(config?, ServeArgs::default()).await,
    }
}

/// Initialize the tracing subscriber.
fn init_logging(args: &Args, config: Option<&Config>) {
    let filter = if args.verbose {
        EnvFilter::new("minikube_probe=debug,tower_http=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(config.map(|c| c.rust_log.as_str()).unwrap_or("info"))
        })
    };

    let json = args.json_logs || config.is_some_and(Config::json_logs);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

/// Check configuration validity.
fn cmd_check_config(config: Config) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("MINIKUBE PROBE - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Validating configuration... ");
    if let Err(e) = config.validate() {
        println!("FAILED");
        println!("  Error: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed"));
    }
    println!("OK");

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Listen: {}", config.socket_addr()?);
    match config.metrics_addr()? {
        Some(addr) => println!("  Metrics: {}", addr),
        None => println!("  Metrics: Disabled"),
    }
    println!("  Log Level: {}", config.rust_log);
    println!(
        "  Log Format: {}",
        if config.json_logs() { LOG_FORMAT_JSON } else { "pretty" }
    );
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Print the OpenAPI document.
fn cmd_openapi() -> anyhow::Result<()> {
    println!("{}", ApiDoc::openapi().to_pretty_json()?);
    Ok(())
}

/// Run the HTTP server until a shutdown signal arrives.
async fn cmd_serve(mut config: Config, overrides: ServeArgs) -> anyhow::Result<()> {
    // Override with CLI args if provided
    if let Some(host) = overrides.host {
        config.host = host;
    }
    if let Some(port) = overrides.port {
        config.port = port;
    }
    if overrides.metrics_port.is_some() {
        config.metrics_port = overrides.metrics_port;
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    // Recorder must be installed before metrics are described
    if let Some(addr) = config.metrics_addr()? {
        metrics::install_exporter(addr)?;
        info!("Prometheus exporter listening on {}", addr);
    }
    metrics::init_metrics();

    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, create_app())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}
