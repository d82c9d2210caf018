use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use equipviz::client::console::{ChartSlot, ConsoleCanvas, ConsoleMetrics, ConsoleTable};
use equipviz::client::{Dashboard, DashboardSurfaces, SummaryClient};
use equipviz::config::AppConfig;

#[cfg(feature = "server")]
use equipviz::server;

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    /// YAML configuration file
    #[clap(short, long, global = true)]
    config: Option<PathBuf>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[cfg(feature = "server")]
    Serve {
        #[clap(long)]
        host: Option<String>,
        #[clap(short, long)]
        port: Option<u16>,
        #[clap(short, long)]
        database: Option<String>,
        #[clap(long)]
        cors_origin: Option<String>,
    },
    #[cfg(feature = "server")]
    Db {
        #[clap(subcommand)]
        command: DbCommands,
    },
    /// Upload a CSV file and animate the returned summary
    Upload {
        file: PathBuf,
        #[clap(short, long)]
        endpoint: Option<String>,
        /// Milliseconds between animation frames
        #[clap(long)]
        tick_ms: Option<u64>,
    },
}

#[cfg(feature = "server")]
#[derive(Subcommand, Debug)]
enum DbCommands {
    Init {
        #[clap(short, long)]
        database: Option<String>,
    },
    Migrate {
        #[clap(subcommand)]
        direction: server::MigrateDirection,
        #[clap(short, long)]
        database: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Cli::parse();
    setup_logging(&args.log_level);

    let mut config = AppConfig::load(args.config.as_deref())?;

    match args.command {
        #[cfg(feature = "server")]
        Commands::Serve {
            host,
            port,
            database,
            cors_origin,
        } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(database) = database {
                config.server.database = database;
            }
            if cors_origin.is_some() {
                config.server.cors_origin = cors_origin;
            }
            info!("Starting server on port {}", config.server.port);
            server::start_server(&config.server).await?;
        }
        #[cfg(feature = "server")]
        Commands::Db { command } => match command {
            DbCommands::Init { database } => {
                let database = database.unwrap_or(config.server.database);
                info!("Initializing database: {}", database);
                server::migrate_database(&database, server::MigrateDirection::Up).await?;
            }
            DbCommands::Migrate {
                direction,
                database,
            } => {
                let database = database.unwrap_or(config.server.database);
                info!("Running database migration: {:?}", direction);
                server::migrate_database(&database, direction).await?;
            }
        },
        Commands::Upload {
            file,
            endpoint,
            tick_ms,
        } => {
            if let Some(endpoint) = endpoint {
                config.client.endpoint = endpoint;
            }
            if let Some(tick_ms) = tick_ms {
                config.client.tick_interval_ms = tick_ms;
            }
            return Ok(run_upload(&config, file).await);
        }
    }

    Ok(ExitCode::SUCCESS)
}

async fn run_upload(config: &AppConfig, file: PathBuf) -> ExitCode {
    let canvas = ConsoleCanvas::new();
    let surfaces = DashboardSurfaces {
        metrics: Arc::new(ConsoleMetrics),
        bar_chart: Arc::new(canvas.chart(ChartSlot::Bar)),
        line_chart: Arc::new(canvas.chart(ChartSlot::Line)),
        table: Arc::new(ConsoleTable),
    };
    let dashboard = Dashboard::new(
        SummaryClient::new(config.client.endpoint.clone()),
        surfaces,
        config.client.tick_interval(),
    );

    info!("Uploading {} to {}", file.display(), config.client.endpoint);
    match dashboard.run_upload(&file).await {
        Ok(_) => {
            dashboard.wait_until_complete().await;
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level
        .as_ref()
        .unwrap_or(&"info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!(
            "sqlx=warn,sea_orm_migration=warn,{}",
            log_level
        )))
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}
