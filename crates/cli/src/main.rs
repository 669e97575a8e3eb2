mod config;
mod error;
mod logging;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mcp::{Implementation, Server};
use runtime::{InferenceClient, Sidekick};
use tracing::{error, info, warn};

use config::{CONFIG_FILE, Config};
use error::Result;

const SERVER_NAME: &str = "lm-studio-mcp-sidekick";

#[derive(Parser)]
#[command(name = "lm-sidekick")]
#[command(about = "MCP server that offloads menial tasks to a local LM Studio model", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the TOML config file (optional)
    #[arg(short, long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Log level or filter directive, overrides LOG_LEVEL
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Serve MCP over stdio (default)
    Serve,
    /// Print the tool catalog as JSON
    Tools,
    /// Probe LM Studio once and print the status; exits 1 when unhealthy
    Health,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = logging::init(&config.log) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let code = match run(cli.command.unwrap_or(Commands::Serve), config).await {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "fatal error");
            1
        }
    };

    // Exit here rather than returning: a blocked stdin read would otherwise
    // keep the runtime from shutting down.
    std::process::exit(code);
}

fn load_config(cli: &Cli) -> Result<Config> {
    dotenvy::dotenv().ok();

    let mut config = Config::load_or_default(&cli.config)?;
    config.apply_env(|key| std::env::var(key).ok())?;
    if let Some(level) = &cli.log_level {
        config.log.level = level.clone();
    }
    config.validate()?;
    Ok(config)
}

async fn run(command: Commands, config: Config) -> Result<i32> {
    match command {
        Commands::Serve => cmd_serve(config).await.map(|()| 0),
        Commands::Tools => cmd_tools().map(|()| 0),
        Commands::Health => cmd_health(config).await,
    }
}

async fn cmd_serve(config: Config) -> Result<()> {
    info!(
        version = env!("CARGO_PKG_VERSION"),
        model = %config.backend.model,
        api_url = %config.backend.api_url,
        "starting LM Studio MCP sidekick"
    );

    let client = InferenceClient::new(config.backend);
    let info = Implementation {
        name: SERVER_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    let server = Server::new(info, Sidekick::new(client));

    info!("ready for connections on stdio");
    tokio::select! {
        served = server.serve_stdio() => {
            served?;
            info!("client closed the connection, shutting down");
        }
        signal = shutdown::signal() => {
            let signal = signal?;
            info!(signal, "received signal, shutting down gracefully");
        }
    }
    Ok(())
}

fn cmd_tools() -> Result<()> {
    let tools = runtime::tools::descriptors();
    println!("{}", serde_json::to_string_pretty(&tools)?);
    Ok(())
}

async fn cmd_health(config: Config) -> Result<i32> {
    let sidekick = Sidekick::new(InferenceClient::new(config.backend));
    let status = sidekick.health_status().await;
    println!("{}", serde_json::to_string_pretty(&status)?);

    if status.is_healthy() {
        Ok(0)
    } else {
        warn!(api_url = %status.api_url, "LM Studio is unreachable");
        Ok(1)
    }
}
