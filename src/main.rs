use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use melingo::{config, gateway};

#[derive(Parser)]
#[command(name = "melingo")]
#[command(about = "Session-aware engagement messages for online stores")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the engagement API server
    Serve {
        /// Port to bind to (overrides config)
        #[arg(short, long, env = "MELINGO_PORT")]
        port: Option<u16>,

        /// Bind address (overrides config)
        #[arg(short, long, env = "MELINGO_BIND")]
        bind: Option<String>,
    },

    /// Show version and decision engine configuration
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = config::load()?;

    match cli.command {
        Commands::Serve { port, bind } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            gateway::run(config).await
        }
        Commands::Status => {
            let engine = &config.engine;
            println!("melingo v{}", env!("CARGO_PKG_VERSION"));
            println!("listen:   {}:{}", config.server.bind, config.server.port);
            println!("provider: {} ({})", engine.provider, engine.model);
            let mode = match (engine.enabled, engine.api_key.is_some()) {
                (false, _) => "heuristic (generation disabled)".to_string(),
                (true, true) => "generation with heuristic fallback".to_string(),
                (true, false) => format!(
                    "heuristic (set {} to enable generation)",
                    config::api_key_env_var(&engine.provider).unwrap_or("an API key")
                ),
            };
            println!("mode:     {mode}");
            Ok(())
        }
    }
}
