use anyhow::Result;
use clap::{Parser, Subcommand};
use midrate::core::config::AppConfig;
use midrate::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the conversion API (default)
    Serve {
        /// Address to listen on, overrides LISTEN_ADDR
        #[arg(short, long)]
        listen: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = serve(cli).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

async fn serve(cli: Cli) -> Result<()> {
    let mut config = AppConfig::load(cli.config_path.as_deref())?;
    if let Some(Commands::Serve {
        listen: Some(listen),
    }) = cli.command
    {
        config.listen_addr = listen;
    }
    midrate::run(config).await
}
