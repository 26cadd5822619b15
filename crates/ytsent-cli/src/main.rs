mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "ytsent-cli")]
#[command(about = "Fetch YouTube comments and judge their overall reception")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the most popular comments of a video
    Comments {
        /// Video URL or bare video id
        link: String,

        /// Maximum number of comments to collect (defaults to `YTSENT_DEFAULT_MAX_COMMENTS`)
        #[arg(long, allow_negative_numbers = true)]
        max: Option<i64>,
    },
    /// Classify newline-separated comments and print the verdict
    Sentiment {
        /// Read comments from a file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Fetch comments for a video and print the verdict
    Analyze {
        /// Video URL or bare video id
        link: String,

        /// Maximum number of comments to analyze; zero or negative analyzes none
        #[arg(long, allow_negative_numbers = true)]
        max: Option<i64>,
    },
    /// Print the tool schemas exposed to an orchestrator
    Tools,
    /// Invoke a tool by name with JSON arguments
    Call {
        name: String,

        /// JSON object of tool arguments
        #[arg(long, default_value = "{}")]
        args: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = ytsent_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Comments { link, max } => commands::run_comments(&config, &link, max).await,
        Commands::Sentiment { file } => commands::run_sentiment(&config, file.as_deref()).await,
        Commands::Analyze { link, max } => commands::run_analyze(&config, &link, max).await,
        Commands::Tools => commands::run_tools(&config),
        Commands::Call { name, args } => commands::run_call(&config, &name, &args).await,
    }
}
