use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use interview_cli::{
    config::{Config, LoggingConfig},
    handlers::{chat, preview, session},
    state::AppState,
};

#[derive(Parser)]
#[command(name = "golden-interview")]
#[command(about = "Build a job posting through a conversational interview", long_about = None)]
struct Cli {
    /// Session id, or a URL carrying ?session= or ?q=
    #[arg(long, global = true)]
    session: Option<String>,

    /// Override api.base_url from the configuration
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interview (default)
    Chat,
    /// Print the job posting collected so far
    Status,
    /// List the fields the interview collects
    Schema,
    /// Forget the remembered session
    Reset,
    /// Render creative asset previews from a JSON file
    Preview { file: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Previews are offline and need no backend configuration
    if let Some(Commands::Preview { file }) = &cli.command {
        init_logging(&LoggingConfig::default());
        preview::run_preview(file, &mut io::stdout())?;
        return Ok(());
    }

    let mut config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
    }

    init_logging(&config.logging);
    tracing::info!("Using interview API at {}", config.api.base_url);

    let state = AppState::new(config)?;
    let mut stdout = io::stdout();

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            let mut controller = state.controller(cli.session.as_deref())?;
            let stdin = BufReader::new(tokio::io::stdin());
            chat::run_chat(&mut controller, stdin, &mut stdout).await?;
        }
        Commands::Status => session::print_status(&state, cli.session.as_deref(), &mut stdout).await?,
        Commands::Schema => session::print_schema(&state, &mut stdout).await?,
        Commands::Reset => session::reset(&state, &mut stdout)?,
        Commands::Preview { .. } => {}
    }

    Ok(())
}

fn init_logging(config: &LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let registry = tracing_subscriber::registry().with(env_filter);

    // Logs go to stderr so they never interleave with the transcript
    match config.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(io::stderr))
                .init();
        }
    }
}
