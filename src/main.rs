use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vibe_check::api::{self, AppState, SecurityConfig};
use vibe_check::catalog::Catalog;
use vibe_check::client::FeedbackClient;
use vibe_check::config::VibeConfig;
use vibe_check::db::Database;
use vibe_check::sink::{DatabaseSink, FeedbackSink, RemoteSink};
use vibe_check::survey::{SurveyController, SurveySession, DEFAULT_SESSION_IDLE};
use vibe_check::terminal::TerminalSurvey;

#[derive(Parser)]
#[command(name = "vibe")]
#[command(about = "Anonymous course feedback survey")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the survey server
    Serve {
        /// Port for HTTP API
        #[arg(short, long)]
        port: Option<u16>,

        /// SQLite database file
        #[arg(long)]
        db: Option<PathBuf>,

        /// JSON question catalog
        #[arg(long)]
        questions: Option<PathBuf>,
    },
    /// Take the survey in the terminal
    Take {
        /// Base URL of a running server
        #[arg(long)]
        url: Option<String>,

        /// Write straight into the local database instead of a server
        #[arg(long)]
        local: bool,

        /// SQLite database file (with --local)
        #[arg(long)]
        db: Option<PathBuf>,

        /// JSON question catalog
        #[arg(long)]
        questions: Option<PathBuf>,
    },
}

/// Initialize tracing with output to stderr (for the terminal survey) or stdout
fn init_tracing(use_stderr: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "vibe_check=debug,tower_http=debug".into()),
    );

    if use_stderr {
        // The survey itself owns stdout
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn open_database(path: Option<PathBuf>) -> anyhow::Result<Database> {
    let db = match path {
        Some(path) => Database::open(path)?,
        None => Database::open_default()?,
    };
    db.migrate()?;
    Ok(db)
}

async fn serve(config: VibeConfig) -> anyhow::Result<()> {
    tracing::info!("Starting vibe check server on port {}", config.port);

    let catalog = Arc::new(Catalog::load(config.questions_path.as_deref())?);
    let db = open_database(config.database_path.clone())?;

    let mut state = AppState::new(db, catalog);
    state.controller = state
        .controller
        .clone()
        .with_submit_timeout(config.submit_timeout());

    let security = SecurityConfig::from_env();
    let limiter = security.rate_limiter.clone();
    let sessions = state.sessions.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(300));
        loop {
            interval.tick().await;
            if let Some(limiter) = &limiter {
                limiter.cleanup();
            }
            let evicted = sessions.cleanup(DEFAULT_SESSION_IDLE);
            if evicted > 0 {
                tracing::debug!("Evicted {} idle survey sessions", evicted);
            }
        }
    });

    let app = api::create_router_with_config(state, security);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", config.port)).await?;
    tracing::info!(
        "Vibe check server listening on http://127.0.0.1:{}",
        config.port
    );

    axum::serve(listener, app).await?;
    Ok(())
}

async fn take(config: VibeConfig, local: bool) -> anyhow::Result<()> {
    let (catalog, sink) = if local {
        let catalog = Catalog::load(config.questions_path.as_deref())?;
        let db = open_database(config.database_path.clone())?;
        let sink: Arc<dyn FeedbackSink> = Arc::new(DatabaseSink::new(db));
        (catalog, sink)
    } else {
        let client = FeedbackClient::new(config.server_url.clone());
        let catalog = match config.questions_path.as_deref() {
            Some(path) => Catalog::from_json_file(path)?,
            None => Catalog::new(client.questions().await.with_context(|| {
                format!("Could not load questions from {}", client.base_url())
            })?)?,
        };
        let sink: Arc<dyn FeedbackSink> = Arc::new(RemoteSink::new(client));
        (catalog, sink)
    };

    let controller = SurveyController::new(sink).with_submit_timeout(config.submit_timeout());
    let session = Arc::new(Mutex::new(SurveySession::new(Arc::new(catalog))));

    let stdin = std::io::stdin();
    let mut terminal = TerminalSurvey::new(stdin.lock(), std::io::stdout(), controller);
    let summary = terminal.run(&session).await?;

    tracing::debug!("Terminal survey finished with {} submissions", summary.submitted);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The terminal survey needs stdout for itself
    let use_stderr = matches!(cli.command, Some(Commands::Take { .. }));
    init_tracing(use_stderr);

    let mut config = VibeConfig::load();

    match cli.command {
        Some(Commands::Serve {
            port,
            db,
            questions,
        }) => {
            config.port = port.unwrap_or(config.port);
            config.database_path = db.or(config.database_path);
            config.questions_path = questions.or(config.questions_path);
            serve(config).await?;
        }
        Some(Commands::Take {
            url,
            local,
            db,
            questions,
        }) => {
            config.server_url = url.unwrap_or(config.server_url);
            config.database_path = db.or(config.database_path);
            config.questions_path = questions.or(config.questions_path);
            take(config, local).await?;
        }
        None => serve(config).await?,
    }

    Ok(())
}
