use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};
use api::{ApiState, JwtVerifier, Role, router};
use clap::{Parser, Subcommand};
use course_core::model::UserId;
use services::{AppServices, Clock};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(author, version, about = "SkillHub course progress server", long_about = None)]
struct Cli {
    /// SQLite database URL or path
    #[arg(long = "db", env = "SKILLHUB_DB_URL", default_value = "sqlite://skillhub.sqlite3", global = true)]
    db_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API
    Serve {
        #[arg(long, env = "SKILLHUB_HOST", default_value = "0.0.0.0")]
        host: String,

        #[arg(long, env = "PORT", default_value_t = 3002)]
        port: u16,

        #[arg(long, env = "SKILLHUB_JWT_SECRET", hide_env_values = true)]
        jwt_secret: String,
    },
    /// Mint a bearer token for local development
    IssueToken {
        #[arg(long)]
        user: u64,

        #[arg(long)]
        name: Option<String>,

        /// Grant access to the course management routes
        #[arg(long)]
        admin: bool,

        /// Lifetime in hours
        #[arg(long, default_value_t = 24)]
        hours: i64,

        #[arg(long, env = "SKILLHUB_JWT_SECRET", hide_env_values = true)]
        jwt_secret: String,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Turn `sqlite:relative.db` or a bare path into an absolute `sqlite://` URL.
fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:" {
        return trimmed.to_owned();
    }
    let path_str = trimmed
        .strip_prefix("sqlite://")
        .or_else(|| trimmed.strip_prefix("sqlite:"))
        .unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Create the database file and its parent directories if missing.
fn prepare_sqlite_file(db_url: &str) -> anyhow::Result<()> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let Some(path) = db_url.strip_prefix("sqlite://") else {
        bail!("invalid database url: {db_url}");
    };
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        bail!("invalid database url: {db_url}");
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)
            .with_context(|| format!("creating {}", path.display()))?;
    }
    Ok(())
}

async fn serve(db_url: &str, host: &str, port: u16, jwt_secret: &str) -> anyhow::Result<()> {
    let db_url = normalize_sqlite_url(db_url);
    prepare_sqlite_file(&db_url)?;
    let services = AppServices::new_sqlite(&db_url, Clock::system())
        .await
        .with_context(|| format!("opening {db_url}"))?;

    let state = ApiState::new(services, Arc::new(JwtVerifier::new(jwt_secret.as_bytes())));
    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("binding {host}:{port}"))?;
    let addr = listener.local_addr()?;
    tracing::info!(%addr, db = %db_url, "server listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown requested");
        })
        .await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            host,
            port,
            jwt_secret,
        } => serve(&cli.db_url, &host, port, &jwt_secret).await,
        Command::IssueToken {
            user,
            name,
            admin,
            hours,
            jwt_secret,
        } => {
            let role = if admin { Role::Admin } else { Role::Student };
            let token = JwtVerifier::new(jwt_secret.as_bytes()).issue(
                UserId::new(user),
                name.as_deref(),
                role,
                chrono::Duration::hours(hours),
            )?;
            println!("{token}");
            Ok(())
        }
    }
}
