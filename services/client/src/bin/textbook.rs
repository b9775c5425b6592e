//! services/client/src/bin/textbook.rs

use client_lib::{
    adapters::{FileSessionStorage, HttpBackendAdapter},
    auth::{AuthService, SessionStore},
    config::Config,
    error::ClientError,
    search::{highlight, SearchController, SearchOutcome},
};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use textbook_core::domain::{AuthProvider, Credentials};
use textbook_core::ports::LearningMaterialsService;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "textbook", about = "Sign in and search the textbook from the terminal")]
struct Cli {
    /// Backend base URL. Takes precedence over TEXTBOOK_BACKEND_URL.
    #[arg(long, global = true)]
    backend_url: Option<String>,

    /// Where the session record is kept.
    #[arg(long, global = true, env = "TEXTBOOK_SESSION_PATH")]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and store a session.
    SignIn {
        #[command(subcommand)]
        provider: SignInProvider,
    },
    /// Clear the stored session.
    SignOut,
    /// Show who is signed in.
    Status,
    /// Print the current auth token.
    Token,
    /// Search the textbook.
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// List the learning materials for a chapter.
    Materials { chapter_id: u32 },
}

#[derive(Subcommand)]
enum SignInProvider {
    Email {
        #[arg(long)]
        email: String,
        #[arg(long, env = "TEXTBOOK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Simulated Google sign-in; always succeeds with a placeholder profile.
    Google,
}

#[tokio::main]
async fn main() -> Result<(), ClientError> {
    let cli = Cli::parse();

    // --- 1. Load Configuration & Set Up Logging ---
    let mut config = Config::from_env(cli.backend_url.clone())?;
    if let Some(path) = cli.session_file.clone() {
        config.session_path = path;
    }
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!(backend = %config.backend_url, "Configuration loaded");

    // --- 2. Initialize Adapters ---
    let storage = Arc::new(FileSessionStorage::new(config.session_path.clone()));
    let backend = Arc::new(HttpBackendAdapter::with_timeout(config.request_timeout)?);
    let auth = AuthService::new(
        SessionStore::new(storage).with_sign_in_delay(config.sign_in_delay),
    );

    // --- 3. Dispatch ---
    let mut out = std::io::stdout().lock();
    match cli.command {
        Command::SignIn { provider } => {
            let (provider, credentials) = match provider {
                SignInProvider::Email { email, password } => {
                    (AuthProvider::Email, Credentials::new(email, password))
                }
                SignInProvider::Google => (AuthProvider::Google, Credentials::default()),
            };
            match auth.sign_in(provider, &credentials).await {
                Ok(session) => writeln!(
                    out,
                    "Signed in as {} <{}> until {}",
                    session.user.display_name,
                    session.user.email,
                    session.expires_at.to_rfc3339()
                )?,
                Err(failure) => writeln!(out, "{}", failure)?,
            }
        }
        Command::SignOut => match auth.sign_out().await {
            Ok(()) => writeln!(out, "Signed out")?,
            Err(failure) => writeln!(out, "{}", failure)?,
        },
        Command::Status => match auth.get_session().await {
            Some(session) => writeln!(
                out,
                "{} <{}> via {} (expires {})",
                session.user.display_name,
                session.user.email,
                session.user.provider,
                session.expires_at.to_rfc3339()
            )?,
            None => writeln!(out, "Not signed in")?,
        },
        Command::Token => match auth.get_auth_token().await {
            Some(token) => writeln!(out, "{}", token)?,
            None => writeln!(out, "Not signed in")?,
        },
        Command::Search { query } => {
            let query = query.join(" ");
            let controller = SearchController::new(backend, config.backend_url.clone());
            match controller.submit(&query).await {
                SearchOutcome::Results(results) if results.is_empty() => {
                    writeln!(out, "No results found.")?
                }
                SearchOutcome::Results(results) => {
                    for (rank, result) in results.iter().enumerate() {
                        let passage: String = highlight(&result.content, &query)
                            .into_iter()
                            .map(|segment| {
                                if segment.matched {
                                    format!("\x1b[1m{}\x1b[0m", segment.text)
                                } else {
                                    segment.text
                                }
                            })
                            .collect();
                        writeln!(
                            out,
                            "{}. [{:.2}] {}\n   {}",
                            rank + 1,
                            result.score,
                            result.source,
                            passage
                        )?;
                    }
                }
                SearchOutcome::Failed { message, .. } => writeln!(out, "{}", message)?,
                SearchOutcome::Superseded => {}
            }
        }
        Command::Materials { chapter_id } => {
            match backend
                .get_learning_materials(chapter_id, &config.backend_url)
                .await
            {
                Ok(materials) if materials.is_empty() => {
                    writeln!(out, "No learning materials for chapter {}.", chapter_id)?
                }
                Ok(materials) => {
                    for material in materials {
                        writeln!(out, "## {}\n{}\n", material.material_type.as_str(), material.content)?;
                    }
                }
                Err(e) => {
                    tracing::error!(chapter_id, error = %e, "Error fetching learning materials");
                    writeln!(out, "Failed to load learning materials: {}", e)?;
                }
            }
        }
    }

    Ok(())
}
