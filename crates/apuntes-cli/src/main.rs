//! apuntes CLI: submit notes and render stored ones.
//!
//! Storage and metadata endpoints come from the environment (see `Config`).
//! The user is identified by APUNTES_OWNER_ID and APUNTES_TOKEN.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use apuntes_api_client::ApiClient;
use apuntes_cli::{describe_state, read_candidate, user_from_lookup, TOKEN_VAR};
use apuntes_core::models::{DocumentFormat, Visibility};
use apuntes_core::{Config, ErrorMetadata};
use apuntes_infra::init_telemetry;
use apuntes_services::{NoteSubmission, RenderingDispatcher, SubmissionCoordinator};
use apuntes_storage::{create_storage, generate_object_key};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "apuntes", about = "Submit and render study notes")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a file and create the note record
    Submit {
        #[arg(long)]
        title: String,
        /// pdf, markdown or docx
        #[arg(long)]
        format: DocumentFormat,
        /// Path to the file to upload
        #[arg(long)]
        file: PathBuf,
        #[arg(long, default_value = "private")]
        visibility: Visibility,
        /// Free-text content stored with the note
        #[arg(long)]
        content: Option<String>,
        /// Associated challenge id
        #[arg(long)]
        challenge: Option<String>,
        /// Associated study plan id
        #[arg(long)]
        plan: Option<String>,
    },
    /// Fetch a note and render it
    Render {
        /// Note id
        id: String,
        /// Print an HTML fragment instead of JSON
        #[arg(long)]
        html: bool,
    },
    /// Preview the object key a file would be stored under
    Key {
        #[arg(long)]
        owner: String,
        #[arg(long)]
        title: String,
        /// Original filename
        #[arg(long)]
        file: String,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

fn load_config() -> anyhow::Result<Config> {
    let config = Config::from_env().context("Failed to load configuration")?;
    init_telemetry("apuntes", config.environment(), config.log_format())
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;
    Ok(config)
}

#[allow(clippy::too_many_arguments)]
async fn submit(
    title: String,
    format: DocumentFormat,
    file: PathBuf,
    visibility: Visibility,
    content: Option<String>,
    challenge: Option<String>,
    plan: Option<String>,
) -> anyhow::Result<()> {
    let config = load_config()?;
    let user = user_from_lookup(|key| std::env::var(key).ok())?;
    let storage = create_storage(&config).context("Failed to create storage backend")?;
    let metadata = Arc::new(ApiClient::from_config(&config)?);
    let coordinator = SubmissionCoordinator::from_config(&config, storage, metadata);

    let submission = NoteSubmission {
        title,
        format: Some(format),
        visibility,
        associated_challenge_id: challenge,
        associated_plan_id: plan,
        content,
        file: Some(read_candidate(&file, config.max_upload_size_bytes())?),
    };

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Interrupt received, cancelling submission");
                cancel.cancel();
            }
        }
    });

    let mut states = coordinator.subscribe();
    let progress = tokio::spawn(async move {
        while states.changed().await.is_ok() {
            let state = states.borrow_and_update().clone();
            eprintln!("{}", describe_state(&state));
            if state.is_terminal() {
                break;
            }
        }
    });

    let result = coordinator.submit(&user, submission, &cancel).await;
    let _ = progress.await;

    match result {
        Ok(document) => print_json(&document),
        Err(err) => Err(anyhow::Error::new(err.clone()).context(err.error_code())),
    }
}

async fn render(id: String, html: bool) -> anyhow::Result<()> {
    let config = load_config()?;
    let user = user_from_lookup(|key| std::env::var(key).ok())?;
    let token = user
        .bearer()
        .with_context(|| format!("{} is not set", TOKEN_VAR))?;
    let client = ApiClient::from_config(&config)?;

    let rendered = RenderingDispatcher::new()
        .fetch_and_render(&client, token, &id)
        .await
        .with_context(|| format!("Failed to render note {}", id))?;

    if html {
        println!("{}", rendered.to_html());
        Ok(())
    } else {
        print_json(&rendered)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Submit {
            title,
            format,
            file,
            visibility,
            content,
            challenge,
            plan,
        } => submit(title, format, file, visibility, content, challenge, plan).await,
        Commands::Render { id, html } => render(id, html).await,
        Commands::Key { owner, title, file } => {
            let key = generate_object_key(&owner, &title, &file)?;
            println!("{}", key);
            Ok(())
        }
    }
}
