//! Reasoner UI server - one-page web front-end for asking questions.

mod routes;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use axum::Router;
use axum::routing::get;
use clap::Parser;
use reasoner::io::backend::Backend;
use reasoner::io::config::{DEFAULT_CONFIG_FILE, load_config};
use reasoner::solve::Orchestrator;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::state::{AppState, DynCompleter};

#[derive(Parser)]
#[command(name = "reasoner-ui")]
#[command(about = "Web UI for the plan/execute/verify reasoning agent")]
struct Args {
    /// Address to bind the server to
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,

    /// Port to listen on
    #[arg(long, default_value = "3001")]
    port: u16,

    /// Reasoner config file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Override the configured model
    #[arg(long)]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("reasoner_ui=info".parse()?),
        )
        .init();

    let args = Args::parse();

    // The Ollama backend wraps a blocking HTTP client, which must be built
    // off the async runtime.
    let config_path = args.config.clone();
    let model = args.model.clone();
    let state = tokio::task::spawn_blocking(move || build_state(&config_path, model))
        .await
        .context("backend setup task")??;
    info!(
        model = %state.orchestrator.model(),
        backend = state.backend,
        "starting reasoner-ui"
    );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(routes::index))
        .nest("/api", routes::api_router())
        .layer(cors)
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_state(config_path: &std::path::Path, model: Option<String>) -> anyhow::Result<AppState> {
    let mut config = load_config(config_path)?;
    if let Some(model) = model {
        config.model = model;
    }
    config.validate()?;
    let backend = Backend::from_config(&config.backend)?;
    let name = backend.name();
    let completer: DynCompleter = Box::new(backend);
    let orchestrator = Orchestrator::new(completer, config.model).with_max_retries(config.max_retries);
    Ok(AppState::new(orchestrator, name))
}
