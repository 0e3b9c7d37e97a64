use anyhow::{Context, Result};
use artpick::api::create_router;
use artpick::corpus::{art_analyzers, load_corpus};
use artpick::engine::{SearchConfig, SearchEngine};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{EnvFilter, fmt};

// CLI Arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "ASCII art search service that returns one random match", long_about = None)]
struct Args {
    /// Folder holding the .txt art files
    #[arg(short, long, default_value = "./art")]
    root: PathBuf,

    /// Address to listen on
    #[arg(short, long, default_value = "0.0.0.0:8080")]
    bind: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let arts = load_corpus(&args.root)?;
    let engine = SearchEngine::build(arts, art_analyzers()?, SearchConfig::default())?;

    let app = create_router(Arc::new(engine));
    let listener = TcpListener::bind(&args.bind)
        .await
        .with_context(|| format!("binding {}", args.bind))?;
    tracing::info!(addr = %args.bind, "server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
