use anyhow::Result;
use axum::Router;
use clap::Parser;
use review_core::pipeline::AnalyzerConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};
use server::build_app;
use tokio::net::TcpListener;

#[derive(Parser)]
struct Args {
    /// Model artifact directory
    #[arg(long, default_value = "./assets/models")]
    models: PathBuf,
    /// Topic label directory (pos_lab.csv, neg_lab.csv)
    #[arg(long, default_value = "./assets/labels")]
    labels: PathBuf,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let app: Router = build_app(AnalyzerConfig { models_dir: args.models, labels_dir: args.labels })?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
