use anyhow::Context;
use clap::Parser;
use insertcsg::viewer::{AppState, router};
use std::net::SocketAddr;

#[derive(Debug, Parser)]
#[command(version, about = "Upload an STL file and inspect it in the browser")]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8501")]
    addr: SocketAddr,

    /// Largest accepted upload, in MiB
    #[arg(long, default_value_t = 64)]
    max_upload_mb: usize,

    /// Uploads kept at once; the oldest is dropped first
    #[arg(long, default_value_t = 16)]
    max_uploads: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let state = AppState::with_upload_limit_mb(args.max_uploads, args.max_upload_mb);
    let app = router(state.clone());

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("could not bind {}", args.addr))?;
    tracing::info!("Viewer running on http://{}", args.addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    let mut store = state.store.write().await;
    tracing::info!(uploads = store.len(), "shutting down, removing uploads");
    store.clear();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("could not listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
}
