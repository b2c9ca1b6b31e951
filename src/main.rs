//! HTTP server exposing the attendance store to dashboard clients.

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use attendance_engine::api::{AppState, create_router};
use attendance_engine::config::ConfigLoader;
use attendance_engine::store::SystemClock;

/// Attendance server - shared attendance and schedule state over HTTP
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding `store.yaml` and an optional `seed.yaml`.
    #[arg(short, long, default_value = "./config/default")]
    config: String,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let loader = ConfigLoader::load(&args.config)?;
    let store = loader.into_store(Arc::new(SystemClock));

    // keeps the change log running for the life of the process
    let _change_log = store.subscribe(|store| {
        let today = store.get_today_attendance();
        info!(
            date = %today.date,
            status = ?today.status,
            is_clocked = today.is_clocked,
            events = store.get_schedule_data().len(),
            "Store changed"
        );
    });

    let app = create_router(AppState::new(store));

    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
