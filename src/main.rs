use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use custos_recorder::{
    create_router, AppState, CaptureController, Config, LocalStore, MediaSession, SessionConfig,
    SyntheticCamera, SyntheticEncoder, UploadClient,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "custos-recorder", about = "Capture evidence and upload it to content storage")]
struct Cli {
    /// Config file path (without extension)
    #[arg(long, default_value = "config/custos-recorder")]
    config: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP control API (default)
    Serve,
    /// Record for a fixed duration, then stop and upload
    Record {
        #[arg(long, default_value_t = 5)]
        seconds: u64,
    },
    /// Capture one still image and upload it
    Snapshot,
}

fn build_session(cfg: &Config) -> Result<MediaSession> {
    let device = SyntheticCamera::new(cfg.capture.camera());
    let capture = CaptureController::new(Box::new(device), cfg.capture.default_facing);
    let encoder = SyntheticEncoder::new(cfg.capture.timeslice_ms);
    let uploader = UploadClient::new(&cfg.upload).context("Failed to build upload client")?;
    let store = LocalStore::open(&cfg.storage.store_path)?;

    let session_config = SessionConfig {
        downloads_dir: cfg.capture.downloads_dir.as_ref().map(PathBuf::from),
        ..SessionConfig::default()
    };

    Ok(MediaSession::new(
        session_config,
        capture,
        Box::new(encoder),
        uploader,
        store,
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    info!("Custos Recorder v{}", env!("CARGO_PKG_VERSION"));
    info!("Loaded config: {}", cfg.service.name);
    info!("Upload endpoint: {}", cfg.upload.endpoint);
    if cfg.upload.token.is_empty() {
        warn!("No upload token configured; set CUSTOS__UPLOAD__TOKEN");
    }

    let mut session = build_session(&cfg)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("Failed to bind {}", addr))?;

            info!("HTTP control API listening on {}", addr);

            let app = create_router(AppState::new(session));
            axum::serve(listener, app).await?;
        }
        Command::Record { seconds } => {
            session.start_recording().await?;
            info!("Recording for {}s", seconds);
            tokio::time::sleep(Duration::from_secs(seconds)).await;

            match session.stop_recording().await? {
                Some(outcome) => info!(
                    "Recording finished: {} bytes in {} chunks, cid={:?}",
                    outcome.blob_size, outcome.chunks_count, outcome.content_id
                ),
                None => warn!("Recording was not active"),
            }
        }
        Command::Snapshot => {
            session.start_capture().await?;
            let outcome = session.take_snapshot().await?;
            info!(
                "Snapshot {}x{} finished, cid={:?}",
                outcome.snapshot.width, outcome.snapshot.height, outcome.content_id
            );
            session.reset().await;
        }
    }

    Ok(())
}
