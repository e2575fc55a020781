#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use voiceapp_rs::job::{JobRunner, SubprocessWorker};
use voiceapp_rs::storage::note::SqliteNoteStorage;
use voiceapp_rs::utils::logger;
use voiceapp_rs::AppContext;

#[tokio::main]
async fn main() -> Result<()> {
    let _guard = logger::init("./logs".to_string())?;
    voiceapp_rs::init_env();

    info!("Starting media job gateway ({})...", env!("GIT_HASH"));

    info!("Initializing note storage...");
    let notes = SqliteNoteStorage::new(&voiceapp_rs::SQLITE_PATH).await?;

    info!(
        "Initializing job runner (workers at {}, {} concurrent jobs)...",
        &*voiceapp_rs::WORKERS_PATH,
        *voiceapp_rs::MAX_CONCURRENT_JOBS
    );
    let mut worker = SubprocessWorker::new(PathBuf::from(&*voiceapp_rs::WORKERS_PATH));
    if let Some(secs) = *voiceapp_rs::WORKER_TIMEOUT_SECS {
        info!("Applying {}s worker timeout", secs);
        worker = worker.with_timeout(Duration::from_secs(secs));
    }

    let public_audio_url = format!("{}/audio", voiceapp_rs::PUBLIC_URL.trim_end_matches('/'));
    let runner = JobRunner::new(
        Arc::new(worker),
        *voiceapp_rs::MAX_CONCURRENT_JOBS,
        public_audio_url,
    );

    let ctx = Arc::new(AppContext {
        runner: Arc::new(runner),
        notes: Arc::new(notes),
        upload_dir: PathBuf::from(&*voiceapp_rs::UPLOAD_PATH),
    });

    let addr: SocketAddr = voiceapp_rs::LISTEN_ADDR.parse()?;
    info!("Starting HTTP server at http://{}", addr);

    match voiceapp_rs::web::start_server(ctx, addr).await {
        Ok(_) => info!("Server stopped gracefully"),
        Err(e) => {
            tracing::error!("Server error: {}", e);
            return Err(e);
        }
    }

    Ok(())
}
