use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing pipeline: stdout plus a daily-rolling log file.
/// The returned guard must be held for the process lifetime, dropping it
/// stops the background log writer.
pub fn init(log_dir: String) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(log_dir, "voiceapp.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stdout))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(guard)
}
