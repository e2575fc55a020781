use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::task::JoinHandle;
use tokio::time::{timeout, Duration};
use tracing::{debug, info, warn};

use super::error::JobError;
use super::types::{JobKind, WorkerOutput};

/// Narrow capability the pipeline depends on: run one unit of media
/// processing and hand back the captured streams and exit code. Keeps the
/// pipeline independent of whether the worker is a subprocess or
/// something else entirely.
#[async_trait]
pub trait Worker: Send + Sync {
    async fn invoke(&self, kind: JobKind, input: &str) -> Result<WorkerOutput, JobError>;
}

/// Invokes workers as child processes: one executable per job kind under
/// `workers_dir`, called with a single positional argument.
pub struct SubprocessWorker {
    workers_dir: PathBuf,
    timeout: Option<Duration>,
}

impl SubprocessWorker {
    pub fn new(workers_dir: PathBuf) -> Self {
        Self {
            workers_dir,
            timeout: None,
        }
    }

    /// Bound the wait for worker exit; the worker is killed on expiry.
    /// Off by default.
    pub fn with_timeout(mut self, limit: Duration) -> Self {
        self.timeout = Some(limit);
        self
    }

    fn resolve(&self, kind: JobKind) -> PathBuf {
        self.workers_dir.join(kind.worker_name())
    }
}

#[async_trait]
impl Worker for SubprocessWorker {
    async fn invoke(&self, kind: JobKind, input: &str) -> Result<WorkerOutput, JobError> {
        let worker_path = self.resolve(kind);

        // fail closed before any process creation
        if !worker_path.exists() {
            warn!("{} worker not found at {}", kind, worker_path.display());
            return Err(JobError::WorkerMissing(worker_path));
        }

        info!("Spawning {} worker: {}", kind, worker_path.display());
        let mut child = Command::new(&worker_path)
            .arg(input)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| JobError::Internal(format!("failed to spawn worker: {}", e)))?;

        let mut stdout_pipe = child
            .stdout
            .take()
            .ok_or_else(|| JobError::Internal("worker stdout was not captured".to_string()))?;
        let mut stderr_pipe = child
            .stderr
            .take()
            .ok_or_else(|| JobError::Internal("worker stderr was not captured".to_string()))?;

        // both pipes must be drained while we wait: a worker blocked on a
        // full pipe would deadlock against us blocked on its exit
        let stdout_task: JoinHandle<std::io::Result<Vec<u8>>> = tokio::spawn(async move {
            let mut buf = Vec::new();
            stdout_pipe.read_to_end(&mut buf).await?;
            Ok(buf)
        });
        let stderr_task: JoinHandle<std::io::Result<Vec<u8>>> = tokio::spawn(async move {
            let mut buf = Vec::new();
            stderr_pipe.read_to_end(&mut buf).await?;
            Ok(buf)
        });

        let status = match self.timeout {
            Some(limit) => match timeout(limit, child.wait()).await {
                Ok(waited) => waited.map_err(|e| {
                    JobError::Internal(format!("failed to wait for worker: {}", e))
                })?,
                Err(_) => {
                    warn!("{} worker exceeded {}s, killing it", kind, limit.as_secs());
                    if let Err(e) = child.kill().await {
                        warn!("Failed to kill timed out worker: {}", e);
                    }
                    return Err(JobError::TimedOut {
                        secs: limit.as_secs(),
                    });
                }
            },
            None => child
                .wait()
                .await
                .map_err(|e| JobError::Internal(format!("failed to wait for worker: {}", e)))?,
        };

        let stdout = collect_stream(stdout_task).await?;
        let stderr = collect_stream(stderr_task).await?;
        let exit_code = status.code().unwrap_or(-1);
        debug!("{} worker exited with code {}", kind, exit_code);

        Ok(WorkerOutput {
            stdout,
            stderr,
            exit_code,
        })
    }
}

async fn collect_stream(task: JoinHandle<std::io::Result<Vec<u8>>>) -> Result<String, JobError> {
    let bytes = task
        .await
        .map_err(|e| JobError::Internal(format!("stream reader task failed: {}", e)))?
        .map_err(|e| JobError::Internal(format!("failed to read worker stream: {}", e)))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    fn write_worker(dir: &Path, name: &str, script: &str) {
        let path = dir.join(name);
        std::fs::write(&path, script).unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
    }

    #[tokio::test]
    async fn test_missing_worker_fails_before_spawn() {
        let dir = tempfile::tempdir().unwrap();
        let worker = SubprocessWorker::new(dir.path().to_path_buf());

        let err = worker.invoke(JobKind::Ocr, "input.png").await.unwrap_err();
        match err {
            JobError::WorkerMissing(path) => assert!(path.ends_with("ocr")),
            other => panic!("expected WorkerMissing, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_successful_worker_output_is_captured() {
        let dir = tempfile::tempdir().unwrap();
        write_worker(
            dir.path(),
            "transcribe",
            "#!/bin/sh\necho '{\"status\":\"success\",\"text\":\"hello\"}'\n",
        );
        let worker = SubprocessWorker::new(dir.path().to_path_buf());

        let output = worker.invoke(JobKind::Transcribe, "in.wav").await.unwrap();
        assert_eq!(output.exit_code, 0);
        assert_eq!(
            output.stdout.trim(),
            "{\"status\":\"success\",\"text\":\"hello\"}"
        );
        assert!(output.stderr.is_empty());
    }

    #[tokio::test]
    async fn test_input_is_passed_as_single_argument() {
        let dir = tempfile::tempdir().unwrap();
        write_worker(dir.path(), "tts", "#!/bin/sh\nprintf '%s' \"$1\"\n");
        let worker = SubprocessWorker::new(dir.path().to_path_buf());

        let output = worker.invoke(JobKind::Tts, "hello world").await.unwrap();
        assert_eq!(output.stdout, "hello world");
    }

    #[tokio::test]
    async fn test_nonzero_exit_and_stderr_are_captured() {
        let dir = tempfile::tempdir().unwrap();
        write_worker(
            dir.path(),
            "ocr",
            "#!/bin/sh\nprintf 'model load error' >&2\nexit 1\n",
        );
        let worker = SubprocessWorker::new(dir.path().to_path_buf());

        let output = worker.invoke(JobKind::Ocr, "in.png").await.unwrap();
        assert_eq!(output.exit_code, 1);
        assert_eq!(output.stderr, "model load error");
    }

    #[tokio::test]
    async fn test_large_output_on_both_streams_does_not_deadlock() {
        // writes well past the pipe buffer size on both streams
        let dir = tempfile::tempdir().unwrap();
        write_worker(
            dir.path(),
            "transcribe",
            "#!/bin/sh\n\
             head -c 262144 /dev/zero | tr '\\0' 'a'\n\
             head -c 262144 /dev/zero | tr '\\0' 'b' >&2\n",
        );
        let worker = SubprocessWorker::new(dir.path().to_path_buf());

        let output = worker.invoke(JobKind::Transcribe, "in.wav").await.unwrap();
        assert_eq!(output.stdout.len(), 262144);
        assert_eq!(output.stderr.len(), 262144);
        assert_eq!(output.exit_code, 0);
    }

    #[tokio::test]
    async fn test_timeout_kills_the_worker() {
        let dir = tempfile::tempdir().unwrap();
        write_worker(dir.path(), "tts", "#!/bin/sh\nsleep 30\n");
        let worker =
            SubprocessWorker::new(dir.path().to_path_buf()).with_timeout(Duration::from_millis(200));

        let err = worker.invoke(JobKind::Tts, "text").await.unwrap_err();
        assert!(matches!(err, JobError::TimedOut { .. }));
    }
}
