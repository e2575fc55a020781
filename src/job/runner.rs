use std::path::Path;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{error, info};

use super::decode;
use super::error::JobError;
use super::types::{JobInput, JobKind, JobPayload, JobRequest, JobSuccess};
use super::worker::Worker;

/// Owns the end-to-end pipeline for one job: invoke the worker, decode
/// its report, rewrite TTS output into a public URL, and guarantee the
/// staged upload is removed on every exit path.
pub struct JobRunner {
    worker: Arc<dyn Worker>,
    permits: Semaphore,
    public_audio_url: String,
}

impl JobRunner {
    /// `max_jobs` bounds the number of concurrently running workers.
    pub fn new(worker: Arc<dyn Worker>, max_jobs: usize, public_audio_url: String) -> Self {
        Self {
            worker,
            permits: Semaphore::new(max_jobs),
            public_audio_url: public_audio_url.trim_end_matches('/').to_string(),
        }
    }

    /// Run one job to its terminal outcome. Exactly one cleanup attempt is
    /// made for a staged upload, whichever branch produced the outcome,
    /// and cleanup failure never overrides the real result.
    pub async fn run(&self, request: JobRequest) -> Result<JobSuccess, JobError> {
        let JobRequest { kind, mut input } = request;

        let outcome = match self.permits.acquire().await {
            Ok(_permit) => self.execute(kind, &input).await,
            Err(e) => Err(JobError::Internal(format!("job queue closed: {}", e))),
        };

        if let JobInput::File(upload) = &mut input {
            upload.remove().await;
        }

        match &outcome {
            Ok(_) => info!("{} job completed", kind),
            Err(e) => error!("{} job failed: {}", kind, e),
        }

        outcome
    }

    async fn execute(&self, kind: JobKind, input: &JobInput) -> Result<JobSuccess, JobError> {
        let argument = match input {
            JobInput::File(upload) => upload.path().to_string_lossy().into_owned(),
            JobInput::Text(text) => text.clone(),
        };

        let output = self.worker.invoke(kind, &argument).await?;
        let payload = decode::decode_outcome(kind, &output)?;

        match payload {
            JobPayload::Text(text) => Ok(JobSuccess::Text(text)),
            JobPayload::AudioFile(path) => Ok(JobSuccess::AudioUrl(self.audio_url(&path)?)),
        }
    }

    /// Rewrite a worker-local output path into an externally resolvable
    /// URL derived from its basename. Local filesystem paths never reach
    /// the client.
    fn audio_url(&self, local_path: &str) -> Result<String, JobError> {
        let name = Path::new(local_path)
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| JobError::MalformedOutput {
                stdout: local_path.to_string(),
            })?;

        Ok(format!("{}/{}", self.public_audio_url, name))
    }
}
