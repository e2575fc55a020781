use std::fmt::Display;
use serde::{Deserialize, Serialize};

use crate::upload::StagedUpload;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum JobKind {
    Transcribe,
    Ocr,
    Tts,
}

impl JobKind {
    /// Name of the worker executable under the workers directory.
    pub fn worker_name(&self) -> &'static str {
        match self {
            JobKind::Transcribe => "transcribe",
            JobKind::Ocr => "ocr",
            JobKind::Tts => "tts",
        }
    }
}

impl Display for JobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Input for one job. File-based kinds own their staged upload for the
/// whole request lifecycle; TTS carries the raw text.
#[derive(Debug)]
pub enum JobInput {
    File(StagedUpload),
    Text(String),
}

#[derive(Debug)]
pub struct JobRequest {
    pub kind: JobKind,
    pub input: JobInput,
}

/// Kind-dependent success payload as returned to the client.
#[derive(Debug, Clone, PartialEq)]
pub enum JobSuccess {
    Text(String),
    AudioUrl(String),
}

/// Payload extracted from a validated worker report. The TTS variant is
/// still a worker-local file path at this stage.
#[derive(Debug, Clone, PartialEq)]
pub enum JobPayload {
    Text(String),
    AudioFile(String),
}

/// Captured streams and exit code of one worker invocation.
#[derive(Debug, Clone)]
pub struct WorkerOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}
