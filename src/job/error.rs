use std::fmt::Display;
use std::path::PathBuf;

/// Terminal failure of one job. No variant is retried; each maps to a
/// specific HTTP response in `web::response`.
#[derive(Debug, Clone, PartialEq)]
pub enum JobError {
    NoInput,
    WorkerMissing(PathBuf),
    NonZeroExit { code: i32, stderr: String },
    ParseError { stdout: String },
    MalformedOutput { stdout: String },
    TimedOut { secs: u64 },
    Internal(String),
}

impl Display for JobError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobError::NoInput => write!(f, "no input provided"),
            JobError::WorkerMissing(path) => {
                write!(f, "worker executable not found at {}", path.display())
            }
            JobError::NonZeroExit { code, .. } => {
                write!(f, "worker exited with code {}", code)
            }
            JobError::ParseError { .. } => write!(f, "worker output is not valid JSON"),
            JobError::MalformedOutput { .. } => {
                write!(f, "worker output is not in the expected format")
            }
            JobError::TimedOut { secs } => write!(f, "worker timed out after {}s", secs),
            JobError::Internal(message) => write!(f, "{}", message),
        }
    }
}
