use serde::Deserialize;

use super::error::JobError;
use super::types::{JobKind, JobPayload, WorkerOutput};

/// The single JSON object a worker must print to stdout on success.
#[derive(Debug, Deserialize)]
pub struct WorkerReport {
    pub status: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, rename = "filePath")]
    pub file_path: Option<String>,
}

/// Classify a terminated worker invocation. Success requires exit code 0,
/// a JSON report with `status == "success"` and a non-empty kind payload;
/// every other combination is a specific failure. Exit code 0 with
/// malformed output is still a failure.
pub fn decode_outcome(kind: JobKind, output: &WorkerOutput) -> Result<JobPayload, JobError> {
    if output.exit_code != 0 {
        return Err(JobError::NonZeroExit {
            code: output.exit_code,
            stderr: output.stderr.clone(),
        });
    }

    let raw = output.stdout.trim();
    let report: WorkerReport = match serde_json::from_str(raw) {
        Ok(report) => report,
        Err(_) => {
            return Err(JobError::ParseError {
                stdout: output.stdout.clone(),
            })
        }
    };

    if report.status != "success" {
        return Err(JobError::MalformedOutput {
            stdout: raw.to_string(),
        });
    }

    match kind {
        JobKind::Transcribe | JobKind::Ocr => match report.text {
            Some(text) if !text.is_empty() => Ok(JobPayload::Text(text)),
            _ => Err(JobError::MalformedOutput {
                stdout: raw.to_string(),
            }),
        },
        JobKind::Tts => match report.file_path {
            Some(path) if !path.is_empty() => Ok(JobPayload::AudioFile(path)),
            _ => Err(JobError::MalformedOutput {
                stdout: raw.to_string(),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(stdout: &str, stderr: &str, exit_code: i32) -> WorkerOutput {
        WorkerOutput {
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            exit_code,
        }
    }

    #[test]
    fn test_nonzero_exit_wins_over_stdout() {
        let out = output("{\"status\":\"success\",\"text\":\"hi\"}", "boom", 2);
        let err = decode_outcome(JobKind::Transcribe, &out).unwrap_err();
        assert_eq!(
            err,
            JobError::NonZeroExit {
                code: 2,
                stderr: "boom".to_string()
            }
        );
    }

    #[test]
    fn test_non_json_stdout_is_a_parse_error() {
        let out = output("Loading model...\nhello", "", 0);
        let err = decode_outcome(JobKind::Transcribe, &out).unwrap_err();
        assert!(matches!(err, JobError::ParseError { .. }));
    }

    #[test]
    fn test_error_status_is_malformed() {
        let out = output("{\"status\":\"error\",\"message\":\"oom\"}", "", 0);
        let err = decode_outcome(JobKind::Ocr, &out).unwrap_err();
        assert!(matches!(err, JobError::MalformedOutput { .. }));
    }

    #[test]
    fn test_success_without_payload_is_malformed() {
        let out = output("{\"status\":\"success\"}", "", 0);
        assert!(matches!(
            decode_outcome(JobKind::Transcribe, &out),
            Err(JobError::MalformedOutput { .. })
        ));
        assert!(matches!(
            decode_outcome(JobKind::Tts, &out),
            Err(JobError::MalformedOutput { .. })
        ));
    }

    #[test]
    fn test_empty_payload_is_malformed() {
        let out = output("{\"status\":\"success\",\"text\":\"\"}", "", 0);
        assert!(matches!(
            decode_outcome(JobKind::Ocr, &out),
            Err(JobError::MalformedOutput { .. })
        ));
    }

    #[test]
    fn test_trailing_whitespace_is_trimmed() {
        let out = output("{\"status\":\"success\",\"text\":\"හෙලෝ\"}\n\n", "", 0);
        let payload = decode_outcome(JobKind::Transcribe, &out).unwrap();
        assert_eq!(payload, JobPayload::Text("හෙලෝ".to_string()));
    }

    #[test]
    fn test_tts_success_yields_file_path() {
        let out = output(
            "{\"status\":\"success\",\"filePath\":\"/srv/app/audio/out123.mp3\"}",
            "",
            0,
        );
        let payload = decode_outcome(JobKind::Tts, &out).unwrap();
        assert_eq!(
            payload,
            JobPayload::AudioFile("/srv/app/audio/out123.mp3".to_string())
        );
    }

    #[test]
    fn test_wrong_payload_field_for_kind_is_malformed() {
        // a tts-shaped report handed to a transcribe job
        let out = output("{\"status\":\"success\",\"filePath\":\"/tmp/a.mp3\"}", "", 0);
        assert!(matches!(
            decode_outcome(JobKind::Transcribe, &out),
            Err(JobError::MalformedOutput { .. })
        ));
    }
}
