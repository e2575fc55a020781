use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::job::{JobError, JobKind, JobSuccess};

#[derive(Debug, Serialize)]
pub struct TextResponse {
    pub status: &'static str,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct AudioResponse {
    pub status: &'static str,
    #[serde(rename = "audioUrl")]
    pub audio_url: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(message: String) -> Self {
        Self {
            status: "error",
            message,
            details: None,
        }
    }
}

/// Translate a terminal job outcome into the HTTP response.
pub fn job_response(kind: JobKind, outcome: Result<JobSuccess, JobError>) -> Response {
    match outcome {
        Ok(JobSuccess::Text(text)) => (
            StatusCode::OK,
            Json(TextResponse {
                status: "success",
                text,
            }),
        )
            .into_response(),
        Ok(JobSuccess::AudioUrl(audio_url)) => (
            StatusCode::OK,
            Json(AudioResponse {
                status: "success",
                audio_url,
            }),
        )
            .into_response(),
        Err(err) => failure_response(kind, err),
    }
}

pub fn failure_response(kind: JobKind, err: JobError) -> Response {
    let (code, message, details) = match err {
        JobError::NoInput => (
            StatusCode::BAD_REQUEST,
            missing_input_message(kind).to_string(),
            None,
        ),
        JobError::WorkerMissing(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            worker_missing_message(kind).to_string(),
            None,
        ),
        JobError::NonZeroExit { stderr, .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            failed_message(kind).to_string(),
            Some(stderr),
        ),
        JobError::ParseError { stdout } => {
            error!("Raw {} worker output: {}", kind, stdout);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                parse_failed_message(kind).to_string(),
                None,
            )
        }
        JobError::MalformedOutput { stdout } => {
            error!("Unexpected {} worker report: {}", kind, stdout);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                invalid_format_message(kind).to_string(),
                None,
            )
        }
        JobError::TimedOut { secs } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            failed_message(kind).to_string(),
            Some(format!("worker timed out after {}s", secs)),
        ),
        JobError::Internal(detail) => {
            error!("Unexpected failure in {} job: {}", kind, detail);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong.".to_string(),
                None,
            )
        }
    };

    (
        code,
        Json(ErrorResponse {
            status: "error",
            message,
            details,
        }),
    )
        .into_response()
}

fn missing_input_message(kind: JobKind) -> &'static str {
    match kind {
        JobKind::Transcribe => "No audio file uploaded.",
        JobKind::Ocr => "No image file uploaded.",
        JobKind::Tts => "No text provided.",
    }
}

fn worker_missing_message(kind: JobKind) -> &'static str {
    match kind {
        JobKind::Transcribe => "Transcription worker not found.",
        JobKind::Ocr => "OCR worker not found.",
        JobKind::Tts => "TTS worker not found.",
    }
}

fn failed_message(kind: JobKind) -> &'static str {
    match kind {
        JobKind::Transcribe => "Transcription failed.",
        JobKind::Ocr => "OCR failed.",
        JobKind::Tts => "TTS failed.",
    }
}

fn parse_failed_message(kind: JobKind) -> &'static str {
    match kind {
        JobKind::Transcribe => "Failed to parse transcription result.",
        JobKind::Ocr => "Failed to parse OCR result.",
        JobKind::Tts => "Failed to parse TTS result.",
    }
}

fn invalid_format_message(kind: JobKind) -> &'static str {
    match kind {
        JobKind::Transcribe => "Invalid transcription result format.",
        JobKind::Ocr => "Invalid OCR result format.",
        JobKind::Tts => "Invalid TTS result format.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_no_input_maps_to_bad_request() {
        let resp = failure_response(JobKind::Transcribe, JobError::NoInput);
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_worker_failures_map_to_internal_error() {
        let errs = vec![
            JobError::WorkerMissing(PathBuf::from("/opt/workers/ocr")),
            JobError::NonZeroExit {
                code: 1,
                stderr: "boom".to_string(),
            },
            JobError::ParseError {
                stdout: "garbage".to_string(),
            },
            JobError::MalformedOutput {
                stdout: "{}".to_string(),
            },
            JobError::TimedOut { secs: 30 },
            JobError::Internal("queue closed".to_string()),
        ];
        for err in errs {
            let resp = failure_response(JobKind::Ocr, err);
            assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn test_success_maps_to_ok() {
        let resp = job_response(JobKind::Tts, Ok(JobSuccess::AudioUrl("http://h/a.mp3".into())));
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
