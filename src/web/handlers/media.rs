use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};

use crate::job::{JobError, JobInput, JobKind, JobRequest};
use crate::upload::StagedUpload;
use crate::web::response::{self, ErrorResponse};
use crate::AppContext;

pub fn media_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/transcribe", post(transcribe))
        .route("/ocr", post(ocr))
        .route("/tts", post(tts))
        .layer(DefaultBodyLimit::max(*crate::MAX_UPLOAD_BYTES))
        .with_state(ctx)
}

async fn transcribe(State(ctx): State<Arc<AppContext>>, multipart: Multipart) -> Response {
    run_file_job(ctx, JobKind::Transcribe, "audioFile", multipart).await
}

async fn ocr(State(ctx): State<Arc<AppContext>>, multipart: Multipart) -> Response {
    run_file_job(ctx, JobKind::Ocr, "imageFile", multipart).await
}

#[derive(Debug, Deserialize)]
pub struct TtsRequest {
    // absent and empty are both NoInput, not a deserialization error
    pub text: Option<String>,
}

async fn tts(State(ctx): State<Arc<AppContext>>, Json(req): Json<TtsRequest>) -> Response {
    let text = match req.text {
        Some(text) if !text.trim().is_empty() => text,
        _ => return response::failure_response(JobKind::Tts, JobError::NoInput),
    };

    info!("Received tts request ({} chars)", text.len());
    let outcome = ctx
        .runner
        .run(JobRequest {
            kind: JobKind::Tts,
            input: JobInput::Text(text),
        })
        .await;

    response::job_response(JobKind::Tts, outcome)
}

async fn run_file_job(
    ctx: Arc<AppContext>,
    kind: JobKind,
    field_name: &str,
    mut multipart: Multipart,
) -> Response {
    let upload = match stage_upload(&ctx, field_name, &mut multipart).await {
        Ok(Some(upload)) => upload,
        // no file part: nothing was staged, nothing to clean up
        Ok(None) => return response::failure_response(kind, JobError::NoInput),
        Err(response) => return response,
    };

    info!("Received {} request ({} bytes)", kind, upload.size());
    let outcome = ctx
        .runner
        .run(JobRequest {
            kind,
            input: JobInput::File(upload),
        })
        .await;

    response::job_response(kind, outcome)
}

/// Pull the expected file part out of the multipart body and stage it.
/// `Ok(None)` means the request carried no such part.
async fn stage_upload(
    ctx: &AppContext,
    field_name: &str,
    multipart: &mut Multipart,
) -> Result<Option<StagedUpload>, Response> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Ok(None),
            Err(e) => {
                error!("Failed to read multipart body: {}", e);
                return Err((
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::new(format!("Failed to read upload: {}", e))),
                )
                    .into_response());
            }
        };

        if field.name() != Some(field_name) {
            continue;
        }

        let data = match field.bytes().await {
            Ok(data) => data,
            Err(e) => {
                error!("Failed to read upload field '{}': {}", field_name, e);
                return Err((
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::new(format!("Failed to read upload: {}", e))),
                )
                    .into_response());
            }
        };

        let upload = StagedUpload::stage(&ctx.upload_dir, field_name, &data)
            .await
            .map_err(|e| {
                error!("Failed to stage upload: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new("Something went wrong.".to_string())),
                )
                    .into_response()
            })?;

        return Ok(Some(upload));
    }
}
