use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

use crate::storage::note::{NoteModel, NoteStorage};
use crate::web::response::ErrorResponse;
use crate::web::Pagination;

#[derive(Clone)]
pub struct NotesState {
    pub storage: Arc<dyn NoteStorage>,
    pub notes_dir: PathBuf,
}

pub fn notes_router(state: NotesState) -> Router {
    Router::new()
        .route("/", post(save_note))
        .route("/:user_id", get(list_notes))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveNoteRequest {
    pub user_id: String,
    pub note: String,
}

#[derive(Debug, Serialize)]
pub struct SaveNoteResponse {
    pub status: &'static str,
    pub message: &'static str,
    #[serde(rename = "documentId")]
    pub document_id: String,
}

async fn save_note(
    State(state): State<NotesState>,
    Json(req): Json<SaveNoteRequest>,
) -> Response {
    if req.user_id.trim().is_empty() || req.note.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(
                "User ID and note content are required.".to_string(),
            )),
        )
            .into_response();
    }

    // the note text is also kept as a plain file next to the database
    let file_path = state
        .notes_dir
        .join(format!("note-{}.txt", Utc::now().timestamp_millis()));
    if let Err(e) = write_note_file(&state.notes_dir, &file_path, &req.note).await {
        error!("Failed to write note file: {}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("Failed to save note.".to_string())),
        )
            .into_response();
    }

    let note = NoteModel {
        id: format!("note-{}", Uuid::new_v4()),
        user_id: req.user_id,
        kind: "speech_to_text".to_string(),
        content: req.note,
        file_path: Some(file_path.to_string_lossy().into_owned()),
        created_at: Utc::now(),
    };

    match state.storage.create(&note).await {
        Ok(()) => {
            info!("Note {} saved for user {}", note.id, note.user_id);
            (
                StatusCode::CREATED,
                Json(SaveNoteResponse {
                    status: "success",
                    message: "Note saved successfully!",
                    document_id: note.id,
                }),
            )
                .into_response()
        }
        Err(e) => {
            error!("Failed to save note: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to save note.".to_string())),
            )
                .into_response()
        }
    }
}

async fn write_note_file(dir: &PathBuf, path: &PathBuf, note: &str) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(path, note).await?;
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct ListNotesResponse {
    pub status: &'static str,
    pub notes: Vec<NoteModel>,
}

async fn list_notes(
    State(state): State<NotesState>,
    Path(user_id): Path<String>,
    Query(pagination): Query<Pagination>,
) -> Response {
    match state.storage.list_by_user(&user_id, &pagination).await {
        Ok(notes) => (
            StatusCode::OK,
            Json(ListNotesResponse {
                status: "success",
                notes,
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to list notes for user {}: {}", user_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to load notes.".to_string())),
            )
                .into_response()
        }
    }
}
