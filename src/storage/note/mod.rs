use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::web::Pagination;

pub mod sqlite;

pub use sqlite::SqliteNoteStorage;

/// A saved note: the text a processing job produced, kept for a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteModel {
    pub id: String,
    pub user_id: String,
    pub kind: String,
    pub content: String,
    pub file_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait NoteStorage: Send + Sync + 'static {
    async fn create(&self, note: &NoteModel) -> Result<()>;
    async fn get(&self, note_id: &str) -> Result<Option<NoteModel>>;
    async fn list_by_user(&self, user_id: &str, pagination: &Pagination) -> Result<Vec<NoteModel>>;
    async fn delete(&self, note_id: &str) -> Result<()>;
}
