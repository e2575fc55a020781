use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use tracing::info;

use super::{NoteModel, NoteStorage};
use crate::web::Pagination;

pub struct SqliteNoteStorage {
    pool: SqlitePool,
}

impl SqliteNoteStorage {
    pub async fn new(database_url: &str) -> Result<Self> {
        info!("Initializing SQLite note storage at {}", database_url);
        let pool = SqlitePool::connect(database_url).await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS notes (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                kind TEXT NOT NULL,
                content TEXT NOT NULL,
                file_path TEXT,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }

    fn row_to_note(&self, row: sqlx::sqlite::SqliteRow) -> Result<NoteModel> {
        Ok(NoteModel {
            id: row.get("id"),
            user_id: row.get("user_id"),
            kind: row.get("kind"),
            content: row.get("content"),
            file_path: row.get("file_path"),
            created_at: DateTime::parse_from_rfc3339(row.get("created_at"))?.with_timezone(&Utc),
        })
    }
}

#[async_trait]
impl NoteStorage for SqliteNoteStorage {
    async fn create(&self, note: &NoteModel) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO notes (id, user_id, kind, content, file_path, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&note.id)
        .bind(&note.user_id)
        .bind(&note.kind)
        .bind(&note.content)
        .bind(&note.file_path)
        .bind(note.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, note_id: &str) -> Result<Option<NoteModel>> {
        let row = sqlx::query("SELECT * FROM notes WHERE id = ?")
            .bind(note_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(match row {
            Some(row) => Some(self.row_to_note(row)?),
            None => None,
        })
    }

    async fn list_by_user(&self, user_id: &str, pagination: &Pagination) -> Result<Vec<NoteModel>> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM notes
            WHERE user_id = ?
            ORDER BY created_at DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(user_id)
        .bind(pagination.limit() as i64)
        .bind(pagination.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        let mut notes = Vec::new();
        for row in rows {
            notes.push(self.row_to_note(row)?);
        }

        Ok(notes)
    }

    async fn delete(&self, note_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM notes WHERE id = ?")
            .bind(note_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
