use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;

use crate::AppContext;

pub mod audio;
pub mod media;
pub mod notes;

pub fn router(ctx: Arc<AppContext>) -> Router {
    let notes_state = notes::NotesState {
        storage: ctx.notes.clone(),
        notes_dir: PathBuf::from(&*crate::NOTES_PATH),
    };

    Router::new()
        .merge(media::media_router(ctx))
        .nest("/notes", notes::notes_router(notes_state))
        .nest("/audio", audio::audio_router(PathBuf::from(&*crate::AUDIO_PATH)))
}
