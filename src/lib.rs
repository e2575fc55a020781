pub mod job;
pub mod storage;
pub mod upload;
pub mod utils;
pub mod web;

use std::{env, path::PathBuf, sync::Arc};
use job::runner::JobRunner;
use once_cell::sync::Lazy;
use storage::note::NoteStorage;

pub struct AppContext {
    pub runner: Arc<JobRunner>,
    pub notes: Arc<dyn NoteStorage>,
    pub upload_dir: PathBuf,
}

const VOICE_SQLITE_PATH: &str = "sqlite://./data/database/storage.db?mode=rwc";
const VOICE_UPLOAD_PATH: &str = "./data/uploads/";
const VOICE_AUDIO_PATH: &str = "./data/audio/";
const VOICE_NOTES_PATH: &str = "./data/saved_notes/";
const VOICE_WORKERS_PATH: &str = "./workers/";
const VOICE_PUBLIC_URL: &str = "http://127.0.0.1:3000";
const VOICE_LISTEN_ADDR: &str = "0.0.0.0:3000";

fn env_or(key: &str, default: &str) -> String {
    match env::var(key) {
        Ok(value) => value,
        Err(_) => dotenv::var(key).unwrap_or_else(|_| default.to_string()),
    }
}

pub static SQLITE_PATH: Lazy<String> =
    Lazy::new(|| env_or("VOICE_SQLITE_PATH", VOICE_SQLITE_PATH));

pub static UPLOAD_PATH: Lazy<String> =
    Lazy::new(|| env_or("VOICE_UPLOAD_PATH", VOICE_UPLOAD_PATH));

pub static AUDIO_PATH: Lazy<String> =
    Lazy::new(|| env_or("VOICE_AUDIO_PATH", VOICE_AUDIO_PATH));

pub static NOTES_PATH: Lazy<String> =
    Lazy::new(|| env_or("VOICE_NOTES_PATH", VOICE_NOTES_PATH));

pub static WORKERS_PATH: Lazy<String> =
    Lazy::new(|| env_or("VOICE_WORKERS_PATH", VOICE_WORKERS_PATH));

pub static PUBLIC_URL: Lazy<String> =
    Lazy::new(|| env_or("VOICE_PUBLIC_URL", VOICE_PUBLIC_URL));

pub static LISTEN_ADDR: Lazy<String> =
    Lazy::new(|| env_or("VOICE_LISTEN_ADDR", VOICE_LISTEN_ADDR));

// 50 MiB default whole-body cap for uploads
pub static MAX_UPLOAD_BYTES: Lazy<usize> = Lazy::new(|| {
    env_or("VOICE_MAX_UPLOAD_BYTES", "52428800")
        .parse()
        .unwrap_or(52_428_800)
});

pub static MAX_CONCURRENT_JOBS: Lazy<usize> = Lazy::new(|| {
    env_or("VOICE_MAX_CONCURRENT_JOBS", "4").parse().unwrap_or(4)
});

// no timeout unless configured, workers are trusted to terminate
pub static WORKER_TIMEOUT_SECS: Lazy<Option<u64>> = Lazy::new(|| {
    env::var("VOICE_WORKER_TIMEOUT_SECS")
        .ok()
        .or_else(|| dotenv::var("VOICE_WORKER_TIMEOUT_SECS").ok())
        .and_then(|value| value.parse().ok())
});

pub fn init_env() {
    dotenv::dotenv().ok();

    if let Some(db_url) = SQLITE_PATH.strip_prefix("sqlite://") {
        let db_path = db_url.split('?').next().unwrap_or(db_url);
        if let Some(dir) = std::path::Path::new(db_path).parent() {
            std::fs::create_dir_all(dir).unwrap_or_else(|e| {
                eprintln!("Failed to create database directory: {}", e);
            });
        }
    }

    for dir in [&*UPLOAD_PATH, &*AUDIO_PATH, &*NOTES_PATH] {
        std::fs::create_dir_all(dir).unwrap_or_else(|e| {
            eprintln!("Failed to create data directory {}: {}", dir, e);
        });
    }
}
