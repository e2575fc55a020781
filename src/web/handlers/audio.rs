use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::path::PathBuf;
use tracing::warn;

/// Serves synthesized audio files by basename. This is the public face of
/// the TTS output directory; clients only ever see basename-derived URLs.
pub fn audio_router(audio_dir: PathBuf) -> Router {
    Router::new()
        .route("/:filename", get(serve_audio))
        .with_state(audio_dir)
}

async fn serve_audio(
    State(audio_dir): State<PathBuf>,
    Path(filename): Path<String>,
) -> Response {
    // basenames only, no traversal out of the audio directory
    if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
        return StatusCode::NOT_FOUND.into_response();
    }

    let path = audio_dir.join(&filename);
    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            let content_type = match path.extension().and_then(|ext| ext.to_str()) {
                Some("wav") => "audio/wav",
                Some("mp3") => "audio/mpeg",
                Some("ogg") => "audio/ogg",
                _ => "application/octet-stream",
            };
            ([(header::CONTENT_TYPE, content_type)], bytes).into_response()
        }
        Err(e) => {
            warn!("Audio file {} not served: {}", filename, e);
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_serves_existing_file_with_content_type() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("out123.mp3"), b"ID3audio").unwrap();
        let app = audio_router(dir.path().to_path_buf());

        let response = app.oneshot(get_request("/out123.mp3")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "audio/mpeg"
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"ID3audio");
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let app = audio_router(dir.path().to_path_buf());

        let response = app.oneshot(get_request("/nope.wav")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_traversal_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("secret.wav"), b"x").unwrap();
        let app = audio_router(dir.path().to_path_buf());

        let response = app.oneshot(get_request("/..%2Fsecret.wav")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
