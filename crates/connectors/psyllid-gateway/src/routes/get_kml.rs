use std::path::{Component, Path, PathBuf};

use axum::{
    extract::{self, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::state::ServerState;

pub const KML_MIME_TYPE: &str = "application/vnd.google-earth.kml+xml";

/// A stored overlay file, byte for byte.
pub async fn get_kml(
    State(state): State<ServerState>,
    extract::Path(filename): extract::Path<String>,
) -> Result<Response, StatusCode> {
    let Some(path) = resolve(&state.kml_directory, &filename) else {
        tracing::debug!(%filename, "rejected overlay path");
        return Err(StatusCode::NOT_FOUND);
    };

    match tokio::fs::metadata(&path).await {
        Ok(metadata) if metadata.is_file() => {}
        _ => return Err(StatusCode::NOT_FOUND),
    }

    let contents = tokio::fs::read(&path).await.map_err(|err| {
        tracing::error!(path = %path.display(), error = %err, "unable to read overlay");
        StatusCode::NOT_FOUND
    })?;

    Ok(([(header::CONTENT_TYPE, KML_MIME_TYPE)], contents).into_response())
}

/// Only plain file and directory names below the overlay directory are served.
fn resolve(directory: &Path, filename: &str) -> Option<PathBuf> {
    let relative = Path::new(filename.trim_start_matches('/'));
    let mut components = relative.components().peekable();
    components.peek()?;
    if !components.all(|component| matches!(component, Component::Normal(_))) {
        return None;
    }
    Some(directory.join(relative))
}
