use super::store::{MeshSummary, StoredMesh, UploadStore};
use super::{ViewerConfig, ViewerError};
use axum::{
    Json, Router,
    body::Body,
    extract::{DefaultBodyLimit, Multipart, Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{Html, Response},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

const PAGE: &str = include_str!("../../assets/viewer.html");

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<UploadStore>>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(max_uploads: usize, max_upload_bytes: usize) -> Self {
        Self {
            store: Arc::new(RwLock::new(UploadStore::new(max_uploads))),
            max_upload_bytes,
        }
    }

    /// Like [`AppState::new`] with the limit given in MiB, saturating at `usize::MAX` bytes.
    pub fn with_upload_limit_mb(max_uploads: usize, max_upload_mb: usize) -> Self {
        Self::new(max_uploads, max_upload_mb.saturating_mul(1024 * 1024))
    }
}

/// What the page needs to (re)draw a mesh.
#[derive(Debug, Serialize)]
pub struct RenderDescription {
    pub mesh_url: String,
    #[serde(flatten)]
    pub mesh: MeshSummary,
    pub config: ViewerConfig,
}

pub fn router(state: AppState) -> Router {
    let limit = state.max_upload_bytes;
    Router::new()
        .route("/", get(page))
        .route("/api/health", get(health))
        .route("/api/meshes", post(upload))
        .route("/api/meshes/{id}", get(download).delete(remove))
        .route("/api/meshes/{id}/render", post(render))
        .layer(DefaultBodyLimit::max(limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn page() -> Html<&'static str> {
    Html(PAGE)
}

/// Health check
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Accept one `.stl` file from the multipart field `file`.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<MeshSummary>), ViewerError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or_default().to_owned();
        if !has_stl_extension(&name) {
            return Err(ViewerError::UnsupportedFile(name));
        }
        let bytes = field.bytes().await?;
        let stored =
            tokio::task::spawn_blocking(move || StoredMesh::from_bytes(name, &bytes)).await??;

        let mut store = state.store.write().await;
        let id = store.insert(stored);
        let summary = store.get(&id).map(|m| m.summary(id)).ok_or(ViewerError::NotFound(id))?;
        tracing::info!(%id, name = %summary.name, triangles = summary.stats.triangles, "stored upload");
        return Ok((StatusCode::CREATED, Json(summary)));
    }
    Err(ViewerError::MissingFile)
}

/// Raw STL bytes of an upload.
pub async fn download(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ViewerError> {
    let store = state.store.read().await;
    let mesh = store.get(&id).ok_or(ViewerError::NotFound(id))?;
    let bytes = tokio::fs::read(mesh.path()).await?;
    let disposition = format!("inline; filename=\"{}\"", mesh.name.replace('"', ""));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "model/stl")
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(Body::from(bytes))
        .map_err(|e| ViewerError::Storage(std::io::Error::other(e)))
}

/// Validate a display configuration for an upload.
pub async fn render(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<ViewerConfig>, JsonRejection>,
) -> Result<Json<RenderDescription>, ViewerError> {
    let Json(config) = payload?;
    config.validate()?;
    let store = state.store.read().await;
    let mesh = store.get(&id).ok_or(ViewerError::NotFound(id))?;
    Ok(Json(RenderDescription {
        mesh_url: format!("/api/meshes/{id}"),
        mesh: mesh.summary(id),
        config,
    }))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ViewerError> {
    let removed = state.store.write().await.remove(&id);
    match removed {
        Some(_) => {
            tracing::info!(%id, "removed upload");
            Ok(StatusCode::NO_CONTENT)
        },
        None => Err(ViewerError::NotFound(id)),
    }
}

fn has_stl_extension(name: &str) -> bool {
    std::path::Path::new(name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("stl"))
}

#[cfg(test)]
mod tests {
    use super::{AppState, has_stl_extension};

    #[test]
    fn upload_limit_in_mib_saturates() {
        assert_eq!(AppState::with_upload_limit_mb(1, 64).max_upload_bytes, 64 * 1024 * 1024);
        assert_eq!(AppState::with_upload_limit_mb(1, usize::MAX).max_upload_bytes, usize::MAX);
    }

    #[test]
    fn stl_extension_is_case_insensitive() {
        assert!(has_stl_extension("part.stl"));
        assert!(has_stl_extension("PART.STL"));
        assert!(!has_stl_extension("part.obj"));
        assert!(!has_stl_extension("stl"));
        assert!(!has_stl_extension(""));
    }
}
