use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::Json;
use dirserve_core::{delete_entry, list_directory, read_text, write_upload, CoreError, DirEntry};

use crate::dto::{DeleteRequest, ListDirQuery, UploadQuery, UploadResponse, ViewFileQuery};
use crate::error::AppError;
use crate::state::AppState;

/// Multipart field carrying the uploaded file.
const UPLOAD_FIELD: &str = "file";

/// Runs a blocking filesystem call off the async executor.
async fn run_blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))
}

fn malformed(e: impl std::fmt::Display) -> AppError {
    tracing::warn!("Malformed request: {e}");
    AppError::Malformed(e.to_string())
}

pub async fn list_files(
    State(state): State<AppState>,
    query: Result<Query<ListDirQuery>, QueryRejection>,
) -> Result<Json<Vec<DirEntry>>, AppError> {
    let Query(query) = query.map_err(malformed)?;
    let relative = query.path.unwrap_or_default();
    tracing::info!("Listing files in {:?}", relative);

    let root = state.root.clone();
    let target = relative.clone();
    let entries = run_blocking(move || list_directory(&root, &target))
        .await?
        .map_err(|e| AppError::from_core(e, "Unable to list files"))?;

    tracing::debug!("Found {} entries in {:?}", entries.len(), relative);
    Ok(Json(entries))
}

pub async fn upload(
    State(state): State<AppState>,
    query: Result<Query<UploadQuery>, QueryRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let Query(query) = query.map_err(malformed)?;
    let mut multipart = multipart.map_err(malformed)?;
    let relative = query.path.unwrap_or_default();

    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| malformed("upload field has no file name"))?;
        let contents = field.bytes().await.map_err(malformed)?;
        upload = Some((file_name, contents));
        break;
    }
    let (file_name, contents) =
        upload.ok_or_else(|| malformed(format!("missing multipart field {UPLOAD_FIELD:?}")))?;

    tracing::info!(
        "Uploading {:?} ({} bytes) into {:?}",
        file_name,
        contents.len(),
        relative
    );

    let root = state.root.clone();
    let target = relative.clone();
    let stored = run_blocking(move || write_upload(&root, &target, &file_name, &contents))
        .await?
        .map_err(|e| AppError::from_core(e, "Failed to store upload"))?;

    tracing::info!("Stored upload at {}", stored.display());
    Ok(Json(UploadResponse {
        success: true,
        path: relative,
    }))
}

pub async fn delete(
    State(state): State<AppState>,
    body: Result<Json<DeleteRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Json(body) = body.map_err(malformed)?;
    tracing::info!("Deleting {:?}", body.path);

    let root = state.root.clone();
    let target = body.path.clone();
    run_blocking(move || delete_entry(&root, &target))
        .await?
        .map_err(|e| match e {
            CoreError::NotFound(_) => {
                tracing::warn!("Delete target not found: {:?}", body.path);
                AppError::NotFound("File or folder not found".to_string())
            }
            other => AppError::from_core(other, "Failed to delete"),
        })?;

    tracing::info!("Deleted {:?}", body.path);
    Ok(StatusCode::OK)
}

pub async fn view_file(
    State(state): State<AppState>,
    query: Result<Query<ViewFileQuery>, QueryRejection>,
) -> Result<Html<String>, AppError> {
    let Query(query) = query.map_err(malformed)?;
    tracing::info!("Viewing {:?}", query.path);

    let root = state.root.clone();
    let target = query.path.clone();
    let text = run_blocking(move || read_text(&root, &target))
        .await?
        .map_err(|e| AppError::from_core(e, "Failed to read file"))?;

    Ok(Html(render_text_page(&text)))
}

fn render_text_page(text: &str) -> String {
    format!("<pre>{}</pre><a href=\"/\">Back</a>", escape_html(text))
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
