pub mod files;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Routes of the directory service. Each one is stateless: every request is
/// resolved from its own `path` argument.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/files", get(files::list_files))
        .route("/upload", post(files::upload))
        .route("/delete", post(files::delete))
        .route("/view-file", get(files::view_file))
}
