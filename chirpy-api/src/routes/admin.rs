/// Admin endpoints
///
/// - `GET /admin/metrics` - HTML page with the fileserver hit count
/// - `POST /admin/reset` - Delete every user and zero the counter (dev platform only)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, response::Html};

/// Fileserver hit count
pub async fn metrics(State(state): State<AppState>) -> Html<String> {
    Html(format!(
        "<html><body><h1>Welcome, Chirpy Admin</h1><p>Chirpy has been visited {} times!</p></body></html>",
        state.hits()
    ))
}

/// Deletes all users (with their chirps and refresh tokens) and zeroes the counter
///
/// # Errors
///
/// - `403 Forbidden`: Platform is not `dev`
pub async fn reset(State(state): State<AppState>) -> ApiResult<&'static str> {
    if !state.config.is_dev() {
        return Err(ApiError::Forbidden(
            "Reset is only allowed in dev environment".to_string(),
        ));
    }

    let deleted = state.store.delete_all_users().await?;
    state.reset_hits();

    tracing::warn!(deleted, "All users deleted and hit counter reset");

    Ok("File server hits set to 0")
}
