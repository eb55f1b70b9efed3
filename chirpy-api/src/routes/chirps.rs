/// Chirp endpoints
///
/// - `POST /api/chirps` - Post a chirp as the authenticated user
/// - `GET /api/chirps` - List chirps, optionally by author, oldest first by default
/// - `GET /api/chirps/:chirp_id` - Fetch one chirp
/// - `DELETE /api/chirps/:chirp_id` - Delete one of your own chirps

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chirpy_shared::{
    auth::{authorization::require_resource_owner, middleware::AuthContext},
    models::chirp::{Chirp, ChirpFilter, CreateChirp, SortOrder},
    moderation::validate_chirp,
    store::StoreError,
};
use serde::Deserialize;
use uuid::Uuid;

/// Create chirp request
#[derive(Debug, Deserialize)]
pub struct CreateChirpRequest {
    pub body: String,
}

/// Query parameters for listing chirps
#[derive(Debug, Default, Deserialize)]
pub struct ListChirpsQuery {
    /// Only chirps by this user
    pub author_id: Option<String>,

    /// `asc` (default) or `desc`
    pub sort: Option<String>,
}

impl ListChirpsQuery {
    fn into_filter(self) -> ApiResult<ChirpFilter> {
        let author_id = match self.author_id.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                Uuid::parse_str(raw)
                    .map_err(|_| ApiError::BadRequest("Invalid author ID".to_string()))?,
            ),
        };

        Ok(ChirpFilter {
            author_id,
            sort: SortOrder::from_query(self.sort.as_deref()),
        })
    }
}

/// Foreign key from a chirp to its author
const CHIRP_AUTHOR_FKEY: &str = "chirps_user_id_fkey";

fn parse_chirp_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest("Invalid chirp ID".to_string()))
}

/// Post a chirp
///
/// The body is limited to 140 characters and banned words are replaced
/// with `****` before storage.
///
/// # Errors
///
/// - `400 Bad Request`: Chirp is too long, or the body is not a valid request
/// - `401 Unauthorized`: Missing or invalid session token, or the account is gone
pub async fn create_chirp(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<CreateChirpRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Chirp>)> {
    let Json(req) = payload?;
    let body = validate_chirp(&req.body)?;

    let chirp = state
        .store
        .create_chirp(CreateChirp {
            body,
            user_id: auth.user_id,
        })
        .await
        .map_err(|e| match e {
            // Token still verifies but its subject is gone
            StoreError::Conflict(constraint) if constraint == CHIRP_AUTHOR_FKEY => {
                tracing::debug!(user_id = %auth.user_id, "Chirp author no longer exists");
                ApiError::Unauthorized("Unauthorized".to_string())
            }
            other => other.into(),
        })?;

    tracing::debug!(chirp_id = %chirp.id, user_id = %auth.user_id, "Chirp created");

    Ok((StatusCode::CREATED, Json(chirp)))
}

/// List chirps
///
/// ```text
/// GET /api/chirps?author_id=<uuid>&sort=desc
/// ```
///
/// Any `sort` value other than `desc` means ascending by creation time.
pub async fn list_chirps(
    State(state): State<AppState>,
    Query(query): Query<ListChirpsQuery>,
) -> ApiResult<Json<Vec<Chirp>>> {
    let filter = query.into_filter()?;
    let chirps = state.store.list_chirps(filter).await?;

    Ok(Json(chirps))
}

/// Fetch a single chirp
pub async fn get_chirp(
    State(state): State<AppState>,
    Path(chirp_id): Path<String>,
) -> ApiResult<Json<Chirp>> {
    let chirp_id = parse_chirp_id(&chirp_id)?;

    let chirp = state
        .store
        .find_chirp(chirp_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Chirp not found".to_string()))?;

    Ok(Json(chirp))
}

/// Delete a chirp
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid session token
/// - `403 Forbidden`: The chirp belongs to someone else
/// - `404 Not Found`: No such chirp
pub async fn delete_chirp(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(chirp_id): Path<String>,
) -> ApiResult<StatusCode> {
    let chirp_id = parse_chirp_id(&chirp_id)?;

    require_resource_owner(state.store.as_ref(), chirp_id, &auth).await?;

    // Owner-scoped delete; false means it vanished since the ownership check
    if !state.store.delete_chirp(chirp_id, auth.user_id).await? {
        return Err(ApiError::NotFound("Chirp not found".to_string()));
    }

    tracing::info!(%chirp_id, user_id = %auth.user_id, "Chirp deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_into_filter() {
        let filter = ListChirpsQuery::default().into_filter().unwrap();
        assert_eq!(filter.author_id, None);
        assert_eq!(filter.sort, SortOrder::Asc);

        let author = Uuid::new_v4();
        let filter = ListChirpsQuery {
            author_id: Some(author.to_string()),
            sort: Some("desc".to_string()),
        }
        .into_filter()
        .unwrap();
        assert_eq!(filter.author_id, Some(author));
        assert_eq!(filter.sort, SortOrder::Desc);

        let empty = ListChirpsQuery {
            author_id: Some(String::new()),
            sort: None,
        };
        assert_eq!(empty.into_filter().unwrap().author_id, None);

        let bad = ListChirpsQuery {
            author_id: Some("not-a-uuid".to_string()),
            sort: None,
        };
        assert!(matches!(bad.into_filter(), Err(ApiError::BadRequest(_))));
    }
}
