use axum::extract::{OriginalUri, Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::ApiError;

use super::auth::ServerState;

/// Full public view, including `updatedAt`; the credential hash never
/// leaves the service layer.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "users",
    params(("id" = Uuid, Path, description = "Account id")),
    responses(
        (status = 200, description = "Account found", body = UserResponse),
        (status = 404, description = "Unknown account id", body = crate::errors::ErrorResponse),
    )
)]
pub async fn get_user(
    State(state): State<ServerState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    let account = state
        .auth
        .get_account(id)
        .await
        .map_err(|e| ApiError::from_domain(e, uri.path()))?;

    Ok(Json(UserResponse {
        id: account.id,
        first_name: account.first_name,
        last_name: account.last_name,
        email: account.email,
        phone: account.phone,
        role: account.role.as_str().to_string(),
        status: account.status.as_str().to_string(),
        created_at: account.created_at,
        updated_at: account.updated_at,
    }))
}
