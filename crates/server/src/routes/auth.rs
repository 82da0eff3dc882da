use std::sync::Arc;

use axum::extract::{OriginalUri, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use service::auth::domain::{Account, LoginInput, RegisterInput};
use service::auth::repo::seaorm::SeaOrmAccountRepository;
use service::auth::{AuthService, TokenService};

use crate::errors::ApiError;
use crate::validation;

#[derive(Clone)]
pub struct ServerState {
    pub auth: Arc<AuthService<SeaOrmAccountRepository>>,
    pub tokens: Arc<TokenService>,
}

/// All fields optional so that missing required fields surface as 400 with
/// per-field messages instead of a deserialization rejection.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub identifier: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
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
}

impl From<&Account> for RegisterResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            email: account.email.clone(),
            phone: account.phone.clone(),
            role: account.role.as_str().to_string(),
            status: account.status.as_str().to_string(),
            created_at: account.created_at,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token_type: String,
    pub access_token: String,
    pub expires_in: i64,
    pub user: UserInfo,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Validation failure", body = crate::errors::ErrorResponse),
        (status = 409, description = "Email or phone already registered", body = crate::errors::ErrorResponse),
    )
)]
pub async fn register(
    State(state): State<ServerState>,
    OriginalUri(uri): OriginalUri,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let path = uri.path().to_string();

    let violations = validation::validate_register(&req);
    if !violations.is_empty() {
        return Err(ApiError::validation(&path, violations));
    }

    let input = RegisterInput {
        email: req.email,
        phone: req.phone,
        // Validation guarantees presence of the remaining fields.
        password: req.password.unwrap_or_default(),
        first_name: req.first_name.unwrap_or_default(),
        last_name: req.last_name.unwrap_or_default(),
    };

    let account = state
        .auth
        .register(input)
        .await
        .map_err(|e| ApiError::from_domain(e, &path))?;

    let location = format!("/api/v1/users/{}", account.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(RegisterResponse::from(&account)),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 400, description = "Missing fields", body = crate::errors::ErrorResponse),
        (status = 401, description = "Invalid credentials", body = crate::errors::ErrorResponse),
    )
)]
pub async fn login(
    State(state): State<ServerState>,
    OriginalUri(uri): OriginalUri,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let path = uri.path().to_string();

    let violations = validation::validate_login(&req);
    if !violations.is_empty() {
        return Err(ApiError::validation(&path, violations));
    }

    let input = LoginInput {
        identifier: req.identifier.unwrap_or_default(),
        password: req.password.unwrap_or_default(),
    };

    let outcome = state
        .auth
        .login(input)
        .await
        .map_err(|e| ApiError::from_domain(e, &path))?;

    Ok(Json(LoginResponse {
        token_type: outcome.token_type,
        access_token: outcome.access_token,
        expires_in: outcome.expires_in,
        user: UserInfo {
            id: outcome.account.id,
            first_name: outcome.account.first_name,
            last_name: outcome.account.last_name,
            email: outcome.account.email,
            phone: outcome.account.phone,
            role: outcome.account.role.as_str().to_string(),
        },
    }))
}
