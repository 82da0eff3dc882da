//! Fail-open bearer-token middleware.
//!
//! Extracts `Authorization: Bearer <token>`, validates it against the
//! process-wide signing key, and binds an `AuthenticatedAccount` into the
//! request extensions for downstream authorization decisions. A missing,
//! malformed or invalid token is not an error here — many endpoints are
//! public, so the request simply proceeds unauthenticated. No store lookups,
//! no I/O: only the signature/expiry check runs.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use service::auth::domain::AccountRole;
use service::auth::TokenService;

const BEARER_PREFIX: &str = "Bearer ";

/// Read-only authenticated principal, request-scoped.
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount {
    pub account_id: Uuid,
    pub role: AccountRole,
}

pub async fn authenticate(
    State(tokens): State<Arc<TokenService>>,
    mut req: Request,
    next: Next,
) -> Response {
    let bearer = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_PREFIX));

    if let Some(token) = bearer {
        if tokens.validate(token) && req.extensions().get::<AuthenticatedAccount>().is_none() {
            // Claim extraction is gated on validate; a decode failure here
            // would mean a race with expiry, which we treat as unauthenticated.
            if let (Ok(account_id), Ok(role)) =
                (tokens.parse_subject(token), tokens.parse_role(token))
            {
                req.extensions_mut().insert(AuthenticatedAccount { account_id, role });
            }
        }
    }

    next.run(req).await
}
