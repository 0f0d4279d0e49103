use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::auth::{Claims, TokenVerifier};
use crate::error::ApiError;

/// Authenticated caller extracted from a verified token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub subject: String,
    pub permissions: Vec<String>,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            subject: claims.sub,
            permissions: claims.permissions.unwrap_or_default(),
        }
    }
}

/// Middleware state: the verifier plus the one permission the wrapped route needs
#[derive(Clone)]
pub struct PermissionGuard {
    verifier: Arc<TokenVerifier>,
    permission: &'static str,
}

impl PermissionGuard {
    pub fn new(verifier: Arc<TokenVerifier>, permission: &'static str) -> Self {
        Self { verifier, permission }
    }
}

/// Token presence → signature/expiry → permission membership, before the handler
/// (and therefore before the body is read or the store is touched)
pub async fn require_permission(
    State(guard): State<PermissionGuard>,
    mut request: Request,
    next: Next,
) -> Response {
    match guard.verifier.authorize(request.headers(), guard.permission) {
        Ok(claims) => {
            let auth_user = AuthUser::from(claims);
            tracing::debug!("Authorized '{}' for {}", auth_user.subject, guard.permission);
            request.extensions_mut().insert(auth_user);
            next.run(request).await
        }
        Err(err) => {
            tracing::warn!(
                "Rejected {} {}: {} ({})",
                request.method(),
                request.uri().path(),
                err.code,
                guard.permission
            );
            ApiError::from(err).into_response()
        }
    }
}
