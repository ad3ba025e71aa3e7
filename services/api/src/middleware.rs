//! Authentication middleware for session token validation

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    extract::cookie::CookieJar,
    headers::{Authorization, authorization::Bearer},
};
use reporting::models::UserProfile;
use tracing::debug;
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};

/// Name of the session cookie
pub const TOKEN_COOKIE: &str = "token";

/// Authenticated user information
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

impl From<&AuthUser> for UserProfile {
    fn from(user: &AuthUser) -> Self {
        UserProfile {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            created_at: None,
        }
    }
}

/// Authentication middleware
///
/// Accepts the token from an `Authorization: Bearer` header or, failing
/// that, from the session cookie.
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer
        .map(|TypedHeader(authorization)| authorization.token().to_string())
        .or_else(|| jar.get(TOKEN_COOKIE).map(|c| c.value().to_string()))
        .ok_or(ApiError::Unauthorized)?;

    let claims = state.jwt_service.validate_token(&token).map_err(|e| {
        debug!("Rejected session token: {}", e);
        ApiError::Unauthorized
    })?;

    let user = AuthUser {
        id: claims.sub,
        email: claims.email,
        name: claims.name,
    };

    // Insert the user into the request extensions
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}
