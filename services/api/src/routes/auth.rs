//! Account registration, login, and session routes

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::{
    WithRejection,
    cookie::{Cookie, CookieJar, SameSite},
};
use chrono::Utc;
use reporting::{
    models::{LoginCredentials, User, UserPayload, UserProfile, normalize_email},
    validation::{Validation, validate_user},
};
use tracing::{info, warn};
use uuid::Uuid;

use super::internal;
use crate::{
    error::{ApiError, ApiResult},
    middleware::{AuthUser, TOKEN_COOKIE},
    models::{ApiResponse, CurrentUserData, SessionData},
    repositories::{
        DuplicateEmail,
        password::{hash_password, verify_password},
    },
    state::AppState,
};

/// Response of a successful register or login
type SessionResponse = (StatusCode, CookieJar, Json<ApiResponse<SessionData>>);

/// HttpOnly session cookie carrying `token`
pub fn session_cookie(token: String, max_age_seconds: u64) -> Cookie<'static> {
    let max_age = i64::try_from(max_age_seconds).unwrap_or(i64::MAX);
    Cookie::build((TOKEN_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::seconds(max_age))
        .build()
}

fn duplicate_email() -> ApiError {
    ApiError::BadRequest("User with this email already exists".to_string())
}

fn start_session(
    state: &AppState,
    jar: CookieJar,
    status: StatusCode,
    user: &User,
    message: &str,
) -> ApiResult<SessionResponse> {
    let token = state
        .jwt_service
        .issue(user)
        .map_err(internal("Failed to issue session token"))?;
    let cookie = session_cookie(token.clone(), state.jwt_service.ttl_seconds());
    let jar = jar.add(cookie);

    let body = ApiResponse::ok(SessionData {
        user: UserProfile::from(user),
        token,
    })
    .with_message(message);

    Ok((status, jar, Json(body)))
}

/// Register a new account and start a session
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(payload), _): WithRejection<Json<UserPayload>, ApiError>,
) -> ApiResult<SessionResponse> {
    if let Validation::Invalid(errors) = validate_user(&payload) {
        return Err(ApiError::Validation(errors));
    }

    let email = normalize_email(payload.email.as_deref().unwrap_or_default());
    let name = payload.name.as_deref().unwrap_or_default().trim().to_string();
    let password = payload.password.as_deref().unwrap_or_default();

    let existing = state
        .user_repository
        .find_by_email(&email)
        .await
        .map_err(internal("Failed to register user"))?;
    if existing.is_some() {
        return Err(duplicate_email());
    }

    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4(),
        email,
        name,
        password_hash: hash_password(password).map_err(internal("Failed to register user"))?,
        created_at: now,
        updated_at: now,
    };

    // A concurrent registration can claim the email after the lookup above
    let user = state.user_repository.create(&user).await.map_err(|e| {
        if e.is::<DuplicateEmail>() {
            duplicate_email()
        } else {
            internal("Failed to register user")(e)
        }
    })?;

    info!("Registered user {}", user.id);

    start_session(
        &state,
        jar,
        StatusCode::CREATED,
        &user,
        "User registered successfully",
    )
}

/// Exchange credentials for a session
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(credentials), _): WithRejection<Json<LoginCredentials>, ApiError>,
) -> ApiResult<SessionResponse> {
    let user = state
        .user_repository
        .find_by_email(&credentials.email)
        .await
        .map_err(internal("Failed to log in"))?;

    let Some(user) = user else {
        warn!("Login attempt for unknown email");
        return Err(ApiError::Unauthorized);
    };

    let verified = verify_password(&user.password_hash, &credentials.password)
        .map_err(internal("Failed to log in"))?;
    if !verified {
        warn!("Login attempt with wrong password for user {}", user.id);
        return Err(ApiError::Unauthorized);
    }

    info!("User {} logged in", user.id);

    start_session(&state, jar, StatusCode::OK, &user, "Logged in successfully")
}

/// End the session by clearing the cookie
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    (
        jar.remove(Cookie::build(TOKEN_COOKIE).path("/")),
        Json(ApiResponse::done("Logged out successfully")),
    )
}

/// The identity carried by the session token
pub async fn me(Extension(user): Extension<AuthUser>) -> Json<ApiResponse<CurrentUserData>> {
    Json(ApiResponse::ok(CurrentUserData {
        user: UserProfile::from(&user),
    }))
}
