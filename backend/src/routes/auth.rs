//! Authentication routes
//!
//! Signup, signin and "who am I". Handlers only unpack the request and
//! hand off to [`AccountService`].

use crate::auth::BearerToken;
use crate::error::ApiResult;
use crate::services::AccountService;
use crate::state::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use toastspeech_shared::types::{AccountView, SigninRequest, SignupRequest, TokenResponse};

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/signin", post(signin))
        .route("/me", get(me))
}

/// Register a new account
///
/// POST /auth/signup
async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let session = AccountService::signup(state.provider(), state.tokens(), &req).await?;
    Ok(Json(TokenResponse::bearer(
        session.access_token,
        "Signup successful",
        session.account,
    )))
}

/// Sign in with email and password
///
/// POST /auth/signin
async fn signin(
    State(state): State<AppState>,
    Json(req): Json<SigninRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let session = AccountService::signin(state.provider(), state.tokens(), &req).await?;
    Ok(Json(TokenResponse::bearer(
        session.access_token,
        "Signin successful",
        session.account,
    )))
}

/// Get the current account
///
/// GET /auth/me
///
/// # Authentication
/// Requires a Bearer token in the Authorization header.
async fn me(State(state): State<AppState>, token: BearerToken) -> ApiResult<Json<AccountView>> {
    let account = AccountService::who_am_i(state.provider(), state.tokens(), token.as_str()).await?;
    Ok(Json(account))
}
