use crate::errors::custom::CustomError;
use crate::services::auth::{self, LoginRequest, RegisterRequest};
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use tracing::instrument;

/******************************************/
// Registering an account
/******************************************/
/**
 * @route   POST /api/auth/register
 * @access  Public
 */
#[instrument(
    name = "Registration request",
    skip(state, req_user),
    fields(email = %req_user.email, user_type = %req_user.user_type)
)]
pub async fn register(
    state: web::Data<AppState>,
    req_user: web::Json<RegisterRequest>,
) -> Result<HttpResponse, CustomError> {
    let profile = auth::register(state.repo.as_ref(), &state.auth, req_user.into_inner()).await?;
    Ok(HttpResponse::Created().json(profile))
}

/******************************************/
// Logging in
/******************************************/
/**
 * @route   POST /api/auth/login
 * @access  Public
 */
#[instrument(
    name = "Login request",
    skip(state, req_login),
    fields(email = %req_login.email, user_type = %req_login.user_type)
)]
pub async fn login(
    state: web::Data<AppState>,
    req_login: web::Json<LoginRequest>,
) -> Result<HttpResponse, CustomError> {
    let response = auth::login(state.repo.as_ref(), &state.jwt, req_login.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}
