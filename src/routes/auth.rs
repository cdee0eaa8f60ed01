use crate::{
    auth::{AuthResponse, AuthService, LoginRequest, RegisterRequest},
    error::AppError,
};
use actix_web::{post, web, HttpResponse, Responder};

/// Register a new user
///
/// Creates a new user account and returns its public fields with an authentication token.
///
/// ## Responses:
/// - `201 Created`: `{message, user, token}`.
/// - `400 Bad Request`: validation failures (all listed) or an already registered email.
#[post("/register")]
pub async fn register(
    auth: web::Data<AuthService>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    let session = auth.register(register_data.into_inner()).await?;
    Ok(HttpResponse::Created().json(AuthResponse::new("User registered successfully", session)))
}

/// Login user
///
/// Authenticates a user and returns an authentication token.
///
/// ## Responses:
/// - `200 OK`: `{message, user, token}`.
/// - `400 Bad Request`: malformed email or missing password.
/// - `401 Unauthorized`: unknown email or wrong password, indistinguishably.
#[post("/login")]
pub async fn login(
    auth: web::Data<AuthService>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let session = auth.login(login_data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(AuthResponse::new("Logged in successfully", session)))
}
