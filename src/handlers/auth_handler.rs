use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::{
        request::{LoginRequest, RegisterRequest},
        response::{AuthResponse, UserDto},
    },
};

#[post("/api/auth/register")]
pub async fn register(
    state: web::Data<AppState>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let user = state.user_service.register(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(UserDto::from(user)))
}

#[post("/api/auth/login")]
pub async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let user = state.user_service.login(request.into_inner()).await?;
    let token = state.jwt_service.create_token(&user)?;

    log::info!("User '{}' logged in", user.username);

    Ok(HttpResponse::Ok().json(AuthResponse::bearer(
        token,
        state.jwt_service.expiration_hours(),
        user,
    )))
}

#[get("/api/auth/me")]
pub async fn me(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let user = state.user_service.get_user(auth.0.user_id()).await?;
    Ok(HttpResponse::Ok().json(UserDto::from(user)))
}
