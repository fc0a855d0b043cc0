use actix_web::cookie::Cookie;
use actix_web::{web, HttpRequest, HttpResponse};
use secrecy::Secret;
use serde::Deserialize;

use crate::config::AdminSettings;
use crate::session::{session_token, AuthError, SessionStore, SESSION_COOKIE};

#[derive(Deserialize)]
pub struct LoginBody {
    pub username: String,
    pub password: Secret<String>,
}

#[derive(serde::Serialize)]
struct LoginResponse {
    token: String,
}

#[tracing::instrument(
    name = "Administrator login handler",
    skip(body, admin, sessions),
    fields(username = %body.username)
)]
pub async fn login(
    body: web::Json<LoginBody>,
    admin: web::Data<AdminSettings>,
    sessions: web::Data<SessionStore>,
) -> Result<HttpResponse, AuthError> {
    if !admin.matches(&body.username, &body.password) {
        tracing::warn!("Rejected login attempt");
        return Err(AuthError::InvalidCredentials);
    }

    let token = sessions.create(&body.username).await?;
    let cookie = Cookie::build(SESSION_COOKIE, token.clone())
        .path("/")
        .http_only(true)
        .finish();

    Ok(HttpResponse::Ok().cookie(cookie).json(LoginResponse { token }))
}

#[tracing::instrument(name = "Administrator logout handler", skip(req, sessions))]
pub async fn logout(
    req: HttpRequest,
    sessions: web::Data<SessionStore>,
) -> Result<HttpResponse, AuthError> {
    if let Some(token) = session_token(&req) {
        sessions.revoke(&token).await?;
    }

    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_path("/");
    cookie.make_removal();

    Ok(HttpResponse::NoContent().cookie(cookie).finish())
}
