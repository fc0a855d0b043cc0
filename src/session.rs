use actix_web::dev::Payload;
use actix_web::http::StatusCode;
use actix_web::{web, FromRequest, HttpRequest, ResponseError};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Mutex, PoisonError};

use crate::config::{RedisSettings, SessionBackend, SessionSettings};

pub const SESSION_COOKIE: &str = "session_token";
const TOKEN_LENGTH: usize = 30;

#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    #[error("Failed to reach the session storage.")]
    Redis(#[from] redis::RedisError),
}

/// Administrator sessions, kept either in process memory or in Redis
pub struct SessionStore {
    backend: SessionStorage,
    ttl: Duration,
}

enum SessionStorage {
    Memory(Mutex<HashMap<String, MemorySession>>),
    Redis(redis::Client),
}

struct MemorySession {
    username: String,
    expires_at: DateTime<Utc>,
}

impl SessionStore {
    pub fn in_memory(ttl: Duration) -> SessionStore {
        SessionStore {
            backend: SessionStorage::Memory(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    pub fn redis(client: redis::Client, ttl: Duration) -> SessionStore {
        SessionStore {
            backend: SessionStorage::Redis(client),
            ttl,
        }
    }

    pub fn build(
        settings: &SessionSettings,
        redis_settings: &RedisSettings,
    ) -> Result<SessionStore, SessionError> {
        let ttl = Duration::seconds(settings.ttl_seconds as i64);

        match settings.backend {
            SessionBackend::Memory => Ok(SessionStore::in_memory(ttl)),
            SessionBackend::Redis => {
                let client = redis::Client::open(redis_settings.get_address())?;

                Ok(SessionStore::redis(client, ttl))
            }
        }
    }

    /// Opens a session for `username` and returns its token
    #[tracing::instrument(name = "Opening an administrator session", skip(self))]
    pub async fn create(&self, username: &str) -> Result<String, SessionError> {
        let token = generate_session_token();

        match &self.backend {
            SessionStorage::Memory(sessions) => {
                let mut sessions = sessions.lock().unwrap_or_else(PoisonError::into_inner);
                let now = Utc::now();

                sessions.retain(|_, session| session.expires_at > now);
                sessions.insert(
                    token.clone(),
                    MemorySession {
                        username: username.to_string(),
                        expires_at: now + self.ttl,
                    },
                );
            }
            SessionStorage::Redis(client) => {
                let mut redis_conn = client.get_tokio_connection().await?;

                redis::cmd("SET")
                    .arg(session_key(&token))
                    .arg(username)
                    .arg("EX")
                    .arg(self.ttl.num_seconds())
                    .query_async::<_, ()>(&mut redis_conn)
                    .await?;
            }
        }

        Ok(token)
    }

    /// Username owning `token`, if the session exists and has not expired
    #[tracing::instrument(name = "Resolving an administrator session", skip(self, token))]
    pub async fn resolve(&self, token: &str) -> Result<Option<String>, SessionError> {
        match &self.backend {
            SessionStorage::Memory(sessions) => {
                let sessions = sessions.lock().unwrap_or_else(PoisonError::into_inner);

                Ok(sessions
                    .get(token)
                    .filter(|session| session.expires_at > Utc::now())
                    .map(|session| session.username.clone()))
            }
            SessionStorage::Redis(client) => {
                let mut redis_conn = client.get_tokio_connection().await?;

                Ok(redis::cmd("GET")
                    .arg(session_key(token))
                    .query_async::<_, Option<String>>(&mut redis_conn)
                    .await?)
            }
        }
    }

    #[tracing::instrument(name = "Closing an administrator session", skip(self, token))]
    pub async fn revoke(&self, token: &str) -> Result<(), SessionError> {
        match &self.backend {
            SessionStorage::Memory(sessions) => {
                sessions
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .remove(token);
            }
            SessionStorage::Redis(client) => {
                let mut redis_conn = client.get_tokio_connection().await?;

                redis::cmd("DEL")
                    .arg(session_key(token))
                    .query_async::<_, ()>(&mut redis_conn)
                    .await?;
            }
        }

        Ok(())
    }
}

fn session_key(token: &str) -> String {
    format!("session:{}:username", token)
}

fn generate_session_token() -> String {
    let mut rng = rand::thread_rng();

    std::iter::repeat_with(|| rng.sample(rand::distributions::Alphanumeric))
        .map(char::from)
        .take(TOKEN_LENGTH)
        .collect()
}

/// Session token sent either as a bearer token or as the session cookie
pub fn session_token(req: &HttpRequest) -> Option<String> {
    let bearer = req
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string());

    bearer
        .or_else(|| req.cookie(SESSION_COOKIE).map(|cookie| cookie.value().to_string()))
        .filter(|token| !token.is_empty())
}

#[derive(thiserror::Error)]
pub enum AuthError {
    #[error("Authentication is required.")]
    MissingSession,
    #[error("The session is invalid or has expired.")]
    InvalidSession,
    #[error("Invalid username or password.")]
    InvalidCredentials,
    #[error("Failed to check the administrator session.")]
    Backend(#[from] SessionError),
    #[error("The session store is not registered on the application.")]
    Misconfigured,
}

impl std::fmt::Debug for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        crate::routes::error_chain_fmt(self, f)
    }
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingSession | AuthError::InvalidSession | AuthError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::Backend(_) | AuthError::Misconfigured => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Extractor that only succeeds for requests carrying a live administrator session
#[derive(Debug, Clone)]
pub struct AuthenticatedAdmin {
    pub username: String,
}

impl FromRequest for AuthenticatedAdmin {
    type Error = AuthError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let token = session_token(&req).ok_or(AuthError::MissingSession)?;
            let sessions = req
                .app_data::<web::Data<SessionStore>>()
                .ok_or(AuthError::Misconfigured)?;

            match sessions.resolve(&token).await? {
                Some(username) => Ok(AuthenticatedAdmin { username }),
                None => Err(AuthError::InvalidSession),
            }
        })
    }
}
