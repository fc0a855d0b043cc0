use actix_web::HttpResponse;

/// Liveness check. Does not touch the record store nor the session backend.
#[tracing::instrument(name = "Health check handler")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().finish()
}
