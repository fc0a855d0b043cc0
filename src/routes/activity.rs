use actix_web::{web, HttpResponse};
use serde::Deserialize;

use super::CustomerRouteError;
use crate::session::AuthenticatedAdmin;
use crate::store::RecordStore;

#[derive(Deserialize, Debug)]
pub struct ActivityQuery {
    pub limit: Option<usize>,
}

/// Administrative activity, newest entry first
#[tracing::instrument(name = "Activity log handler", skip(store, admin), fields(admin = %admin.username))]
pub async fn activity_log(
    admin: AuthenticatedAdmin,
    query: web::Query<ActivityQuery>,
    store: web::Data<RecordStore>,
) -> Result<HttpResponse, CustomerRouteError> {
    let mut entries = store.load_activity().await?;

    entries.reverse();

    if let Some(limit) = query.limit {
        entries.truncate(limit);
    }

    Ok(HttpResponse::Ok().json(entries))
}
