use actix_web::{web, HttpResponse};
use chrono::Utc;

use super::{load_swept_records, CustomerRouteError};
use crate::config::LifecycleSettings;
use crate::domain::summarize;
use crate::session::AuthenticatedAdmin;
use crate::store::RecordStore;

#[tracing::instrument(name = "Dashboard stats handler", skip(store, lifecycle, admin), fields(admin = %admin.username))]
pub async fn dashboard_stats(
    admin: AuthenticatedAdmin,
    store: web::Data<RecordStore>,
    lifecycle: web::Data<LifecycleSettings>,
) -> Result<HttpResponse, CustomerRouteError> {
    let now = Utc::now();
    let records = load_swept_records(&store, now).await?;
    let stats = summarize(records.records(), now.date_naive(), lifecycle.expiring_soon_days);

    Ok(HttpResponse::Ok().json(stats))
}
