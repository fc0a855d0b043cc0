use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{load_swept_records, CustomerRouteError};
use crate::config::LifecycleSettings;
use crate::domain::{renew, sweep_expired, toggle_status, ActivityEntry, CustomerView, StatusChange};
use crate::session::AuthenticatedAdmin;
use crate::store::RecordStore;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct RenewBody {
    pub days: Option<i64>,
}

impl RenewBody {
    /// An empty body asks for the configured default period
    pub fn parse(body: &[u8]) -> Result<RenewBody, String> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(RenewBody::default());
        }

        serde_json::from_slice(body).map_err(|err| format!("Invalid renewal body: {}", err))
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SweepResponse {
    pub changed: Vec<i64>,
}

#[tracing::instrument(
    name = "Toggling a customer status handler",
    skip(store, admin),
    fields(admin = %admin.username)
)]
pub async fn toggle_customer_status(
    admin: AuthenticatedAdmin,
    path: web::Path<i64>,
    store: web::Data<RecordStore>,
) -> Result<HttpResponse, CustomerRouteError> {
    let id = path.into_inner();
    let now = Utc::now();
    let mut records = store.load_all().await?;
    let previous = records.get(id)?.status();
    let toggled = toggle_status(&mut records, id, now, &admin.username)?;
    let view = CustomerView::new(toggled, now.date_naive());
    let activity = ActivityEntry::status_changed(toggled, previous, now, &admin.username);

    store.save_all(&records).await?;

    if let Some(entry) = activity {
        store.append_activity(&[entry]).await?;
    }

    tracing::info!("Customer {} is now {}", view.id, view.status);

    Ok(HttpResponse::Ok().json(view))
}

#[tracing::instrument(
    name = "Renewing a customer subscription handler",
    skip(body, store, lifecycle, admin),
    fields(admin = %admin.username)
)]
pub async fn renew_customer(
    admin: AuthenticatedAdmin,
    path: web::Path<i64>,
    body: web::Bytes,
    store: web::Data<RecordStore>,
    lifecycle: web::Data<LifecycleSettings>,
) -> Result<HttpResponse, CustomerRouteError> {
    let days = RenewBody::parse(&body)
        .map_err(CustomerRouteError::ValidationError)?
        .days
        .unwrap_or(lifecycle.default_renewal_days);
    let now = Utc::now();
    let mut records = store.load_all().await?;
    let renewed = renew(&mut records, path.into_inner(), days, now, &admin.username)?;
    let view = CustomerView::new(renewed, now.date_naive());
    let activity = ActivityEntry::renewed(renewed, days, now, &admin.username);

    store.save_all(&records).await?;
    store.append_activity(&[activity]).await?;
    tracing::info!("Customer {} renewed until {}", view.id, view.expiration_date);

    Ok(HttpResponse::Ok().json(view))
}

#[tracing::instrument(name = "Expiration sweep handler", skip(store, admin), fields(admin = %admin.username))]
pub async fn sweep_customers(
    admin: AuthenticatedAdmin,
    store: web::Data<RecordStore>,
) -> Result<HttpResponse, CustomerRouteError> {
    let mut records = store.load_all().await?;
    let changed = sweep_expired(&mut records, Utc::now());

    if !changed.is_empty() {
        store.save_all(&records).await?;
    }

    Ok(HttpResponse::Ok().json(SweepResponse { changed }))
}

#[tracing::instrument(name = "Customer status history handler", skip(store, admin), fields(admin = %admin.username))]
pub async fn customer_history(
    admin: AuthenticatedAdmin,
    path: web::Path<i64>,
    store: web::Data<RecordStore>,
) -> Result<HttpResponse, CustomerRouteError> {
    let records = load_swept_records(&store, Utc::now()).await?;
    let history: Vec<&StatusChange> = records.get(path.into_inner())?.status_history().iter().collect();

    Ok(HttpResponse::Ok().json(history))
}
