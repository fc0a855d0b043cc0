use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::CustomerRouteError;
use crate::domain::expiration_date::ExpirationDate;
use crate::domain::new_customer::{CustomerUpdate, CustomerUpdateBody, NewCustomer, NewCustomerBody};
use crate::domain::{
    apply_filters, sort_records, sweep_expired, ActivityEntry, CustomerFilter, CustomerRecord,
    CustomerStatus, CustomerView, RecordSet, SortOrder,
};
use crate::session::AuthenticatedAdmin;
use crate::store::{RecordStore, StoreError};

/// Listing query string. Empty values are treated as absent, as sent by HTML forms.
#[derive(Deserialize, Debug, Default)]
pub struct ListQuery {
    pub q: Option<String>,
    pub status: Option<String>,
    pub expires_on_or_before: Option<String>,
    pub sort: Option<SortOrder>,
}

impl TryFrom<&ListQuery> for CustomerFilter {
    type Error = String;

    fn try_from(query: &ListQuery) -> Result<Self, Self::Error> {
        let status = non_empty(&query.status).map(CustomerStatus::parse).transpose()?;
        let expires_on_or_before = non_empty(&query.expires_on_or_before)
            .map(ExpirationDate::parse)
            .transpose()?
            .map(|date| date.date());

        Ok(CustomerFilter {
            text: non_empty(&query.q).map(str::to_string),
            status,
            expires_on_or_before,
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|value| !value.is_empty())
}

/// Loads the record set and expires overdue records, persisting the set only when
/// the sweep changed something.
#[tracing::instrument(name = "Loading customers and sweeping expired ones", skip(store))]
pub async fn load_swept_records(
    store: &RecordStore,
    now: DateTime<Utc>,
) -> Result<RecordSet, StoreError> {
    let mut records = store.load_all().await?;
    let changed = sweep_expired(&mut records, now);

    if !changed.is_empty() {
        tracing::info!("Expired customers {:?}", changed);
        store.save_all(&records).await?;
    }

    Ok(records)
}

/// Sweeps, filters and sorts the record set for a listing query
pub async fn select_customers(
    store: &RecordStore,
    query: &ListQuery,
    now: DateTime<Utc>,
) -> Result<(RecordSet, CustomerFilter), CustomerRouteError> {
    let filter = CustomerFilter::try_from(query).map_err(CustomerRouteError::ValidationError)?;
    let records = load_swept_records(store, now).await?;

    Ok((records, filter))
}

pub fn filtered<'a>(records: &'a RecordSet, filter: &CustomerFilter, sort: Option<SortOrder>) -> Vec<&'a CustomerRecord> {
    let mut selected = apply_filters(records.records(), filter);

    sort_records(&mut selected, sort.unwrap_or_default());

    selected
}

#[tracing::instrument(name = "Listing customers handler", skip(store, admin), fields(admin = %admin.username))]
pub async fn list_customers(
    admin: AuthenticatedAdmin,
    query: web::Query<ListQuery>,
    store: web::Data<RecordStore>,
) -> Result<HttpResponse, CustomerRouteError> {
    let now = Utc::now();
    let (records, filter) = select_customers(&store, &query, now).await?;
    let views: Vec<CustomerView> = filtered(&records, &filter, query.sort)
        .into_iter()
        .map(|record| CustomerView::new(record, now.date_naive()))
        .collect();

    Ok(HttpResponse::Ok().json(views))
}

#[tracing::instrument(
    name = "Creating a new customer handler",
    skip(body, store, admin),
    fields(customer_name = %body.name, admin = %admin.username)
)]
pub async fn create_customer(
    admin: AuthenticatedAdmin,
    body: web::Json<NewCustomerBody>,
    store: web::Data<RecordStore>,
) -> Result<HttpResponse, CustomerRouteError> {
    let new_customer =
        NewCustomer::try_from(body.into_inner()).map_err(CustomerRouteError::ValidationError)?;
    let now = Utc::now();
    let mut records = store.load_all().await?;
    let created = records.add(new_customer, now);
    let view = CustomerView::new(created, now.date_naive());
    let activity = ActivityEntry::created(created, now, &admin.username);

    store.save_all(&records).await?;
    store.append_activity(&[activity]).await?;
    tracing::info!("Customer {} created", view.id);

    Ok(HttpResponse::Created().json(view))
}

#[tracing::instrument(name = "Fetching a customer handler", skip(store, admin), fields(admin = %admin.username))]
pub async fn get_customer(
    admin: AuthenticatedAdmin,
    path: web::Path<i64>,
    store: web::Data<RecordStore>,
) -> Result<HttpResponse, CustomerRouteError> {
    let now = Utc::now();
    let records = load_swept_records(&store, now).await?;
    let record = records.get(path.into_inner())?;

    Ok(HttpResponse::Ok().json(CustomerView::new(record, now.date_naive())))
}

#[tracing::instrument(
    name = "Editing a customer handler",
    skip(body, store, admin),
    fields(admin = %admin.username)
)]
pub async fn update_customer(
    admin: AuthenticatedAdmin,
    path: web::Path<i64>,
    body: web::Json<CustomerUpdateBody>,
    store: web::Data<RecordStore>,
) -> Result<HttpResponse, CustomerRouteError> {
    let update =
        CustomerUpdate::try_from(body.into_inner()).map_err(CustomerRouteError::ValidationError)?;
    let now = Utc::now();
    let id = path.into_inner();
    let mut records = store.load_all().await?;
    let before = records.get(id)?.clone();
    let edited = records.edit(id, update, now, &admin.username)?;
    let view = CustomerView::new(edited, now.date_naive());
    let activity = ActivityEntry::updated(&before, edited, now, &admin.username);

    store.save_all(&records).await?;

    if let Some(entry) = activity {
        store.append_activity(&[entry]).await?;
    }

    Ok(HttpResponse::Ok().json(view))
}

#[tracing::instrument(name = "Deleting a customer handler", skip(store, admin), fields(admin = %admin.username))]
pub async fn delete_customer(
    admin: AuthenticatedAdmin,
    path: web::Path<i64>,
    store: web::Data<RecordStore>,
) -> Result<HttpResponse, CustomerRouteError> {
    let mut records = store.load_all().await?;
    let removed = records.delete(path.into_inner())?;

    store.save_all(&records).await?;
    store
        .append_activity(&[ActivityEntry::deleted(&removed, Utc::now(), &admin.username)])
        .await?;
    tracing::info!("Customer {} deleted", removed.id());

    Ok(HttpResponse::NoContent().finish())
}
