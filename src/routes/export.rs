use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse};
use chrono::Utc;

use super::{filtered, select_customers, CustomerRouteError, ListQuery};
use crate::export::{export_csv, export_filename};
use crate::session::AuthenticatedAdmin;
use crate::store::RecordStore;

#[tracing::instrument(name = "Exporting customers handler", skip(store, admin), fields(admin = %admin.username))]
pub async fn export_customers(
    admin: AuthenticatedAdmin,
    query: web::Query<ListQuery>,
    store: web::Data<RecordStore>,
) -> Result<HttpResponse, CustomerRouteError> {
    let now = Utc::now();
    let (records, filter) = select_customers(&store, &query, now).await?;
    let selected = filtered(&records, &filter, query.sort);
    let content = export_csv(&selected, now.date_naive())?;

    tracing::info!("Exported {} customers", selected.len());

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(export_filename(now))],
        })
        .body(content))
}
