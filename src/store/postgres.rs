use secrecy::{ExposeSecret, Secret};
use sqlx::{postgres::PgRow, PgPool, Row};
use std::collections::HashMap;

use super::StoreError;
use crate::domain::account_password::AccountPassword;
use crate::domain::activity::{ActivityAction, ActivityEntry};
use crate::domain::customer::CustomerRecord;
use crate::domain::customer_login::CustomerLogin;
use crate::domain::customer_name::CustomerName;
use crate::domain::customer_phone::CustomerPhone;
use crate::domain::customer_status::CustomerStatus;
use crate::domain::record_set::RecordSet;
use crate::domain::status_history::StatusChange;

/// Stores the record set in the `customers` and `customer_status_history` tables,
/// and the activity log in `activity_log`
pub struct PgStore {
    db_pool: PgPool,
}

impl PgStore {
    pub fn new(db_pool: PgPool) -> PgStore {
        PgStore { db_pool }
    }

    #[tracing::instrument(name = "Loading customer records from the database", skip(self))]
    pub async fn load_all(&self) -> Result<RecordSet, StoreError> {
        let mut histories = self.load_histories().await?;
        let rows = sqlx::query(
            r#"
            SELECT id, name, phone, login, password, status, registration_date, expiration_date
            FROM customers
            ORDER BY position
            "#,
        )
        .fetch_all(&self.db_pool)
        .await?;

        let records = rows
            .iter()
            .map(|row| record_from_row(row, &mut histories))
            .collect::<Result<Vec<_>, _>>()?;

        RecordSet::try_from(records).map_err(StoreError::Corrupted)
    }

    async fn load_histories(&self) -> Result<HashMap<i64, Vec<StatusChange>>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT customer_id, changed_at, from_status, to_status, actor
            FROM customer_status_history
            ORDER BY customer_id, position
            "#,
        )
        .fetch_all(&self.db_pool)
        .await?;

        let mut histories: HashMap<i64, Vec<StatusChange>> = HashMap::new();

        for row in rows {
            let from: String = row.try_get("from_status")?;
            let to: String = row.try_get("to_status")?;
            let change = StatusChange {
                at: row.try_get("changed_at")?,
                from: CustomerStatus::parse(&from).map_err(StoreError::Corrupted)?,
                to: CustomerStatus::parse(&to).map_err(StoreError::Corrupted)?,
                actor: row.try_get("actor")?,
            };

            histories
                .entry(row.try_get("customer_id")?)
                .or_default()
                .push(change);
        }

        Ok(histories)
    }

    /// Replaces the stored set inside a single transaction
    #[tracing::instrument(
        name = "Saving customer records to the database",
        skip(self, records),
        fields(records = records.len())
    )]
    pub async fn save_all(&self, records: &RecordSet) -> Result<(), StoreError> {
        let mut transaction = self.db_pool.begin().await?;

        sqlx::query("DELETE FROM customer_status_history")
            .execute(&mut transaction)
            .await?;
        sqlx::query("DELETE FROM customers")
            .execute(&mut transaction)
            .await?;

        for (position, record) in records.records().iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO customers (id, position, name, phone, login, password, status, registration_date, expiration_date)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(record.id())
            .bind(position as i32)
            .bind(record.name().as_ref())
            .bind(record.phone().as_ref())
            .bind(record.login().as_ref())
            .bind(record.password().expose_secret())
            .bind(record.status().as_ref())
            .bind(record.registration_date())
            .bind(record.raw_expiration_date())
            .execute(&mut transaction)
            .await?;

            for (index, change) in record.status_history().iter().enumerate() {
                sqlx::query(
                    r#"
                    INSERT INTO customer_status_history (customer_id, position, changed_at, from_status, to_status, actor)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    "#,
                )
                .bind(record.id())
                .bind(index as i32)
                .bind(change.at)
                .bind(change.from.as_ref())
                .bind(change.to.as_ref())
                .bind(&change.actor)
                .execute(&mut transaction)
                .await?;
            }
        }

        transaction.commit().await?;

        Ok(())
    }

    #[tracing::instrument(name = "Loading the activity log from the database", skip(self))]
    pub async fn load_activity(&self) -> Result<Vec<ActivityEntry>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT occurred_at, customer_id, customer_name, action, details, actor
            FROM activity_log
            ORDER BY id
            "#,
        )
        .fetch_all(&self.db_pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<ActivityEntry, StoreError> {
                let action: String = row.try_get("action")?;

                Ok(ActivityEntry {
                    at: row.try_get("occurred_at")?,
                    customer_id: row.try_get("customer_id")?,
                    customer_name: row.try_get("customer_name")?,
                    action: ActivityAction::parse(&action).map_err(StoreError::Corrupted)?,
                    details: row.try_get("details")?,
                    actor: row.try_get("actor")?,
                })
            })
            .collect()
    }

    #[tracing::instrument(
        name = "Appending to the activity log table",
        skip(self, entries),
        fields(entries = entries.len())
    )]
    pub async fn append_activity(&self, entries: &[ActivityEntry]) -> Result<(), StoreError> {
        let mut transaction = self.db_pool.begin().await?;

        for entry in entries {
            sqlx::query(
                r#"
                INSERT INTO activity_log (occurred_at, customer_id, customer_name, action, details, actor)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(entry.at)
            .bind(entry.customer_id)
            .bind(&entry.customer_name)
            .bind(entry.action.as_ref())
            .bind(&entry.details)
            .bind(&entry.actor)
            .execute(&mut transaction)
            .await?;
        }

        transaction.commit().await?;

        Ok(())
    }
}

fn record_from_row(
    row: &PgRow,
    histories: &mut HashMap<i64, Vec<StatusChange>>,
) -> Result<CustomerRecord, StoreError> {
    let id: i64 = row.try_get("id")?;
    let status: String = row.try_get("status")?;

    Ok(CustomerRecord {
        id,
        name: CustomerName::parse(row.try_get("name")?).map_err(StoreError::Corrupted)?,
        phone: CustomerPhone::parse(row.try_get("phone")?).map_err(StoreError::Corrupted)?,
        login: CustomerLogin::parse(row.try_get("login")?).map_err(StoreError::Corrupted)?,
        password: AccountPassword::parse(Secret::new(row.try_get("password")?))
            .map_err(StoreError::Corrupted)?,
        status: CustomerStatus::parse(&status).map_err(StoreError::Corrupted)?,
        registration_date: row.try_get("registration_date")?,
        expiration_date: row.try_get("expiration_date")?,
        status_history: histories.remove(&id).unwrap_or_default().into(),
    })
}
