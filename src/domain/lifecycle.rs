use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

use crate::domain::customer::CustomerRecord;
use crate::domain::customer_status::CustomerStatus;
use crate::domain::error::CustomerError;
use crate::domain::expiration_date::ExpirationDate;
use crate::domain::record_set::RecordSet;
use crate::domain::status_history::SYSTEM_ACTOR;

pub const MAX_RENEWAL_DAYS: i64 = 3650;

/// Moves every active record whose expiration date is before today to `expired`.
///
/// Returns the ids of the changed records. Records with an unreadable expiration
/// date are skipped with a warning. Running it again for the same day changes nothing.
pub fn sweep_expired(records: &mut RecordSet, now: DateTime<Utc>) -> Vec<i64> {
    let today = now.date_naive();
    let mut changed = Vec::new();

    for record in records.records_mut() {
        if !record.status().is_active() {
            continue;
        }

        let expiration = match record.expiration_date() {
            Ok(expiration) => expiration,
            Err(warning) => {
                tracing::warn!("Skipping record during expiration sweep: {}", warning);
                continue;
            }
        };

        if expiration.date() < today && record.transition(CustomerStatus::Expired, now, SYSTEM_ACTOR) {
            changed.push(record.id());
        }
    }

    changed
}

/// Status reached by toggling a record, given whether it is still within its paid period
pub fn next_toggle_status(current: CustomerStatus, still_valid: bool) -> CustomerStatus {
    match (current, still_valid) {
        (CustomerStatus::Active, true) => CustomerStatus::Inactive,
        (CustomerStatus::Inactive, true) => CustomerStatus::Active,
        (CustomerStatus::Active, false) | (CustomerStatus::Inactive, false) => CustomerStatus::Expired,
        (CustomerStatus::Expired, _) => CustomerStatus::Inactive,
    }
}

pub fn toggle_status<'a>(
    records: &'a mut RecordSet,
    id: i64,
    now: DateTime<Utc>,
    actor: &str,
) -> Result<&'a CustomerRecord, CustomerError> {
    let record = records.get_mut(id)?;
    let today = now.date_naive();

    let next = match record.status() {
        CustomerStatus::Expired => CustomerStatus::Inactive,
        current => {
            let expiration = record
                .expiration_date()
                .map_err(|warning| CustomerError::Validation(warning.to_string()))?;

            next_toggle_status(current, expiration.date() >= today)
        }
    };

    record.transition(next, now, actor);

    Ok(record)
}

/// Extends the paid period by `days`, starting from the later of the current
/// expiration date and today, and reactivates the record.
pub fn renew<'a>(
    records: &'a mut RecordSet,
    id: i64,
    days: i64,
    now: DateTime<Utc>,
    actor: &str,
) -> Result<&'a CustomerRecord, CustomerError> {
    if !(1..=MAX_RENEWAL_DAYS).contains(&days) {
        return Err(CustomerError::Validation(format!(
            "{} is not a valid renewal period. Use between 1 and {} days.",
            days, MAX_RENEWAL_DAYS
        )));
    }

    let record = records.get_mut(id)?;
    let today = now.date_naive();
    let start = match record.expiration_date() {
        Ok(expiration) => expiration.date().max(today),
        Err(warning) => {
            tracing::warn!("Renewing from today: {}", warning);
            today
        }
    };

    // Stored dates keep a four-digit year
    let expiration = start
        .checked_add_signed(Duration::days(days))
        .filter(|expiration| expiration.year() <= 9999)
        .ok_or_else(|| {
            CustomerError::Validation(format!(
                "Renewing customer {} by {} days goes past the last supported date.",
                id, days
            ))
        })?;

    record.expiration_date = ExpirationDate::from(expiration).to_string();
    record.transition(CustomerStatus::Active, now, actor);

    Ok(record)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DashboardStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub expired: usize,
    pub expiring_soon: usize,
}

/// Status counts. `expiring_soon` counts active records whose expiration falls
/// within the next `expiring_soon_days` days, today included.
pub fn summarize(records: &[CustomerRecord], today: NaiveDate, expiring_soon_days: i64) -> DashboardStats {
    records.iter().fold(DashboardStats::default(), |mut stats, record| {
        stats.total += 1;

        match record.status() {
            CustomerStatus::Active => stats.active += 1,
            CustomerStatus::Inactive => stats.inactive += 1,
            CustomerStatus::Expired => stats.expired += 1,
        }

        let expiring_soon = record.status().is_active()
            && record
                .days_remaining(today)
                .map_or(false, |days| (0..=expiring_soon_days).contains(&days));

        if expiring_soon {
            stats.expiring_soon += 1;
        }

        stats
    })
}
