use chrono::{DateTime, NaiveDate, Utc};
use std::borrow::Cow;

use crate::domain::customer::CustomerRecord;

/// Column order of the spreadsheet. Passwords are never exported.
pub const EXPORT_COLUMNS: [&str; 8] = [
    "id",
    "name",
    "phone",
    "login",
    "status",
    "registration_date",
    "expiration_date",
    "days_remaining",
];

#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error("Failed to write the spreadsheet row.")]
    Csv(#[from] csv::Error),
    #[error("Failed to flush the spreadsheet.")]
    Flush(#[from] std::io::Error),
}

/// Renders `records` as CSV, one row per record in the given order
pub fn export_csv(records: &[&CustomerRecord], today: NaiveDate) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(EXPORT_COLUMNS)?;

    for record in records {
        let days_remaining = record
            .days_remaining(today)
            .map(|days| days.to_string())
            .unwrap_or_default();

        writer.write_record([
            record.id().to_string().as_str(),
            &*text_cell(record.name().as_ref()),
            &*text_cell(record.phone().as_ref()),
            &*text_cell(record.login().as_ref()),
            record.status().as_ref(),
            record.registration_date().to_string().as_str(),
            &*text_cell(record.raw_expiration_date()),
            days_remaining.as_str(),
        ])?;
    }

    writer.flush()?;

    writer
        .into_inner()
        .map_err(|err| ExportError::Flush(err.into_error()))
}

/// Free text cell. A leading formula trigger is escaped with `'` so spreadsheet
/// applications show the value instead of evaluating it.
fn text_cell(value: &str) -> Cow<'_, str> {
    if value.starts_with(['=', '+', '-', '@', '\t', '\r']) {
        Cow::Owned(format!("'{}", value))
    } else {
        Cow::Borrowed(value)
    }
}

/// Timestamped download name, unique per second
pub fn export_filename(now: DateTime<Utc>) -> String {
    format!("customers_{}.csv", now.format("%Y%m%d_%H%M%S"))
}
