use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;

use crate::domain::customer::CustomerRecord;
use crate::domain::customer_status::CustomerStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    Created,
    Updated,
    Deleted,
    Renewed,
    StatusChanged,
}

impl ActivityAction {
    pub fn parse(action: &str) -> Result<ActivityAction, String> {
        match action {
            "created" => Ok(ActivityAction::Created),
            "updated" => Ok(ActivityAction::Updated),
            "deleted" => Ok(ActivityAction::Deleted),
            "renewed" => Ok(ActivityAction::Renewed),
            "status_changed" => Ok(ActivityAction::StatusChanged),
            _ => Err(format!("{} is not a valid activity action", action)),
        }
    }
}

impl AsRef<str> for ActivityAction {
    fn as_ref(&self) -> &str {
        match self {
            ActivityAction::Created => "created",
            ActivityAction::Updated => "updated",
            ActivityAction::Deleted => "deleted",
            ActivityAction::Renewed => "renewed",
            ActivityAction::StatusChanged => "status_changed",
        }
    }
}

/// One administrative action on a customer. The log outlives the records it
/// mentions, so the customer name is copied into the entry.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ActivityEntry {
    pub at: DateTime<Utc>,
    pub customer_id: i64,
    pub customer_name: String,
    pub action: ActivityAction,
    pub details: String,
    pub actor: String,
}

impl ActivityEntry {
    fn new(
        record: &CustomerRecord,
        action: ActivityAction,
        details: String,
        at: DateTime<Utc>,
        actor: &str,
    ) -> ActivityEntry {
        ActivityEntry {
            at,
            customer_id: record.id(),
            customer_name: record.name().as_ref().to_string(),
            action,
            details,
            actor: actor.to_string(),
        }
    }

    pub fn created(record: &CustomerRecord, at: DateTime<Utc>, actor: &str) -> ActivityEntry {
        let details = format!("Customer {} was added.", record.name().as_ref());

        Self::new(record, ActivityAction::Created, details, at, actor)
    }

    /// `None` when the edit left every field as it was
    pub fn updated(
        before: &CustomerRecord,
        after: &CustomerRecord,
        at: DateTime<Utc>,
        actor: &str,
    ) -> Option<ActivityEntry> {
        let fields = changed_fields(before, after);

        if fields.is_empty() {
            return None;
        }

        let details = format!("Changed {}.", fields.join(", "));

        Some(Self::new(after, ActivityAction::Updated, details, at, actor))
    }

    pub fn deleted(record: &CustomerRecord, at: DateTime<Utc>, actor: &str) -> ActivityEntry {
        let details = format!("Customer {} was removed.", record.name().as_ref());

        Self::new(record, ActivityAction::Deleted, details, at, actor)
    }

    pub fn renewed(record: &CustomerRecord, days: i64, at: DateTime<Utc>, actor: &str) -> ActivityEntry {
        let details = format!(
            "Renewed for {} days. New expiration date {}.",
            days,
            record.raw_expiration_date()
        );

        Self::new(record, ActivityAction::Renewed, details, at, actor)
    }

    /// `None` when the status did not move
    pub fn status_changed(
        record: &CustomerRecord,
        from: CustomerStatus,
        at: DateTime<Utc>,
        actor: &str,
    ) -> Option<ActivityEntry> {
        if record.status() == from {
            return None;
        }

        let details = format!("Status changed from {} to {}.", from, record.status());

        Some(Self::new(record, ActivityAction::StatusChanged, details, at, actor))
    }
}

/// Names of the fields that differ between two versions of a record.
/// Password values never appear, only the fact that it changed.
pub fn changed_fields(before: &CustomerRecord, after: &CustomerRecord) -> Vec<&'static str> {
    let mut fields = Vec::new();

    if before.name() != after.name() {
        fields.push("name");
    }
    if before.phone() != after.phone() {
        fields.push("phone");
    }
    if before.login() != after.login() {
        fields.push("login");
    }
    if before.password().expose_secret() != after.password().expose_secret() {
        fields.push("password");
    }
    if before.raw_expiration_date() != after.raw_expiration_date() {
        fields.push("expiration_date");
    }
    if before.status() != after.status() {
        fields.push("status");
    }

    fields
}
