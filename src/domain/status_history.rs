use chrono::{DateTime, Utc};

use crate::domain::customer_status::CustomerStatus;

pub const SYSTEM_ACTOR: &str = "system";

/// A single status transition of a customer record
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StatusChange {
    pub at: DateTime<Utc>,
    pub from: CustomerStatus,
    pub to: CustomerStatus,
    pub actor: String,
}

/// Append-only audit trail. Entries are never removed nor reordered.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct StatusHistory(Vec<StatusChange>);

impl StatusHistory {
    /// Appends a change. A timestamp earlier than the last entry is clamped to it
    /// so the trail stays chronological.
    pub fn push(&mut self, mut change: StatusChange) {
        if let Some(last) = self.0.last() {
            if change.at < last.at {
                change.at = last.at;
            }
        }

        self.0.push(change);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&StatusChange> {
        self.0.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusChange> {
        self.0.iter()
    }
}

impl From<Vec<StatusChange>> for StatusHistory {
    fn from(changes: Vec<StatusChange>) -> Self {
        let mut history = StatusHistory::default();

        changes.into_iter().for_each(|change| history.push(change));

        history
    }
}
