use chrono::NaiveDate;

use crate::domain::customer::CustomerRecord;
use crate::domain::customer_phone::digits_of;
use crate::domain::customer_status::CustomerStatus;

/// Listing filters. Every provided filter must hold for a record to be kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerFilter {
    pub text: Option<String>,
    pub status: Option<CustomerStatus>,
    pub expires_on_or_before: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Id,
    Name,
    Expiration,
    Status,
}

impl CustomerFilter {
    pub fn matches(&self, record: &CustomerRecord) -> bool {
        self.matches_text(record) && self.matches_status(record) && self.matches_expiration(record)
    }

    fn matches_text(&self, record: &CustomerRecord) -> bool {
        let query = match self.text.as_deref().map(str::trim) {
            Some(query) if !query.is_empty() => query,
            _ => return true,
        };
        let phone = record.phone().as_ref();

        if record.name().as_ref().to_lowercase().contains(&query.to_lowercase()) || phone.contains(query) {
            return true;
        }

        let query_digits = digits_of(query);

        !query_digits.is_empty() && record.phone().digits().contains(&query_digits)
    }

    fn matches_status(&self, record: &CustomerRecord) -> bool {
        self.status.map_or(true, |status| record.status() == status)
    }

    fn matches_expiration(&self, record: &CustomerRecord) -> bool {
        let limit = match self.expires_on_or_before {
            Some(limit) => limit,
            None => return true,
        };

        match record.expiration_date() {
            Ok(expiration) => expiration.date() <= limit,
            Err(warning) => {
                tracing::warn!("Excluding record from expiration filter: {}", warning);
                false
            }
        }
    }
}

/// Returns the records matching `filter`, keeping their relative order
pub fn apply_filters<'a>(records: &'a [CustomerRecord], filter: &CustomerFilter) -> Vec<&'a CustomerRecord> {
    records.iter().filter(|record| filter.matches(record)).collect()
}

pub fn sort_records(records: &mut [&CustomerRecord], order: SortOrder) {
    match order {
        SortOrder::Id => {}
        SortOrder::Name => records.sort_by_cached_key(|record| record.name().as_ref().to_lowercase()),
        // Unreadable dates go last
        SortOrder::Expiration => records.sort_by_key(|record| {
            record
                .expiration_date()
                .map(|expiration| (false, Some(expiration.date())))
                .unwrap_or((true, None))
        }),
        SortOrder::Status => records.sort_by_key(|record| record.status().rank()),
    }
}
