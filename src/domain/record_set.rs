use chrono::{DateTime, Utc};
use std::collections::HashSet;

use crate::domain::customer::CustomerRecord;
use crate::domain::error::CustomerError;
use crate::domain::new_customer::{CustomerUpdate, NewCustomer};
use crate::domain::status_history::StatusHistory;

/// The full set of customer records loaded for one request
#[derive(Debug, Clone, Default, serde::Serialize)]
#[serde(transparent)]
pub struct RecordSet(Vec<CustomerRecord>);

/// Builds a set from stored records. Fails when two records share an id.
impl TryFrom<Vec<CustomerRecord>> for RecordSet {
    type Error = String;

    fn try_from(records: Vec<CustomerRecord>) -> Result<Self, Self::Error> {
        let mut seen = HashSet::with_capacity(records.len());

        if let Some(duplicate) = records.iter().find(|record| !seen.insert(record.id)) {
            return Err(format!("customer id {} is used by more than one record", duplicate.id));
        }

        Ok(Self(records))
    }
}

impl RecordSet {
    #[cfg(test)]
    pub(crate) fn new(records: Vec<CustomerRecord>) -> RecordSet {
        Self(records)
    }

    pub fn records(&self) -> &[CustomerRecord] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn records_mut(&mut self) -> &mut [CustomerRecord] {
        &mut self.0
    }

    /// Identifier the next created record receives
    pub fn next_id(&self) -> i64 {
        self.0.iter().map(|record| record.id).max().unwrap_or(0) + 1
    }

    pub fn get(&self, id: i64) -> Result<&CustomerRecord, CustomerError> {
        self.0
            .iter()
            .find(|record| record.id == id)
            .ok_or(CustomerError::NotFound(id))
    }

    pub(crate) fn get_mut(&mut self, id: i64) -> Result<&mut CustomerRecord, CustomerError> {
        self.0
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or(CustomerError::NotFound(id))
    }

    pub fn add(&mut self, new_customer: NewCustomer, now: DateTime<Utc>) -> &CustomerRecord {
        let record = CustomerRecord {
            id: self.next_id(),
            name: new_customer.name,
            phone: new_customer.phone,
            login: new_customer.login,
            password: new_customer.password,
            status: new_customer.status,
            registration_date: now.date_naive(),
            expiration_date: new_customer.expiration_date.to_string(),
            status_history: StatusHistory::default(),
        };

        self.0.push(record);

        &self.0[self.0.len() - 1]
    }

    pub fn edit(
        &mut self,
        id: i64,
        update: CustomerUpdate,
        now: DateTime<Utc>,
        actor: &str,
    ) -> Result<&CustomerRecord, CustomerError> {
        let record = self.get_mut(id)?;

        record.name = update.name;
        record.phone = update.phone;
        record.login = update.login;
        record.expiration_date = update.expiration_date.to_string();

        if let Some(password) = update.password {
            record.password = password;
        }

        if let Some(status) = update.status {
            record.transition(status, now, actor);
        }

        Ok(record)
    }

    pub fn delete(&mut self, id: i64) -> Result<CustomerRecord, CustomerError> {
        let position = self
            .0
            .iter()
            .position(|record| record.id == id)
            .ok_or(CustomerError::NotFound(id))?;

        Ok(self.0.remove(position))
    }
}
