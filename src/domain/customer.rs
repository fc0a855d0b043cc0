use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::account_password::AccountPassword;
use crate::domain::customer_login::CustomerLogin;
use crate::domain::customer_name::CustomerName;
use crate::domain::customer_phone::CustomerPhone;
use crate::domain::customer_status::CustomerStatus;
use crate::domain::error::ParseWarning;
use crate::domain::expiration_date::ExpirationDate;
use crate::domain::status_history::{StatusChange, StatusHistory};

/// Customer subscription record as kept by the record store
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CustomerRecord {
    pub(crate) id: i64,
    #[serde(alias = "nome")]
    pub(crate) name: CustomerName,
    #[serde(alias = "telefone")]
    pub(crate) phone: CustomerPhone,
    pub(crate) login: CustomerLogin,
    #[serde(alias = "senha")]
    pub(crate) password: AccountPassword,
    pub(crate) status: CustomerStatus,
    #[serde(alias = "data_cadastro")]
    pub(crate) registration_date: NaiveDate,
    // Kept raw: legacy records may carry a missing or malformed value
    #[serde(alias = "data_vencimento", default)]
    pub(crate) expiration_date: String,
    #[serde(default)]
    pub(crate) status_history: StatusHistory,
}

impl CustomerRecord {
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &CustomerName {
        &self.name
    }

    pub fn phone(&self) -> &CustomerPhone {
        &self.phone
    }

    pub fn login(&self) -> &CustomerLogin {
        &self.login
    }

    pub fn password(&self) -> &AccountPassword {
        &self.password
    }

    pub fn status(&self) -> CustomerStatus {
        self.status
    }

    pub fn registration_date(&self) -> NaiveDate {
        self.registration_date
    }

    pub fn raw_expiration_date(&self) -> &str {
        &self.expiration_date
    }

    pub fn expiration_date(&self) -> Result<ExpirationDate, ParseWarning> {
        ExpirationDate::parse(&self.expiration_date).map_err(|_| ParseWarning {
            id: self.id,
            value: self.expiration_date.clone(),
        })
    }

    pub fn status_history(&self) -> &StatusHistory {
        &self.status_history
    }

    /// Days between today and the expiration date, negative once expired
    pub fn days_remaining(&self, today: NaiveDate) -> Option<i64> {
        self.expiration_date()
            .ok()
            .map(|expiration| (expiration.date() - today).num_days())
    }

    /// Moves the record to `to`, recording the change. Returns false when the
    /// status was already `to`.
    pub(crate) fn transition(&mut self, to: CustomerStatus, at: DateTime<Utc>, actor: &str) -> bool {
        if self.status == to {
            return false;
        }

        self.status_history.push(StatusChange {
            at,
            from: self.status,
            to,
            actor: actor.to_string(),
        });
        self.status = to;

        true
    }
}

/// Public representation of a record. The password is never part of it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CustomerView {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub login: String,
    pub status: CustomerStatus,
    pub registration_date: NaiveDate,
    pub expiration_date: String,
    pub days_remaining: Option<i64>,
}

impl CustomerView {
    pub fn new(record: &CustomerRecord, today: NaiveDate) -> CustomerView {
        CustomerView {
            id: record.id,
            name: record.name.as_ref().to_string(),
            phone: record.phone.as_ref().to_string(),
            login: record.login.as_ref().to_string(),
            status: record.status,
            registration_date: record.registration_date,
            expiration_date: record.expiration_date.clone(),
            days_remaining: record.days_remaining(today),
        }
    }
}
