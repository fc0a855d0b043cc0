use secrecy::Secret;
use serde::Deserialize;

use crate::domain::account_password::AccountPassword;
use crate::domain::customer_login::CustomerLogin;
use crate::domain::customer_name::CustomerName;
use crate::domain::customer_phone::CustomerPhone;
use crate::domain::customer_status::CustomerStatus;
use crate::domain::expiration_date::ExpirationDate;

#[derive(Debug)]
pub struct NewCustomer {
    pub name: CustomerName,
    pub phone: CustomerPhone,
    pub login: CustomerLogin,
    pub password: AccountPassword,
    pub status: CustomerStatus,
    pub expiration_date: ExpirationDate,
}

#[derive(Deserialize)]
pub struct NewCustomerBody {
    pub name: String,
    pub phone: String,
    pub login: String,
    pub password: Secret<String>,
    pub expiration_date: String,
    pub status: Option<String>,
}

impl TryFrom<NewCustomerBody> for NewCustomer {
    type Error = String;

    fn try_from(body: NewCustomerBody) -> Result<Self, Self::Error> {
        let name = CustomerName::parse(body.name)?;
        let phone = CustomerPhone::parse(body.phone)?;
        let login = CustomerLogin::parse(body.login)?;
        let password = AccountPassword::parse(body.password)?;
        let expiration_date = ExpirationDate::parse(&body.expiration_date)?;
        let status = match body.status.as_deref() {
            Some(status) => CustomerStatus::parse(status)?,
            None => CustomerStatus::Active,
        };

        Ok(NewCustomer {
            name,
            phone,
            login,
            password,
            status,
            expiration_date,
        })
    }
}

/// Replacement values for an existing record
#[derive(Debug)]
pub struct CustomerUpdate {
    pub name: CustomerName,
    pub phone: CustomerPhone,
    pub login: CustomerLogin,
    pub password: Option<AccountPassword>,
    pub status: Option<CustomerStatus>,
    pub expiration_date: ExpirationDate,
}

#[derive(Deserialize)]
pub struct CustomerUpdateBody {
    pub name: String,
    pub phone: String,
    pub login: String,
    pub password: Option<Secret<String>>,
    pub expiration_date: String,
    pub status: Option<String>,
}

impl TryFrom<CustomerUpdateBody> for CustomerUpdate {
    type Error = String;

    fn try_from(body: CustomerUpdateBody) -> Result<Self, Self::Error> {
        let name = CustomerName::parse(body.name)?;
        let phone = CustomerPhone::parse(body.phone)?;
        let login = CustomerLogin::parse(body.login)?;
        let password = body.password.map(AccountPassword::parse).transpose()?;
        let expiration_date = ExpirationDate::parse(&body.expiration_date)?;
        let status = body
            .status
            .as_deref()
            .map(CustomerStatus::parse)
            .transpose()?;

        Ok(CustomerUpdate {
            name,
            phone,
            login,
            password,
            status,
            expiration_date,
        })
    }
}
