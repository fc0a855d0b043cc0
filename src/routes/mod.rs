mod activity;
mod customer_status;
mod customers;
mod export;
mod health_check;
mod login;
mod stats;

pub use activity::*;
pub use customer_status::*;
pub use customers::*;
pub use export::*;
pub use health_check::*;
pub use login::*;
pub use stats::*;

use actix_web::{http::StatusCode, ResponseError};

use crate::domain::CustomerError;
use crate::export::ExportError;
use crate::store::StoreError;

#[derive(thiserror::Error)]
pub enum CustomerRouteError {
    #[error("{0}")]
    ValidationError(String),
    #[error("Customer {0} was not found.")]
    NotFoundError(i64),
    #[error("Failed to load or save the customer records.")]
    PersistenceError(#[from] StoreError),
    #[error("Failed to export the customer records.")]
    ExportError(#[from] ExportError),
}

impl From<CustomerError> for CustomerRouteError {
    fn from(err: CustomerError) -> Self {
        match err {
            CustomerError::Validation(message) => CustomerRouteError::ValidationError(message),
            CustomerError::NotFound(id) => CustomerRouteError::NotFoundError(id),
        }
    }
}

impl std::fmt::Debug for CustomerRouteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for CustomerRouteError {
    fn status_code(&self) -> StatusCode {
        match self {
            CustomerRouteError::ValidationError(_) => StatusCode::BAD_REQUEST,
            CustomerRouteError::NotFoundError(_) => StatusCode::NOT_FOUND,
            CustomerRouteError::PersistenceError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CustomerRouteError::ExportError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Prints the error followed by every error in its source chain
pub fn error_chain_fmt(
    err: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}", err)?;

    let mut current = err.source();

    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }

    Ok(())
}
