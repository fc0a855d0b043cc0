#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum CustomerError {
    #[error("{0}")]
    Validation(String),
    #[error("Customer {0} was not found.")]
    NotFound(i64),
}

/// A stored expiration date that cannot be read. Never fatal: the record is left
/// out of the affected operation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Customer {id} has an unparseable expiration date {value:?}.")]
pub struct ParseWarning {
    pub id: i64,
    pub value: String,
}
