pub mod account_password;
pub mod activity;
pub mod customer;
pub mod customer_login;
pub mod customer_name;
pub mod customer_phone;
pub mod customer_status;
pub mod error;
pub mod expiration_date;
pub mod filters;
pub mod lifecycle;
pub mod new_customer;
pub mod record_set;
pub mod status_history;

pub use activity::{ActivityAction, ActivityEntry};
pub use customer::{CustomerRecord, CustomerView};
pub use customer_status::CustomerStatus;
pub use error::{CustomerError, ParseWarning};
pub use filters::{apply_filters, sort_records, CustomerFilter, SortOrder};
pub use lifecycle::{renew, summarize, sweep_expired, toggle_status, DashboardStats};
pub use record_set::RecordSet;
pub use status_history::{StatusChange, StatusHistory, SYSTEM_ACTOR};
