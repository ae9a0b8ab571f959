pub mod auth_payload;
pub mod transaction_payload;
