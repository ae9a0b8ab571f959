pub mod money;
pub mod ports;
pub mod session;
pub mod transaction;
