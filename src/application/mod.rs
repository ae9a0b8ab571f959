pub mod ledger;
pub mod session;
