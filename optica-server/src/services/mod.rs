//! Business rules shared by the data-access layer

pub mod ledger;
pub mod route_close;
