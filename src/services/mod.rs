//! Operations behind the HTTP surface. Each takes its dependencies
//! explicitly so it can run against any store or adapter.

pub mod accounts;
pub mod requests;
pub mod tracking;
