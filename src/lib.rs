//! Emergency resource request backend
//!
//! Requesters post help requests, volunteers accept them and stream their
//! location back, and new requests fan out as WhatsApp alerts.

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod models;
pub mod outbound;
pub mod routes;
pub mod security;
pub mod services;

pub use config::Config;
pub use db::{open_store, Store};
pub use error::{AppError, Result};
pub use routes::router;

use std::sync::Arc;

use outbound::{AlertQueue, Geocoder};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub config: Config,
    pub geocoder: Arc<dyn Geocoder>,
    pub alerts: AlertQueue,
}

impl AppState {
    pub fn new(store: Store, config: Config, geocoder: Arc<dyn Geocoder>, alerts: AlertQueue) -> Self {
        Self {
            store,
            config,
            geocoder,
            alerts,
        }
    }
}
