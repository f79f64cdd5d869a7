//! Stockroom inventory tracking server
//!
//! Staff scan or type barcodes to look up inventory items, borrowers and
//! borrow records. The core pieces are the barcode classifier, which turns a
//! raw code into a typed reference, and the notification bus, which carries
//! short-lived messages to every connected display.

use std::sync::Arc;

pub mod api;
pub mod barcode;
pub mod config;
pub mod error;
pub mod models;
pub mod notifications;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    pub notifications: notifications::NotificationBus,
}
