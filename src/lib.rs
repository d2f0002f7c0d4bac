//! # Estampa Gestor
//!
//! Order, expense and activity reporting for a small print and sewing shop.
//!
//! This crate provides:
//! - Period filtering of dated records by year, month, ISO week or day,
//!   with step-forward/backward navigation and display labels
//! - The business entities as persisted by the front end
//! - A read-only storage port over per-entity JSON arrays
//! - Dashboard, analytics, expense and activity aggregations
//!
//! ## Example
//!
//! ```
//! use estampa_gestor::period::{period_label, Granularity, PeriodCursor};
//! use chrono::NaiveDate;
//!
//! let today = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
//! let mut cursor = PeriodCursor::starting_at(Granularity::Month, today);
//! let value = cursor.step(estampa_gestor::period::Direction::Next);
//! assert_eq!(value, "2024-02");
//! assert_eq!(period_label(Granularity::Month, &value), "fevereiro de 2024");
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod analytics;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod period;
pub mod store;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use period::{filter_by_period, period_label, Granularity, Period, PeriodCursor};
pub use store::{JsonStore, Store};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "estampa-gestor";
