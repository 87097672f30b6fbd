//! `gudlft` - competition place booking for weightlifting clubs
//!
//! Clubs log in with their secretary email, browse competitions and spend
//! points to book places. Club and competition data is loaded from JSON
//! files at startup and kept in memory.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod booking;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod loadtest;
pub mod logging;
pub mod model;
pub mod web;

pub use booking::{book, purchase_places, BookingPage, PurchaseRequest, Receipt};
pub use config::{BookingRules, Config};
pub use dataset::Dataset;
pub use error::{BookingError, Error, Result};
pub use logging::init_logging;
pub use model::{Club, Competition};
pub use web::{build_router, AppState};
