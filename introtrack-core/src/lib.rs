//! # introtrack-core
//!
//! Core library for introtrack - the analytics pipeline behind a
//! multi-page training walkthrough.
//!
//! This library provides:
//! - A fire-and-forget event tracker pointed at a remote collector
//! - A summary client that fetches and normalizes the collector's
//!   aggregate view for the admin dashboard
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! Two halves, coupled only through the remote collector:
//! - **Write (tracker):** one unacknowledged POST per event, outcome
//!   unobservable to the caller by design
//! - **Read (summary):** one GET per dashboard load, normalized into a
//!   canonical snapshot and rendered into a view
//!
//! ## Example
//!
//! ```rust,no_run
//! use introtrack_core::{BlockingTracker, Config};
//! use serde_json::json;
//!
//! let config = Config::load().expect("failed to load config");
//!
//! if let Some(tracker) = BlockingTracker::from_config(&config.collector).unwrap() {
//!     tracker.track("page_view", json!({ "page": "welcome", "language": "en" }));
//! }
//! ```

// Re-export commonly used items at the crate root
pub use config::{CollectorConfig, Config, RateConvention, TransportMode};
pub use error::{Error, Result};
pub use summary::render;
pub use summary::{
    Dashboard, DashboardStatus, DashboardView, ReadTransport, SummaryClient, SummarySnapshot,
    Totals,
};
pub use tracker::{
    BlockingTracker, EventRecord, EventTransport, HttpEventTransport, QuizSubmission, Tracker,
    TrackerStats,
};

// Public modules
pub mod config;
pub mod error;
pub mod logging;
pub mod summary;
pub mod tracker;
