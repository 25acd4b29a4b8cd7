//! Event tracking (the write half of the pipeline)
//!
//! UI glue calls [`Tracker::track`] (or [`BlockingTracker::track`] from
//! synchronous code) with an event type and an attribute bag; the tracker
//! stamps a timestamp and hands the record to the collector without
//! waiting for, or ever exposing, the outcome.
//!
//! ## Usage
//!
//! ```no_run
//! use introtrack_core::{BlockingTracker, Config};
//! use serde_json::json;
//!
//! let config = Config::load().unwrap();
//! if let Some(tracker) = BlockingTracker::from_config(&config.collector).unwrap() {
//!     tracker.track("page_view", json!({ "page": "welcome", "language": "en" }));
//! }
//! ```

mod emitter;
mod event;

pub use emitter::{BlockingTracker, EventTransport, HttpEventTransport, Tracker, TrackerStats};
pub use event::{EventRecord, QuizSubmission};
