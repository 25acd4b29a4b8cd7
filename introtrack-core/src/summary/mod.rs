//! Summary aggregation (the read half of the pipeline)
//!
//! On dashboard load, one GET pulls pre-aggregated totals from the
//! collector, the response is normalized into a [`SummarySnapshot`], and
//! the snapshot is rendered into a [`DashboardView`]. The two response
//! shapes the collector has shipped, and the two read strategies (direct
//! JSON vs. callback padding), all funnel into the same snapshot type.
//!
//! ## Usage
//!
//! ```no_run
//! use introtrack_core::{Config, Dashboard, SummaryClient};
//! # use introtrack_core::{DashboardStatus, DashboardView};
//! # use introtrack_core::render::{EventRow, LanguageRow, MetricCards};
//! # struct MyView;
//! # impl DashboardView for MyView {
//! #     fn set_status(&mut self, _: DashboardStatus) {}
//! #     fn show_metrics(&mut self, _: &MetricCards) {}
//! #     fn show_languages(&mut self, _: &[LanguageRow]) {}
//! #     fn show_events(&mut self, _: &[EventRow]) {}
//! # }
//!
//! # async fn run() {
//! let config = Config::load().unwrap();
//! let client = SummaryClient::new(&config.collector).unwrap();
//! let dashboard = Dashboard::new(client, config.collector.rate_convention);
//!
//! let mut view = MyView;
//! dashboard.load_summary(&mut view).await;
//! # }
//! ```

mod dashboard;
pub mod render;
mod snapshot;
mod transport;

pub use dashboard::{Dashboard, DashboardStatus, DashboardView};
pub use snapshot::{SummarySnapshot, Totals};
pub use transport::{ReadTransport, SummaryClient};
