//! Dashboard load orchestration
//!
//! `load_summary` is the read-side entry point: status goes to `Loading`
//! immediately, one read is issued, and on success the three surfaces are
//! rendered and status goes to `Live`. Any failure - transport, malformed
//! response, collector-reported error - lands in the logs and flips the
//! status to `Error`; it never propagates, and surfaces rendered before
//! the failure are left as they are.
//!
//! Calling `load_summary` again is safe: each surface is replaced
//! wholesale on every render. Two racing loads both repopulate the same
//! view and the last response to arrive wins.

use crate::config::RateConvention;

use super::render::{event_rows, language_rows, metric_cards, EventRow, LanguageRow, MetricCards};
use super::snapshot::SummarySnapshot;
use super::transport::ReadTransport;

/// State of the dashboard status indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardStatus {
    /// A load is in flight
    Loading,
    /// Last load rendered successfully
    Live,
    /// Last load failed; only this generic state is shown, never the
    /// underlying error text
    Error,
}

/// Output surfaces of the admin dashboard
///
/// The DOM-surface analog: a status indicator, three metric cards, the
/// language breakdown, and the event table. Each `show_*` call replaces
/// that surface's previous content entirely. An empty row slice means the
/// surface should display its placeholder ("no data yet") instead of an
/// empty container.
pub trait DashboardView {
    fn set_status(&mut self, status: DashboardStatus);
    fn show_metrics(&mut self, cards: &MetricCards);
    fn show_languages(&mut self, rows: &[LanguageRow]);
    fn show_events(&mut self, rows: &[EventRow]);
}

/// Read-side coordinator: fetch, normalize, render
pub struct Dashboard<T: ReadTransport> {
    transport: T,
    rate_convention: RateConvention,
}

impl<T: ReadTransport> Dashboard<T> {
    pub fn new(transport: T, rate_convention: RateConvention) -> Self {
        Self {
            transport,
            rate_convention,
        }
    }

    /// Load the summary once and render it into the view
    ///
    /// Strictly sequenced: status, fetch, render. Never returns an error;
    /// failures flip the status indicator and are logged.
    pub async fn load_summary(&self, view: &mut impl DashboardView) {
        view.set_status(DashboardStatus::Loading);

        let value = match self.transport.fetch_summary().await {
            Ok(value) => value,
            Err(e) => {
                tracing::error!(error = %e, "summary load failed");
                view.set_status(DashboardStatus::Error);
                return;
            }
        };

        let snapshot = match SummarySnapshot::from_value(&value, self.rate_convention) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::error!(error = %e, "summary load failed");
                view.set_status(DashboardStatus::Error);
                return;
            }
        };

        view.show_metrics(&metric_cards(&snapshot));
        view.show_languages(&language_rows(&snapshot));
        view.show_events(&event_rows(&snapshot));
        view.set_status(DashboardStatus::Live);
    }
}
