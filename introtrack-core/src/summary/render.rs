//! Deterministic rendering model for the admin dashboard
//!
//! Pure functions that turn a [`SummarySnapshot`] into the three display
//! surfaces: scalar metric cards, per-language breakdown rows, and the
//! event-count table. Views consume these rows; nothing here touches I/O.
//!
//! Ordering is pinned down explicitly because the upstream aggregation
//! makes no guarantee:
//! - language rows: lexicographic by language code;
//! - event rows: count descending, ties broken lexicographic ascending by
//!   event type.

use std::collections::BTreeSet;

use super::snapshot::SummarySnapshot;

/// The three scalar metric cards
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricCards {
    pub learners: u64,
    pub completions: u64,
    /// Completion rate as a percentage
    pub completion_rate: f64,
}

impl MetricCards {
    /// Rate card text, e.g. `40%`
    pub fn rate_display(&self) -> String {
        format!("{}%", self.completion_rate.round() as i64)
    }
}

/// One per-language breakdown row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageRow {
    pub language: String,
    pub registrations: u64,
    pub completions: u64,
    /// round(completions / registrations * 100), 0 when there are no
    /// registrations
    pub rate: u32,
}

impl LanguageRow {
    /// Pill text, e.g. `EN — 3/8 completed (38%)`
    pub fn pill_label(&self) -> String {
        format!(
            "{} — {}/{} completed ({}%)",
            self.language.to_uppercase(),
            self.completions,
            self.registrations,
            self.rate
        )
    }
}

/// One event-count table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRow {
    pub event_type: String,
    pub count: u64,
}

/// Scalar metric cards from a snapshot
pub fn metric_cards(snapshot: &SummarySnapshot) -> MetricCards {
    MetricCards {
        learners: snapshot.totals.learners,
        completions: snapshot.totals.completions,
        completion_rate: snapshot.totals.completion_rate,
    }
}

/// Per-language rows over the union of registration and completion keys,
/// sorted lexicographically
///
/// An empty result means the view should show its "no learner data"
/// placeholder.
pub fn language_rows(snapshot: &SummarySnapshot) -> Vec<LanguageRow> {
    let languages: BTreeSet<&String> = snapshot
        .registrations_by_language
        .keys()
        .chain(snapshot.completions_by_language.keys())
        .collect();

    languages
        .into_iter()
        .map(|language| {
            let registrations = snapshot
                .registrations_by_language
                .get(language)
                .copied()
                .unwrap_or(0);
            let completions = snapshot
                .completions_by_language
                .get(language)
                .copied()
                .unwrap_or(0);

            // Guard: never divide by zero
            let rate = if registrations > 0 {
                (completions as f64 / registrations as f64 * 100.0).round() as u32
            } else {
                0
            };

            LanguageRow {
                language: language.clone(),
                registrations,
                completions,
                rate,
            }
        })
        .collect()
}

/// Event table rows, count descending, ties lexicographic by event type
///
/// An empty result means the view should show its "no events" placeholder.
pub fn event_rows(snapshot: &SummarySnapshot) -> Vec<EventRow> {
    // BTreeMap iteration is lexicographic, and the sort is stable, so
    // equal counts keep that order
    let mut rows: Vec<EventRow> = snapshot
        .event_counts
        .iter()
        .map(|(event_type, count)| EventRow {
            event_type: event_type.clone(),
            count: *count,
        })
        .collect();

    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::snapshot::Totals;
    use std::collections::BTreeMap;

    fn snapshot_with_events(counts: &[(&str, u64)]) -> SummarySnapshot {
        SummarySnapshot {
            event_counts: counts
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_event_rows_sorted_by_count_descending() {
        let rows = event_rows(&snapshot_with_events(&[
            ("quiz_submitted", 4),
            ("page_view", 12),
            ("cta_clicked", 7),
        ]));

        let order: Vec<&str> = rows.iter().map(|r| r.event_type.as_str()).collect();
        assert_eq!(order, ["page_view", "cta_clicked", "quiz_submitted"]);
    }

    #[test]
    fn test_event_rows_tie_break_is_lexicographic() {
        let rows = event_rows(&snapshot_with_events(&[("a", 3), ("b", 5), ("c", 5)]));

        let order: Vec<&str> = rows.iter().map(|r| r.event_type.as_str()).collect();
        assert_eq!(order, ["b", "c", "a"]);
    }

    #[test]
    fn test_event_rows_empty() {
        assert!(event_rows(&SummarySnapshot::default()).is_empty());
    }

    #[test]
    fn test_language_rows_sorted_and_unioned() {
        let snapshot = SummarySnapshot {
            registrations_by_language: BTreeMap::from([
                ("es".to_string(), 2),
                ("en".to_string(), 8),
            ]),
            completions_by_language: BTreeMap::from([
                ("en".to_string(), 3),
                ("zh".to_string(), 1),
            ]),
            ..Default::default()
        };

        let rows = language_rows(&snapshot);
        let order: Vec<&str> = rows.iter().map(|r| r.language.as_str()).collect();
        assert_eq!(order, ["en", "es", "zh"]);

        // "zh" appears only in completions; registrations default to 0
        assert_eq!(rows[2].registrations, 0);
        assert_eq!(rows[2].completions, 1);
    }

    #[test]
    fn test_language_rate_division_guard() {
        let snapshot = SummarySnapshot {
            registrations_by_language: BTreeMap::from([("es".to_string(), 0)]),
            completions_by_language: BTreeMap::from([("es".to_string(), 0)]),
            ..Default::default()
        };

        let rows = language_rows(&snapshot);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].rate, 0);
    }

    #[test]
    fn test_language_pill_labels() {
        let snapshot = SummarySnapshot {
            registrations_by_language: BTreeMap::from([
                ("en".to_string(), 8),
                ("es".to_string(), 2),
            ]),
            completions_by_language: BTreeMap::from([
                ("en".to_string(), 3),
                ("es".to_string(), 1),
            ]),
            ..Default::default()
        };

        let rows = language_rows(&snapshot);
        assert_eq!(rows[0].pill_label(), "EN — 3/8 completed (38%)");
        assert_eq!(rows[1].pill_label(), "ES — 1/2 completed (50%)");
    }

    #[test]
    fn test_metric_cards_rate_display() {
        let cards = metric_cards(&SummarySnapshot {
            totals: Totals {
                learners: 10,
                completions: 4,
                completion_rate: 40.0,
            },
            ..Default::default()
        });

        assert_eq!(cards.learners, 10);
        assert_eq!(cards.completions, 4);
        assert_eq!(cards.rate_display(), "40%");
    }

    #[test]
    fn test_metric_cards_rate_display_rounds() {
        let cards = MetricCards {
            learners: 0,
            completions: 0,
            completion_rate: 37.5,
        };
        assert_eq!(cards.rate_display(), "38%");
    }
}
