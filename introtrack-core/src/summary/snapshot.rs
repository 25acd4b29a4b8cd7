//! Summary snapshot normalization
//!
//! The collector's summary endpoint has shipped two response shapes:
//!
//! - the current shape, with a `status` marker and split per-language maps:
//!   `{status, error?, totals: {learners, completions, completionRate},
//!   eventCounts, registrationsByLanguage, completionsByLanguage}`
//! - a legacy flat shape: `{totalLearners, completions, completionRate,
//!   byLanguage, eventCounts}`
//!
//! Both are normalized into [`SummarySnapshot`], the only shape the
//! renderer ever sees. Every field defaults to zero/empty when absent; a
//! response that is missing everything still normalizes cleanly. The
//! legacy `byLanguage` map carries registrations; legacy responses have no
//! per-language completion data.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::config::RateConvention;
use crate::error::{Error, Result};

/// Scalar counters from the summary endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    /// Total distinct learners
    pub learners: u64,
    /// Total completions
    pub completions: u64,
    /// Completion rate as a percentage (already converted per the
    /// configured [`RateConvention`])
    pub completion_rate: f64,
}

/// The normalized aggregate consumed by the dashboard
///
/// Fetched once per dashboard load and discarded; there is no caching and
/// no incremental update.
#[derive(Debug, Clone, Default)]
pub struct SummarySnapshot {
    pub totals: Totals,
    /// Language code -> registration count
    pub registrations_by_language: BTreeMap<String, u64>,
    /// Language code -> completion count
    pub completions_by_language: BTreeMap<String, u64>,
    /// Event type -> occurrence count
    pub event_counts: BTreeMap<String, u64>,
}

/// Wire totals for the current shape
#[derive(Debug, Deserialize, Default)]
struct WireTotals {
    #[serde(default)]
    learners: u64,
    #[serde(default)]
    completions: u64,
    #[serde(default, rename = "completionRate")]
    completion_rate: f64,
}

/// Current summary shape
#[derive(Debug, Deserialize)]
struct CurrentShape {
    status: Option<String>,
    error: Option<String>,
    #[serde(default)]
    totals: WireTotals,
    #[serde(default, rename = "eventCounts")]
    event_counts: BTreeMap<String, u64>,
    #[serde(default, rename = "registrationsByLanguage")]
    registrations_by_language: BTreeMap<String, u64>,
    #[serde(default, rename = "completionsByLanguage")]
    completions_by_language: BTreeMap<String, u64>,
}

/// Legacy flat summary shape
#[derive(Debug, Deserialize)]
struct LegacyShape {
    #[serde(default, rename = "totalLearners")]
    total_learners: u64,
    #[serde(default)]
    completions: u64,
    #[serde(default, rename = "completionRate")]
    completion_rate: f64,
    #[serde(default, rename = "byLanguage")]
    by_language: BTreeMap<String, u64>,
    #[serde(default, rename = "eventCounts")]
    event_counts: BTreeMap<String, u64>,
}

impl SummarySnapshot {
    /// Normalize a summary response into the canonical shape
    ///
    /// A `status` marker other than `"ok"` is a collector-reported failure;
    /// the collector's message ends up in the error (for the logs), never
    /// on screen. A response without a `status` marker is treated as the
    /// legacy shape when it carries legacy field names.
    pub fn from_value(value: &serde_json::Value, convention: RateConvention) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| Error::Collector("summary response is not a JSON object".to_string()))?;

        if object.contains_key("totalLearners") || object.contains_key("byLanguage") {
            let legacy: LegacyShape = serde_json::from_value(value.clone())
                .map_err(|e| Error::Collector(format!("malformed legacy summary: {}", e)))?;
            return Ok(Self {
                totals: Totals {
                    learners: legacy.total_learners,
                    completions: legacy.completions,
                    completion_rate: convention.to_percent(legacy.completion_rate),
                },
                registrations_by_language: legacy.by_language,
                completions_by_language: BTreeMap::new(),
                event_counts: legacy.event_counts,
            });
        }

        let current: CurrentShape = serde_json::from_value(value.clone())
            .map_err(|e| Error::Collector(format!("malformed summary: {}", e)))?;

        if let Some(status) = &current.status {
            if status != "ok" {
                let message = current
                    .error
                    .unwrap_or_else(|| "unknown error from summary endpoint".to_string());
                return Err(Error::Collector(message));
            }
        }

        Ok(Self {
            totals: Totals {
                learners: current.totals.learners,
                completions: current.totals.completions,
                completion_rate: convention.to_percent(current.totals.completion_rate),
            },
            registrations_by_language: current.registrations_by_language,
            completions_by_language: current.completions_by_language,
            event_counts: current.event_counts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_current_shape() {
        let value = json!({
            "status": "ok",
            "totals": { "learners": 10, "completions": 4, "completionRate": 40 },
            "eventCounts": { "quiz_submitted": 4, "page_view": 12 },
            "registrationsByLanguage": { "en": 8, "es": 2 },
            "completionsByLanguage": { "en": 3, "es": 1 }
        });

        let snapshot = SummarySnapshot::from_value(&value, RateConvention::Percent).unwrap();
        assert_eq!(snapshot.totals.learners, 10);
        assert_eq!(snapshot.totals.completions, 4);
        assert_eq!(snapshot.totals.completion_rate, 40.0);
        assert_eq!(snapshot.event_counts["page_view"], 12);
        assert_eq!(snapshot.registrations_by_language["en"], 8);
        assert_eq!(snapshot.completions_by_language["es"], 1);
    }

    #[test]
    fn test_normalize_legacy_shape() {
        let value = json!({
            "totalLearners": 7,
            "completions": 2,
            "completionRate": 0.29,
            "byLanguage": { "en": 5, "hi": 2 },
            "eventCounts": { "page_view": 30 }
        });

        let snapshot = SummarySnapshot::from_value(&value, RateConvention::Fraction).unwrap();
        assert_eq!(snapshot.totals.learners, 7);
        assert_eq!(snapshot.totals.completions, 2);
        assert!((snapshot.totals.completion_rate - 29.0).abs() < 1e-9);
        assert_eq!(snapshot.registrations_by_language["hi"], 2);
        assert!(snapshot.completions_by_language.is_empty());
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let snapshot =
            SummarySnapshot::from_value(&json!({}), RateConvention::Percent).unwrap();
        assert_eq!(snapshot.totals.learners, 0);
        assert_eq!(snapshot.totals.completions, 0);
        assert_eq!(snapshot.totals.completion_rate, 0.0);
        assert!(snapshot.registrations_by_language.is_empty());
        assert!(snapshot.completions_by_language.is_empty());
        assert!(snapshot.event_counts.is_empty());
    }

    #[test]
    fn test_partial_totals_default_missing_fields() {
        let value = json!({ "status": "ok", "totals": { "learners": 3 } });
        let snapshot = SummarySnapshot::from_value(&value, RateConvention::Percent).unwrap();
        assert_eq!(snapshot.totals.learners, 3);
        assert_eq!(snapshot.totals.completions, 0);
        assert_eq!(snapshot.totals.completion_rate, 0.0);
    }

    #[test]
    fn test_collector_reported_error() {
        let value = json!({ "status": "error", "error": "sheet quota exceeded" });
        let err = SummarySnapshot::from_value(&value, RateConvention::Percent).unwrap_err();
        assert!(err.to_string().contains("sheet quota exceeded"));
    }

    #[test]
    fn test_error_status_without_message() {
        let value = json!({ "status": "error" });
        let err = SummarySnapshot::from_value(&value, RateConvention::Percent).unwrap_err();
        assert!(err.to_string().contains("unknown error"));
    }

    #[test]
    fn test_non_object_response_is_rejected() {
        let err =
            SummarySnapshot::from_value(&json!("nope"), RateConvention::Percent).unwrap_err();
        assert!(matches!(err, Error::Collector(_)));
    }

    #[test]
    fn test_fraction_convention_scales_current_shape() {
        let value = json!({
            "status": "ok",
            "totals": { "learners": 10, "completions": 4, "completionRate": 0.4 }
        });
        let snapshot = SummarySnapshot::from_value(&value, RateConvention::Fraction).unwrap();
        assert!((snapshot.totals.completion_rate - 40.0).abs() < 1e-9);
    }
}
