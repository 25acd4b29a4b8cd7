//! Event records sent to the collector
//!
//! An event is a type string, a bag of scalar attributes, and a timestamp
//! stamped at construction. The wire shape matches what the collector's
//! write endpoint has always received:
//!
//! ```json
//! {"eventType": "page_view", "data": {"page": "quiz", "language": "en"}, "ts": "2025-01-04T12:00:00Z"}
//! ```
//!
//! The vocabulary is open: `track` accepts any event type string. The
//! constructors below cover the events the walkthrough pages actually emit,
//! so call sites don't hand-build attribute bags.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// A single telemetry event
///
/// Has no identity and no client-side persistence: it is serialized and
/// handed to the transport immediately, then discarded regardless of
/// delivery outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    /// Event type, open vocabulary
    #[serde(rename = "eventType")]
    pub event_type: String,

    /// Scalar attributes describing event context
    pub data: serde_json::Value,

    /// When the event was emitted (set at construction, never caller-supplied)
    pub ts: DateTime<Utc>,
}

impl EventRecord {
    /// Create an event record, stamping the current time
    pub fn new(event_type: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            event_type: event_type.into(),
            data,
            ts: Utc::now(),
        }
    }

    /// A walkthrough page was opened
    pub fn page_view(page: &str, language: &str, theme: &str) -> Self {
        Self::new(
            "page_view",
            json!({ "page": page, "language": language, "theme": theme }),
        )
    }

    /// The welcome form was submitted
    pub fn registration_submitted(name: &str, email: &str, language: &str) -> Self {
        Self::new(
            "registration_submitted",
            json!({ "name": name, "email": email, "language": language }),
        )
    }

    /// A language was committed from the dropdown
    pub fn language_selected(lang: &str) -> Self {
        Self::new("language_selected", json!({ "lang": lang }))
    }

    /// A language was hover-previewed without being committed
    pub fn language_preview(lang: &str) -> Self {
        Self::new("language_preview", json!({ "lang": lang }))
    }

    /// Theme state restored on page load
    pub fn theme_initialized(theme: &str) -> Self {
        Self::new("theme_initialized", json!({ "theme": theme }))
    }

    /// Theme toggled by the user
    pub fn theme_changed(theme: &str) -> Self {
        Self::new("theme_changed", json!({ "theme": theme }))
    }

    /// A call-to-action button advanced the walkthrough
    pub fn cta_clicked(from_page: &str, action: &str, language: &str) -> Self {
        Self::new(
            "cta_clicked",
            json!({ "fromPage": from_page, "action": action, "language": language }),
        )
    }

    /// Quiz form submitted
    pub fn quiz_submitted(quiz: &QuizSubmission<'_>) -> Self {
        Self::new(
            "quiz_submitted",
            json!({
                "questionId": quiz.question_id,
                "selectedAnswer": quiz.selected_answer,
                "isCorrect": quiz.is_correct,
                "score": quiz.score,
                "maxScore": quiz.max_score,
                "language": quiz.language,
                "email": quiz.email,
                "name": quiz.name,
            }),
        )
    }

    /// Learner reached the end of the walkthrough
    pub fn intro_completed(
        name: &str,
        email: &str,
        language: &str,
        quiz_score: u32,
        quiz_max: u32,
    ) -> Self {
        Self::new(
            "intro_completed",
            json!({
                "name": name,
                "email": email,
                "language": language,
                "quizScore": quiz_score,
                "quizMax": quiz_max,
            }),
        )
    }
}

/// Attributes of a quiz submission event
#[derive(Debug, Clone)]
pub struct QuizSubmission<'a> {
    pub question_id: &'a str,
    pub selected_answer: &'a str,
    pub is_correct: bool,
    pub score: u32,
    pub max_score: u32,
    pub language: &'a str,
    pub email: &'a str,
    pub name: &'a str,
}
