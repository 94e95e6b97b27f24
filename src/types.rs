use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Who authored a message in the conversation log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
    /// Pipeline/interpreter failures surfaced to the user, distinct from
    /// ordinary assistant replies.
    System,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::System => write!(f, "system"),
        }
    }
}

/// A calendar event. Immutable once created; lives for the session.
///
/// `date` is a plain `YYYY-MM-DD` calendar day and `time` a 24h `HH:MM`
/// string. No time zone conversion is performed anywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub date: String,
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One entry in the append-only conversation log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// User-tunable settings, replaced wholesale on save (no partial update).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Phrase gating speech activation, matched case-insensitively.
    pub wake_word: String,
    /// Daily summary fire time, 24h "HH:MM".
    pub summary_time: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            wake_word: "hey cal".to_string(),
            summary_time: "08:00".to_string(),
        }
    }
}

/// Structured intent produced by the interpreter from raw command text.
///
/// Closed taxonomy: the dispatcher matches exhaustively, so adding a variant
/// is a compile-time checked change. The serde shape is what the LLM is asked
/// to emit: `{"action": "CREATE_EVENT", ...fields}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    CreateEvent {
        title: String,
        date: String,
        time: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    ReadEvents {
        date: String,
    },
    SummarizeEvents {
        period: SummaryPeriod,
    },
    OpenProgram {
        program: String,
    },
    GeneralResponse {
        text: String,
    },
    /// The interpreter could not produce a valid action; `message` is its
    /// own diagnosis, surfaced verbatim as a system message.
    Error {
        message: String,
    },
}

/// Date window selector for SUMMARIZE_EVENTS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryPeriod {
    Today,
    Tomorrow,
    ThisWeek,
}

impl SummaryPeriod {
    /// The single calendar day this period covers, relative to `today`.
    ///
    /// `ThisWeek` is declared in the taxonomy but has no window upstream; it
    /// deliberately resolves to no day at all rather than a guessed range.
    pub fn window(self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            SummaryPeriod::Today => Some(today),
            SummaryPeriod::Tomorrow => today.succ_opt(),
            SummaryPeriod::ThisWeek => None,
        }
    }

    /// Human label used in summary replies.
    pub fn label(self) -> &'static str {
        match self {
            SummaryPeriod::Today => "today",
            SummaryPeriod::Tomorrow => "tomorrow",
            SummaryPeriod::ThisWeek => "this week",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_deserializes_from_interpreter_json() {
        let json = r#"{
            "action": "CREATE_EVENT",
            "title": "Standup",
            "date": "2025-03-18",
            "time": "09:00"
        }"#;
        let action: Action = serde_json::from_str(json).unwrap();
        assert_eq!(
            action,
            Action::CreateEvent {
                title: "Standup".to_string(),
                date: "2025-03-18".to_string(),
                time: "09:00".to_string(),
                description: None,
            }
        );
    }

    #[test]
    fn summary_period_deserializes_snake_case() {
        let json = r#"{"action": "SUMMARIZE_EVENTS", "period": "this_week"}"#;
        let action: Action = serde_json::from_str(json).unwrap();
        assert_eq!(
            action,
            Action::SummarizeEvents {
                period: SummaryPeriod::ThisWeek
            }
        );
    }

    #[test]
    fn unknown_action_tag_is_rejected() {
        let json = r#"{"action": "DELETE_EVENT", "id": "x"}"#;
        assert!(serde_json::from_str::<Action>(json).is_err());
    }

    #[test]
    fn period_windows() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 18).unwrap();
        assert_eq!(SummaryPeriod::Today.window(today), Some(today));
        assert_eq!(
            SummaryPeriod::Tomorrow.window(today),
            NaiveDate::from_ymd_opt(2025, 3, 19)
        );
        assert_eq!(SummaryPeriod::ThisWeek.window(today), None);
    }

    #[test]
    fn role_display() {
        assert_eq!(Role::User.to_string(), "user");
        assert_eq!(Role::Assistant.to_string(), "assistant");
        assert_eq!(Role::System.to_string(), "system");
    }
}
