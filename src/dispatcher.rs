//! Action dispatcher: one exhaustive match from [`Action`] to state
//! mutation plus at most one side effect.
//!
//! The launch side effect runs strictly after every store append; side
//! effects are never interleaved with mutations.

use chrono::{NaiveDate, NaiveTime};
use tracing::{info, warn};

use crate::store::StateStore;
use crate::traits::ProgramLauncher;
use crate::types::{Action, CalendarEvent, Role, SummaryPeriod};

/// Route one action through the store. `today` is injected so summaries are
/// deterministic under test; production passes the local calendar date.
pub async fn dispatch(
    action: Action,
    store: &StateStore,
    launcher: &dyn ProgramLauncher,
    today: NaiveDate,
) {
    match action {
        Action::CreateEvent {
            title,
            date,
            time,
            description,
        } => {
            let event = CalendarEvent {
                id: uuid::Uuid::new_v4().to_string(),
                title: title.clone(),
                date: date.clone(),
                time: time.clone(),
                description,
            };
            store.append_event(event).await;
            info!(title = %title, date = %date, time = %time, "Created event");

            let text = format!(
                "Added \"{}\" on {} at {}.",
                title,
                format_date(&date),
                format_time(&time)
            );
            store.append_message(Role::Assistant, &text).await;
        }

        Action::ReadEvents { date } => {
            let events = store.events_snapshot().await;
            let matching: Vec<&CalendarEvent> =
                events.iter().filter(|e| e.date == date).collect();
            let text = event_list_text(&matching, &format!("on {}", format_date(&date)));
            store.append_message(Role::Assistant, &text).await;
        }

        Action::SummarizeEvents { period } => {
            let events = store.events_snapshot().await;
            let matching: Vec<&CalendarEvent> = match period.window(today) {
                Some(day) => {
                    let day = day.format("%Y-%m-%d").to_string();
                    events.iter().filter(|e| e.date == day).collect()
                }
                // No window (this_week): summary still goes out, just empty.
                None => Vec::new(),
            };
            let text = event_list_text(&matching, period.label());
            store.append_message(Role::Assistant, &text).await;
        }

        Action::OpenProgram { program } => {
            store
                .append_message(Role::Assistant, &format!("Trying to open {}.", program))
                .await;
            // Fire-and-forget: no feedback loop exists for launch failures.
            if let Err(e) = launcher.launch(&program).await {
                warn!(program = %program, "Program launch failed: {}", e);
            }
        }

        Action::GeneralResponse { text } => {
            store.append_message(Role::Assistant, &text).await;
        }

        Action::Error { message } => {
            store.append_message(Role::System, &message).await;
        }
    }
}

/// "2025-03-18" -> "Tuesday, March 18". Falls back to the raw string when
/// the payload date does not parse.
pub fn format_date(date: &str) -> String {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| d.format("%A, %B %-d").to_string())
        .unwrap_or_else(|_| date.to_string())
}

/// "09:00" -> "9:00 AM". Falls back to the raw string when the payload time
/// does not parse.
pub fn format_time(time: &str) -> String {
    NaiveTime::parse_from_str(time, "%H:%M")
        .map(|t| t.format("%-I:%M %p").to_string())
        .unwrap_or_else(|_| time.to_string())
}

/// Reply text for a (possibly empty) set of events. Zero matches still
/// produce a message.
fn event_list_text(events: &[&CalendarEvent], when: &str) -> String {
    if events.is_empty() {
        return format!("You have nothing scheduled {}.", when);
    }

    let mut lines: Vec<String> = events
        .iter()
        .map(|e| format!("- \"{}\" at {}", e.title, format_time(&e.time)))
        .collect();
    lines.sort();

    format!(
        "You have {} event{} {}:\n{}",
        events.len(),
        if events.len() == 1 { "" } else { "s" },
        when,
        lines.join("\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_parseable_date_and_time() {
        assert_eq!(format_date("2025-03-18"), "Tuesday, March 18");
        assert_eq!(format_time("09:00"), "9:00 AM");
        assert_eq!(format_time("14:30"), "2:30 PM");
    }

    #[test]
    fn falls_back_to_raw_strings() {
        assert_eq!(format_date("next tuesday"), "next tuesday");
        assert_eq!(format_time("9 o'clock"), "9 o'clock");
    }

    #[test]
    fn empty_event_list_still_has_text() {
        let text = event_list_text(&[], "today");
        assert_eq!(text, "You have nothing scheduled today.");
    }

    #[test]
    fn event_list_mentions_every_title() {
        let a = CalendarEvent {
            id: "1".to_string(),
            title: "Standup".to_string(),
            date: "2025-03-18".to_string(),
            time: "09:00".to_string(),
            description: None,
        };
        let b = CalendarEvent {
            id: "2".to_string(),
            title: "Dentist".to_string(),
            date: "2025-03-18".to_string(),
            time: "14:00".to_string(),
            description: Some("bring insurance card".to_string()),
        };
        let text = event_list_text(&[&a, &b], "today");
        assert!(text.contains("2 events today"));
        assert!(text.contains("\"Standup\" at 9:00 AM"));
        assert!(text.contains("\"Dentist\" at 2:00 PM"));
    }
}
