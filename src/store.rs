//! Shared state store: the event list and the conversation log.
//!
//! Single source of truth for both. All mutation funnels through the append
//! methods here, and only the dispatcher/pipeline call them. That is what
//! preserves the user-before-reply ordering of the log.

use chrono::Utc;
use tokio::sync::{broadcast, Mutex};
use tracing::debug;

use crate::types::{CalendarEvent, Message, Role};

pub struct StateStore {
    events: Mutex<Vec<CalendarEvent>>,
    messages: Mutex<Vec<Message>>,
    message_tx: broadcast::Sender<Message>,
}

impl StateStore {
    pub fn new() -> Self {
        let (message_tx, _) = broadcast::channel(64);
        Self {
            events: Mutex::new(Vec::new()),
            messages: Mutex::new(Vec::new()),
            message_tx,
        }
    }

    /// Subscribe to the live message feed. Every appended message is
    /// broadcast so the shell (or a future UI) can render the conversation
    /// without polling.
    pub fn subscribe(&self) -> broadcast::Receiver<Message> {
        self.message_tx.subscribe()
    }

    /// Append a new event. Events are immutable once stored.
    pub async fn append_event(&self, event: CalendarEvent) {
        self.events.lock().await.push(event);
    }

    /// Append a message to the log and broadcast it.
    pub async fn append_message(&self, role: Role, text: &str) -> Message {
        let message = Message {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            text: text.to_string(),
            created_at: Utc::now(),
        };
        self.messages.lock().await.push(message.clone());
        if self.message_tx.send(message.clone()).is_err() {
            debug!("No message subscribers active");
        }
        message
    }

    pub async fn events_snapshot(&self) -> Vec<CalendarEvent> {
        self.events.lock().await.clone()
    }

    pub async fn messages_snapshot(&self) -> Vec<Message> {
        self.messages.lock().await.clone()
    }

    pub async fn event_count(&self) -> usize {
        self.events.lock().await.len()
    }

    pub async fn message_count(&self) -> usize {
        self.messages.lock().await.len()
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn append_message_broadcasts_to_subscribers() {
        let store = StateStore::new();
        let mut rx = store.subscribe();

        store.append_message(Role::Assistant, "hello").await;

        let received = rx.recv().await.unwrap();
        assert_eq!(received.role, Role::Assistant);
        assert_eq!(received.text, "hello");
        assert_eq!(store.message_count().await, 1);
    }

    #[tokio::test]
    async fn events_snapshot_is_a_copy() {
        let store = StateStore::new();
        store
            .append_event(CalendarEvent {
                id: "1".to_string(),
                title: "Dentist".to_string(),
                date: "2025-03-18".to_string(),
                time: "14:00".to_string(),
                description: None,
            })
            .await;

        let snapshot = store.events_snapshot().await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].title, "Dentist");
        // Mutating the snapshot must not touch the store.
        drop(snapshot);
        assert_eq!(store.event_count().await, 1);
    }
}
