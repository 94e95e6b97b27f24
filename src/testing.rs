//! Test infrastructure: MockInterpreter and RecordingLauncher.
//!
//! Gives the pipeline a scripted interpreter and a launcher that records
//! instead of touching the OS, so integration tests exercise the real
//! submit/dispatch path.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{oneshot, Mutex};

use crate::store::StateStore;
use crate::traits::{Interpreter, ProgramLauncher};
use crate::types::{Action, CalendarEvent};

/// A recorded call to `MockInterpreter::interpret()`.
#[derive(Debug, Clone)]
pub struct InterpretCall {
    pub command: String,
    pub context_len: usize,
}

/// Mock interpreter that returns scripted results (FIFO). An optional gate
/// holds the first call in flight until released, for single-flight tests.
pub struct MockInterpreter {
    responses: Mutex<Vec<anyhow::Result<Action>>>,
    pub call_log: Mutex<Vec<InterpretCall>>,
    gate: Mutex<Option<oneshot::Receiver<()>>>,
}

impl MockInterpreter {
    /// An interpreter that always replies with a canned GENERAL_RESPONSE.
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(Vec::new()),
            call_log: Mutex::new(Vec::new()),
            gate: Mutex::new(None),
        }
    }

    /// FIFO queue of scripted results; falls back to the canned reply when
    /// the queue runs out.
    pub fn with_responses(responses: Vec<anyhow::Result<Action>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            call_log: Mutex::new(Vec::new()),
            gate: Mutex::new(None),
        }
    }

    /// An interpreter whose every call fails.
    pub fn failing() -> Self {
        Self::with_responses(vec![Err(anyhow::anyhow!("connection refused"))])
    }

    /// Hold the next call in flight until the returned sender fires (or is
    /// dropped). Only the first call blocks.
    pub async fn gate_next_call(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.gate.lock().await = Some(rx);
        tx
    }

    pub async fn call_count(&self) -> usize {
        self.call_log.lock().await.len()
    }
}

#[async_trait]
impl Interpreter for MockInterpreter {
    async fn interpret(
        &self,
        command: &str,
        context: &[CalendarEvent],
    ) -> anyhow::Result<Action> {
        self.call_log.lock().await.push(InterpretCall {
            command: command.to_string(),
            context_len: context.len(),
        });

        let gate = self.gate.lock().await.take();
        if let Some(rx) = gate {
            let _ = rx.await;
        }

        let mut responses = self.responses.lock().await;
        if responses.is_empty() {
            Ok(Action::GeneralResponse {
                text: "Okay.".to_string(),
            })
        } else {
            responses.remove(0)
        }
    }
}

/// Launcher that records requested programs instead of spawning anything.
/// When built with [`RecordingLauncher::watching`] it also records how many
/// messages the store held at each launch, for ordering assertions.
pub struct RecordingLauncher {
    pub launched: Mutex<Vec<String>>,
    pub messages_at_launch: Mutex<Vec<usize>>,
    store: Option<Arc<StateStore>>,
}

impl RecordingLauncher {
    pub fn new() -> Self {
        Self {
            launched: Mutex::new(Vec::new()),
            messages_at_launch: Mutex::new(Vec::new()),
            store: None,
        }
    }

    /// A launcher that snapshots `store`'s message count whenever it fires.
    pub fn watching(store: Arc<StateStore>) -> Self {
        Self {
            launched: Mutex::new(Vec::new()),
            messages_at_launch: Mutex::new(Vec::new()),
            store: Some(store),
        }
    }

    pub async fn launched_programs(&self) -> Vec<String> {
        self.launched.lock().await.clone()
    }
}

#[async_trait]
impl ProgramLauncher for RecordingLauncher {
    async fn launch(&self, program: &str) -> anyhow::Result<()> {
        if let Some(store) = &self.store {
            let count = store.message_count().await;
            self.messages_at_launch.lock().await.push(count);
        }
        self.launched.lock().await.push(program.to_string());
        Ok(())
    }
}
