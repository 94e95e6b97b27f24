//! Command pipeline: validate -> interpret -> dispatch, single-flight.
//!
//! Two states, IDLE and RUNNING, held in an atomic flag. A submission while
//! RUNNING is dropped, not queued: explicit backpressure, one command at a
//! time. No failure path leaks RUNNING.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Local;
use tracing::{debug, warn};

use crate::dispatcher;
use crate::store::StateStore;
use crate::traits::{Interpreter, ProgramLauncher};
use crate::types::Role;

/// Failure notice shown when the interpreter call itself fails (transport
/// error, unparseable reply). Interpreter-signaled ERROR actions carry their
/// own message instead.
const INTERPRETER_FAILURE_NOTICE: &str =
    "Sorry, I couldn't process that command. Please try again.";

pub struct CommandPipeline {
    store: Arc<StateStore>,
    interpreter: Arc<dyn Interpreter>,
    launcher: Arc<dyn ProgramLauncher>,
    busy: AtomicBool,
}

impl CommandPipeline {
    pub fn new(
        store: Arc<StateStore>,
        interpreter: Arc<dyn Interpreter>,
        launcher: Arc<dyn ProgramLauncher>,
    ) -> Self {
        Self {
            store,
            interpreter,
            launcher,
            busy: AtomicBool::new(false),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Submit one raw command. Returns whether it was accepted.
    ///
    /// Rejects silently (no state change, no message) when the text is
    /// empty/whitespace or a run is already in flight. On acceptance the
    /// user message is appended before the interpreter is called, so it is
    /// always visible before the reply.
    pub async fn submit(&self, command: &str) -> bool {
        let command = command.trim();
        if command.is_empty() {
            return false;
        }

        // Atomic IDLE -> RUNNING; two submissions can never both win.
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!(command, "Pipeline busy; dropping command");
            return false;
        }

        self.store.append_message(Role::User, command).await;
        let context = self.store.events_snapshot().await;

        match self.interpreter.interpret(command, &context).await {
            Ok(action) => {
                dispatcher::dispatch(
                    action,
                    &self.store,
                    self.launcher.as_ref(),
                    Local::now().date_naive(),
                )
                .await;
            }
            Err(e) => {
                warn!("Interpreter call failed: {}", e);
                self.store
                    .append_message(Role::System, INTERPRETER_FAILURE_NOTICE)
                    .await;
            }
        }

        self.busy.store(false, Ordering::Release);
        true
    }
}
