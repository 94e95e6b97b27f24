use async_trait::async_trait;

use crate::types::{Action, CalendarEvent};

/// Natural-language interpreter: turns raw command text plus the current
/// event list into exactly one [`Action`], or fails.
///
/// Stateless across calls from the pipeline's perspective. May take
/// unbounded time; the pipeline awaits it with no timeout of its own.
#[async_trait]
pub trait Interpreter: Send + Sync {
    async fn interpret(&self, command: &str, context: &[CalendarEvent])
        -> anyhow::Result<Action>;
}

/// Best-effort OS-level program launch via a `<program>://` URI.
///
/// Fire-and-forget: the dispatcher logs a failure but never surfaces it to
/// the user, and no success feedback exists.
#[async_trait]
pub trait ProgramLauncher: Send + Sync {
    async fn launch(&self, program: &str) -> anyhow::Result<()>;
}
