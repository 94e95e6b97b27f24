use std::sync::Arc;

use tokio::io::AsyncBufReadExt;
use tracing::{info, warn};

use crate::config::{AppConfig, SharedSettings};
use crate::interpreter::LlmInterpreter;
use crate::launcher::SystemLauncher;
use crate::pipeline::CommandPipeline;
use crate::scheduler::SummaryScheduler;
use crate::store::StateStore;
use crate::traits::{Interpreter, ProgramLauncher};
use crate::types::Role;
use crate::wake;

pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    // 1. Shared state
    let store = Arc::new(StateStore::new());
    let settings = SharedSettings::new(config.settings());

    // 2. External boundaries
    let interpreter: Arc<dyn Interpreter> = Arc::new(LlmInterpreter::new(&config.interpreter)?);
    let launcher: Arc<dyn ProgramLauncher> = Arc::new(SystemLauncher);

    // 3. Pipeline
    let pipeline = Arc::new(CommandPipeline::new(
        Arc::clone(&store),
        interpreter,
        launcher,
    ));

    // 4. Daily summary scheduler
    let scheduler = Arc::new(SummaryScheduler::new(
        Arc::clone(&pipeline),
        settings.clone(),
        config.scheduler.tick_secs,
    ));
    let scheduler_handle = scheduler.spawn();

    // 5. Reply printer: render assistant/system messages as they land in
    // the log (the user's own lines are already on screen).
    let mut replies = store.subscribe();
    tokio::spawn(async move {
        loop {
            match replies.recv().await {
                Ok(message) => {
                    if message.role != Role::User {
                        println!("[{}] {}", message.role, message.text);
                    }
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                    warn!("Reply printer lagged by {} messages", n);
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let current = settings.get().await;
    info!(
        wake_word = %current.wake_word,
        summary_time = %current.summary_time,
        "calvox ready; type a command (a leading wake phrase is stripped)"
    );

    // 6. Input loop. Typed lines stand in for recognized utterances: a
    // leading wake phrase is stripped, anything else is submitted as-is.
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    while let Some(line) = lines.next_line().await? {
        let wake_word = settings.get().await.wake_word;
        let command = wake::extract_command(&line, &wake_word)
            .unwrap_or_else(|| line.trim().to_string());
        pipeline.submit(&command).await;
    }

    scheduler_handle.shutdown().await;
    info!("Input closed; shutting down");
    Ok(())
}
