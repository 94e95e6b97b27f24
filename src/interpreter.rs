//! LLM-backed natural-language interpreter.
//!
//! Single-call boundary: (command text, current event list) in, exactly one
//! [`Action`] out, or an error. The pipeline treats transport failures and
//! unparseable replies identically, so everything here just propagates.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::InterpreterConfig;
use crate::traits::Interpreter;
use crate::types::{Action, CalendarEvent};

const SYSTEM_PROMPT: &str = "\
You are the command interpreter for a calendar assistant. Convert the user's \
command into exactly one JSON object and output nothing else.\n\
\n\
Schemas (pick one):\n\
{\"action\": \"CREATE_EVENT\", \"title\": string, \"date\": \"YYYY-MM-DD\", \"time\": \"HH:MM\", \"description\": string?}\n\
{\"action\": \"READ_EVENTS\", \"date\": \"YYYY-MM-DD\"}\n\
{\"action\": \"SUMMARIZE_EVENTS\", \"period\": \"today\" | \"tomorrow\" | \"this_week\"}\n\
{\"action\": \"OPEN_PROGRAM\", \"program\": string}\n\
{\"action\": \"GENERAL_RESPONSE\", \"text\": string}\n\
{\"action\": \"ERROR\", \"message\": string}\n\
\n\
Use GENERAL_RESPONSE for small talk. Use ERROR when you cannot map the \
command to any other action; put a short explanation in \"message\".";

pub struct LlmInterpreter {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl LlmInterpreter {
    pub fn new(config: &InterpreterConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl Interpreter for LlmInterpreter {
    async fn interpret(
        &self,
        command: &str,
        context: &[CalendarEvent],
    ) -> anyhow::Result<Action> {
        let events_json = serde_json::to_string(context)?;
        let today = chrono::Local::now().format("%Y-%m-%d (%A)").to_string();

        let body = json!({
            "model": self.model,
            "temperature": 0,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {
                    "role": "user",
                    "content": format!(
                        "Today is {}.\nCurrent events: {}\n\nCommand: {}",
                        today, events_json, command
                    ),
                },
            ],
        });

        let url = format!("{}/chat/completions", self.base_url);
        debug!(model = %self.model, url = %url, "Calling interpreter");

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .context("Interpreter request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            anyhow::bail!("Interpreter returned {}: {}", status, detail);
        }

        let value: Value = resp.json().await.context("Invalid interpreter response")?;
        let content = value["choices"][0]["message"]["content"]
            .as_str()
            .context("Interpreter response missing content")?;

        parse_action(content)
    }
}

/// Parse the model's reply into an [`Action`], tolerating a markdown code
/// fence around the JSON object.
pub fn parse_action(content: &str) -> anyhow::Result<Action> {
    let trimmed = content.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix("```").unwrap_or(trimmed).trim();

    serde_json::from_str(trimmed)
        .with_context(|| format!("Interpreter reply is not a valid action: {}", content))
}
