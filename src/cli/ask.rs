//! Ask command handler.

use std::sync::Arc;

use anyhow::{Context, Result};
use futures::StreamExt;

use skillrelay::agent::TaskExecutor;
use skillrelay::bus::{EventQueue, ExecuteParams, InboundRequest};
use skillrelay::config::Config;
use skillrelay::conversation::{Message, Part, Role};
use skillrelay::skills::DispatchMode;

/// Run one request and print the answer (or every event when streaming).
pub(crate) async fn cmd_ask(
    text: Vec<String>,
    style: Option<String>,
    context_id: Option<String>,
    mode: Option<DispatchMode>,
    stream: bool,
) -> Result<()> {
    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(mode) = mode {
        config.dispatch.mode = mode;
    }
    if config.has_errors() {
        for diag in config.validate() {
            eprintln!("{}", diag);
        }
        anyhow::bail!("invalid configuration (run `skillrelay config check`)");
    }

    let executor = TaskExecutor::from_config(&config)?;
    let request = build_request(&text, context_id.as_deref(), style.as_deref());
    let events = EventQueue::new();

    if stream {
        let handle = executor.spawn(request, Arc::new(events.clone()));
        let mut events = Box::pin(events.stream());
        while let Some(event) = events.next().await {
            println!("{}", serde_json::to_string(&event)?);
        }
        handle.await.context("request task failed")??;
    } else {
        executor.execute(request, &events).await?;
        let answer = events
            .collect_final()
            .await
            .context("no response was produced")?;
        println!("{}", answer);
    }

    Ok(())
}

/// One text part per argument; the executor joins them with single spaces.
fn build_request(
    text: &[String],
    context_id: Option<&str>,
    style: Option<&str>,
) -> InboundRequest {
    let parts = text.iter().map(|t| Part::text(t)).collect();
    let message = Message::from_parts(Role::User, parts);
    InboundRequest::new(message, ExecuteParams::new(context_id, style))
}
