//! Task executor: one inbound request in, one terminal event out.

use std::sync::Arc;
use std::time::Instant;

use tokio::task::{JoinHandle, JoinSet};
use tracing::{info_span, Instrument};

use crate::bus::{EventSink, InboundRequest, RequestBus, ResponseEvent};
use crate::config::Config;
use crate::conversation::{
    BoundedConversationStore, ConversationId, ConversationStore, InMemoryConversationStore,
    Message,
};
use crate::error::{RelayError, Result};
use crate::log_component;
use crate::skills::{
    DocumentSummarizer, ExecutionRequest, LanguageModelProxy, SkillRouter, StyleTransformer,
};
use crate::utils::string::preview;

/// Orchestrates requests: records, dispatches, emits.
///
/// Cloning is cheap; clones share the store and router.
#[derive(Clone)]
pub struct TaskExecutor {
    store: Arc<dyn ConversationStore>,
    router: Arc<SkillRouter>,
}

impl std::fmt::Debug for TaskExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskExecutor")
            .field("router", &self.router)
            .finish_non_exhaustive()
    }
}

impl TaskExecutor {
    /// Create an executor over a store and a router.
    pub fn new(store: Arc<dyn ConversationStore>, router: SkillRouter) -> Self {
        Self {
            store,
            router: Arc::new(router),
        }
    }

    /// Wire an executor from configuration.
    ///
    /// The history store is bounded only when a retention limit is set.
    /// Without an API key the executor still works; completion and
    /// summarization requests answer with a contained failure.
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let proxy = LanguageModelProxy::from_config(&cfg.provider)?;
        let summarizer = DocumentSummarizer::from_config(&cfg.summarizer, proxy.clone())?;
        let router = SkillRouter::new(
            cfg.dispatch.mode,
            StyleTransformer::from_config(&cfg.style),
            proxy,
            summarizer,
        )
        .with_style_config(&cfg.style);

        let store: Arc<dyn ConversationStore> = if cfg.history.is_bounded() {
            Arc::new(BoundedConversationStore::from_config(
                InMemoryConversationStore::new(),
                &cfg.history,
            ))
        } else {
            Arc::new(InMemoryConversationStore::new())
        };

        Ok(Self::new(store, router))
    }

    /// The router requests are dispatched through.
    pub fn router(&self) -> &SkillRouter {
        &self.router
    }

    /// Recorded history of a conversation.
    pub async fn history_of(&self, id: &ConversationId) -> Vec<Message> {
        self.store.history_of(id).await
    }

    /// Run one request to completion and emit exactly one terminal event.
    ///
    /// Skill failures never surface here: they become a failed event whose
    /// text is `Error: <description>`.
    ///
    /// # Errors
    /// Only when the sink rejects the event (`RelayError::BusClosed`).
    pub async fn execute(&self, request: InboundRequest, sink: &dyn EventSink) -> Result<()> {
        let span = info_span!(
            "request",
            request_id = %request.request_id,
            conversation_id = request
                .params
                .conversation_id
                .as_ref()
                .map(ConversationId::as_str)
                .unwrap_or("-"),
        );
        self.execute_inner(request, sink).instrument(span).await
    }

    async fn execute_inner(&self, request: InboundRequest, sink: &dyn EventSink) -> Result<()> {
        let start = Instant::now();
        log_component!(
            info,
            "executor",
            "request received",
            has_conversation = request.params.conversation_id.is_some(),
            part_count = request.message.parts.len()
        );

        // Write before process: a crash after this point loses the answer,
        // never the record.
        if let Some(id) = &request.params.conversation_id {
            self.store.append(id, request.message.clone()).await;
        }

        let exec = ExecutionRequest {
            text: request.message.flatten_text(),
            style: request.params.style.clone(),
        };

        log_component!(
            debug,
            "executor",
            "dispatching",
            mode = self.router.mode().as_str(),
            style = exec.style.as_deref().unwrap_or("-"),
            text = preview(&exec.text, 80)
        );

        let (skill, result) = self.router.dispatch(&exec).await;
        let latency_ms = start.elapsed().as_millis() as u64;

        let event = match result {
            Ok(text) => {
                log_component!(
                    info,
                    "executor",
                    "request completed",
                    skill = skill.skill_id(),
                    latency_ms = latency_ms,
                    response_len = text.len()
                );
                ResponseEvent::completed(&request, skill, text)
            }
            Err(e) => {
                let contained = e.is_contained();
                log_component!(
                    warn,
                    "executor",
                    "skill failed",
                    skill = skill.skill_id(),
                    kind = e.kind().as_str(),
                    contained = contained,
                    latency_ms = latency_ms,
                    error = tracing::field::display(&e)
                );
                let text = format!("Error: {}", e);
                ResponseEvent::failed(&request, Some(skill), e.kind(), text)
            }
        };

        sink.emit(event).await?;
        log_component!(debug, "executor", "event emitted");
        Ok(())
    }

    /// Run one request as an independent task.
    pub fn spawn(
        &self,
        request: InboundRequest,
        sink: Arc<dyn EventSink>,
    ) -> JoinHandle<Result<()>> {
        let executor = self.clone();
        tokio::spawn(async move { executor.execute(request, sink.as_ref()).await })
    }

    /// Consume requests from `bus` until it shuts down, one task per request.
    ///
    /// Events go to the bus's event queue. Requests still queued at shutdown
    /// are run too; returns after every request has finished.
    pub async fn serve(&self, bus: &RequestBus) -> Result<()> {
        let sink: Arc<dyn EventSink> = Arc::new(bus.events());
        let mut tasks = JoinSet::new();
        log_component!(info, "executor", "serving requests");

        loop {
            tokio::select! {
                request = bus.consume_request() => {
                    let Some(request) = request else { break };
                    let executor = self.clone();
                    let sink = Arc::clone(&sink);
                    tasks.spawn(async move { executor.execute(request, sink.as_ref()).await });
                }
                Some(done) = tasks.join_next(), if !tasks.is_empty() => log_task_result(done),
            }
        }

        // Requests accepted before shutdown still get their event.
        let pending = bus.drain_pending().await;
        if !pending.is_empty() {
            log_component!(
                info,
                "executor",
                "running requests queued at shutdown",
                count = pending.len()
            );
        }
        for request in pending {
            let executor = self.clone();
            let sink = Arc::clone(&sink);
            tasks.spawn(async move { executor.execute(request, sink.as_ref()).await });
        }

        while let Some(done) = tasks.join_next().await {
            log_task_result(done);
        }
        log_component!(info, "executor", "request bus shut down");
        Ok(())
    }

    /// Mid-flight cancellation is not supported; always fails.
    ///
    /// # Errors
    /// Always `RelayError::Unsupported`.
    pub async fn cancel(&self, request_id: &str) -> Result<()> {
        log_component!(
            debug,
            "executor",
            "cancellation refused",
            request_id = request_id
        );
        Err(RelayError::Unsupported("cancel not supported".to_string()))
    }

    /// Whether [`TaskExecutor::cancel`] can ever succeed.
    pub fn supports_cancellation(&self) -> bool {
        false
    }
}

fn log_task_result(done: std::result::Result<Result<()>, tokio::task::JoinError>) {
    match done {
        Ok(Ok(())) => {}
        Ok(Err(e)) => log_component!(
            error,
            "executor",
            "failed to emit event",
            error = tracing::field::display(&e)
        ),
        Err(e) => log_component!(
            error,
            "executor",
            "request task panicked",
            error = tracing::field::display(&e)
        ),
    }
}
