//! Request and event bus
//!
//! This module carries work into the executor and results back out.
//! [`RequestBus`] holds an inbound queue of [`InboundRequest`]s and an
//! outbound [`EventQueue`] of [`ResponseEvent`]s.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌──────────────┐
//! │  Transport  │────>│ RequestBus  │────>│ TaskExecutor │
//! │             │     │  (inbound)  │     │              │
//! └─────────────┘     └─────────────┘     └──────────────┘
//!                                                │
//!                                                │ emit
//!                                                ▼
//! ┌─────────────┐     ┌─────────────┐
//! │  Consumer   │<────│ EventQueue  │
//! │ batch/stream│     │ (outbound)  │
//! └─────────────┘     └─────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use skillrelay::bus::{EventQueue, EventSink, ExecuteParams, InboundRequest, ResponseEvent};
//! use skillrelay::skills::SkillKind;
//!
//! #[tokio::main]
//! async fn main() {
//!     let queue = EventQueue::new();
//!     let request = InboundRequest::text("hi", ExecuteParams::default());
//!
//!     queue
//!         .emit(ResponseEvent::completed(&request, SkillKind::Completion, "hello".into()))
//!         .await
//!         .unwrap();
//!
//!     assert_eq!(queue.collect_final().await.as_deref(), Some("hello"));
//! }
//! ```

pub mod message;

pub use message::{ExecuteParams, InboundRequest, Outcome, ResponseEvent};

use async_trait::async_trait;
use futures::Stream;
use std::sync::Arc;
use tokio::sync::{mpsc, watch, Mutex};

use crate::error::{RelayError, Result};

/// Default buffer size for bus channels
const DEFAULT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Event sink
// ============================================================================

/// Destination for response events.
///
/// The executor emits exactly one terminal event per request; turning events
/// into a single answer or a chunked stream is the consumer's business.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Publish one event.
    ///
    /// # Errors
    /// Returns `RelayError::BusClosed` if nobody can receive the event.
    async fn emit(&self, event: ResponseEvent) -> Result<()>;
}

/// Bounded MPSC queue of response events.
///
/// Clones share the same channel. Consumers read it either in batch
/// ([`EventQueue::collect_final`]) or incrementally ([`EventQueue::stream`]).
#[derive(Debug, Clone)]
pub struct EventQueue {
    tx: mpsc::Sender<ResponseEvent>,
    rx: Arc<Mutex<mpsc::Receiver<ResponseEvent>>>,
}

impl EventQueue {
    /// Create a queue with the default buffer size.
    pub fn new() -> Self {
        Self::with_buffer_size(DEFAULT_BUFFER_SIZE)
    }

    /// Create a queue holding at most `buffer_size` undelivered events.
    pub fn with_buffer_size(buffer_size: usize) -> Self {
        let (tx, rx) = mpsc::channel(buffer_size);
        Self {
            tx,
            rx: Arc::new(Mutex::new(rx)),
        }
    }

    /// Receive the next event.
    ///
    /// # Returns
    /// - `Some(ResponseEvent)` if an event is available
    /// - `None` if every sender has been dropped and the queue is drained
    pub async fn next_event(&self) -> Option<ResponseEvent> {
        self.rx.lock().await.recv().await
    }

    /// Batch consumption: wait for the first terminal event and return its
    /// text. Non-terminal events before it are skipped.
    pub async fn collect_final(&self) -> Option<String> {
        while let Some(event) = self.next_event().await {
            if event.is_final {
                return Some(event.text);
            }
        }
        None
    }

    /// Incremental consumption: a stream of events that ends once every
    /// other clone of this queue (and thus every sender) is gone.
    ///
    /// Consumes `self` so this handle's own sender does not keep the stream
    /// open.
    pub fn stream(self) -> impl Stream<Item = ResponseEvent> {
        let Self { tx, rx } = self;
        drop(tx);
        futures::stream::unfold(rx, |rx| async move {
            let next = rx.lock().await.recv().await;
            next.map(|event| (event, rx))
        })
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventSink for EventQueue {
    async fn emit(&self, event: ResponseEvent) -> Result<()> {
        self.tx.send(event).await.map_err(|_| RelayError::BusClosed)
    }
}

// ============================================================================
// Request bus
// ============================================================================

/// Inbound request queue paired with the outbound event queue.
///
/// Clones share the same channels. [`RequestBus::shutdown`] makes every
/// pending and future [`RequestBus::consume_request`] return `None`.
#[derive(Debug, Clone)]
pub struct RequestBus {
    inbound_tx: mpsc::Sender<InboundRequest>,
    inbound_rx: Arc<Mutex<mpsc::Receiver<InboundRequest>>>,
    events: EventQueue,
    shutdown_tx: Arc<watch::Sender<bool>>,
}

impl RequestBus {
    /// Create a bus with default buffer sizes.
    pub fn new() -> Self {
        Self::with_buffer_size(DEFAULT_BUFFER_SIZE)
    }

    /// Create a bus with a custom buffer size for both directions.
    pub fn with_buffer_size(buffer_size: usize) -> Self {
        let (inbound_tx, inbound_rx) = mpsc::channel(buffer_size);
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            inbound_tx,
            inbound_rx: Arc::new(Mutex::new(inbound_rx)),
            events: EventQueue::with_buffer_size(buffer_size),
            shutdown_tx: Arc::new(shutdown_tx),
        }
    }

    /// Publish an inbound request.
    ///
    /// # Errors
    /// Returns `RelayError::BusClosed` if the bus is shut down or the
    /// receiver has been dropped.
    pub async fn publish_request(&self, request: InboundRequest) -> Result<()> {
        if self.is_shut_down() {
            return Err(RelayError::BusClosed);
        }
        self.inbound_tx
            .send(request)
            .await
            .map_err(|_| RelayError::BusClosed)
    }

    /// Receive the next inbound request, or `None` once the bus is shut down.
    pub async fn consume_request(&self) -> Option<InboundRequest> {
        let mut shutdown = self.shutdown_tx.subscribe();
        if *shutdown.borrow() {
            return None;
        }
        let mut rx = self.inbound_rx.lock().await;
        tokio::select! {
            biased;
            _ = shutdown.wait_for(|stopped| *stopped) => None,
            request = rx.recv() => request,
        }
    }

    /// Close the inbound channel and take every request still queued.
    ///
    /// Publishing fails with `BusClosed` afterwards, so each request that
    /// was accepted is either returned here or already consumed.
    pub async fn drain_pending(&self) -> Vec<InboundRequest> {
        let mut rx = self.inbound_rx.lock().await;
        rx.close();
        let mut pending = Vec::new();
        while let Some(request) = rx.recv().await {
            pending.push(request);
        }
        pending
    }

    /// Returns a clone of the inbound request sender.
    pub fn request_sender(&self) -> mpsc::Sender<InboundRequest> {
        self.inbound_tx.clone()
    }

    /// The outbound event queue shared by this bus.
    pub fn events(&self) -> EventQueue {
        self.events.clone()
    }

    /// Stop request consumption.
    pub fn shutdown(&self) {
        self.shutdown_tx.send_replace(true);
    }

    /// Whether [`RequestBus::shutdown`] has been called.
    pub fn is_shut_down(&self) -> bool {
        *self.shutdown_tx.borrow()
    }
}

impl Default for RequestBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::skills::SkillKind;
    use futures::StreamExt;
    use std::time::Duration;

    fn request(text: &str) -> InboundRequest {
        InboundRequest::text(text, ExecuteParams::default())
    }

    fn progress(request: &InboundRequest, text: &str) -> ResponseEvent {
        let mut event = ResponseEvent::completed(request, SkillKind::Completion, text.into());
        event.is_final = false;
        event
    }

    #[tokio::test]
    async fn test_event_queue_roundtrip() {
        let queue = EventQueue::new();
        let req = request("hi");
        queue
            .emit(ResponseEvent::completed(&req, SkillKind::Completion, "yo".into()))
            .await
            .unwrap();

        let event = queue.next_event().await.unwrap();
        assert_eq!(event.text, "yo");
        assert_eq!(event.request_id, req.request_id);
    }

    #[tokio::test]
    async fn test_collect_final_skips_progress_events() {
        let queue = EventQueue::new();
        let req = request("hi");
        queue.emit(progress(&req, "partial")).await.unwrap();
        queue
            .emit(ResponseEvent::completed(&req, SkillKind::Completion, "done".into()))
            .await
            .unwrap();

        assert_eq!(queue.collect_final().await.as_deref(), Some("done"));
    }

    #[tokio::test]
    async fn test_stream_ends_when_senders_drop() {
        let queue = EventQueue::new();
        let producer = queue.clone();
        let req = request("hi");

        tokio::spawn(async move {
            for text in ["a", "b"] {
                producer.emit(progress(&req, text)).await.unwrap();
            }
            producer
                .emit(ResponseEvent::failed(
                    &req,
                    None,
                    ErrorKind::Upstream,
                    "Error: c".into(),
                ))
                .await
                .unwrap();
        });

        let texts: Vec<String> = queue.stream().map(|e| e.text).collect().await;
        assert_eq!(texts, vec!["a", "b", "Error: c"]);
    }

    #[tokio::test]
    async fn test_request_bus_flow() {
        let bus = RequestBus::new();
        for i in 0..3 {
            bus.publish_request(request(&format!("msg {}", i)))
                .await
                .unwrap();
        }
        for i in 0..3 {
            let received = bus.consume_request().await.unwrap();
            assert_eq!(received.message.flatten_text(), format!("msg {}", i));
        }
    }

    #[tokio::test]
    async fn test_shutdown_wakes_blocked_consumer() {
        let bus = RequestBus::new();
        let consumer = {
            let bus = bus.clone();
            tokio::spawn(async move { bus.consume_request().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        bus.shutdown();

        let received = tokio::time::timeout(Duration::from_secs(1), consumer)
            .await
            .unwrap()
            .unwrap();
        assert!(received.is_none());
        assert!(bus.is_shut_down());
        assert!(matches!(
            bus.publish_request(request("late")).await,
            Err(RelayError::BusClosed)
        ));
    }

    #[tokio::test]
    async fn test_drain_pending_after_shutdown() {
        let bus = RequestBus::new();
        for i in 0..3 {
            bus.publish_request(request(&format!("msg {}", i)))
                .await
                .unwrap();
        }
        bus.shutdown();
        assert!(bus.consume_request().await.is_none());

        let pending = bus.drain_pending().await;
        let texts: Vec<String> = pending.iter().map(|r| r.message.flatten_text()).collect();
        assert_eq!(texts, vec!["msg 0", "msg 1", "msg 2"]);

        assert!(bus
            .request_sender()
            .send(request("late"))
            .await
            .is_err());
        assert!(bus.drain_pending().await.is_empty());
    }

    #[tokio::test]
    async fn test_request_sender_clone() {
        let bus = RequestBus::default();
        let sender = bus.request_sender();
        sender.send(request("from sender")).await.unwrap();
        let received = bus.consume_request().await.unwrap();
        assert_eq!(received.message.flatten_text(), "from sender");
    }
}
