//! Agent module - request orchestration
//!
//! The [`TaskExecutor`] is the entry point for inbound work. For every
//! request it:
//!
//! - records the message under its conversation (when one is given)
//! - flattens the text parts into a single execution request
//! - dispatches through the [`SkillRouter`](crate::skills::SkillRouter)
//! - emits exactly one terminal event, turning skill failures into text
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌─────────────┐
//! │ RequestBus  │────>│ TaskExecutor │────>│ SkillRouter │
//! │  (inbound)  │     │              │     │             │
//! └─────────────┘     └──────────────┘     └─────────────┘
//!                            │                   │
//!                            ▼                   ▼
//!                     ┌──────────────┐    ┌──────────────┐
//!                     │ Conversation │    │ style / llm  │
//!                     │    Store     │    │ / summarize  │
//!                     └──────────────┘    └──────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use skillrelay::agent::TaskExecutor;
//! use skillrelay::bus::{EventQueue, ExecuteParams, InboundRequest};
//! use skillrelay::config::Config;
//!
//! #[tokio::main]
//! async fn main() {
//!     let executor = TaskExecutor::from_config(&Config::default()).unwrap();
//!     let events = EventQueue::new();
//!
//!     let params = ExecuteParams::new(Some("ctx-1"), Some("uppercase"));
//!     let request = InboundRequest::text("bonjour", params);
//!     executor.execute(request, &events).await.unwrap();
//!
//!     assert_eq!(events.collect_final().await.as_deref(), Some("BONJOUR"));
//! }
//! ```

mod executor;

pub use crate::bus::{ExecuteParams, InboundRequest};
pub use executor::TaskExecutor;
