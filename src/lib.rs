//! SkillRelay - agent task execution and skill routing engine
//!
//! An inbound conversational message is recorded under its conversation,
//! routed to one of three skills (text styling, language-model completion,
//! URL document summarization) and answered with exactly one response event.

pub mod utils;

pub mod agent;
pub mod bus;
pub mod config;
pub mod conversation;
pub mod error;
pub mod providers;
pub mod skills;

#[cfg(test)]
mod test_support;

pub use agent::TaskExecutor;
pub use bus::{EventQueue, EventSink, ExecuteParams, InboundRequest, RequestBus, ResponseEvent};
pub use config::Config;
pub use error::{ErrorKind, ProviderError, RelayError, Result};
