//! Skills - the capabilities a request can be dispatched to.
//!
//! Three built-in skills exist: text styling (`echo-plus`), language-model
//! completion (`llm-proxy`) and URL document summarization (`doc-summary`).
//! [`SkillRouter`] picks one per request according to the deployment's
//! [`DispatchMode`].

pub mod completion;
pub mod registry;
pub mod router;
pub mod style;
pub mod summarize;
mod types;

pub use completion::LanguageModelProxy;
pub use registry::SkillRegistry;
pub use router::{is_document_url, select, DispatchMode, SkillRouter};
pub use style::{Style, StyleTransformer};
pub use summarize::{
    build_prompt, truncate_document, DocumentFetcher, DocumentSummarizer, HttpFetcher,
};
pub use types::{ExecutionRequest, SkillDescriptor, SkillKind};
