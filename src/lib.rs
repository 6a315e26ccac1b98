// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod age;
pub mod config;
pub mod dispatch;
pub mod fingerprint;
pub mod hashtags;
pub mod merge;
pub mod normalize;
pub mod run;
pub mod sink;
pub mod source;
pub mod store;

// ---- Re-exports for stable public API ----
pub use crate::config::RunConfig;
pub use crate::run::{run_once, RunSummary, SourcePlan};
pub use crate::sink::{Sink, SinkError, TelegramSink};
pub use crate::source::{CandidateItem, SourceAdapter};
pub use crate::store::{SeenStore, StoreError};
