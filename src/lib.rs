pub mod analyzer;
pub mod config;
pub mod data_models;
pub mod errors;
pub mod events;
pub mod fetcher;
pub mod orchestrator;
pub mod search;
pub mod summarizer;

pub use config::Config;
pub use data_models::{PageOutcome, PageResult, ResponseEnvelope, SearchOutcome};
pub use events::{ChannelEmitter, EventEmitter, LogEmitter, NoopEmitter, ProgressEvent};
pub use orchestrator::Orchestrator;
