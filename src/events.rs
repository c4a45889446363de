//! Progress channel towards the hosting application.
//!
//! Events are only ever emitted from the coordinating task of the
//! orchestrator; fetch workers hand their results back over a channel instead
//! of emitting themselves. Emitters therefore see events one at a time, in
//! order, and need no locking of their own.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::data_models::{PageResult, now_rfc3339};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ProgressEvent {
    Status(StatusData),
    Citation(CitationData),
    Message(MessageData),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StatusData {
    pub description: String,
    pub done: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CitationData {
    pub document: Vec<String>,
    pub metadata: Vec<CitationMetadata>,
    pub source: CitationSource,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CitationMetadata {
    pub date_accessed: String,
    pub source: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CitationSource {
    pub name: String,
    pub url: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MessageData {
    pub content: String,
}

impl ProgressEvent {
    pub fn status(description: impl Into<String>, done: bool) -> Self {
        ProgressEvent::Status(StatusData {
            description: description.into(),
            done,
            hidden: false,
            status: None,
        })
    }

    pub fn status_with_label(
        description: impl Into<String>,
        done: bool,
        label: impl Into<String>,
    ) -> Self {
        ProgressEvent::Status(StatusData {
            description: description.into(),
            done,
            hidden: false,
            status: Some(label.into()),
        })
    }

    pub fn citation(page: &PageResult) -> Self {
        ProgressEvent::Citation(CitationData {
            document: vec![page.content.clone()],
            metadata: vec![CitationMetadata {
                date_accessed: now_rfc3339(),
                source: page.url.clone(),
            }],
            source: CitationSource {
                name: page.title.clone(),
                url: page.url.clone(),
            },
        })
    }

    pub fn message(content: impl Into<String>) -> Self {
        ProgressEvent::Message(MessageData {
            content: content.into(),
        })
    }
}

pub trait EventEmitter: Send + Sync {
    fn emit(&self, event: ProgressEvent);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEmitter;

impl EventEmitter for NoopEmitter {
    fn emit(&self, _event: ProgressEvent) {}
}

/// Forwards events to a tokio channel. A closed receiver is not an error.
#[derive(Debug, Clone)]
pub struct ChannelEmitter {
    tx: mpsc::UnboundedSender<ProgressEvent>,
}

impl ChannelEmitter {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl EventEmitter for ChannelEmitter {
    fn emit(&self, event: ProgressEvent) {
        if self.tx.send(event).is_err() {
            log::debug!("progress receiver dropped, event discarded");
        }
    }
}

/// Writes every event as a JSON line through the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEmitter;

impl EventEmitter for LogEmitter {
    fn emit(&self, event: ProgressEvent) {
        match serde_json::to_string(&event) {
            Ok(line) => log::info!(target: "websift::events", "{line}"),
            Err(e) => log::warn!("could not serialize progress event: {:#}", e),
        }
    }
}

/// Emits through an optional emitter; an absent one swallows the event.
pub(crate) fn emit(emitter: Option<&dyn EventEmitter>, event: ProgressEvent) {
    if let Some(emitter) = emitter {
        emitter.emit(event);
    }
}
