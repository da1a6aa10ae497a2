//! Lifecycle events emitted by the automation engine
//!
//! Events arrive as one JSON object per line, tagged by `event`.
//! Payloads are normalized here so the formatter never inspects raw JSON.

use serde::Deserialize;
use std::collections::BTreeMap;

pub mod lenient;
pub mod message;

pub use message::Message;

/// A single lifecycle event
///
/// Every field is optional on the wire and tolerates the wrong type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    PlayStart,
    TaskStart {
        #[serde(default, deserialize_with = "lenient::string_or_none")]
        stage: Option<String>,
    },
    HandlerTaskStart {
        #[serde(default, deserialize_with = "lenient::string_or_none")]
        stage: Option<String>,
    },
    TaskOk {
        #[serde(default, deserialize_with = "lenient::string_or_empty")]
        name: String,
        #[serde(default, deserialize_with = "lenient::string_or_empty")]
        action: String,
        #[serde(default, deserialize_with = "lenient::or_default")]
        result: TaskResult,
    },
    TaskFailed {
        #[serde(default, deserialize_with = "lenient::string_or_empty")]
        name: String,
        #[serde(default, deserialize_with = "lenient::or_default")]
        result: TaskResult,
        #[serde(default, deserialize_with = "lenient::bool_or_false")]
        ignore_errors: bool,
    },
    TaskSkipped,
    HostUnreachable {
        #[serde(default, deserialize_with = "lenient::or_default")]
        result: TaskResult,
    },
    RunSummary {
        /// Keyed by host; BTreeMap keeps hosts in lexicographic order
        #[serde(default, deserialize_with = "lenient::host_stats")]
        stats: BTreeMap<String, HostStats>,
    },
}

impl Event {
    /// Decode one input line. Blank lines decode to `None`.
    pub fn from_json_line(line: &str) -> Result<Option<Self>, serde_json::Error> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        serde_json::from_str(trimmed).map(Some)
    }

    /// Wire name of the event, for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Event::PlayStart => "play_start",
            Event::TaskStart { .. } => "task_start",
            Event::HandlerTaskStart { .. } => "handler_task_start",
            Event::TaskOk { .. } => "task_ok",
            Event::TaskFailed { .. } => "task_failed",
            Event::TaskSkipped => "task_skipped",
            Event::HostUnreachable { .. } => "host_unreachable",
            Event::RunSummary { .. } => "run_summary",
        }
    }
}

/// Result payload of a task
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TaskResult {
    pub msg: Message,
    #[serde(deserialize_with = "lenient::text_or_none")]
    pub stderr: Option<String>,
    #[serde(deserialize_with = "lenient::bool_or_false")]
    pub changed: bool,
}

impl TaskResult {
    #[cfg(test)]
    pub fn with_msg(msg: impl Into<Message>) -> Self {
        Self {
            msg: msg.into(),
            ..Self::default()
        }
    }
}

/// Per-host counters from the final run summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HostStats {
    #[serde(deserialize_with = "lenient::count_or_zero")]
    pub ok: u64,
    #[serde(deserialize_with = "lenient::count_or_zero")]
    pub changed: u64,
    #[serde(deserialize_with = "lenient::count_or_zero")]
    pub failures: u64,
    #[serde(deserialize_with = "lenient::count_or_zero")]
    pub unreachable: u64,
}

impl HostStats {
    pub fn has_failed(&self) -> bool {
        self.failures > 0 || self.unreachable > 0
    }
}
