//! Event → log line formatting
//!
//! Turns lifecycle events into `[INFO]`/`[WARN]`/`[ERROR]` lines and
//! bordered stage headers. Downstream parsers match these lines
//! literally, so the shapes here must not drift.

use std::io::{self, Write};

use crate::event::{Event, HostStats, Message, TaskResult};

pub mod shared;
pub mod sink;
pub mod stages;

pub use sink::LineSink;

const FACT_GATHERING_TASKS: [&str; 3] = ["gathering facts", "gather facts", "setup"];
const ASSERT_DEFAULT_MSG: &str = "All assertions passed";
const UNKNOWN_ERROR: &str = "unknown error";

fn is_action(action: &str, short: &str) -> bool {
    action == short || action.strip_prefix("ansible.builtin.") == Some(short)
}

/// Formats a run's events; create one per run
pub struct EventFormatter<W: Write> {
    sink: LineSink<W>,
    current_stage: Option<String>,
}

impl<W: Write> EventFormatter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            sink: LineSink::new(writer),
            current_stage: None,
        }
    }

    /// Stage most recently entered, mapped or not
    pub fn current_stage(&self) -> Option<&str> {
        self.current_stage.as_deref()
    }

    pub fn lines_written(&self) -> u64 {
        self.sink.lines_written()
    }

    pub fn into_inner(self) -> W {
        self.sink.into_inner()
    }

    pub fn handle(&mut self, event: &Event) -> io::Result<()> {
        log::trace!("Handling event: {}", event.kind());
        match event {
            Event::PlayStart | Event::TaskSkipped => Ok(()),
            Event::TaskStart { stage } | Event::HandlerTaskStart { stage } => self.on_task_start(stage.as_deref()),
            Event::TaskOk { name, action, result } => self.on_task_ok(name, action, result),
            Event::TaskFailed {
                name,
                result,
                ignore_errors,
            } => self.on_task_failed(name, result, *ignore_errors),
            Event::HostUnreachable { result } => self.on_host_unreachable(result),
            Event::RunSummary { stats } => self.on_run_summary(stats.iter()),
        }
    }

    pub fn on_task_start(&mut self, stage: Option<&str>) -> io::Result<()> {
        let Some(stage) = stage else {
            return Ok(());
        };
        if stage.is_empty() || self.current_stage.as_deref() == Some(stage) {
            return Ok(());
        }

        log::debug!("Stage transition: {:?} -> {}", self.current_stage, stage);
        self.current_stage = Some(stage.to_string());
        self.emit_stage_header(stage)
    }

    fn emit_stage_header(&mut self, stage: &str) -> io::Result<()> {
        let Some(title) = stages::stage_title(stage) else {
            log::debug!("No stage title for role '{}'", stage);
            return Ok(());
        };
        for line in stages::header_lines(title) {
            self.sink.emit(&line)?;
        }
        Ok(())
    }

    pub fn on_task_ok(&mut self, name: &str, action: &str, result: &TaskResult) -> io::Result<()> {
        if is_action(action, "debug") {
            return self.emit_debug(&result.msg);
        }

        if is_action(action, "assert") {
            return match result.msg.as_text() {
                Some(msg) if msg != ASSERT_DEFAULT_MSG => self.info(&msg),
                _ => self.info(&format!("{} ... ok", name)),
            };
        }

        if FACT_GATHERING_TASKS.contains(&name.to_lowercase().as_str()) {
            return Ok(());
        }

        let outcome = if result.changed { "changed" } else { "ok" };
        self.info(&format!("{} ... {}", name, outcome))
    }

    fn emit_debug(&mut self, msg: &Message) -> io::Result<()> {
        match msg {
            Message::Empty => Ok(()),
            Message::Lines(lines) => {
                for line in lines {
                    self.info(line)?;
                }
                Ok(())
            }
            Message::Text(text) => {
                for line in text.split('\n').filter(|line| !line.trim().is_empty()) {
                    self.info(line)?;
                }
                Ok(())
            }
        }
    }

    pub fn on_task_failed(&mut self, name: &str, result: &TaskResult, ignored: bool) -> io::Result<()> {
        let msg = result.msg.as_text();
        let detail = msg
            .as_deref()
            .or(result.stderr.as_deref().filter(|stderr| !stderr.is_empty()))
            .unwrap_or(UNKNOWN_ERROR);

        if ignored {
            self.sink.emit(&format!("[WARN] {} ... FAILED (ignored): {}", name, detail))
        } else {
            self.sink.emit(&format!("[ERROR] {} ... FAILED: {}", name, detail))
        }
    }

    pub fn on_host_unreachable(&mut self, result: &TaskResult) -> io::Result<()> {
        let msg = result.msg.as_text().unwrap_or_default();
        self.sink.emit(&format!("[ERROR] Target unreachable: {}", msg))
    }

    /// Emits one summary line per host; callers pass hosts already sorted
    pub fn on_run_summary<'a>(&mut self, stats: impl IntoIterator<Item = (&'a String, &'a HostStats)>) -> io::Result<()> {
        for (host, s) in stats {
            log::info!("Run summary for {}: {:?}", host, s);
            if s.has_failed() {
                self.sink.emit(&format!(
                    "[ERROR] Deployment failed: {} failures, {} unreachable",
                    s.failures, s.unreachable
                ))?;
            } else {
                self.info(&format!("Deployment completed: {} ok, {} changed", s.ok, s.changed))?;
            }
        }
        Ok(())
    }

    fn info(&mut self, text: &str) -> io::Result<()> {
        self.sink.emit(&format!("[INFO] {}", text))
    }
}
