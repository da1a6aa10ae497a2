//! Stream formatting command
//!
//! Reads JSON-line events one at a time and writes formatted lines to
//! stdout as soon as each event is handled.

use eyre::{Context, Result};
use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use crate::event::Event;
use crate::formatter::EventFormatter;

/// Counters for one formatting run
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunReport {
    pub events: u64,
    pub skipped_lines: u64,
    pub lines_written: u64,
}

pub fn run(input: Option<&Path>) -> Result<()> {
    let stdout = io::stdout().lock();

    let report = match input {
        Some(path) => {
            let file = File::open(path).context(format!("Failed to open event file {}", path.display()))?;
            format_stream(BufReader::new(file), stdout)?
        }
        None => format_stream(io::stdin().lock(), stdout)?,
    };

    log::info!(
        "Formatted {} events into {} lines ({} undecodable lines skipped)",
        report.events,
        report.lines_written,
        report.skipped_lines
    );
    Ok(())
}

/// Format every event from `reader` into `writer`
pub fn format_stream<R: BufRead, W: Write>(mut reader: R, writer: W) -> Result<RunReport> {
    let mut formatter = EventFormatter::new(writer);
    let mut report = RunReport::default();

    let mut buf = Vec::new();
    let mut line_number = 0u64;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).context("Failed to read event input")? == 0 {
            break;
        }
        line_number += 1;

        // Invalid UTF-8 is replaced rather than dropped; the JSON may still decode
        let line = String::from_utf8_lossy(&buf);
        if let Cow::Owned(_) = line {
            log::warn!("Line {} is not valid UTF-8, decoding lossily", line_number);
        }

        let event = match Event::from_json_line(&line) {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(e) => {
                log::warn!("Skipping undecodable event on line {}: {}", line_number, e);
                report.skipped_lines += 1;
                continue;
            }
        };

        formatter
            .handle(&event)
            .context(format!("Failed to write output for {} event", event.kind()))?;
        report.events += 1;
    }

    log::debug!("Last stage entered: {:?}", formatter.current_stage());
    report.lines_written = formatter.lines_written();
    Ok(report)
}
