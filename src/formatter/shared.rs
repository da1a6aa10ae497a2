//! Formatter shared between threads

use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use super::EventFormatter;
use crate::event::Event;

/// Serializes event handling so a stage header block is never split and
/// lines keep the order in which events were handled.
#[allow(dead_code)] // for engines that deliver events from several threads
pub struct SharedFormatter<W: Write> {
    inner: Mutex<EventFormatter<W>>,
}

#[allow(dead_code)]
impl<W: Write> SharedFormatter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            inner: Mutex::new(EventFormatter::new(writer)),
        }
    }

    pub fn handle(&self, event: &Event) -> io::Result<()> {
        // A panic mid-event leaves at worst a partial line; keep formatting
        let mut formatter = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        formatter.handle(event)
    }

    pub fn into_inner(self) -> W {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner).into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::stages::BORDER;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_headers_are_not_interleaved() {
        let shared = Arc::new(SharedFormatter::new(Vec::new()));
        let roles = ["k3s", "helm", "istio", "mariadb"];

        let handles: Vec<_> = roles
            .iter()
            .map(|role| {
                let shared = Arc::clone(&shared);
                let role = role.to_string();
                thread::spawn(move || {
                    for _ in 0..25 {
                        shared.handle(&Event::TaskStart { stage: Some(role.clone()) }).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let shared = Arc::try_unwrap(shared).ok().unwrap();
        let output = String::from_utf8(shared.into_inner()).unwrap();
        let lines: Vec<_> = output.lines().collect();

        assert!(!lines.is_empty());
        assert_eq!(lines.len() % 3, 0);
        for block in lines.chunks(3) {
            assert_eq!(block[0], BORDER);
            assert!(block[1].starts_with("║  ") && block[1].ends_with("  ║"));
            assert_eq!(block[2], BORDER);
        }
    }
}
