//! Streams the transcript to a line-oriented terminal.
//!
//! Output is append-only, so the printer remembers how much of each message
//! it has already written and only emits the difference. A transcript reset
//! clears the screen and starts over.

use std::collections::HashMap;
use std::io::{self, Write};

use nexus_terminal::{MessageId, MessageKind, MessageLog, RevealState};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

#[derive(Default)]
pub struct TranscriptPrinter {
    generation: u64,
    /// Bytes of each message's visible text already written.
    printed: HashMap<MessageId, usize>,
    /// Message whose line has not been terminated yet.
    open_line: Option<MessageId>,
}

impl TranscriptPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, log: &MessageLog, out: &mut impl Write) -> io::Result<()> {
        if log.generation() != self.generation {
            out.write_all(CLEAR_SCREEN.as_bytes())?;
            self.generation = log.generation();
            self.printed.clear();
            self.open_line = None;
        }

        for msg in log.messages() {
            let id = msg.id();
            // The user already sees what they typed.
            if msg.kind() == MessageKind::User {
                self.printed.entry(id).or_insert(msg.text().len());
                continue;
            }
            if msg.state() == RevealState::Pending {
                continue;
            }

            let done = self.printed.get(&id).copied();
            let visible = msg.visible();
            let start = done.unwrap_or(0);
            if done.is_none() || visible.len() > start {
                if self.open_line.is_some_and(|open| open != id) {
                    writeln!(out)?;
                }
                out.write_all(visible.get(start..).unwrap_or("").as_bytes())?;
                self.printed.insert(id, visible.len());
                self.open_line = Some(id);
            }
            if self.open_line == Some(id) && !msg.is_revealing() {
                writeln!(out)?;
                self.open_line = None;
            }
        }
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexus_terminal::{ResponseGenerator, TerminalSession};
    use nexus_types::config::TerminalConfig;

    fn session() -> TerminalSession {
        TerminalSession::open(TerminalConfig::default(), ResponseGenerator::with_seed(5))
    }

    fn run_until_idle(s: &mut TerminalSession) {
        while let Some(due) = s.next_due() {
            s.advance(due - s.now());
        }
    }

    fn render_to_string(printer: &mut TranscriptPrinter, s: &TerminalSession) -> String {
        let mut buf = Vec::new();
        printer.render(s.transcript(), &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn welcome_prints_each_line_once() {
        let mut s = session();
        run_until_idle(&mut s);
        let out = render_to_string(&mut TranscriptPrinter::new(), &s);
        assert_eq!(
            out,
            "NexusAI Terminal v1.0\n© 2024 NexusAI. All rights reserved.\n\n\
             Welcome to NexusAI Trading Assistant\nType 'help' for available commands\n"
        );
    }

    #[test]
    fn incremental_render_matches_final_render() {
        let mut s = session();
        let mut printer = TranscriptPrinter::new();
        let mut streamed = String::new();
        while !s.is_idle() {
            s.advance(45);
            streamed.push_str(&render_to_string(&mut printer, &s));
        }
        let whole = render_to_string(&mut TranscriptPrinter::new(), &s);
        assert_eq!(streamed, whole);
        // Nothing new to print once settled.
        assert_eq!(render_to_string(&mut printer, &s), "");
    }

    #[test]
    fn user_lines_are_not_echoed() {
        let mut s = session();
        run_until_idle(&mut s);
        let mut printer = TranscriptPrinter::new();
        render_to_string(&mut printer, &s);
        s.submit("bogus");
        assert_eq!(render_to_string(&mut printer, &s), "");
        run_until_idle(&mut s);
        assert_eq!(
            render_to_string(&mut printer, &s),
            "Command not recognized. Type 'help' for available commands.\n"
        );
    }

    #[test]
    fn placeholder_prints_immediately() {
        let mut s = session();
        run_until_idle(&mut s);
        let mut printer = TranscriptPrinter::new();
        render_to_string(&mut printer, &s);
        s.submit("status");
        assert_eq!(
            render_to_string(&mut printer, &s),
            "Fetching network status... \n"
        );
    }

    #[test]
    fn clear_resets_the_screen() {
        let mut s = session();
        run_until_idle(&mut s);
        let mut printer = TranscriptPrinter::new();
        render_to_string(&mut printer, &s);
        s.submit("clear");
        run_until_idle(&mut s);
        let out = render_to_string(&mut printer, &s);
        assert!(out.starts_with(CLEAR_SCREEN));
        assert!(out.ends_with("NexusAI Terminal v1.0\nTerminal cleared.\n"));
    }
}
