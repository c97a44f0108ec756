use std::io::BufRead;
use std::sync::mpsc::{self, Receiver};
use std::thread;

/// One event read from the keyboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A submitted line.
    Line(String),
    /// End of input (Ctrl-D); treated like pressing Escape.
    Escape,
}

/// Read stdin on a background thread so the render loop never blocks.
pub fn spawn_stdin_reader() -> Receiver<InputEvent> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(InputEvent::Line(line)).is_err() {
                        return;
                    }
                },
                Err(e) => {
                    log::warn!("stdin read failed: {e}");
                    break;
                },
            }
        }
        let _ = tx.send(InputEvent::Escape);
    });
    rx
}
