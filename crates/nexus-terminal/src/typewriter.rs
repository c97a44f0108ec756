//! Typewriter reveal of `Ai` replies.
//!
//! The engine owns at most one [`RevealJob`]. Starting a new reveal
//! interrupts the previous one; jobs are never queued. Each job carries a
//! fresh [`RevealToken`] and a tick is only applied when its token matches
//! the active job, so ticks scheduled for a superseded job are inert.

use crate::transcript::{MessageId, MessageLog, RevealState};

/// Identity of one reveal job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealToken(u64);

/// Total planned reveal time for `text`: one cadence step per character,
/// never less than `min_ms`.
pub fn reveal_duration(text: &str, char_interval_ms: u64, min_ms: u64) -> u64 {
    (text.chars().count() as u64)
        .saturating_mul(char_interval_ms)
        .max(min_ms)
}

/// An in-flight reveal.
#[derive(Debug, Clone)]
pub struct RevealJob {
    token: RevealToken,
    target: MessageId,
    text: String,
    /// Characters revealed so far.
    cursor: usize,
}

/// Result of starting a reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealStart {
    pub token: RevealToken,
    /// Duration to report to the embedding view.
    pub duration_ms: u64,
}

/// Result of applying one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// One more character shown; schedule the next tick.
    Advanced,
    /// The job completed and was retired.
    Finished,
    /// The token no longer names the active job.
    Stale,
}

pub struct TypewriterEngine {
    char_interval_ms: u64,
    min_reveal_ms: u64,
    next_token: u64,
    active: Option<RevealJob>,
}

impl TypewriterEngine {
    pub fn new(char_interval_ms: u64, min_reveal_ms: u64) -> Self {
        Self {
            char_interval_ms,
            min_reveal_ms,
            next_token: 0,
            active: None,
        }
    }

    pub fn active(&self) -> Option<&RevealJob> {
        self.active.as_ref()
    }

    /// Begin revealing the message `target`, interrupting any active job.
    ///
    /// The first character is shown immediately; the caller schedules
    /// [`TypewriterEngine::tick`] every `char_interval_ms` afterwards.
    /// Returns `None` if `target` is no longer in the log.
    pub fn start(&mut self, log: &mut MessageLog, target: MessageId) -> Option<RevealStart> {
        // A missing target leaves the active job untouched.
        let text = log.get(target)?.text().to_string();
        self.cancel(log);

        let token = RevealToken(self.next_token);
        self.next_token += 1;
        let duration_ms = reveal_duration(&text, self.char_interval_ms, self.min_reveal_ms);

        if let Some(msg) = log.get_mut(target) {
            msg.set_visible("");
            msg.set_state(RevealState::Revealing);
        }
        self.active = Some(RevealJob {
            token,
            target,
            text,
            cursor: 0,
        });
        log::debug!("Reveal {target} started ({duration_ms}ms)");
        // Settles an empty text on the spot; the scheduled tick goes stale.
        self.tick(log, token);
        Some(RevealStart { token, duration_ms })
    }

    /// Show the next character of the job named by `token`.
    pub fn tick(&mut self, log: &mut MessageLog, token: RevealToken) -> Tick {
        let Some(job) = self.active.as_mut().filter(|j| j.token == token) else {
            return Tick::Stale;
        };
        let Some(msg) = log.get_mut(job.target) else {
            // Wiped by a transcript reset.
            self.active = None;
            return Tick::Finished;
        };

        let next = job.text.char_indices().nth(job.cursor);
        match next {
            Some((offset, ch)) => {
                job.cursor += 1;
                msg.set_visible(&job.text[..offset + ch.len_utf8()]);
                Tick::Advanced
            },
            None => {
                msg.set_visible(&job.text);
                msg.set_state(RevealState::Settled);
                self.active = None;
                Tick::Finished
            },
        }
    }

    /// Stop the active job, leaving its partial prefix in place.
    pub fn cancel(&mut self, log: &mut MessageLog) {
        if let Some(job) = self.active.take() {
            if let Some(msg) = log.get_mut(job.target) {
                msg.set_state(RevealState::Interrupted);
            }
            log::debug!("Reveal {} interrupted at {}", job.target, job.cursor);
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::transcript::NewMessage;

    fn engine() -> TypewriterEngine {
        TypewriterEngine::new(30, 2000)
    }

    fn drain(engine: &mut TypewriterEngine, log: &mut MessageLog, token: RevealToken) -> usize {
        let mut ticks = 0;
        while engine.tick(log, token) == Tick::Advanced {
            ticks += 1;
        }
        ticks
    }

    #[test]
    fn duration_has_a_floor() {
        assert_eq!(reveal_duration("", 30, 2000), 2000);
        assert_eq!(reveal_duration("short", 30, 2000), 2000);
        let long = "x".repeat(100);
        assert_eq!(reveal_duration(&long, 30, 2000), 3000);
    }

    #[test]
    fn duration_counts_chars_not_bytes() {
        let rule = "━".repeat(100);
        assert_eq!(reveal_duration(&rule, 30, 0), 3000);
    }

    #[test]
    fn reveal_runs_to_completion() {
        let mut log = MessageLog::new();
        let id = log.push(NewMessage::ai("abc"));
        let mut tw = engine();
        let start = tw.start(&mut log, id).unwrap();
        assert_eq!(start.duration_ms, 2000);

        let msg = log.get(id).unwrap();
        assert_eq!(msg.visible(), "a");
        assert!(msg.is_revealing());

        assert_eq!(tw.tick(&mut log, start.token), Tick::Advanced);
        assert_eq!(log.get(id).unwrap().visible(), "ab");
        assert_eq!(tw.tick(&mut log, start.token), Tick::Advanced);
        assert_eq!(tw.tick(&mut log, start.token), Tick::Finished);

        let msg = log.get(id).unwrap();
        assert_eq!(msg.visible(), "abc");
        assert_eq!(msg.state(), RevealState::Settled);
        assert!(tw.active().is_none());
    }

    #[test]
    fn multibyte_text_reveals_on_char_boundaries() {
        let mut log = MessageLog::new();
        let id = log.push(NewMessage::ai("✓━ok"));
        let mut tw = engine();
        let start = tw.start(&mut log, id).unwrap();
        assert_eq!(log.get(id).unwrap().visible(), "✓");
        tw.tick(&mut log, start.token);
        assert_eq!(log.get(id).unwrap().visible(), "✓━");
        drain(&mut tw, &mut log, start.token);
        assert_eq!(log.get(id).unwrap().visible(), "✓━ok");
    }

    #[test]
    fn new_reveal_interrupts_previous() {
        let mut log = MessageLog::new();
        let first = log.push(NewMessage::ai("first message"));
        let second = log.push(NewMessage::ai("second"));
        let mut tw = engine();

        let a = tw.start(&mut log, first).unwrap();
        tw.tick(&mut log, a.token);
        let b = tw.start(&mut log, second).unwrap();
        assert_ne!(a.token, b.token);

        let msg = log.get(first).unwrap();
        assert_eq!(msg.state(), RevealState::Interrupted);
        assert_eq!(msg.visible(), "fi");
        assert_eq!(log.revealing_count(), 1);

        // Ticks for the old job change nothing.
        assert_eq!(tw.tick(&mut log, a.token), Tick::Stale);
        assert_eq!(log.get(first).unwrap().visible(), "fi");

        drain(&mut tw, &mut log, b.token);
        assert_eq!(log.get(second).unwrap().visible(), "second");
        assert_eq!(log.revealing_count(), 0);
    }

    #[test]
    fn empty_text_settles_immediately() {
        let mut log = MessageLog::new();
        let id = log.push(NewMessage::ai(""));
        let mut tw = engine();
        let start = tw.start(&mut log, id).unwrap();
        assert_eq!(log.get(id).unwrap().state(), RevealState::Settled);
        assert_eq!(tw.tick(&mut log, start.token), Tick::Stale);
    }

    #[test]
    fn missing_target_is_not_started() {
        let mut log = MessageLog::new();
        let id = log.push(NewMessage::ai("gone"));
        log.remove(id);
        assert!(engine().start(&mut log, id).is_none());
    }

    #[test]
    fn missing_target_does_not_interrupt_active_job() {
        let mut log = MessageLog::new();
        let gone = log.push(NewMessage::ai("gone"));
        log.remove(gone);
        let live = log.push(NewMessage::ai("live"));
        let mut tw = engine();
        let start = tw.start(&mut log, live).unwrap();

        assert!(tw.start(&mut log, gone).is_none());
        assert!(log.get(live).unwrap().is_revealing());
        drain(&mut tw, &mut log, start.token);
        assert_eq!(log.get(live).unwrap().visible(), "live");
        assert_eq!(log.get(live).unwrap().state(), RevealState::Settled);
    }

    #[test]
    fn reset_transcript_retires_job() {
        let mut log = MessageLog::new();
        let id = log.push(NewMessage::ai("will be wiped"));
        let mut tw = engine();
        let start = tw.start(&mut log, id).unwrap();
        log.replace_all(vec![NewMessage::system("fresh")]);
        assert_eq!(tw.tick(&mut log, start.token), Tick::Finished);
        assert!(tw.active().is_none());
    }

    proptest! {
        #[test]
        fn duration_formula_and_monotonic(a in 0usize..400, b in 0usize..400) {
            let (short, long) = (a.min(b), a.max(b));
            let d_short = reveal_duration(&"x".repeat(short), 30, 2000);
            let d_long = reveal_duration(&"x".repeat(long), 30, 2000);
            prop_assert_eq!(d_long, (long as u64 * 30).max(2000));
            prop_assert!(d_short <= d_long);
        }
    }
}
