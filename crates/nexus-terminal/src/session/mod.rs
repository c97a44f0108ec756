//! A mounted terminal: transcript, typing animation, and pending work.
//!
//! All activity runs on the session's logical clock. [`TerminalSession::submit`]
//! reacts to a line synchronously and queues whatever is delayed; the host
//! calls [`TerminalSession::advance`] to let time pass and drains
//! [`TerminalEvent`]s to learn about reveal durations and close requests.
//!
//! Every queued task is stamped with the session epoch. Closing the session
//! bumps the epoch, so work queued before the close never touches the
//! transcript afterwards.


use nexus_types::config::TerminalConfig;

use crate::clock::Scheduler;
use crate::commands::register_builtins;
use crate::generator::ResponseGenerator;
use crate::router::{CommandRouter, DeferredJob, Environment, Response, parse_line};
use crate::transcript::{MessageId, MessageLog, NewMessage};
use crate::typewriter::{RevealToken, Tick, TypewriterEngine, reveal_duration};

pub const BANNER: &str = "NexusAI Terminal v1.0";
pub const COPYRIGHT: &str = "© 2024 NexusAI. All rights reserved.";
pub const WELCOME: &str = "Welcome to NexusAI Trading Assistant";
pub const HELP_HINT: &str = "Type 'help' for available commands";
pub const CLEARED: &str = "Terminal cleared.";

/// Signals for the embedding view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalEvent {
    /// An `Ai` reply started typing and will take this long.
    Busy { duration_ms: u64 },
    /// The terminal asked to be closed (`exit` or escape).
    CloseRequested,
}

#[derive(Debug)]
enum Task {
    BeginReveal(MessageId),
    RevealTick(RevealToken),
    Resolve {
        placeholder: MessageId,
        job: DeferredJob,
    },
}

#[derive(Debug)]
struct Scheduled {
    epoch: u64,
    task: Task,
}

pub struct TerminalSession {
    config: TerminalConfig,
    router: CommandRouter,
    generator: ResponseGenerator,
    log: MessageLog,
    typewriter: TypewriterEngine,
    scheduler: Scheduler<Scheduled>,
    events: Vec<TerminalEvent>,
    epoch: u64,
    open: bool,
}

impl TerminalSession {
    /// Mount a terminal with the built-in commands and the welcome banner.
    pub fn open(config: TerminalConfig, generator: ResponseGenerator) -> Self {
        let mut router = CommandRouter::new();
        register_builtins(&mut router);
        let typewriter = TypewriterEngine::new(config.char_interval_ms, config.min_reveal_ms);
        let mut session = Self {
            config,
            router,
            generator,
            log: MessageLog::new(),
            typewriter,
            scheduler: Scheduler::new(),
            events: Vec::new(),
            epoch: 0,
            open: true,
        };
        session.seed_welcome();
        log::info!("Terminal session opened");
        session
    }

    fn seed_welcome(&mut self) {
        for line in [BANNER, COPYRIGHT, ""] {
            self.log.push(NewMessage::system(line));
        }
        // Each line waits for the previous one's reported duration so the
        // welcome text is never cut off mid-reveal.
        let mut offset = self.config.welcome_first_delay_ms;
        for line in [WELCOME, HELP_HINT] {
            let id = self.log.push(NewMessage::ai(line));
            self.schedule(offset, Task::BeginReveal(id));
            let duration = reveal_duration(
                line,
                self.config.char_interval_ms,
                self.config.min_reveal_ms,
            );
            offset += duration.max(self.config.welcome_gap_ms);
        }
    }

    /// Handle one submitted line. Blank input is ignored.
    pub fn submit(&mut self, raw: &str) {
        if !self.open {
            log::warn!("Input ignored: terminal is closed");
            return;
        }
        let Some(parsed) = parse_line(raw) else {
            return;
        };
        self.log.push(NewMessage::user(parsed.line));

        let env = Environment {
            config: &self.config,
        };
        let response = self.router.dispatch(&parsed, &env);
        log::debug!("Dispatched {:?} -> {response:?}", parsed.name);

        match response {
            Response::Reply(text) => {
                let id = self.log.push(NewMessage::ai(text));
                self.schedule(self.config.reply_delay_ms, Task::BeginReveal(id));
            },
            Response::Deferred {
                working,
                delay_ms,
                job,
            } => {
                let placeholder = self.log.push(NewMessage::placeholder(working));
                self.schedule(delay_ms, Task::Resolve { placeholder, job });
            },
            Response::Clear => self.clear(),
            Response::Exit => self.request_close(),
        }
    }

    fn clear(&mut self) {
        self.typewriter.cancel(&mut self.log);
        let ids = self
            .log
            .replace_all(vec![NewMessage::system(BANNER), NewMessage::ai(CLEARED)]);
        if let Some(&id) = ids.last() {
            self.begin_reveal(id);
        }
    }

    /// External cancel request, e.g. the Escape key.
    pub fn escape(&mut self) {
        if self.open {
            self.request_close();
        }
    }

    fn request_close(&mut self) {
        self.events.push(TerminalEvent::CloseRequested);
        self.close();
    }

    /// Tear the session down: stop typing and orphan all queued work.
    pub fn close(&mut self) {
        if !self.open {
            return;
        }
        self.typewriter.cancel(&mut self.log);
        self.open = false;
        self.epoch += 1;
        self.scheduler.clear();
        log::info!("Terminal session closed");
    }

    /// Let `ms` of logical time pass, running everything that falls due.
    pub fn advance(&mut self, ms: u64) {
        let deadline = self.scheduler.now().saturating_add(ms);
        while let Some(scheduled) = self.scheduler.pop_due(deadline) {
            if !self.open || scheduled.epoch != self.epoch {
                log::debug!("Dropped stale task {:?}", scheduled.task);
                continue;
            }
            self.run(scheduled.task);
        }
        self.scheduler.advance_to(deadline);
    }

    fn run(&mut self, task: Task) {
        match task {
            Task::BeginReveal(id) => self.begin_reveal(id),
            Task::RevealTick(token) => {
                if self.typewriter.tick(&mut self.log, token) == Tick::Advanced {
                    self.schedule(self.config.char_interval_ms, Task::RevealTick(token));
                }
            },
            Task::Resolve { placeholder, job } => {
                self.log.remove(placeholder);
                let text = job.run(&mut self.generator);
                log::debug!("Deferred {job:?} resolved");
                let id = self.log.push(NewMessage::ai(text));
                self.schedule(self.config.settle_delay_ms, Task::BeginReveal(id));
            },
        }
    }

    fn begin_reveal(&mut self, id: MessageId) {
        let Some(start) = self.typewriter.start(&mut self.log, id) else {
            log::debug!("Reveal target {id} no longer in transcript");
            return;
        };
        self.events.push(TerminalEvent::Busy {
            duration_ms: start.duration_ms,
        });
        self.schedule(self.config.char_interval_ms, Task::RevealTick(start.token));
    }

    fn schedule(&mut self, delay_ms: u64, task: Task) {
        self.scheduler.schedule_in(
            delay_ms,
            Scheduled {
                epoch: self.epoch,
                task,
            },
        );
    }

    pub fn transcript(&self) -> &MessageLog {
        &self.log
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Current logical time.
    pub fn now(&self) -> u64 {
        self.scheduler.now()
    }

    /// Due time of the next queued task, if any.
    pub fn next_due(&self) -> Option<u64> {
        self.scheduler.next_due()
    }

    /// Whether nothing is queued.
    pub fn is_idle(&self) -> bool {
        self.scheduler.pending() == 0
    }

    pub fn drain_events(&mut self) -> Vec<TerminalEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn generator(&self) -> &ResponseGenerator {
        &self.generator
    }

    /// Unmount and hand back the generator so its wallet cache can outlive
    /// this session.
    pub fn into_generator(mut self) -> ResponseGenerator {
        self.close();
        self.generator
    }
}
