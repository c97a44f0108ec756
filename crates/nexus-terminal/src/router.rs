//! Command trait, registry, and dispatch logic.
//!
//! A submitted line is trimmed and split on whitespace; the first token,
//! lowercased, names the command. Dispatch never fails: unknown names and
//! command errors both come back as an ordinary [`Response::Reply`].

use std::collections::HashMap;

use nexus_types::config::TerminalConfig;
use nexus_types::error::{NexusError, Result};

use crate::generator::ResponseGenerator;

/// Reply for any name that is not registered.
pub const NOT_RECOGNIZED: &str = "Command not recognized. Type 'help' for available commands.";

/// First line of the `help` listing.
pub const HELP_HEADER: &str = "Available commands:";

/// Work to perform when a deferred command's delay elapses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeferredJob {
    NetworkStatus,
    Mempool,
    Trade,
    WalletAnalysis { address: String },
}

impl DeferredJob {
    /// Produce the payload. Called exactly once per command execution.
    pub fn run(&self, generator: &mut ResponseGenerator) -> String {
        match self {
            Self::NetworkStatus => generator.network_status(),
            Self::Mempool => generator.mempool_status(),
            Self::Trade => generator.trade_status(),
            Self::WalletAnalysis { address } => generator.wallet_analysis(address),
        }
    }
}

/// What a command wants the session to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Type out this text after the reply pre-delay.
    Reply(String),
    /// Show `working` now, then replace it with the job's payload after
    /// `delay_ms`.
    Deferred {
        working: &'static str,
        delay_ms: u64,
        job: DeferredJob,
    },
    /// Reset the transcript.
    Clear,
    /// Ask the host to close the terminal.
    Exit,
}

/// Read-only context passed to every command.
pub struct Environment<'a> {
    pub config: &'a TerminalConfig,
}

/// A single executable command.
pub trait Command {
    /// The command name (what the user types, lowercase).
    fn name(&self) -> &str;

    /// One-line description for `help`.
    fn description(&self) -> &str;

    /// Usage string (e.g. "analysis <wallet>").
    fn usage(&self) -> &str;

    /// Execute the command with the given arguments.
    fn execute(&self, args: &[&str], env: &Environment<'_>) -> Result<Response>;
}

/// A trimmed, tokenized input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine<'a> {
    /// The trimmed line as typed.
    pub line: &'a str,
    /// Command name, lowercased.
    pub name: String,
    pub args: Vec<&'a str>,
}

/// Split `raw` into a command name and arguments. `None` for blank input.
pub fn parse_line(raw: &str) -> Option<ParsedLine<'_>> {
    let line = raw.trim();
    let mut tokens = line.split_whitespace();
    let name = tokens.next()?.to_lowercase();
    Some(ParsedLine {
        line,
        name,
        args: tokens.collect(),
    })
}

/// Registry of available commands with dispatch.
///
/// `help` is handled by the router itself so it can list the registry.
pub struct CommandRouter {
    commands: HashMap<String, Box<dyn Command>>,
    /// Names in registration order, for the `help` listing.
    order: Vec<String>,
}

impl CommandRouter {
    /// Create an empty router.
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register a command. Replaces any existing command with the same name,
    /// keeping its place in the `help` listing.
    pub fn register(&mut self, cmd: Box<dyn Command>) {
        let name = cmd.name().to_string();
        if self.commands.insert(name.clone(), cmd).is_none() {
            self.order.push(name);
        }
    }

    /// Registered commands as `(usage, description)`, in registration order.
    pub fn listing(&self) -> Vec<(&str, &str)> {
        self.order
            .iter()
            .filter_map(|name| self.commands.get(name))
            .map(|cmd| (cmd.usage(), cmd.description()))
            .collect()
    }

    /// Built-in help with access to the registry.
    fn help(&self) -> String {
        let mut out = HELP_HEADER.to_string();
        for (usage, description) in self.listing() {
            out.push_str(&format!("\n- {usage}: {description}"));
        }
        out
    }

    /// Resolve and run the command named by `parsed`.
    pub fn dispatch(&self, parsed: &ParsedLine<'_>, env: &Environment<'_>) -> Response {
        if parsed.name == "help" {
            return Response::Reply(self.help());
        }
        let Some(cmd) = self.commands.get(&parsed.name) else {
            log::debug!("Unrecognized command: {}", parsed.name);
            return Response::Reply(NOT_RECOGNIZED.to_string());
        };
        match cmd.execute(&parsed.args, env) {
            Ok(response) => response,
            Err(NexusError::Command(msg)) => Response::Reply(format!("Error: {msg}")),
            Err(e) => {
                log::warn!("Command {} failed: {e}", parsed.name);
                Response::Reply(format!("Error: {e}"))
            },
        }
    }
}

impl Default for CommandRouter {
    fn default() -> Self {
        Self::new()
    }
}
