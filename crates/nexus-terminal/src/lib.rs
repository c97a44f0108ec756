//! Command-and-response engine for the NexusAI terminal.
//!
//! A submitted line is routed to a registered `Command`, which either
//! replies right away or asks for a deferred report. Replies are revealed
//! character by character by the typewriter, and every delay runs on a
//! logical clock the host advances.

pub mod clock;
mod commands;
pub mod generator;
pub mod router;
pub mod session;
pub mod transcript;
pub mod typewriter;

/// Base58 shape check used by `analysis`.
pub use commands::is_wallet_address;
/// Register the built-in commands into a router.
pub use commands::register_builtins;
/// Report synthesis and the per-address wallet cache.
pub use generator::{ResponseGenerator, WalletAnalysisCache};
/// Command trait, dispatch, and the responses commands produce.
pub use router::{Command, CommandRouter, DeferredJob, Response};
/// A mounted terminal and the signals it emits.
pub use session::{TerminalEvent, TerminalSession};
/// Transcript entries and the log holding them.
pub use transcript::{Message, MessageId, MessageKind, MessageLog, RevealState};
/// Reveal duration formula.
pub use typewriter::reveal_duration;
