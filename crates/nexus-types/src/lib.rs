//! Foundation types for the NexusAI terminal.
//!
//! Shared by the terminal engine and its frontends: the error type and the
//! timing configuration that drives every scheduled delay.

pub mod config;
pub mod error;
