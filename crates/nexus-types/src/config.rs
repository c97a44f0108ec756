//! Terminal timing configuration.
//!
//! All delays are in milliseconds of the session's logical clock. Loaded
//! from a TOML file; every field is optional and falls back to the
//! built-in defaults below.
//!
//! ```toml
//! char_interval_ms = 30
//! reply_delay_ms = 500
//!
//! [delays]
//! status = 9000
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::{NexusError, Result};

/// Phase-two delays for the deferred commands.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CommandDelays {
    pub status: u64,
    pub mempool: u64,
    pub trade: u64,
    pub analysis: u64,
}

impl Default for CommandDelays {
    fn default() -> Self {
        Self {
            status: 9000,
            mempool: 8000,
            trade: 10000,
            analysis: 10000,
        }
    }
}

/// Timing knobs for the terminal session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    /// Time between two revealed characters.
    pub char_interval_ms: u64,
    /// Floor for the reported reveal duration.
    pub min_reveal_ms: u64,
    /// Pause between a deferred result landing and its reveal starting.
    pub settle_delay_ms: u64,
    /// Pause before a synchronous reply starts typing.
    pub reply_delay_ms: u64,
    /// Pause before the first welcome line starts typing.
    pub welcome_first_delay_ms: u64,
    /// Minimum spacing between consecutive welcome lines.
    pub welcome_gap_ms: u64,
    pub delays: CommandDelays,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            char_interval_ms: 30,
            min_reveal_ms: 2000,
            settle_delay_ms: 100,
            reply_delay_ms: 500,
            welcome_first_delay_ms: 100,
            welcome_gap_ms: 1000,
            delays: CommandDelays::default(),
        }
    }
}

impl TerminalConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(src: &str) -> Result<Self> {
        let config: Self = toml::from_str(src)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let src = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&src)?;
        log::info!("Loaded terminal config from {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.char_interval_ms == 0 {
            return Err(NexusError::Config(
                "char_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_product_timings() {
        let cfg = TerminalConfig::default();
        assert_eq!(cfg.char_interval_ms, 30);
        assert_eq!(cfg.min_reveal_ms, 2000);
        assert_eq!(cfg.delays.status, 9000);
        assert_eq!(cfg.delays.mempool, 8000);
        assert_eq!(cfg.delays.trade, 10000);
        assert_eq!(cfg.delays.analysis, 10000);
    }

    #[test]
    fn empty_document_is_default() {
        let cfg = TerminalConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, TerminalConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let cfg = TerminalConfig::from_toml_str(
            "reply_delay_ms = 10\n[delays]\nstatus = 50\n",
        )
        .unwrap();
        assert_eq!(cfg.reply_delay_ms, 10);
        assert_eq!(cfg.delays.status, 50);
        assert_eq!(cfg.delays.mempool, 8000);
        assert_eq!(cfg.char_interval_ms, 30);
    }

    #[test]
    fn zero_char_interval_rejected() {
        let err = TerminalConfig::from_toml_str("char_interval_ms = 0").unwrap_err();
        assert!(matches!(err, NexusError::Config(_)));
    }

    #[test]
    fn malformed_toml_rejected() {
        let err = TerminalConfig::from_toml_str("delays = [[[").unwrap_err();
        assert!(matches!(err, NexusError::TomlParse(_)));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("terminal.toml");
        std::fs::write(&path, "min_reveal_ms = 1500\n").unwrap();
        let cfg = TerminalConfig::load(&path).unwrap();
        assert_eq!(cfg.min_reveal_ms, 1500);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = TerminalConfig::load(Path::new("/nonexistent/terminal.toml")).unwrap_err();
        assert!(matches!(err, NexusError::Io(_)));
    }
}
