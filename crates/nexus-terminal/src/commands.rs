//! Built-in terminal commands.

use nexus_types::error::{NexusError, Result};

use crate::router::{Command, CommandRouter, DeferredJob, Environment, Response};

#[cfg(test)]
pub(crate) const HELP_TEXT: &str = "Available commands:
- status: View network status and gas prices
- analysis <wallet>: Get wallet analysis
- mempool: View pending transactions
- trade: Execute a trade
- clear: Clear terminal
- exit: Close terminal";

pub const STATUS_WORKING: &str = "Fetching network status... ";
pub const MEMPOOL_WORKING: &str = "Scanning mempool... ";
pub const TRADE_WORKING: &str = "Initializing trade execution... ";
pub const ANALYSIS_WORKING: &str = "Analyzing wallet... ";

/// Register every built-in command into a router, in `help` listing order.
pub fn register_builtins(router: &mut CommandRouter) {
    router.register(Box::new(StatusCmd));
    router.register(Box::new(AnalysisCmd));
    router.register(Box::new(MempoolCmd));
    router.register(Box::new(TradeCmd));
    router.register(Box::new(ClearCmd));
    router.register(Box::new(ExitCmd));
}

/// Whether `s` looks like a Solana address: 32 to 44 Base58 characters
/// (ASCII alphanumerics without `0`, `I`, `O` and `l`).
pub fn is_wallet_address(s: &str) -> bool {
    (32..=44).contains(&s.len())
        && s.bytes()
            .all(|b| b.is_ascii_alphanumeric() && !matches!(b, b'0' | b'I' | b'O' | b'l'))
}

// ---------------------------------------------------------------------------
// status / mempool / trade
// ---------------------------------------------------------------------------

struct StatusCmd;
impl Command for StatusCmd {
    fn name(&self) -> &str {
        "status"
    }
    fn description(&self) -> &str {
        "View network status and gas prices"
    }
    fn usage(&self) -> &str {
        "status"
    }
    fn execute(&self, _args: &[&str], env: &Environment<'_>) -> Result<Response> {
        Ok(Response::Deferred {
            working: STATUS_WORKING,
            delay_ms: env.config.delays.status,
            job: DeferredJob::NetworkStatus,
        })
    }
}

struct MempoolCmd;
impl Command for MempoolCmd {
    fn name(&self) -> &str {
        "mempool"
    }
    fn description(&self) -> &str {
        "View pending transactions"
    }
    fn usage(&self) -> &str {
        "mempool"
    }
    fn execute(&self, _args: &[&str], env: &Environment<'_>) -> Result<Response> {
        Ok(Response::Deferred {
            working: MEMPOOL_WORKING,
            delay_ms: env.config.delays.mempool,
            job: DeferredJob::Mempool,
        })
    }
}

struct TradeCmd;
impl Command for TradeCmd {
    fn name(&self) -> &str {
        "trade"
    }
    fn description(&self) -> &str {
        "Execute a trade"
    }
    fn usage(&self) -> &str {
        "trade"
    }
    fn execute(&self, _args: &[&str], env: &Environment<'_>) -> Result<Response> {
        Ok(Response::Deferred {
            working: TRADE_WORKING,
            delay_ms: env.config.delays.trade,
            job: DeferredJob::Trade,
        })
    }
}

// ---------------------------------------------------------------------------
// analysis
// ---------------------------------------------------------------------------

struct AnalysisCmd;
impl Command for AnalysisCmd {
    fn name(&self) -> &str {
        "analysis"
    }
    fn description(&self) -> &str {
        "Get wallet analysis"
    }
    fn usage(&self) -> &str {
        "analysis <wallet>"
    }
    fn execute(&self, args: &[&str], env: &Environment<'_>) -> Result<Response> {
        // Only the first argument is considered.
        let address = args.first().ok_or_else(|| {
            NexusError::Command("Please provide a Solana wallet address".to_string())
        })?;
        if !is_wallet_address(address) {
            return Err(NexusError::Command(
                "Invalid Solana wallet address format".to_string(),
            ));
        }
        Ok(Response::Deferred {
            working: ANALYSIS_WORKING,
            delay_ms: env.config.delays.analysis,
            job: DeferredJob::WalletAnalysis {
                address: (*address).to_string(),
            },
        })
    }
}

// ---------------------------------------------------------------------------
// clear / exit
// ---------------------------------------------------------------------------

struct ClearCmd;
impl Command for ClearCmd {
    fn name(&self) -> &str {
        "clear"
    }
    fn description(&self) -> &str {
        "Clear terminal"
    }
    fn usage(&self) -> &str {
        "clear"
    }
    fn execute(&self, _args: &[&str], _env: &Environment<'_>) -> Result<Response> {
        Ok(Response::Clear)
    }
}

struct ExitCmd;
impl Command for ExitCmd {
    fn name(&self) -> &str {
        "exit"
    }
    fn description(&self) -> &str {
        "Close terminal"
    }
    fn usage(&self) -> &str {
        "exit"
    }
    fn execute(&self, _args: &[&str], _env: &Environment<'_>) -> Result<Response> {
        Ok(Response::Exit)
    }
}
