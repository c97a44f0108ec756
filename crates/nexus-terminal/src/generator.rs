//! Synthetic report generation for the market commands.
//!
//! Nothing here touches the network. Network status is fixed text, mempool
//! and trade reports are re-rolled on every call, and wallet analyses are
//! rolled once per address and then served from [`WalletAnalysisCache`].

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

const TRADING_PATTERNS: [&str; 5] = [
    "High frequency trading detected",
    "Long-term holder profile",
    "Active DeFi participant",
    "NFT collector profile",
    "Yield farming strategy",
];

const PROTOCOLS: [&str; 5] = [
    "Raydium",
    "Orca",
    "Magic Eden",
    "Marinade Finance",
    "Jupiter Exchange",
];

struct NetworkQuote {
    name: &'static str,
    price: &'static str,
    metric: &'static str,
    value: &'static str,
}

const NETWORKS: [NetworkQuote; 3] = [
    NetworkQuote {
        name: "Ethereum",
        price: "$2,247.82",
        metric: "Gas",
        value: "32 gwei",
    },
    NetworkQuote {
        name: "Solana",
        price: "$95.14",
        metric: "TPS",
        value: "3,421",
    },
    NetworkQuote {
        name: "Arbitrum",
        price: "$1.68",
        metric: "Gas",
        value: "0.1 gwei",
    },
];

/// Risk tier for a wallet's risk score.
pub fn risk_level(score: u32) -> &'static str {
    if score < 33 {
        "Low"
    } else if score < 66 {
        "Medium"
    } else {
        "High"
    }
}

/// Format an integer with `,` thousands separators.
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Per-address wallet reports. Entries are never replaced or evicted.
#[derive(Debug, Default)]
pub struct WalletAnalysisCache {
    reports: HashMap<String, String>,
}

impl WalletAnalysisCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the report for `address`, building it with `make` only if
    /// none is stored yet.
    pub fn get_or_insert_with(&mut self, address: &str, make: impl FnOnce() -> String) -> &str {
        self.reports
            .entry(address.to_string())
            .or_insert_with(make)
            .as_str()
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}

/// Produces the report text for each deferred command.
pub struct ResponseGenerator {
    rng: StdRng,
    wallets: WalletAnalysisCache,
}

impl ResponseGenerator {
    /// Generator seeded from OS entropy.
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Generator with reproducible output.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng,
            wallets: WalletAnalysisCache::new(),
        }
    }

    pub fn wallet_cache(&self) -> &WalletAnalysisCache {
        &self.wallets
    }

    pub fn network_status(&self) -> String {
        let mut out = format!("Network Status (Live)\n{RULE}\n");
        for net in &NETWORKS {
            out.push_str(&format!(
                "{}: {} | {}: {}\n",
                net.name, net.price, net.metric, net.value
            ));
        }
        out.push_str("\nNetwork Health: Optimal ✓\nBlock Production: Normal");
        out
    }

    pub fn mempool_status(&mut self) -> String {
        let pending: u64 = self.rng.gen_range(100_000..300_000);
        let avg_confirmation: u32 = self.rng.gen_range(30..90);
        let load = if self.rng.gen_bool(0.5) {
            "High"
        } else {
            "Moderate"
        };
        format!(
            "Mempool Status (Live)\n{RULE}\n\
             Pending Transactions: {}\n\
             Average Confirmation: {avg_confirmation} seconds\n\
             Network Load: {load}\n\n\
             Top Protocols by Volume:\n\
             1. Jupiter (24h: $127.8M)\n\
             2. Raydium (24h: $89.2M)\n\
             3. Orca (24h: $45.6M)",
            group_thousands(pending)
        )
    }

    /// Trading is always reported as disabled.
    pub fn trade_status(&mut self) -> String {
        let block: u64 = self.rng.gen_range(9_000_000..10_000_000);
        format!(
            "Error: Trading temporarily disabled\n{RULE}\n\
             Reason: Network congestion detected\n\
             Status: Waiting for confirmation of block #{block}\n\
             Estimated resolution: 5-10 minutes\n\n\
             Please try again later or use alternative DEX aggregators."
        )
    }

    /// Report for `address`: rolled on first request, cached afterwards.
    pub fn wallet_analysis(&mut self, address: &str) -> String {
        let rng = &mut self.rng;
        self.wallets
            .get_or_insert_with(address, || {
                log::debug!("Rolling new wallet analysis for {address}");
                roll_wallet_analysis(rng)
            })
            .to_string()
    }
}

impl Default for ResponseGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn roll_wallet_analysis(rng: &mut StdRng) -> String {
    let risk_score: u32 = rng.gen_range(0..100);
    let pattern = TRADING_PATTERNS
        .choose(rng)
        .copied()
        .unwrap_or(TRADING_PATTERNS[0]);
    let protocol_count = rng.gen_range(2..=4);
    let protocols: Vec<&str> = PROTOCOLS
        .choose_multiple(rng, protocol_count)
        .copied()
        .collect();
    let mut pnl = || format!("{:.2}%", rng.gen_range(-20.0..20.0_f64));
    let (day, week, month) = (pnl(), pnl(), pnl());

    let volatility = rng.gen_range(10.0..60.0_f64);
    let efficiency = rng.gen_range(0.0..100.0_f64);
    let risk_reward = rng.gen_range(0.5..3.5_f64);
    let correlation = rng.gen_range(0.0..100.0_f64);
    let security = if rng.gen_bool(0.2) {
        "⚠️ Suspicious activity detected"
    } else {
        "✓ Normal activity pattern"
    };

    format!(
        "Wallet Analysis Complete ✓\n\n\
         Portfolio Overview:\n{RULE}\n\
         Risk Factor: {risk_score}\n\
         Risk Level: {}\n\
         Profile: {pattern}\n\n\
         Transaction Activity (Average PnL):\n{RULE}\n\
         Last 24h: {day}\n\
         Last 7d: {week}\n\
         Last 30d: {month}\n\n\
         Protocol Interaction:\n{RULE}\n\
         Recently Used: {}\n\n\
         Advanced Metrics:\n{RULE}\n\
         Volatility Index: {volatility:.2}\n\
         Trading Efficiency: {efficiency:.2}%\n\
         Risk/Reward Ratio: {risk_reward:.2}\n\
         Market Correlation: {correlation:.2}%\n\n\
         Security Status: {security}",
        risk_level(risk_score),
        protocols.join(", ")
    )
}
