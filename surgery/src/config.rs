use {
    crate::{DEFAULT_ACCOUNT_CONCURRENCY, RetryPolicy},
    alloy::transports::http::reqwest::Url,
    clap::Parser,
    std::{path::PathBuf, time::Duration},
};

/// Command line of the surgery binary. Every option can also be set in the environment or in a
/// `.env` file.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Args {
    /// Line delimited JSON state dump of the legacy chain.
    #[arg(long, env = "REGENESIS_STATE_DUMP")]
    pub state_dump: PathBuf,
    /// Genesis file of the new chain.
    #[arg(long, env = "REGENESIS_GENESIS")]
    pub genesis: PathBuf,
    /// JSON array of archived verified sources.
    #[arg(long, env = "REGENESIS_ETHERSCAN")]
    pub etherscan: PathBuf,
    #[arg(long, env = "REGENESIS_REFERENCES")]
    pub references: PathBuf,
    /// JSON object mapping legacy pool addresses to new chain addresses.
    #[arg(long, env = "REGENESIS_POOLS")]
    pub pools: PathBuf,
    /// Directory holding `evm/solc-<version>` and `ovm/solc-<version>` binaries.
    #[arg(long, env = "REGENESIS_COMPILERS_DIR")]
    pub compilers_dir: PathBuf,
    #[arg(long, short, env = "REGENESIS_OUTPUT")]
    pub output: PathBuf,
    #[arg(long, env = "REGENESIS_LEGACY_L2_RPC")]
    pub legacy_l2_rpc: Url,
    #[arg(long, env = "REGENESIS_LEGACY_MAINNET_RPC")]
    pub legacy_mainnet_rpc: Url,
    #[arg(long, env = "REGENESIS_NEW_CHAIN_RPC")]
    pub new_chain_rpc: Url,
    /// Requests in flight per RPC endpoint.
    #[arg(long, env = "REGENESIS_RPC_CONCURRENCY", default_value_t = 16)]
    pub rpc_concurrency: usize,
    #[arg(long, env = "REGENESIS_RPC_ATTEMPTS", default_value_t = 3)]
    pub rpc_attempts: usize,
    /// Pause after the first failed request, growing linearly with every further attempt.
    #[arg(long, env = "REGENESIS_RPC_BACKOFF_MS", default_value_t = 500)]
    pub rpc_backoff_ms: u64,
    #[arg(long, env = "REGENESIS_ACCOUNT_CONCURRENCY", default_value_t = DEFAULT_ACCOUNT_CONCURRENCY)]
    pub account_concurrency: usize,
}

impl Args {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            attempts: self.rpc_attempts,
            backoff: Duration::from_millis(self.rpc_backoff_ms),
        }
    }
}
