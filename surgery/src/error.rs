//! Errors of the surgery run.
//!
//! [`Error`] aborts the whole run. Everything that goes wrong while transforming a single account
//! is a [`HandlerError`] wrapped together with the address of that account.

use {
    crate::AccountType,
    regenesis_dump::ValidationError,
    regenesis_solc::{CompileError, RelocationError, ResolveError},
    thiserror::Error,
};

/// The result type with its error type set to [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("State dump is invalid: {0}")]
    Validation(#[from] ValidationError),
    #[error("Reference sets are inconsistent: {0}")]
    References(#[from] ReferenceError),
    #[error("Surgery failed for account {address}: {cause}")]
    Account {
        address: String,
        #[source]
        cause: HandlerError,
    },
    #[error("Surgery output contains account {0} more than once")]
    DuplicateAddress(String),
}

/// Failure to load or cross-check the configured address lists.
#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("Failed to read reference file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse reference file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Address {address} is listed as both {first} and {second}")]
    Overlap {
        address: String,
        first: &'static str,
        second: &'static str,
    },
}

/// Failure to classify or transform one account.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Account with code hash {code_hash} matches no category")]
    Unclassified { code_hash: String },
    #[error("No archived source for verified contract")]
    MissingSource,
    #[error("No genesis account at {0}")]
    MissingGenesisAccount(String),
    #[error("No state dump account at {0}")]
    MissingDumpAccount(String),
    #[error("No new address for protocol pool")]
    MissingPoolAddress,
    #[error("Address `{0}` is malformed")]
    InvalidAddress(String),
    #[error("Fetching code of {address} from {client} failed after {attempts} attempts: {reason}")]
    Fetch {
        client: String,
        address: String,
        attempts: usize,
        reason: String,
    },
    #[error("Client {client} returned no code for {address}")]
    EmptyCode { client: String, address: String },
    #[error("Account code is not hex")]
    InvalidCode,
    #[error("Account storage is not hex")]
    InvalidStorage,
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error(transparent)]
    Relocation(#[from] RelocationError),
    #[error("Surgery for {0} accounts is not implemented")]
    NotImplemented(AccountType),
    #[error("Background task failed: {0}")]
    Task(String),
}
