pub use {
    classify::{AccountType, classify},
    config::Args,
    error::{Error, HandlerError, ReferenceError, Result},
    handlers::{Transformed, handle},
    references::{PoolAddresses, ReferenceSets},
    rpc::{CodeSource, RetryPolicy, RpcCodeSource, ThrottledCodeSource},
    sources::{SurgeryDataSources, compile_limiter},
    surgery::{DEFAULT_ACCOUNT_CONCURRENCY, perform_surgery},
};

#[cfg(any(feature = "test-doubles", test))]
pub use rpc::test_doubles;

mod classify;
mod config;
mod error;
mod handlers;
mod references;
mod rpc;
mod sources;
mod surgery;
