use {
    crate::HandlerError,
    alloy::providers::Provider,
    regenesis_shared::primitives::{Address, Bytes, ToHexString},
    std::{fmt::Display, future::Future, time::Duration},
    tokio::sync::Semaphore,
    tracing::{trace, warn},
};

/// Source of deployed bytecode at an address on one chain.
pub trait CodeSource: Send + Sync {
    /// Name used in logs and errors.
    fn name(&self) -> &str;

    fn code_at(&self, address: Address) -> impl Future<Output = Result<Bytes, HandlerError>> + Send;
}

/// Bounded attempts with a linearly growing pause between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: usize,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Runs `operation` until it succeeds or attempts run out. The error carries the number of
    /// attempts made.
    pub async fn run<T, E, F, Fut>(&self, mut operation: F) -> Result<T, (usize, E)>
    where
        E: Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let attempts = self.attempts.max(1);
        let mut attempt = 1;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < attempts => {
                    warn!(attempt, attempts, error = %e, "Retrying failed request");
                    tokio::time::sleep(self.backoff * attempt as u32).await;
                    attempt += 1;
                }
                Err(e) => return Err((attempt, e)),
            }
        }
    }
}

/// Fetches code over JSON-RPC `eth_getCode`, one attempt per call.
#[derive(Debug)]
pub struct RpcCodeSource<P> {
    name: String,
    provider: P,
}

impl<P: Provider> RpcCodeSource<P> {
    pub fn new(name: impl Into<String>, provider: P) -> Self {
        Self {
            name: name.into(),
            provider,
        }
    }
}

impl<P: Provider> CodeSource for RpcCodeSource<P> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn code_at(&self, address: Address) -> Result<Bytes, HandlerError> {
        let code = self
            .provider
            .get_code_at(address)
            .await
            .map_err(|e| HandlerError::Fetch {
                client: self.name.clone(),
                address: address.to_hex_string(),
                attempts: 1,
                reason: e.to_string(),
            })?;
        trace!(client = %self.name, %address, size = code.len(), "Fetched code");

        Ok(code)
    }
}

/// Wraps a code source with a cap on requests in flight and retries of failed requests.
#[derive(Debug)]
pub struct ThrottledCodeSource<S> {
    inner: S,
    limiter: Semaphore,
    retry: RetryPolicy,
}

impl<S: CodeSource> ThrottledCodeSource<S> {
    pub fn new(inner: S, concurrency: usize, retry: RetryPolicy) -> Self {
        Self {
            inner,
            limiter: Semaphore::new(concurrency.max(1)),
            retry,
        }
    }
}

impl<S: CodeSource> CodeSource for ThrottledCodeSource<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn code_at(&self, address: Address) -> Result<Bytes, HandlerError> {
        let _permit = self
            .limiter
            .acquire()
            .await
            .map_err(|e| HandlerError::Fetch {
                client: self.name().to_string(),
                address: address.to_hex_string(),
                attempts: 0,
                reason: e.to_string(),
            })?;

        self.retry
            .run(|| self.inner.code_at(address))
            .await
            .map_err(|(made, e)| match e {
                HandlerError::Fetch {
                    client,
                    address,
                    reason,
                    ..
                } => HandlerError::Fetch {
                    client,
                    address,
                    attempts: made,
                    reason,
                },
                other => other,
            })
    }
}

#[cfg(any(feature = "test-doubles", test))]
pub mod test_doubles {
    use {
        super::*,
        std::{
            collections::HashMap,
            sync::{
                Arc,
                atomic::{AtomicUsize, Ordering},
            },
        },
    };

    /// Serves code from a fixed map. Unknown addresses have no code.
    #[derive(Debug, Clone, Default)]
    pub struct StaticCodeSource {
        pub name: String,
        pub code: HashMap<Address, Bytes>,
        pub calls: Arc<AtomicUsize>,
    }

    impl StaticCodeSource {
        pub fn new(name: &str) -> Self {
            Self {
                name: name.to_string(),
                ..Default::default()
            }
        }

        pub fn with(mut self, address: &str, code: &[u8]) -> Self {
            let address = address.parse().expect("Test address should be valid");
            self.code.insert(address, Bytes::copy_from_slice(code));
            self
        }
    }

    impl CodeSource for StaticCodeSource {
        fn name(&self) -> &str {
            &self.name
        }

        async fn code_at(&self, address: Address) -> Result<Bytes, HandlerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.code.get(&address).cloned().unwrap_or_default())
        }
    }
}
