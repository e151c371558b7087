use {
    crate::{CompileError, CompilerInput, CompilerOutput},
    once_cell::sync::Lazy,
    parking_lot::Mutex,
    regex::Regex,
    std::{
        collections::HashMap,
        fmt,
        io::Write,
        path::PathBuf,
        process::{Command, Stdio},
        str::FromStr,
        sync::Arc,
    },
    tracing::{debug, info},
};

static VERSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^v?(?<version>\d+\.\d+\.\d+(\+commit\.[0-9a-f]{8})?)$")
        .expect("Version pattern should be a valid regex")
});

/// Compiler family a session belongs to.
///
/// # Variants
/// * `Evm` is the upstream compiler whose output the new chain executes.
/// * `Ovm` is the paired compiler the legacy chain contracts were deployed with. Its output gives
///   the historical bytecode layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Toolchain {
    Evm,
    Ovm,
}

impl fmt::Display for Toolchain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Evm => f.write_str("evm"),
            Self::Ovm => f.write_str("ovm"),
        }
    }
}

/// A validated compiler release, `MAJOR.MINOR.PATCH` with an optional `+commit.HASH` suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Version(String);

impl FromStr for Version {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VERSION
            .captures(s.trim())
            .map(|captures| Self(captures["version"].to_string()))
            .ok_or_else(|| CompileError::UnknownVersion(s.to_string()))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompilerKey {
    pub version: Version,
    pub toolchain: Toolchain,
}

impl fmt::Display for CompilerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} solc {}", self.toolchain, self.version)
    }
}

/// A compiler instance ready to take standard JSON input.
pub trait CompilerSession: Send + Sync {
    fn compile(&self, input: &CompilerInput) -> Result<CompilerOutput, CompileError>;
}

/// Creates sessions, the expensive step [`CompilerCache`] performs once per key.
pub trait SessionLoader: Send + Sync {
    fn load(&self, key: &CompilerKey) -> Result<Arc<dyn CompilerSession>, CompileError>;
}

/// A native `solc` executable driven through `--standard-json`.
#[derive(Debug, Clone)]
pub struct SolcBinary {
    key: CompilerKey,
    path: PathBuf,
}

impl SolcBinary {
    pub fn new(key: CompilerKey, path: impl Into<PathBuf>) -> Self {
        Self {
            key,
            path: path.into(),
        }
    }

    fn failure(&self, reason: impl ToString) -> CompileError {
        CompileError::Session {
            key: self.key.clone(),
            reason: reason.to_string(),
        }
    }
}

impl CompilerSession for SolcBinary {
    fn compile(&self, input: &CompilerInput) -> Result<CompilerOutput, CompileError> {
        let input = serde_json::to_vec(input).map_err(|e| self.failure(e))?;
        let mut child = Command::new(&self.path)
            .arg("--standard-json")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.failure(e))?;

        // Closing stdin signals the end of input
        child
            .stdin
            .take()
            .ok_or_else(|| self.failure("stdin is not piped"))?
            .write_all(&input)
            .map_err(|e| self.failure(e))?;

        let output = child.wait_with_output().map_err(|e| self.failure(e))?;
        if !output.status.success() {
            return Err(self.failure(format!(
                "{}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        serde_json::from_slice(&output.stdout).map_err(|e| self.failure(e))
    }
}

/// Loads [`SolcBinary`] sessions from `<root>/<toolchain>/solc-<version>`.
///
/// Binaries are downloaded into the directory ahead of the surgery, a missing one means the
/// version is unknown to the toolchain.
#[derive(Debug, Clone)]
pub struct SolcDirectory {
    root: PathBuf,
}

impl SolcDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn binary_path(&self, key: &CompilerKey) -> PathBuf {
        self.root
            .join(key.toolchain.to_string())
            .join(format!("solc-{}", key.version))
    }
}

impl SessionLoader for SolcDirectory {
    fn load(&self, key: &CompilerKey) -> Result<Arc<dyn CompilerSession>, CompileError> {
        let path = self.binary_path(key);
        if !path.is_file() {
            return Err(CompileError::MissingCompiler {
                toolchain: key.toolchain,
                version: key.version.to_string(),
            });
        }
        info!(%key, path = %path.display(), "Loading compiler");

        Ok(Arc::new(SolcBinary::new(key.clone(), path)))
    }
}

/// Lazily populated `(version, toolchain) -> session` cache shared for the process lifetime.
pub struct CompilerCache {
    loader: Box<dyn SessionLoader>,
    sessions: Mutex<HashMap<CompilerKey, Arc<dyn CompilerSession>>>,
}

impl CompilerCache {
    pub fn new(loader: impl SessionLoader + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the session for `version` on `toolchain`, loading it on first request.
    ///
    /// Loading happens under the cache lock, so concurrent requests for a key load it only once.
    pub fn session(
        &self,
        version: &Version,
        toolchain: Toolchain,
    ) -> Result<Arc<dyn CompilerSession>, CompileError> {
        let key = CompilerKey {
            version: version.clone(),
            toolchain,
        };
        let mut sessions = self.sessions.lock();
        if let Some(session) = sessions.get(&key) {
            return Ok(session.clone());
        }

        let session = self.loader.load(&key)?;
        debug!(%key, cached = sessions.len() + 1, "Cached compiler session");
        sessions.insert(key, session.clone());
        Ok(session)
    }
}

impl fmt::Debug for CompilerCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompilerCache")
            .field("sessions", &self.sessions.lock().keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(any(feature = "test-doubles", test))]
pub mod test_doubles {
    use {
        super::*,
        std::sync::atomic::{AtomicUsize, Ordering},
    };

    /// A session answering every input with the same output.
    #[derive(Debug, Clone)]
    pub struct StaticSession {
        pub output: CompilerOutput,
        pub calls: Arc<AtomicUsize>,
    }

    impl CompilerSession for StaticSession {
        fn compile(&self, _: &CompilerInput) -> Result<CompilerOutput, CompileError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.output.clone())
        }
    }

    /// Serves [`StaticSession`]s registered per key and counts loads.
    #[derive(Debug, Default)]
    pub struct StaticLoader {
        outputs: HashMap<CompilerKey, CompilerOutput>,
        pub loads: Arc<AtomicUsize>,
        pub compilations: Arc<AtomicUsize>,
    }

    impl StaticLoader {
        pub fn with(mut self, version: &str, toolchain: Toolchain, output: CompilerOutput) -> Self {
            let version = version.parse().expect("Test version should be valid");
            self.outputs.insert(CompilerKey { version, toolchain }, output);
            self
        }
    }

    impl SessionLoader for StaticLoader {
        fn load(&self, key: &CompilerKey) -> Result<Arc<dyn CompilerSession>, CompileError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            let output = self
                .outputs
                .get(key)
                .cloned()
                .ok_or_else(|| CompileError::MissingCompiler {
                    toolchain: key.toolchain,
                    version: key.version.to_string(),
                })?;

            Ok(Arc::new(StaticSession {
                output,
                calls: self.compilations.clone(),
            }))
        }
    }
}
