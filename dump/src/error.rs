use {std::fmt, thiserror::Error};

/// Failure to turn a state export into a [`crate::StateDump`].
#[derive(Debug, Error)]
pub enum DumpError {
    #[error("Failed to read state dump: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to read state dump line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: std::io::Error,
    },
    #[error("State dump line {line} is not a valid record: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("State dump has no root record")]
    MissingRoot,
    #[error("Failed to parse genesis file: {0}")]
    Genesis(serde_json::Error),
}

/// Every dump invariant violation found by [`crate::validate`].
#[derive(Debug, Error)]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "State dump has {} invariant violations", self.violations.len())?;
        for violation in &self.violations {
            write!(f, "\n  {violation}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{address}: field `{field}` {kind}")]
pub struct Violation {
    pub address: String,
    pub field: &'static str,
    pub kind: ViolationKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViolationKind {
    #[error("is not lower-case hex: {0}")]
    NotLowerHex(String),
    #[error("must be zero outside the precompile range, got {0}")]
    NonZeroBalance(String),
    #[error("is not a decimal number: {0}")]
    NotDecimal(String),
}
