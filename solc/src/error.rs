use {
    crate::{CompilerKey, Toolchain},
    thiserror::Error,
};

/// Failure to turn an archived source record into a compiler input.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Optimizer runs `{0}` is not a decimal number")]
    InvalidRuns(String),
    #[error("Source with a `language` field is not a valid compiler input: {0}")]
    InvalidInput(#[source] serde_json::Error),
}

/// Failure to load the archived source dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to read source dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse source dataset: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failure to compile a resolved input or to extract the intended artifact.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Unknown compiler version `{0}`")]
    UnknownVersion(String),
    #[error("No {toolchain} compiler available for version {version}")]
    MissingCompiler {
        toolchain: Toolchain,
        version: String,
    },
    #[error("Compiler {key} failed to run: {reason}")]
    Session { key: CompilerKey, reason: String },
    #[error("Compiler produced no output: {0}")]
    NoOutput(String),
    #[error("Compiler output has no contract `{contract}` in file `{file}`")]
    MissingArtifact { file: String, contract: String },
    #[error("Contract `{0}` requires library linking")]
    LibraryLinking(String),
    #[error("Bytecode of `{contract}` is not hex: {source}")]
    InvalidBytecode {
        contract: String,
        #[source]
        source: hex::FromHexError,
    },
}

/// Failure to carry immutable values from the historical bytecode into the recompiled one.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RelocationError {
    #[error("Immutable {0} has no references in the paired compilation")]
    MissingReference(String),
    #[error("Immutable {id} occurs {new} times but {paired} times in the paired compilation")]
    OccurrenceMismatch {
        id: String,
        new: usize,
        paired: usize,
    },
    #[error("Immutable {id} occurrence {index} is {new} bytes long but {paired} bytes long in the paired compilation")]
    LengthMismatch {
        id: String,
        index: usize,
        new: usize,
        paired: usize,
    },
    #[error("Immutable {id} occurrence {index} range {start}+{length} exceeds bytecode of {size} bytes")]
    OutOfBounds {
        id: String,
        index: usize,
        start: usize,
        length: usize,
        size: usize,
    },
    #[error("Splicing immutable {id} changed bytecode length from {expected} to {actual}")]
    LengthChanged {
        id: String,
        expected: usize,
        actual: usize,
    },
}
