pub use {
    compile::{Artifact, compile, select_artifact},
    error::{CompileError, DatasetError, RelocationError, ResolveError},
    etherscan::{EtherscanContract, EtherscanDataset},
    immutables::relocate_immutables,
    input::{CompilerInput, Optimizer, OutputSelection, SOLIDITY, Settings, SourceUnit},
    output::{
        CompilerOutput, ContractOutput, DeployedBytecode, Diagnostic, EvmOutput, ImmutableRange,
        ImmutableReferences,
    },
    resolve::{DEFAULT_FILE_KEY, resolve_input},
    session::{
        CompilerCache, CompilerKey, CompilerSession, SessionLoader, SolcBinary, SolcDirectory,
        Toolchain, Version,
    },
};

#[cfg(any(feature = "test-doubles", test))]
pub use session::test_doubles;

mod compile;
mod error;
mod etherscan;
mod immutables;
mod input;
mod output;
mod resolve;
mod session;
