use {
    crate::{HandlerError, PoolAddresses, ReferenceSets},
    regenesis_dump::{GenesisState, StateDump},
    regenesis_solc::{
        Artifact, CompilerCache, CompilerInput, EtherscanContract, EtherscanDataset, Toolchain,
        Version,
    },
    std::{sync::Arc, thread},
    tokio::sync::Semaphore,
};

/// Everything a handler may read. Shared by all account pipelines and never written to.
#[derive(Debug)]
pub struct SurgeryDataSources<C> {
    pub dump: StateDump,
    pub genesis: GenesisState,
    pub pools: PoolAddresses,
    pub etherscan: EtherscanDataset,
    pub references: ReferenceSets,
    pub legacy_l2: C,
    pub legacy_mainnet: C,
    pub new_chain: C,
    pub compilers: Arc<CompilerCache>,
    pub compile_limiter: Arc<Semaphore>,
}

/// A compile limiter allowing one compilation per available core.
pub fn compile_limiter() -> Arc<Semaphore> {
    let permits = thread::available_parallelism().map_or(1, usize::from);
    Arc::new(Semaphore::new(permits))
}

impl<C> SurgeryDataSources<C> {
    /// Compiles `input` on a blocking thread and extracts the artifact of `contract`.
    pub async fn compile(
        &self,
        version: &Version,
        toolchain: Toolchain,
        input: &CompilerInput,
        contract: &EtherscanContract,
    ) -> Result<Artifact, HandlerError> {
        let _permit = self
            .compile_limiter
            .acquire()
            .await
            .map_err(|e| HandlerError::Task(e.to_string()))?;
        let compilers = self.compilers.clone();
        let (version, input, contract) = (version.clone(), input.clone(), contract.clone());

        let artifact = tokio::task::spawn_blocking(move || {
            let session = compilers.session(&version, toolchain)?;
            regenesis_solc::compile(session.as_ref(), &input, &contract)
        })
        .await
        .map_err(|e| HandlerError::Task(e.to_string()))??;

        Ok(artifact)
    }
}
