use {
    super::protocol::fetch_code,
    crate::{CodeSource, HandlerError, SurgeryDataSources},
    regenesis_dump::Account,
    regenesis_shared::primitives::{ToHexString, code_hash, decode_hex},
    regenesis_solc::{Toolchain, Version, relocate_immutables, resolve_input},
    tracing::debug,
};

/// Recompiles the archived source with the upstream compiler and carries the immutable values
/// over from the code the contract runs on the legacy chain.
pub async fn recompile<C: CodeSource>(
    account: &Account,
    sources: &SurgeryDataSources<C>,
) -> Result<Account, HandlerError> {
    let contract = sources
        .etherscan
        .get(&account.address)
        .ok_or(HandlerError::MissingSource)?;
    let input = resolve_input(contract)?;
    let version: Version = contract.compiler_version.parse()?;

    let artifact = sources
        .compile(&version, Toolchain::Evm, &input, contract)
        .await?;
    let bytecode = if artifact.has_immutables() {
        // Only the paired compilation knows where the legacy code keeps each immutable
        let paired = sources
            .compile(&version, Toolchain::Ovm, &input, contract)
            .await?;
        let historical = historical_code(account, sources).await?;
        relocate_immutables(
            artifact.bytecode,
            &artifact.immutable_references,
            &paired.immutable_references,
            &historical,
        )?
    } else {
        artifact.bytecode
    };
    debug!(
        address = %account.address,
        contract = %contract.contract_name,
        %version,
        size = bytecode.len(),
        "Recompiled verified contract"
    );

    Ok(Account {
        code: Some(bytecode.to_hex_string()),
        code_hash: code_hash(&bytecode),
        ..account.clone()
    })
}

async fn historical_code<C: CodeSource>(
    account: &Account,
    sources: &SurgeryDataSources<C>,
) -> Result<Vec<u8>, HandlerError> {
    match account.code.as_deref() {
        Some(code) if account.has_code() => {
            decode_hex(code).map_err(|_| HandlerError::InvalidCode)
        }
        _ => Ok(fetch_code(&sources.legacy_l2, &account.address)
            .await?
            .to_vec()),
    }
}
