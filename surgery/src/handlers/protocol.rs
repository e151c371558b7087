use {
    crate::{CodeSource, HandlerError, SurgeryDataSources},
    regenesis_dump::Account,
    regenesis_shared::primitives::{Address, Bytes, ToHexString, code_hash},
    tracing::debug,
};

/// Moves a pool to its new chain address and takes the code deployed there.
pub async fn pool<C: CodeSource>(
    account: &Account,
    sources: &SurgeryDataSources<C>,
) -> Result<Account, HandlerError> {
    let new_address = sources
        .pools
        .get(&account.address)
        .ok_or(HandlerError::MissingPoolAddress)?;
    let code = fetch_code(&sources.new_chain, new_address).await?;
    debug!(from = %account.address, to = %new_address, "Relocated pool");

    Ok(Account {
        address: new_address.to_string(),
        code: Some(code.to_hex_string()),
        code_hash: code_hash(&code),
        ..account.clone()
    })
}

/// Takes the code the protocol contract has on the legacy mainnet.
pub async fn other<C: CodeSource>(
    account: &Account,
    sources: &SurgeryDataSources<C>,
) -> Result<Account, HandlerError> {
    let code = fetch_code(&sources.legacy_mainnet, &account.address).await?;

    Ok(Account {
        code: Some(code.to_hex_string()),
        code_hash: code_hash(&code),
        ..account.clone()
    })
}

/// Fetches the code at `address`, which must not be empty.
pub(super) async fn fetch_code<C: CodeSource>(
    client: &C,
    address: &str,
) -> Result<Bytes, HandlerError> {
    let parsed: Address = address
        .parse()
        .map_err(|_| HandlerError::InvalidAddress(address.to_string()))?;
    let code = client.code_at(parsed).await?;
    if code.is_empty() {
        return Err(HandlerError::EmptyCode {
            client: client.name().to_string(),
            address: address.to_string(),
        });
    }

    Ok(code)
}
