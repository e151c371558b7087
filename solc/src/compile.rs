use {
    crate::{
        CompileError, CompilerInput, CompilerOutput, CompilerSession, DEFAULT_FILE_KEY,
        EtherscanContract, ImmutableReferences,
    },
    regenesis_shared::primitives::decode_hex,
};

/// The deployed bytecode of one compiled contract and the byte ranges of its immutables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub bytecode: Vec<u8>,
    pub immutable_references: ImmutableReferences,
}

impl Artifact {
    pub fn has_immutables(&self) -> bool {
        self.immutable_references
            .values()
            .any(|ranges| !ranges.is_empty())
    }
}

/// Compiles `input` with `session` and extracts the artifact of `contract`.
pub fn compile(
    session: &dyn CompilerSession,
    input: &CompilerInput,
    contract: &EtherscanContract,
) -> Result<Artifact, CompileError> {
    select_artifact(session.compile(input)?, contract)
}

/// Picks the artifact of `contract` out of a compiler output.
///
/// Multi-file bundles are looked up under the archived file name. Single-file sources have no
/// recorded name and were resolved under [`DEFAULT_FILE_KEY`].
pub fn select_artifact(
    output: CompilerOutput,
    contract: &EtherscanContract,
) -> Result<Artifact, CompileError> {
    let summary = output.error_summary();
    let mut contracts = output
        .contracts
        .filter(|contracts| !contracts.is_empty())
        .ok_or(CompileError::NoOutput(summary))?;
    let file = contract.file_name().unwrap_or(DEFAULT_FILE_KEY);
    let name = &contract.contract_name;

    let deployed = contracts
        .remove(file)
        .and_then(|mut in_file| in_file.remove(name))
        .and_then(|output| output.evm)
        .and_then(|evm| evm.deployed_bytecode)
        .ok_or_else(|| CompileError::MissingArtifact {
            file: file.to_string(),
            contract: name.clone(),
        })?;

    if deployed.needs_linking() {
        return Err(CompileError::LibraryLinking(name.clone()));
    }
    let bytecode =
        decode_hex(&deployed.object).map_err(|source| CompileError::InvalidBytecode {
            contract: name.clone(),
            source,
        })?;

    Ok(Artifact {
        bytecode,
        immutable_references: deployed.immutable_references,
    })
}

#[cfg(test)]
mod tests {
    use {super::*, serde_json::json, test_case::test_case};

    fn contract(file_name: Option<&str>) -> EtherscanContract {
        EtherscanContract {
            contract_address: "0x00000000000000000000000000000000000000cc".to_string(),
            source_code: String::new(),
            compiler_version: "v0.7.6+commit.7338295f".to_string(),
            optimization_used: "0".to_string(),
            runs: "200".to_string(),
            contract_name: "Counter".to_string(),
            contract_file_name: file_name.map(str::to_string),
        }
    }

    fn output(file: &str, object: &str) -> CompilerOutput {
        serde_json::from_value(json!({
            "contracts": {
                file: {
                    "Counter": {
                        "evm": {
                            "deployedBytecode": {
                                "object": object,
                                "immutableReferences": {"7": [{"start": 1, "length": 2}]}
                            }
                        }
                    }
                }
            }
        }))
        .unwrap()
    }

    #[test_case(None, DEFAULT_FILE_KEY; "Single file under default key")]
    #[test_case(Some("contracts/Counter.sol"), "contracts/Counter.sol"; "Multi file under archived name")]
    fn test_artifact_is_selected_by_file_and_contract(file_name: Option<&str>, file: &str) {
        let artifact = select_artifact(output(file, "6080ff00"), &contract(file_name)).unwrap();

        assert_eq!(artifact.bytecode, [0x60, 0x80, 0xff, 0x00]);
        assert!(artifact.has_immutables());
    }

    #[test]
    fn test_artifact_under_other_file_is_missing() {
        let error = select_artifact(output("Other.sol", "6080"), &contract(None)).unwrap_err();

        assert!(matches!(error, CompileError::MissingArtifact { file, .. } if file == DEFAULT_FILE_KEY));
    }

    #[test]
    fn test_output_without_contracts_reports_compiler_errors() {
        let output: CompilerOutput = serde_json::from_value(json!({
            "errors": [{"severity": "error", "message": "ParserError: Expected ';'"}]
        }))
        .unwrap();

        let error = select_artifact(output, &contract(None)).unwrap_err();

        assert!(matches!(error, CompileError::NoOutput(summary) if summary.contains("ParserError")));
    }

    #[test]
    fn test_library_placeholder_requires_linking() {
        let object = "6080__$3f2a1c0e8f7d6b5a4c3b2a1908f7e6d5c4$__00";

        let error = select_artifact(output(DEFAULT_FILE_KEY, object), &contract(None)).unwrap_err();

        assert!(matches!(error, CompileError::LibraryLinking(_)));
    }
}
