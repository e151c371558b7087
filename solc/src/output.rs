use {
    serde::{Deserialize, Serialize},
    serde_json::{Map, Value},
    std::collections::BTreeMap,
};

/// Immutable id to every byte range of the deployed bytecode holding its value.
///
/// The id is the AST id of the immutable variable, stable across toolchains for the same source.
pub type ImmutableReferences = BTreeMap<String, Vec<ImmutableRange>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImmutableRange {
    pub start: usize,
    pub length: usize,
}

/// A compiler standard JSON output document, reduced to what the surgery consumes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompilerOutput {
    /// `file -> contract -> output`. Missing when the compiler produced no output at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contracts: Option<BTreeMap<String, BTreeMap<String, ContractOutput>>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<Diagnostic>,
}

impl CompilerOutput {
    /// Every diagnostic of `error` severity joined into one line.
    pub fn error_summary(&self) -> String {
        let errors: Vec<_> = self
            .errors
            .iter()
            .filter(|diagnostic| diagnostic.severity == "error")
            .map(|diagnostic| {
                diagnostic
                    .formatted_message
                    .as_deref()
                    .unwrap_or(&diagnostic.message)
                    .trim()
            })
            .collect();

        if errors.is_empty() {
            "no diagnostics".to_string()
        } else {
            errors.join("; ")
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evm: Option<EvmOutput>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvmOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployed_bytecode: Option<DeployedBytecode>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployedBytecode {
    pub object: String,
    #[serde(default)]
    pub immutable_references: ImmutableReferences,
    #[serde(default)]
    pub link_references: Map<String, Value>,
}

impl DeployedBytecode {
    /// Checks for unresolved library placeholders of the form `__$<hash>$__`.
    pub fn needs_linking(&self) -> bool {
        self.object.contains("__$") || !self.link_references.is_empty()
    }
}
