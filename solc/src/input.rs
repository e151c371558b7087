use {
    serde::{Deserialize, Serialize},
    serde_json::{Map, Value},
    std::collections::BTreeMap,
};

pub const SOLIDITY: &str = "Solidity";

/// A compiler standard JSON input document.
///
/// Fields not modelled here are kept in `extra` maps so an archived input passes through intact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompilerInput {
    pub language: String,
    pub sources: BTreeMap<String, SourceUnit>,
    #[serde(default)]
    pub settings: Settings,
}

impl CompilerInput {
    pub fn solidity(sources: BTreeMap<String, SourceUnit>, settings: Settings) -> Self {
        Self {
            language: SOLIDITY.to_string(),
            sources,
            settings,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceUnit {
    #[serde(default)]
    pub content: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SourceUnit {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            extra: Map::new(),
        }
    }
}

/// Output selection `file -> contract -> outputs`.
pub type OutputSelection = BTreeMap<String, BTreeMap<String, Vec<String>>>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimizer: Option<Optimizer>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub output_selection: OutputSelection,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Settings {
    /// Settings requesting every output of every contract in every file.
    pub fn full_output(optimizer: Optimizer) -> Self {
        let all = || BTreeMap::from([("*".to_string(), vec!["*".to_string()])]);

        Self {
            optimizer: Some(optimizer),
            output_selection: BTreeMap::from([("*".to_string(), all())]),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Optimizer {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runs: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
