use {
    crate::{
        CompilerInput, EtherscanContract, Optimizer, ResolveError, Settings, SourceUnit,
    },
    serde_json::{Map, Value},
    std::collections::BTreeMap,
};

/// File key of a single-file source, the archive does not record its real name.
pub const DEFAULT_FILE_KEY: &str = "file";

/// Normalizes the archived source of `contract` into a compiler standard JSON input.
///
/// The archive stores sources in three shapes:
/// * A complete compiler input, recognized by its `language` field. Returned as is, or rejected
///   if it does not parse as one.
/// * A `file -> { content }` map. Becomes the `sources` of a new input.
/// * Plain Solidity. Becomes the single source under [`DEFAULT_FILE_KEY`].
///
/// JSON shapes may be wrapped in an extra pair of braces, which is stripped before parsing.
/// Constructed inputs carry the archived optimizer settings and request every output.
pub fn resolve_input(contract: &EtherscanContract) -> Result<CompilerInput, ResolveError> {
    let source = contract.source_code.as_str();

    if let Ok(Value::Object(object)) = serde_json::from_str(unwrap_braces(source)) {
        if object.contains_key("language") {
            return serde_json::from_value(Value::Object(object))
                .map_err(ResolveError::InvalidInput);
        } else if let Some(sources) = as_sources(object) {
            return Ok(CompilerInput::solidity(sources, settings(contract)?));
        }
    }

    let sources = BTreeMap::from([(DEFAULT_FILE_KEY.to_string(), SourceUnit::new(source))]);
    Ok(CompilerInput::solidity(sources, settings(contract)?))
}

fn unwrap_braces(source: &str) -> &str {
    if !source.starts_with("{{") {
        return source;
    }
    let mut chars = source.chars();
    chars.next();
    chars.next_back();
    chars.as_str()
}

fn as_sources(object: Map<String, Value>) -> Option<BTreeMap<String, SourceUnit>> {
    if object.is_empty() {
        return None;
    }
    serde_json::from_value(Value::Object(object)).ok()
}

fn settings(contract: &EtherscanContract) -> Result<Settings, ResolveError> {
    let runs = contract
        .runs
        .parse()
        .map_err(|_| ResolveError::InvalidRuns(contract.runs.clone()))?;

    Ok(Settings::full_output(Optimizer {
        enabled: contract.optimizer_enabled(),
        runs: Some(runs),
        extra: Map::new(),
    }))
}
