use {
    crate::error::DatasetError,
    serde::{Deserialize, Serialize},
    std::{collections::HashMap, fs::File, io::BufReader, path::Path},
    tracing::info,
};

/// A contract source archived by the block explorer verification service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EtherscanContract {
    pub contract_address: String,
    /// Plain Solidity, a JSON source bundle or a JSON compiler input, possibly wrapped in an
    /// extra pair of braces.
    pub source_code: String,
    pub compiler_version: String,
    /// `"1"` when the optimizer was enabled, `"0"` otherwise.
    pub optimization_used: String,
    pub runs: String,
    pub contract_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_file_name: Option<String>,
}

impl EtherscanContract {
    pub fn optimizer_enabled(&self) -> bool {
        self.optimization_used == "1"
    }

    /// The file the contract was archived under, if it came from a multi-file bundle.
    pub fn file_name(&self) -> Option<&str> {
        self.contract_file_name
            .as_deref()
            .filter(|name| !name.is_empty())
    }
}

/// Every archived contract source keyed by lower-case contract address.
#[derive(Debug, Clone, Default)]
pub struct EtherscanDataset {
    contracts: HashMap<String, EtherscanContract>,
}

impl EtherscanDataset {
    /// Reads a JSON array of [`EtherscanContract`] records.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let contracts: Vec<EtherscanContract> =
            serde_json::from_reader(BufReader::new(File::open(path)?))?;
        info!(path = %path.display(), contracts = contracts.len(), "Read verified sources");

        Ok(Self::from_iter(contracts))
    }

    pub fn get(&self, address: &str) -> Option<&EtherscanContract> {
        self.contracts.get(address)
    }

    pub fn contains(&self, address: &str) -> bool {
        self.contracts.contains_key(address)
    }

    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }
}

impl FromIterator<EtherscanContract> for EtherscanDataset {
    fn from_iter<T: IntoIterator<Item = EtherscanContract>>(iter: T) -> Self {
        Self {
            contracts: iter
                .into_iter()
                .map(|contract| (contract.contract_address.to_lowercase(), contract))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_is_keyed_by_lower_case_address() {
        let json = r#"[{
            "contractAddress": "0xAbCdEf0000000000000000000000000000000001",
            "sourceCode": "contract A {}",
            "compilerVersion": "v0.7.6+commit.7338295f",
            "optimizationUsed": "1",
            "runs": "200",
            "contractName": "A",
            "contractFileName": ""
        }]"#;
        let contracts: Vec<EtherscanContract> = serde_json::from_str(json).unwrap();

        let dataset = EtherscanDataset::from_iter(contracts);
        let contract = dataset
            .get("0xabcdef0000000000000000000000000000000001")
            .unwrap();

        assert!(contract.optimizer_enabled());
        assert_eq!(contract.file_name(), None);
    }
}
