use {
    alloy_trie::root::storage_root_unhashed,
    regenesis_shared::primitives::{
        B256, EMPTY_ROOT_HASH, KECCAK_EMPTY, ToHexString, U256, strip_hex_prefix,
    },
    serde::{Deserialize, Serialize},
    std::collections::BTreeMap,
};

/// Storage of an account, 32-byte hex slot keys mapped to 32-byte hex values.
pub type Storage = BTreeMap<String, String>;

/// Computes the Merkle-Patricia root of `storage` as a dump storage root.
///
/// Zero values are not part of the trie. Returns `None` if a slot key or value is not hex.
pub fn storage_root(storage: &Storage) -> Option<String> {
    let slots = storage
        .iter()
        .map(|(key, value)| {
            let key: B256 = key.parse().ok()?;
            let value = U256::from_str_radix(strip_hex_prefix(value), 16).ok()?;
            Some((key, value))
        })
        .collect::<Option<Vec<_>>>()?;

    let root = storage_root_unhashed(slots.into_iter().filter(|(_, value)| !value.is_zero()));
    Some(root.to_hex_string())
}

/// One account record of a state dump.
///
/// The dump spells the storage root as `root`. The transport-only `key` field of a dump line is
/// not part of the record and is dropped on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub address: String,
    pub nonce: u64,
    pub balance: String,
    #[serde(rename = "codeHash")]
    pub code_hash: String,
    pub root: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<Storage>,
}

impl Account {
    /// Checks if the record carries any bytecode. Both a missing `code` and `0x` mean no code.
    pub fn has_code(&self) -> bool {
        self.code
            .as_deref()
            .is_some_and(|code| !code.is_empty() && code != "0x")
    }

    /// The same account with code and storage stripped and both hashes set to their empty
    /// values.
    pub fn without_code_and_storage(&self) -> Self {
        Self {
            code: None,
            storage: None,
            code_hash: KECCAK_EMPTY.to_hex_string(),
            root: EMPTY_ROOT_HASH.to_hex_string(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::*, test_case::test_case};

    fn account(code: Option<&str>) -> Account {
        Account {
            address: "0x00000000000000000000000000000000000000aa".to_string(),
            nonce: 0,
            balance: "0".to_string(),
            code_hash: KECCAK_EMPTY.to_hex_string(),
            root: EMPTY_ROOT_HASH.to_hex_string(),
            code: code.map(str::to_string),
            storage: None,
        }
    }

    #[test_case(None, false; "Missing")]
    #[test_case(Some(""), false; "Empty")]
    #[test_case(Some("0x"), false; "Prefix only")]
    #[test_case(Some("0x6080"), true; "Bytecode")]
    fn test_account_has_code_only_with_non_empty_bytecode(code: Option<&str>, expected: bool) {
        assert_eq!(account(code).has_code(), expected);
    }

    #[test]
    fn test_storage_root_of_zero_slots_is_empty_root() {
        let storage = Storage::from([(B256::ZERO.to_hex_string(), "0x0".to_string())]);

        assert_eq!(storage_root(&storage), Some(EMPTY_ROOT_HASH.to_hex_string()));
    }

    #[test]
    fn test_storage_root_ignores_value_padding() {
        let key = B256::with_last_byte(1).to_hex_string();
        let short = Storage::from([(key.clone(), "0x02".to_string())]);
        let padded = Storage::from([(key, B256::with_last_byte(2).to_hex_string())]);

        assert_eq!(storage_root(&short), storage_root(&padded));
        assert_ne!(storage_root(&short), Some(EMPTY_ROOT_HASH.to_hex_string()));
    }

    #[test]
    fn test_storage_root_rejects_malformed_slot() {
        let storage = Storage::from([("0x01".to_string(), "0x01".to_string())]);

        assert_eq!(storage_root(&storage), None);
    }

    #[test]
    fn test_dump_line_drops_key_and_keeps_address() {
        let line = r#"{"address":"0x00000000000000000000000000000000000000aa","key":"0x01","nonce":1,"balance":"0","codeHash":"0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470","root":"0x56e81f171bcc55a6ff8345e692c0f86e5b48e01b996cadc001622fb5e363b421"}"#;

        let actual: Account = serde_json::from_str(line).unwrap();
        let json = serde_json::to_value(&actual).unwrap();

        assert_eq!(actual.nonce, 1);
        assert!(json.get("key").is_none());
        assert!(json.get("code").is_none());
        assert_eq!(json["codeHash"], actual.code_hash);
    }
}
