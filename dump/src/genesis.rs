use {
    crate::{Account, DumpError, Storage},
    alloy::genesis::{Genesis, GenesisAccount as AllocAccount},
    alloy_trie::root::storage_root_unhashed,
    regenesis_shared::primitives::{Address, ToHexString, U256, code_hash},
    std::{collections::BTreeMap, fs::File, io::BufReader, path::Path},
    tracing::info,
};

/// An account of the new chain genesis allocation in state dump spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenesisAccount {
    pub address: String,
    pub nonce: u64,
    pub balance: String,
    pub code: Option<String>,
    pub code_hash: String,
    pub storage: Storage,
    pub root: String,
}

impl GenesisAccount {
    fn from_alloc(address: &Address, alloc: &AllocAccount) -> Self {
        let code = alloc.code.as_ref().filter(|code| !code.is_empty());
        let slots = alloc.storage.clone().unwrap_or_default();
        let root = storage_root_unhashed(
            slots
                .iter()
                .map(|(key, value)| (*key, U256::from_be_bytes(value.0)))
                .filter(|(_, value)| !value.is_zero()),
        );

        Self {
            address: address.to_hex_string(),
            nonce: alloc.nonce.unwrap_or_default(),
            balance: alloc.balance.to_string(),
            code: code.map(|code| code.to_hex_string()),
            code_hash: code_hash(code.map_or(&[][..], |code| &code[..])),
            storage: slots
                .iter()
                .map(|(key, value)| (key.to_hex_string(), value.to_hex_string()))
                .collect(),
            root: root.to_hex_string(),
        }
    }

    /// The account as a state dump record, as it appears in the new chain genesis.
    pub fn to_account(&self) -> Account {
        Account {
            address: self.address.clone(),
            nonce: self.nonce,
            balance: self.balance.clone(),
            code_hash: self.code_hash.clone(),
            root: self.root.clone(),
            code: self.code.clone(),
            storage: (!self.storage.is_empty()).then(|| self.storage.clone()),
        }
    }
}

/// The genesis allocation of the new chain keyed by lower-case address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenesisState {
    accounts: BTreeMap<String, GenesisAccount>,
}

impl GenesisState {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DumpError> {
        let path = path.as_ref();
        info!(path = %path.display(), "Reading genesis file");

        let genesis: Genesis = serde_json::from_reader(BufReader::new(File::open(path)?))
            .map_err(DumpError::Genesis)?;

        Ok(Self::from(&genesis))
    }

    pub fn get(&self, address: &str) -> Option<&GenesisAccount> {
        self.accounts.get(address)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GenesisAccount> {
        self.accounts.values()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl From<&Genesis> for GenesisState {
    fn from(genesis: &Genesis) -> Self {
        Self {
            accounts: genesis
                .alloc
                .iter()
                .map(|(address, alloc)| {
                    let account = GenesisAccount::from_alloc(address, alloc);
                    (account.address.clone(), account)
                })
                .collect(),
        }
    }
}
