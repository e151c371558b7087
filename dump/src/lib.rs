pub use {
    account::{Account, Storage, storage_root},
    error::{DumpError, ValidationError, Violation, ViolationKind},
    genesis::{GenesisAccount, GenesisState},
    reader::{load_dump, read_dump},
    validate::validate,
};

use std::collections::BTreeMap;

mod account;
mod error;
mod genesis;
mod reader;
mod validate;

/// A legacy chain state export: its state root and every account keyed by lower-case address.
///
/// Built once by the reader and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateDump {
    pub root: String,
    pub accounts: BTreeMap<String, Account>,
}

impl StateDump {
    pub fn get(&self, address: &str) -> Option<&Account> {
        self.accounts.get(address)
    }

    pub fn contains(&self, address: &str) -> bool {
        self.accounts.contains_key(address)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
