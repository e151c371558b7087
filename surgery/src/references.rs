use {
    crate::ReferenceError,
    serde::Deserialize,
    std::{
        collections::{BTreeMap, BTreeSet, HashMap},
        fs::File,
        io::BufReader,
        path::Path,
    },
    tracing::info,
};

/// Address lists and code hashes that decide the category of an account before its code is
/// looked at.
///
/// Every address and hash is lower-cased on load to match the state dump spelling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReferenceSets {
    /// Native asset predeploy of the new chain.
    pub predeploy_eth: Option<String>,
    pub predeploy_weth: Option<String>,
    /// Legacy native asset contract whose storage the native asset predeploy inherits. Defaults
    /// to the predeploy address itself.
    pub legacy_eth: Option<String>,
    pub predeploy_dead: BTreeSet<String>,
    pub predeploy_wipe: BTreeSet<String>,
    pub predeploy_no_wipe: BTreeSet<String>,
    pub protocol_factory: BTreeSet<String>,
    pub protocol_position_manager: BTreeSet<String>,
    pub protocol_libraries: BTreeSet<String>,
    pub protocol_other: BTreeSet<String>,
    /// Code hashes of proxy contracts standing in for externally owned accounts.
    pub eoa_code_hashes: BTreeSet<String>,
}

impl ReferenceSets {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReferenceError> {
        let path = path.as_ref();
        info!(path = %path.display(), "Reading reference sets");

        let sets: Self = serde_json::from_reader(BufReader::new(File::open(path)?))?;
        Ok(sets.normalized())
    }

    pub fn normalized(self) -> Self {
        let lower = |set: BTreeSet<String>| set.into_iter().map(|s| s.to_lowercase()).collect();

        Self {
            predeploy_eth: self.predeploy_eth.map(|s| s.to_lowercase()),
            predeploy_weth: self.predeploy_weth.map(|s| s.to_lowercase()),
            legacy_eth: self.legacy_eth.map(|s| s.to_lowercase()),
            predeploy_dead: lower(self.predeploy_dead),
            predeploy_wipe: lower(self.predeploy_wipe),
            predeploy_no_wipe: lower(self.predeploy_no_wipe),
            protocol_factory: lower(self.protocol_factory),
            protocol_position_manager: lower(self.protocol_position_manager),
            protocol_libraries: lower(self.protocol_libraries),
            protocol_other: lower(self.protocol_other),
            eoa_code_hashes: lower(self.eoa_code_hashes),
        }
    }

    /// Fails on the first address that belongs to more than one category, pool addresses
    /// included.
    pub fn check_disjoint(&self, pools: &PoolAddresses) -> Result<(), ReferenceError> {
        let singles = [
            ("predeployEth", &self.predeploy_eth),
            ("predeployWeth", &self.predeploy_weth),
        ]
        .into_iter()
        .flat_map(|(name, address)| address.iter().map(move |a| (name, a)));
        let sets = [
            ("predeployDead", &self.predeploy_dead),
            ("predeployWipe", &self.predeploy_wipe),
            ("predeployNoWipe", &self.predeploy_no_wipe),
            ("protocolFactory", &self.protocol_factory),
            ("protocolPositionManager", &self.protocol_position_manager),
            ("protocolLibraries", &self.protocol_libraries),
            ("protocolOther", &self.protocol_other),
        ]
        .into_iter()
        .flat_map(|(name, set)| set.iter().map(move |a| (name, a)));
        let pools = pools.legacy_addresses().map(|a| ("protocolPool", a));

        let mut seen = HashMap::new();
        for (name, address) in singles.chain(sets).chain(pools) {
            if let Some(first) = seen.insert(address.as_str(), name) {
                return Err(ReferenceError::Overlap {
                    address: address.clone(),
                    first,
                    second: name,
                });
            }
        }

        Ok(())
    }
}

/// Legacy address to new chain address of every protocol pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct PoolAddresses(BTreeMap<String, String>);

impl PoolAddresses {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReferenceError> {
        let path = path.as_ref();
        info!(path = %path.display(), "Reading pool addresses");

        let pools: BTreeMap<String, String> =
            serde_json::from_reader(BufReader::new(File::open(path)?))?;
        Ok(pools.into_iter().collect())
    }

    pub fn get(&self, legacy: &str) -> Option<&str> {
        self.0.get(legacy).map(String::as_str)
    }

    pub fn contains(&self, legacy: &str) -> bool {
        self.0.contains_key(legacy)
    }

    pub fn legacy_addresses(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for PoolAddresses {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(legacy, new)| {
                    (
                        legacy.as_ref().to_lowercase(),
                        new.as_ref().to_lowercase(),
                    )
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use {super::*, std::io::Write, test_case::test_case};

    const A: &str = "0x00000000000000000000000000000000000000aa";
    const B: &str = "0x00000000000000000000000000000000000000bb";

    #[test]
    fn test_reference_file_is_lower_cased_on_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"predeployEth": "0x4200000000000000000000000000000000000006",
                "predeployDead": ["0x00000000000000000000000000000000000000AA"],
                "eoaCodeHashes": ["0xABCD"]}}"#
        )
        .unwrap();

        let sets = ReferenceSets::load(file.path()).unwrap();

        assert_eq!(
            sets.predeploy_eth.as_deref(),
            Some("0x4200000000000000000000000000000000000006")
        );
        assert!(sets.predeploy_dead.contains(A));
        assert!(sets.eoa_code_hashes.contains("0xabcd"));
        assert!(sets.protocol_other.is_empty());
    }

    #[test]
    fn test_pool_file_maps_legacy_to_new_address() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"0x00000000000000000000000000000000000000AA": "{B}"}}"#).unwrap();

        let pools = PoolAddresses::load(file.path()).unwrap();

        assert_eq!(pools.len(), 1);
        assert_eq!(pools.get(A), Some(B));
    }

    #[test_case(
        ReferenceSets { predeploy_dead: BTreeSet::from([A.to_string()]), ..Default::default() },
        PoolAddresses::default();
        "Disjoint"
    )]
    #[test_case(
        ReferenceSets { protocol_other: BTreeSet::from([A.to_string()]), ..Default::default() },
        PoolAddresses::from_iter([(B, A)]);
        "New pool address is not a legacy category"
    )]
    fn test_disjoint_sets_pass(sets: ReferenceSets, pools: PoolAddresses) {
        sets.check_disjoint(&pools).unwrap();
    }

    #[test_case(
        ReferenceSets {
            predeploy_wipe: BTreeSet::from([A.to_string()]),
            predeploy_no_wipe: BTreeSet::from([A.to_string()]),
            ..Default::default()
        },
        PoolAddresses::default(),
        ("predeployWipe", "predeployNoWipe");
        "Two predeploy modes"
    )]
    #[test_case(
        ReferenceSets { predeploy_eth: Some(A.to_string()), ..Default::default() },
        PoolAddresses::from_iter([(A, B)]),
        ("predeployEth", "protocolPool");
        "Predeploy and pool"
    )]
    fn test_address_in_two_categories_is_rejected(
        sets: ReferenceSets,
        pools: PoolAddresses,
        expected: (&str, &str),
    ) {
        let error = sets.check_disjoint(&pools).unwrap_err();

        assert!(matches!(
            error,
            ReferenceError::Overlap { address, first, second }
                if address == A && (first, second) == expected
        ));
    }
}
