use {
    crate::{Account, DumpError, StateDump},
    serde::Deserialize,
    std::{
        collections::BTreeMap,
        fs::File,
        io::{BufRead, BufReader},
        path::Path,
    },
    tracing::{debug, info, warn},
};

const PROGRESS_INTERVAL: usize = 1_000_000;

#[derive(Deserialize)]
struct RootRecord {
    root: String,
}

/// Reads the state dump stored at `path`. See [`read_dump`].
pub fn load_dump(path: impl AsRef<Path>) -> Result<StateDump, DumpError> {
    let path = path.as_ref();
    info!(path = %path.display(), "Reading state dump");

    let dump = read_dump(BufReader::new(File::open(path)?))?;

    info!(accounts = dump.len(), root = %dump.root, "Finished reading state dump");
    Ok(dump)
}

/// Builds a [`StateDump`] out of a line-delimited JSON export in a single forward pass.
///
/// The first non-blank line holds the state root, every following one holds an account. Lines are
/// parsed one at a time so the export is never held in memory as a whole.
pub fn read_dump(reader: impl BufRead) -> Result<StateDump, DumpError> {
    let mut root = None;
    let mut accounts = BTreeMap::new();

    for (index, line) in reader.lines().enumerate() {
        let number = index + 1;
        let line = line.map_err(|source| DumpError::Read {
            line: number,
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let parse_error = |source| DumpError::Parse {
            line: number,
            source,
        };

        if root.is_none() {
            let record: RootRecord = serde_json::from_str(&line).map_err(parse_error)?;
            root.replace(record.root);
            continue;
        }

        let account: Account = serde_json::from_str(&line).map_err(parse_error)?;
        if let Some(previous) = accounts.insert(account.address.clone(), account) {
            warn!(address = %previous.address, line = number, "Duplicate account in state dump");
        }

        if number % PROGRESS_INTERVAL == 0 {
            debug!(lines = number, "Reading state dump");
        }
    }

    Ok(StateDump {
        root: root.ok_or(DumpError::MissingRoot)?,
        accounts,
    })
}
