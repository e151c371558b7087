pub use alloy::primitives::{Address, B256, Bytes, U256, keccak256};

use alloy::primitives::b256;

/// Keccak-256 hash of empty bytes, the code hash of every account without code.
pub const KECCAK_EMPTY: B256 = b256!("c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470");

/// Root hash of an empty Merkle-Patricia trie, the storage root of every account without storage.
pub const EMPTY_ROOT_HASH: B256 = b256!("56e81f171bcc55a6ff8345e692c0f86e5b48e01b996cadc001622fb5e363b421");

/// Number of leading zero bytes shared by every address of the reserved precompile range.
const PRECOMPILE_PREFIX_LEN: usize = 19;

/// Renders a value the way every record of a state dump spells it: `0x` prefixed lower-case hex.
pub trait ToHexString {
    fn to_hex_string(&self) -> String;
}

impl<T: AsRef<[u8]> + ?Sized> ToHexString for T {
    fn to_hex_string(&self) -> String {
        format!("0x{}", hex::encode(self.as_ref()))
    }
}

/// Checks that `value` is hex made of lower-case digits only, with an optional `0x` prefix.
///
/// An empty string after the prefix counts as hex, as it encodes zero bytes.
pub fn is_lower_hex(value: &str) -> bool {
    strip_hex_prefix(value)
        .bytes()
        .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

pub fn strip_hex_prefix(value: &str) -> &str {
    value.strip_prefix("0x").unwrap_or(value)
}

/// Decodes a hex string with an optional `0x` prefix.
pub fn decode_hex(value: &str) -> Result<Vec<u8>, hex::FromHexError> {
    hex::decode(strip_hex_prefix(value))
}

/// Hashes `code` with Keccak-256 and renders it as a dump code hash.
pub fn code_hash(code: &[u8]) -> String {
    keccak256(code).to_hex_string()
}

/// Checks if `address` lies in the reserved precompile range `0x00..00` to `0x00..ff`.
///
/// Malformed addresses are never precompiles.
pub fn is_precompile(address: &str) -> bool {
    address
        .parse::<Address>()
        .is_ok_and(|address| {
            address.as_slice()[..PRECOMPILE_PREFIX_LEN]
                .iter()
                .all(|b| *b == 0)
        })
}
