//! Content hashes for source files. A plan records the hash of the text it was computed
//! from so a commit can refuse to overwrite a file that changed in the meantime.

use sha2::{Digest, Sha256};

/// A SHA-256 content hash.
pub type ContentHash = [u8; 32];

pub fn hash_text(text: &str) -> ContentHash {
    Sha256::digest(text.as_bytes()).into()
}

/// Lowercase hex rendering, used in logs and the revert journal.
pub fn to_hex(hash: &ContentHash) -> String {
    hash.iter().map(|b| format!("{b:02x}")).collect()
}
