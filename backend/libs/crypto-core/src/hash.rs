use sha2::{Digest, Sha256};

/// SHA256 over several byte slices, hex encoded.
///
/// Used to derive content addressed file names from the payload plus a salt
/// such as the upload timestamp.
pub fn sha256_hex(parts: &[&[u8]]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hex::encode(hasher.finalize())
}
