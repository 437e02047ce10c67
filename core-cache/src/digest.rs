//! Content digests.
//!
//! SHA-256 over raw bytes, rendered as lowercase hex. Digest string equality
//! (case-normalized) is the sole correctness oracle for "is this blob the one
//! the manifest describes", both for freshly downloaded content and for
//! re-verifying what is already cached.

use sha2::{Digest, Sha256};

/// Compute the SHA-256 digest of `data` as a lowercase hex string.
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// Compare two hex digest strings, ignoring case.
pub fn digests_match(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vectors() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn deterministic() {
        let data = b"the same bytes";
        assert_eq!(sha256_hex(data), sha256_hex(data));
    }

    #[test]
    fn case_differing_digests_compare_equal() {
        let lower = sha256_hex(b"abc");
        let upper = lower.to_uppercase();
        assert!(digests_match(&lower, &upper));
    }

    #[test]
    fn different_content_differs() {
        assert_ne!(sha256_hex(b"a"), sha256_hex(b"b"));
        assert!(!digests_match(&sha256_hex(b"a"), &sha256_hex(b"b")));
    }
}
