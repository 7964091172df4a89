//! Fingerprinting of resolved variants.

use sha2::{Digest, Sha256};

/// A hasher for building fingerprints from multiple components.
#[derive(Default)]
pub struct Fingerprint {
    hasher: Sha256,
}

impl Fingerprint {
    /// Create a new fingerprint builder.
    pub fn new() -> Self {
        Fingerprint {
            hasher: Sha256::new(),
        }
    }

    /// Add a string component to the fingerprint.
    pub fn update_str(&mut self, s: &str) -> &mut Self {
        self.hasher.update(s.as_bytes());
        self.hasher.update(b"\0");
        self
    }

    /// Add a `key=value` pair.
    pub fn update_pair(&mut self, key: &str, value: &str) -> &mut Self {
        self.update_str(key).update_str(value)
    }

    /// Add a boolean component.
    pub fn update_bool(&mut self, b: bool) -> &mut Self {
        self.hasher.update([b as u8]);
        self
    }

    /// Finalize and return the fingerprint as a hex string.
    pub fn finish(self) -> String {
        hex::encode(self.hasher.finalize())
    }

    /// Finalize and return a short fingerprint (first 16 chars).
    pub fn finish_short(self) -> String {
        self.finish()[..16].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_fingerprint_is_sha256_of_nothing() {
        assert_eq!(
            Fingerprint::new().finish(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let make = || {
            let mut fp = Fingerprint::new();
            fp.update_pair("os", "Linux").update_bool(true);
            fp.finish_short()
        };

        assert_eq!(make(), make());
        assert_eq!(make().len(), 16);
    }

    #[test]
    fn test_separator_prevents_collisions() {
        let mut a = Fingerprint::new();
        a.update_str("ab").update_str("c");

        let mut b = Fingerprint::new();
        b.update_str("a").update_str("bc");

        assert_ne!(a.finish(), b.finish());
    }
}
