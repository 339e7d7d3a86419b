//! One-way hashes applied to credential cache keys.

use std::fmt;
use std::str::FromStr;

use sha2::{Digest, Sha256, Sha384, Sha512};

use crate::error::ConfigError;

// == Hash Algorithm ==
/// Hash used to derive cache keys, so secrets are never held verbatim in the
/// cache's key space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    /// Hex-encoded digest of `input`.
    pub fn digest(&self, input: &[u8]) -> String {
        match self {
            HashAlgorithm::Sha256 => hex::encode(Sha256::digest(input)),
            HashAlgorithm::Sha384 => hex::encode(Sha384::digest(input)),
            HashAlgorithm::Sha512 => hex::encode(Sha512::digest(input)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha384 => "sha384",
            HashAlgorithm::Sha512 => "sha512",
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "").as_str() {
            "sha256" => Ok(HashAlgorithm::Sha256),
            "sha384" => Ok(HashAlgorithm::Sha384),
            "sha512" => Ok(HashAlgorithm::Sha512),
            _ => Err(ConfigError::UnsupportedHash(s.to_string())),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!("sha256".parse::<HashAlgorithm>(), Ok(HashAlgorithm::Sha256));
        assert_eq!("SHA-384".parse::<HashAlgorithm>(), Ok(HashAlgorithm::Sha384));
        assert_eq!(" sha512 ".parse::<HashAlgorithm>(), Ok(HashAlgorithm::Sha512));
    }

    #[test]
    fn test_parse_unknown_is_config_error() {
        let result = "md4".parse::<HashAlgorithm>();
        assert_eq!(result, Err(ConfigError::UnsupportedHash("md4".to_string())));
    }

    #[test]
    fn test_sha256_known_digest() {
        assert_eq!(
            HashAlgorithm::Sha256.digest(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_digest_lengths() {
        assert_eq!(HashAlgorithm::Sha256.digest(b"x").len(), 64);
        assert_eq!(HashAlgorithm::Sha384.digest(b"x").len(), 96);
        assert_eq!(HashAlgorithm::Sha512.digest(b"x").len(), 128);
    }
}
