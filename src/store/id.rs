use std::fmt;
use std::str::FromStr;

use super::error::BlobError;
use crate::validation::Validator;

/// Suffix that turns an identity into its header sidecar file name.
pub const HEADER_SUFFIX: &str = "-Header";

/// Blob identity: lookup key and on-disk base file name in one.
///
/// Conventionally the lowercase hex digest of the blob's content, but any
/// single path component is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlobId(String);

impl BlobId {
    pub fn new<S: Into<String>>(id: S) -> Result<Self, BlobError> {
        let id = id.into();
        let reason = if id.is_empty() {
            Some("identity is empty")
        } else if id == "." || id == ".." {
            Some("identity is a relative path component")
        } else if id.contains(&['/', '\\', '\0'][..]) {
            Some("identity contains a path separator or NUL")
        } else if id.ends_with(HEADER_SUFFIX) {
            Some("identity collides with a header sidecar name")
        } else {
            None
        };
        match reason {
            Some(reason) => Err(BlobError::InvalidIdentity { id, reason }),
            None => Ok(Self(id)),
        }
    }

    /// Name a blob after the hex digest of its content.
    pub fn from_content<V: Validator + ?Sized>(validator: &V, content: &[u8]) -> Self {
        Self(validator.hex_digest(content))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn header_name(&self) -> String {
        format!("{}{}", self.0, HEADER_SUFFIX)
    }

    /// The digest this identity claims, decoded from hex.
    pub fn digest_bytes(&self) -> Result<Vec<u8>, BlobError> {
        hex::decode(&self.0).map_err(|_| BlobError::InvalidIdentity {
            id: self.0.clone(),
            reason: "identity is not a hex digest",
        })
    }
}

impl fmt::Display for BlobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for BlobId {
    type Err = BlobError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for BlobId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Sha256Validator;

    #[test]
    fn test_rejects_unsafe_names() {
        for bad in ["", ".", "..", "a/b", "a\\b", "abc-Header"] {
            assert!(
                matches!(BlobId::new(bad), Err(BlobError::InvalidIdentity { .. })),
                "{bad:?} should be rejected"
            );
        }
        assert!(BlobId::new("deadbeef").is_ok());
    }

    #[test]
    fn test_digest_identity() {
        let id = BlobId::from_content(&Sha256Validator, b"abc");
        assert_eq!(id.header_name(), format!("{id}-Header"));
        assert_eq!(id.digest_bytes().unwrap(), Sha256Validator.digest(b"abc"));

        let named: BlobId = "holiday.jpg".parse().unwrap();
        assert!(matches!(named.digest_bytes(), Err(BlobError::InvalidIdentity { .. })));
    }
}
