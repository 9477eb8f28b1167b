use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::fmt;
use std::fs::File;
use std::io;
use std::path::Path;

use crate::error::{IoResultExt, Result};

/// fingerprint of the staged application content
///
/// either the hex SHA-1 of an app archive or the VCS revision of an app
/// directory. the empty string means the version is unknown.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentVersion(String);

impl ContentVersion {
    /// version for content with no usable fingerprint
    pub fn unknown() -> Self {
        Self(String::new())
    }

    /// wrap a revision identifier (trimmed)
    pub fn from_revision(rev: &str) -> Self {
        Self(rev.trim().to_string())
    }

    /// digest the raw bytes of a file
    pub fn of_file(path: &Path) -> Result<Self> {
        let mut file = File::open(path).with_path(path)?;
        let mut hasher = Sha1::new();
        io::copy(&mut file, &mut hasher).with_path(path)?;
        Ok(Self(hex::encode(hasher.finalize())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_unknown(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ContentVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ContentVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unknown() {
            write!(f, "ContentVersion(unknown)")
        } else {
            let short: String = self.0.chars().take(12).collect();
            write!(f, "ContentVersion({})", short)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_digest_known_value() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.zip");
        std::fs::write(&path, b"hello").unwrap();

        let version = ContentVersion::of_file(&path).unwrap();
        assert_eq!(
            version.as_str(),
            "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d"
        );
    }

    #[test]
    fn test_file_digest_depends_on_bytes_only() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.zip");
        let b = dir.path().join("b.zip");
        std::fs::write(&a, b"same bytes").unwrap();
        std::fs::write(&b, b"same bytes").unwrap();

        assert_eq!(
            ContentVersion::of_file(&a).unwrap(),
            ContentVersion::of_file(&b).unwrap()
        );
    }

    #[test]
    fn test_missing_file_errors() {
        let dir = tempdir().unwrap();
        assert!(ContentVersion::of_file(&dir.path().join("nope.zip")).is_err());
    }

    #[test]
    fn test_unknown_and_revision() {
        assert!(ContentVersion::unknown().is_unknown());
        let rev = ContentVersion::from_revision("abc123\n");
        assert_eq!(rev.to_string(), "abc123");
        assert_eq!(serde_json::to_string(&rev).unwrap(), "\"abc123\"");
    }
}
