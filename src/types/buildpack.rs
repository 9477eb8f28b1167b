use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// length of a buildpack checksum in hex characters
pub const CHECKSUM_LEN: usize = 32;

/// a buildpack archive in the registry, identified by its checksum
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BuildpackEntry {
    checksum: String,
    archive: PathBuf,
}

impl BuildpackEntry {
    /// parse a registry file name of the form `<32 hex>.zip`
    ///
    /// the extension is matched case-insensitively and the checksum is
    /// lowercased. anything else yields `None`.
    pub fn from_file_name(registry: &Path, file_name: &str) -> Option<Self> {
        let (stem, ext) = file_name.rsplit_once('.')?;
        if !ext.eq_ignore_ascii_case("zip") {
            return None;
        }
        if stem.len() != CHECKSUM_LEN || !stem.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        Some(Self {
            checksum: stem.to_ascii_lowercase(),
            archive: registry.join(file_name),
        })
    }

    /// lowercase hex checksum
    pub fn checksum(&self) -> &str {
        &self.checksum
    }

    /// path of the source archive in the registry
    pub fn archive(&self) -> &Path {
        &self.archive
    }

    /// directory this buildpack unpacks into
    pub fn target_dir(&self, buildpacks_dir: &Path) -> PathBuf {
        buildpacks_dir.join(&self.checksum)
    }
}

impl fmt::Display for BuildpackEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.checksum)
    }
}

impl fmt::Debug for BuildpackEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BuildpackEntry({})", &self.checksum[..12])
    }
}

/// one element of the buildpacks `config.json` array
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildpackConfig {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUM: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn test_valid_name() {
        let entry = BuildpackEntry::from_file_name(Path::new("/buildpacks"), &format!("{}.zip", SUM))
            .unwrap();
        assert_eq!(entry.checksum(), SUM);
        assert_eq!(entry.archive(), Path::new(&format!("/buildpacks/{}.zip", SUM)));
        assert_eq!(
            entry.target_dir(Path::new("/tmp/buildpacks")),
            PathBuf::from(format!("/tmp/buildpacks/{}", SUM))
        );
    }

    #[test]
    fn test_uppercase_is_lowercased() {
        let name = format!("{}.ZIP", SUM.to_uppercase());
        let entry = BuildpackEntry::from_file_name(Path::new("/r"), &name).unwrap();
        assert_eq!(entry.checksum(), SUM);
        assert_eq!(entry.archive(), Path::new("/r").join(name));
    }

    #[test]
    fn test_rejected_names() {
        let registry = Path::new("/buildpacks");
        for name in [
            "notavalidname.txt",
            "0123456789abcdef.zip",
            "0123456789abcdef0123456789abcdef0.zip",
            "0123456789abcdef0123456789abcdeg.zip",
            "0123456789abcdef0123456789abcdef.tgz",
            "0123456789abcdef0123456789abcdef",
            "config.json",
        ] {
            assert!(
                BuildpackEntry::from_file_name(registry, name).is_none(),
                "{} should be rejected",
                name
            );
        }
    }

    #[test]
    fn test_config_ignores_extra_fields() {
        let parsed: Vec<BuildpackConfig> =
            serde_json::from_str(r#"[{"name":"ruby","key":"abc","version":1}]"#).unwrap();
        assert_eq!(parsed[0].name, "ruby");
    }
}
