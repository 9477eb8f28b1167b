use serde::{Deserialize, Serialize};

use crate::hash::ContentVersion;

/// top-level key this crate owns in the build metadata file
pub const PACK_METADATA_KEY: &str = "pack_metadata";

/// provenance recorded for a staged droplet
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackMetadata {
    pub app: AppMetadata,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppMetadata {
    pub name: String,
    pub sha: ContentVersion,
}

impl PackMetadata {
    pub fn new(name: impl Into<String>, sha: ContentVersion) -> Self {
        Self {
            app: AppMetadata {
                name: name.into(),
                sha,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_shape() {
        let meta = PackMetadata::new("myapp", ContentVersion::from_revision("abc123"));
        assert_eq!(
            serde_json::to_value(&meta).unwrap(),
            serde_json::json!({"app": {"name": "myapp", "sha": "abc123"}})
        );
    }

    #[test]
    fn test_unknown_sha_is_empty_string() {
        let meta = PackMetadata::new("myapp", ContentVersion::unknown());
        assert_eq!(
            serde_json::to_string(&meta).unwrap(),
            r#"{"app":{"name":"myapp","sha":""}}"#
        );
    }
}
