use std::fs::OpenOptions;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use serde_json::{Map, Value};
use tracing::info;

use crate::error::{Error, Result};
use crate::hash::ContentVersion;
use crate::types::{PackMetadata, PACK_METADATA_KEY};

/// record the app's name and content version under `pack_metadata`
///
/// keys written by the builder are kept. empty content counts as `{}`.
pub fn finalize_metadata(path: &Path, app_name: &str, version: &ContentVersion) -> Result<()> {
    let fail = |reason: String| Error::MetadataWriteFailure {
        path: path.to_path_buf(),
        reason,
    };

    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map_err(|e| fail(e.to_string()))?;

    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| fail(e.to_string()))?;

    let mut doc: Map<String, Value> = if content.trim().is_empty() {
        Map::new()
    } else {
        match serde_json::from_str(&content).map_err(|e| fail(e.to_string()))? {
            Value::Object(map) => map,
            _ => return Err(fail("metadata is not a JSON object".to_string())),
        }
    };

    let pack = serde_json::to_value(PackMetadata::new(app_name, version.clone()))
        .map_err(|e| fail(e.to_string()))?;
    doc.insert(PACK_METADATA_KEY.to_string(), pack);

    file.seek(SeekFrom::Start(0))
        .map_err(|e| fail(e.to_string()))?;
    file.set_len(0).map_err(|e| fail(e.to_string()))?;
    serde_json::to_writer(&mut file, &doc).map_err(|e| fail(e.to_string()))?;
    file.write_all(b"\n").map_err(|e| fail(e.to_string()))?;

    info!("recorded {} ({}) in {}", app_name, version, path.display());
    Ok(())
}
