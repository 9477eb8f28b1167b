use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::toolkit::Toolkit;

/// restore a persisted build cache, returns whether anything was restored
///
/// a missing cache archive is not an error and leaves `cache_dir` alone.
pub fn restore_cache(cache_archive: &Path, cache_dir: &Path, tools: &Toolkit) -> Result<bool> {
    match fs::metadata(cache_archive) {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("no build cache at {}", cache_archive.display());
            return Ok(false);
        }
        Err(e) => {
            return Err(Error::CacheCorrupt {
                path: cache_archive.to_path_buf(),
                source: Box::new(Error::Io {
                    path: cache_archive.to_path_buf(),
                    source: e,
                }),
            })
        }
    }

    tools
        .archiver
        .untar_gz(cache_archive, cache_dir)
        .map_err(|e| Error::CacheCorrupt {
            path: cache_archive.to_path_buf(),
            source: Box::new(e),
        })?;

    info!("restored build cache into {}", cache_dir.display());
    Ok(true)
}
