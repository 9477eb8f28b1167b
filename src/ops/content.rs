use std::path::{Component, Path, PathBuf};

use tracing::{debug, info};

use crate::config::AppSource;
use crate::error::{Error, IoResultExt, Result};
use crate::fs::copy_app_dir;
use crate::hash::ContentVersion;
use crate::toolkit::Toolkit;

/// populate `build_dir` from the app source and fingerprint the content
pub fn resolve_content(
    source: Option<&AppSource>,
    build_dir: &Path,
    tools: &Toolkit,
) -> Result<ContentVersion> {
    match source {
        Some(AppSource::Archive(archive)) => {
            let version = ContentVersion::of_file(archive)
                .map_err(|e| Error::copy("read app archive", e))?;
            copy_app_archive(archive, build_dir, &std::env::temp_dir(), tools)
                .map_err(|e| Error::copy("extract app zip", e))?;
            info!("staged app archive {} ({})", archive.display(), version);
            Ok(version)
        }
        Some(AppSource::Directory(dir)) => {
            let version = tools.revisions.revision(dir);
            if same_dir(dir, build_dir) {
                debug!("app directory is the build directory, nothing to copy");
            } else {
                let copied =
                    copy_app_dir(dir, build_dir).map_err(|e| Error::copy("copy app directory", e))?;
                info!("copied {} entries from {}", copied, dir.display());
            }
            Ok(version)
        }
        None => Err(Error::InvalidInput(
            "no app source: set PACK_APP_ZIP or PACK_APP_DIR".to_string(),
        )),
    }
}

/// unzip into a scratch directory under `scratch_root`, then copy the app files over
fn copy_app_archive(
    archive: &Path,
    build_dir: &Path,
    scratch_root: &Path,
    tools: &Toolkit,
) -> Result<()> {
    let scratch = tempfile::Builder::new()
        .prefix("pack")
        .tempdir_in(scratch_root)
        .with_path(scratch_root)?;

    // scratch is removed when dropped, whichever way this returns
    tools.archiver.unzip(archive, scratch.path())?;
    copy_app_dir(scratch.path(), build_dir)?;
    Ok(())
}

/// compare two paths after making them absolute and lexically clean
fn same_dir(a: &Path, b: &Path) -> bool {
    match (clean_absolute(a), clean_absolute(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// absolute path with `.` and `..` resolved without touching the filesystem
fn clean_absolute(path: &Path) -> Option<PathBuf> {
    let absolute = std::path::absolute(path).ok()?;
    let mut cleaned = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            // `..` at the root stays at the root
            Component::ParentDir => {
                cleaned.pop();
            }
            other => cleaned.push(other),
        }
    }
    Some(cleaned)
}
