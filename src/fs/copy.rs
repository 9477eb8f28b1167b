use std::fs;
use std::os::unix::fs::{symlink, DirBuilderExt, MetadataExt, PermissionsExt};
use std::path::Path;

use tracing::debug;

use crate::error::{Error, IoResultExt, Result};
use crate::fs::select::{app_files_in_dir, AppFile};

/// copy selected files from `src` into `dst`, returns the number of entries copied
///
/// existing regular files are overwritten, so copying twice yields the same tree.
pub fn copy_files(files: &[AppFile], src: &Path, dst: &Path) -> Result<usize> {
    fs::create_dir_all(dst).with_path(dst)?;
    refuse_same_file(src, dst)?;

    for file in files {
        let from = src.join(&file.path);
        let to = dst.join(&file.path);
        let meta = fs::symlink_metadata(&from).with_path(&from)?;

        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent).with_path(parent)?;
        }

        if meta.file_type().is_symlink() {
            let target = fs::read_link(&from).with_path(&from)?;
            remove_existing(&to)?;
            symlink(&target, &to).with_path(&to)?;
        } else if file.is_dir {
            if !to.is_dir() {
                remove_existing(&to)?;
                fs::DirBuilder::new()
                    .mode(meta.permissions().mode() & 0o7777)
                    .create(&to)
                    .with_path(&to)?;
            }
        } else {
            // fs::copy would write through a symlink left at the destination
            if fs::symlink_metadata(&to).is_ok_and(|m| !m.is_file()) {
                remove_existing(&to)?;
            }
            // copying a file onto itself truncates it
            refuse_same_file(&from, &to)?;
            fs::copy(&from, &to).with_path(&to)?;
        }
        debug!("copied {}", file.path.display());
    }

    Ok(files.len())
}

/// copy the application files of `src` into `dst`
pub fn copy_app_dir(src: &Path, dst: &Path) -> Result<usize> {
    let files = app_files_in_dir(src)?;
    copy_files(&files, src, dst)
}

/// fail when `from` and `to` are the same inode
fn refuse_same_file(from: &Path, to: &Path) -> Result<()> {
    let (Ok(a), Ok(b)) = (fs::metadata(from), fs::metadata(to)) else {
        return Ok(());
    };
    if a.dev() == b.dev() && a.ino() == b.ino() {
        return Err(Error::Io {
            path: to.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} is the same file as {}", to.display(), from.display()),
            ),
        });
    }
    Ok(())
}

fn remove_existing(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path).with_path(path),
        Ok(_) => fs::remove_file(path).with_path(path),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_path(path),
    }
}
