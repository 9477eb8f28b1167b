use std::os::unix::fs::lchown;
use std::path::Path;

use nix::unistd::{chown, Gid, Uid};
use walkdir::WalkDir;

use crate::account::Account;
use crate::error::{Error, IoResultExt, Result};

/// changes file ownership
pub trait Ownership {
    /// hand `path` itself to `owner`
    fn chown(&self, path: &Path, owner: &Account) -> Result<()>;

    /// hand `path` and everything below it to `owner`
    fn chown_recursive(&self, path: &Path, owner: &Account) -> Result<()>;

    /// change only the owning user of `path`, leaving its group
    fn chown_user(&self, path: &Path, owner: &Account) -> Result<()>;
}

/// ownership changes through chown(2)/lchown(2)
#[derive(Debug, Default, Clone, Copy)]
pub struct Chown;

impl Ownership for Chown {
    fn chown(&self, path: &Path, owner: &Account) -> Result<()> {
        chown(path, Some(Uid::from_raw(owner.uid)), Some(Gid::from_raw(owner.gid))).map_err(
            |e| Error::Io {
                path: path.to_path_buf(),
                source: e.into(),
            },
        )
    }

    fn chown_recursive(&self, path: &Path, owner: &Account) -> Result<()> {
        // symlinks are re-owned themselves, never followed out of the tree
        for entry in WalkDir::new(path).follow_links(false) {
            let entry = entry.map_err(std::io::Error::from).with_path(path)?;
            lchown(entry.path(), Some(owner.uid), Some(owner.gid)).with_path(entry.path())?;
        }
        Ok(())
    }

    fn chown_user(&self, path: &Path, owner: &Account) -> Result<()> {
        chown(path, Some(Uid::from_raw(owner.uid)), None).map_err(|e| Error::Io {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}
