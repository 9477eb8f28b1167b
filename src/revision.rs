use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::hash::ContentVersion;

/// looks up the version-control revision of a source tree
pub trait RevisionResolver {
    /// the revision of `dir`, or an unknown version when there is none
    fn revision(&self, dir: &Path) -> ContentVersion;
}

/// asks git for the commit checked out in a directory
#[derive(Debug, Default, Clone, Copy)]
pub struct GitRevision;

impl RevisionResolver for GitRevision {
    fn revision(&self, dir: &Path) -> ContentVersion {
        let output = Command::new("git")
            .arg("-C")
            .arg(dir)
            .args(["rev-parse", "HEAD"])
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output();

        match output {
            Ok(out) if out.status.success() => {
                ContentVersion::from_revision(&String::from_utf8_lossy(&out.stdout))
            }
            Ok(out) => {
                debug!("no git revision for {}: {}", dir.display(), out.status);
                ContentVersion::unknown()
            }
            Err(e) => {
                debug!("could not run git for {}: {}", dir.display(), e);
                ContentVersion::unknown()
            }
        }
    }
}
