use crate::account::{Accounts, SystemAccounts};
use crate::env::{AppEnv, ProcessEnv};
use crate::fs::{Archiver, Chown, NativeArchiver, Ownership};
use crate::ops::{BuildRunner, ProcessRunner};
use crate::revision::{GitRevision, RevisionResolver};

/// the external capabilities a staging run relies on
pub struct Toolkit {
    pub archiver: Box<dyn Archiver>,
    pub ownership: Box<dyn Ownership>,
    pub revisions: Box<dyn RevisionResolver>,
    pub accounts: Box<dyn Accounts>,
    pub app_env: Box<dyn AppEnv>,
    pub runner: Box<dyn BuildRunner>,
}

impl Toolkit {
    /// real implementations backed by this host
    pub fn system() -> Self {
        Self {
            archiver: Box::new(NativeArchiver),
            ownership: Box::new(Chown),
            revisions: Box::new(GitRevision),
            accounts: Box::new(SystemAccounts),
            app_env: Box::new(ProcessEnv),
            runner: Box::new(ProcessRunner),
        }
    }
}
