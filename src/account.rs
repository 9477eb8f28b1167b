use nix::unistd::{getgid, getuid, User};

use crate::error::{Error, Result};

/// a local user account and its primary group
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub name: String,
    pub uid: u32,
    pub gid: u32,
}

impl Account {
    pub fn new(name: impl Into<String>, uid: u32, gid: u32) -> Self {
        Self {
            name: name.into(),
            uid,
            gid,
        }
    }

    /// the real uid/gid of this process
    pub fn current() -> Self {
        Self {
            name: String::new(),
            uid: getuid().as_raw(),
            gid: getgid().as_raw(),
        }
    }
}

/// resolves account names to numeric ids
pub trait Accounts {
    fn lookup(&self, name: &str) -> Result<Account>;
}

/// lookups against the system user database
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemAccounts;

impl Accounts for SystemAccounts {
    fn lookup(&self, name: &str) -> Result<Account> {
        let user = User::from_name(name)
            .map_err(|e| Error::Io {
                path: "/etc/passwd".into(),
                source: e.into(),
            })?
            .ok_or_else(|| Error::AccountNotFound(name.to_string()))?;

        Ok(Account {
            name: user.name,
            uid: user.uid.as_raw(),
            gid: user.gid.as_raw(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_root() {
        let root = SystemAccounts.lookup("root").unwrap();
        assert_eq!(root.uid, 0);
        assert_eq!(root.name, "root");
    }

    #[test]
    fn test_lookup_unknown() {
        let result = SystemAccounts.lookup("no-such-staging-user");
        assert!(matches!(result, Err(Error::AccountNotFound(_))));
    }

    #[test]
    fn test_current() {
        let me = Account::current();
        assert_eq!(me.uid, getuid().as_raw());
    }
}
