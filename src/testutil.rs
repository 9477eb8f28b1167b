//! fake capabilities shared by the unit tests

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::rc::Rc;

use crate::account::{Account, Accounts};
use crate::config::{AppSource, Conventions, StagingRequest};
use crate::env::AppEnv;
use crate::error::{BuildFailure, Error, Result};
use crate::fs::{NativeArchiver, Ownership};
use crate::hash::ContentVersion;
use crate::ops::{BuildInvocation, BuildRunner};
use crate::revision::RevisionResolver;
use crate::toolkit::Toolkit;

pub const FAKE_REVISION: &str = "deadbeefcafe";
pub const FAKE_UID: u32 = 2000;

type Hook = Box<dyn Fn(&BuildInvocation)>;

/// what the fakes saw during a test
#[derive(Clone, Default)]
pub struct Probe {
    runs: Rc<RefCell<Vec<BuildInvocation>>>,
    chowned: Rc<RefCell<Vec<(PathBuf, bool)>>>,
    user_chowned: Rc<RefCell<Vec<PathBuf>>>,
}

impl Probe {
    pub fn runs(&self) -> Vec<BuildInvocation> {
        self.runs.borrow().clone()
    }

    /// paths handed to the ownership fake, with whether the call was recursive
    pub fn chowned(&self) -> Vec<(PathBuf, bool)> {
        self.chowned.borrow().clone()
    }

    /// paths whose owning user alone was changed
    pub fn user_chowned(&self) -> Vec<PathBuf> {
        self.user_chowned.borrow().clone()
    }
}

/// records invocations instead of spawning anything
pub struct FakeRunner {
    fail: bool,
    hook: Option<Hook>,
    runs: Rc<RefCell<Vec<BuildInvocation>>>,
}

impl FakeRunner {
    pub fn succeed() -> Self {
        Self {
            fail: false,
            hook: None,
            runs: Rc::default(),
        }
    }

    /// every run exits with status 1
    pub fn fail() -> Self {
        Self {
            fail: true,
            ..Self::succeed()
        }
    }

    /// run `hook` in place of the builder before reporting the outcome
    pub fn with_hook(mut self, hook: impl Fn(&BuildInvocation) + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }
}

impl BuildRunner for FakeRunner {
    fn run(&self, invocation: &BuildInvocation) -> Result<()> {
        self.runs.borrow_mut().push(invocation.clone());
        if let Some(hook) = &self.hook {
            hook(invocation);
        }
        if self.fail {
            return Err(Error::BuildFailed(BuildFailure::Exit {
                program: invocation.program.clone(),
                status: ExitStatus::from_raw(1 << 8),
            }));
        }
        Ok(())
    }
}

struct FakeOwnership {
    chowned: Rc<RefCell<Vec<(PathBuf, bool)>>>,
    user_chowned: Rc<RefCell<Vec<PathBuf>>>,
}

impl Ownership for FakeOwnership {
    fn chown(&self, path: &Path, _owner: &Account) -> Result<()> {
        self.chowned.borrow_mut().push((path.to_path_buf(), false));
        Ok(())
    }

    fn chown_recursive(&self, path: &Path, _owner: &Account) -> Result<()> {
        self.chowned.borrow_mut().push((path.to_path_buf(), true));
        Ok(())
    }

    fn chown_user(&self, path: &Path, _owner: &Account) -> Result<()> {
        self.user_chowned.borrow_mut().push(path.to_path_buf());
        Ok(())
    }
}

pub struct FakeAccounts;

impl Accounts for FakeAccounts {
    fn lookup(&self, name: &str) -> Result<Account> {
        Ok(Account::new(name, FAKE_UID, FAKE_UID))
    }
}

/// an account database with nobody in it
pub struct NoAccounts;

impl Accounts for NoAccounts {
    fn lookup(&self, name: &str) -> Result<Account> {
        Err(Error::AccountNotFound(name.to_string()))
    }
}

struct FakeAppEnv;

impl AppEnv for FakeAppEnv {
    fn staging_env(&self) -> Result<BTreeMap<String, String>> {
        Ok(BTreeMap::from([("FAKE_STAGING".to_string(), "1".to_string())]))
    }
}

/// an app environment that cannot be built
pub struct BrokenAppEnv;

impl AppEnv for BrokenAppEnv {
    fn staging_env(&self) -> Result<BTreeMap<String, String>> {
        Err(Error::InvalidEnv("PACK_APP_MEM must be a whole number".to_string()))
    }
}

struct FakeRevision;

impl RevisionResolver for FakeRevision {
    fn revision(&self, _dir: &Path) -> ContentVersion {
        ContentVersion::from_revision(FAKE_REVISION)
    }
}

/// real archives, fake everything that needs root or external programs
pub fn fake_tools(runner: FakeRunner) -> (Toolkit, Probe) {
    let probe = Probe {
        runs: runner.runs.clone(),
        chowned: Rc::default(),
        user_chowned: Rc::default(),
    };
    let tools = Toolkit {
        archiver: Box::new(NativeArchiver),
        ownership: Box::new(FakeOwnership {
            chowned: probe.chowned.clone(),
            user_chowned: probe.user_chowned.clone(),
        }),
        revisions: Box::new(FakeRevision),
        accounts: Box::new(FakeAccounts),
        app_env: Box::new(FakeAppEnv),
        runner: Box::new(runner),
    };
    (tools, probe)
}

/// a request whose every path lives under `root`, sourcing `root/src`
pub fn staging_request(root: &Path) -> StagingRequest {
    let mut request = StagingRequest::new("myapp", Some(AppSource::Directory(root.join("src"))));
    request.build_dir = root.join("tmp/app");
    request.cache_dir = root.join("tmp/cache");
    request.output_cache = root.join("out/output-cache");
    request.output_metadata = root.join("out/result.json");
    request.output_droplet = root.join("out/droplet");
    request.buildpacks_dir = root.join("tmp/buildpacks");
    request.conventions = Conventions {
        registry_dir: root.join("registry"),
        shared_tmp_dir: root.join("home/vcap/tmp"),
        builder_path: PathBuf::from("/lifecycle/builder"),
        user: "vcap".to_string(),
    };
    request
}
