use std::collections::BTreeMap;
use std::ffi::OsString;
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::account::Account;
use crate::config::StagingRequest;
use crate::error::{BuildFailure, Error, Result};
use crate::toolkit::Toolkit;

/// stdio paths handed to the build user so the dropped-privilege child can write to them
pub const STD_STREAMS: &[&str] = &["/dev/stdout", "/dev/stderr"];

/// a fully resolved run of the lifecycle builder
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildInvocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub dir: PathBuf,
    /// complete child environment, nothing is inherited beyond this
    pub env: BTreeMap<OsString, OsString>,
    /// identity the child runs as
    pub uid: u32,
    pub gid: u32,
}

/// spawns the builder under the invocation's identity
pub trait BuildRunner {
    fn run(&self, invocation: &BuildInvocation) -> Result<()>;
}

/// runs the builder as a child process with inherited stdio
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl BuildRunner for ProcessRunner {
    fn run(&self, invocation: &BuildInvocation) -> Result<()> {
        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.dir)
            .env_clear()
            .envs(&invocation.env)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .uid(invocation.uid)
            .gid(invocation.gid)
            .status()
            .map_err(|source| {
                Error::BuildFailed(BuildFailure::Spawn {
                    program: invocation.program.clone(),
                    source,
                })
            })?;

        if !status.success() {
            return Err(Error::BuildFailed(BuildFailure::Exit {
                program: invocation.program.clone(),
                status,
            }));
        }
        Ok(())
    }
}

/// process environment overlaid with the app's staging variables
pub fn build_env(
    process: impl IntoIterator<Item = (OsString, OsString)>,
    staging: BTreeMap<String, String>,
) -> BTreeMap<OsString, OsString> {
    let mut env: BTreeMap<OsString, OsString> = process.into_iter().collect();
    for (key, value) in staging {
        env.insert(key.into(), value.into());
    }
    env
}

/// assemble the builder invocation for `request`
pub fn prepare_build(
    request: &StagingRequest,
    extra_args: &[OsString],
    account: &Account,
    tools: &Toolkit,
) -> Result<BuildInvocation> {
    let staging = tools.app_env.staging_env()?;

    let mut args = request.builder_args.clone();
    args.extend(extra_args.iter().cloned());

    Ok(BuildInvocation {
        program: request.conventions.builder_path.clone(),
        args,
        dir: request.build_dir.clone(),
        env: build_env(std::env::vars_os(), staging),
        uid: account.uid,
        gid: account.gid,
    })
}

/// run the lifecycle builder as the unprivileged account
pub fn invoke_build(request: &StagingRequest, extra_args: &[OsString], tools: &Toolkit) -> Result<()> {
    let user = &request.conventions.user;
    let account = tools
        .accounts
        .lookup(user)
        .map_err(|e| Error::provision(format!("determine {} UID/GID", user), e))?;

    for stream in STD_STREAMS {
        tools
            .ownership
            .chown_user(Path::new(stream), &account)
            .map_err(|e| Error::provision("adjust fd ownership", e))?;
    }

    let invocation = prepare_build(request, extra_args, &account, tools)?;
    info!(
        "running {} as {} ({}:{})",
        invocation.program.display(),
        account.name,
        account.uid,
        account.gid
    );
    debug!("builder args: {:?}", invocation.args);

    tools.runner.run(&invocation)
}
