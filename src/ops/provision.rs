use std::fs;
use std::os::unix::fs::DirBuilderExt;
use std::path::Path;

use tracing::{debug, info};

use crate::account::Account;
use crate::config::StagingRequest;
use crate::error::{Error, IoResultExt, Result};
use crate::toolkit::Toolkit;

/// create directories and hand each one (not its contents) to `owner`
pub fn own_dirs(dirs: &[&Path], owner: &Account, tools: &Toolkit) -> Result<()> {
    for dir in dirs {
        make_dir(dir)?;
        tools.ownership.chown(dir, owner)?;
        debug!("{} owned by {}", dir.display(), owner.name);
    }
    Ok(())
}

/// create directories and hand them, with everything inside, to `owner`
pub fn own_trees(dirs: &[&Path], owner: &Account, tools: &Toolkit) -> Result<()> {
    for dir in dirs {
        make_dir(dir)?;
        tools.ownership.chown_recursive(dir, owner)?;
        debug!("{} recursively owned by {}", dir.display(), owner.name);
    }
    Ok(())
}

/// make sure the metadata file holds a JSON document the builder may rewrite
pub fn init_metadata(path: &Path, owner: &Account, tools: &Toolkit) -> Result<()> {
    let needs_init = match fs::read_to_string(path) {
        Ok(content) => content.trim().is_empty(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
        Err(e) => return Err(e).with_path(path),
    };
    if needs_init {
        fs::write(path, "{}\n").with_path(path)?;
    }
    tools.ownership.chown(path, owner)
}

/// establish the ownership boundary the unprivileged build relies on
pub fn provision(request: &StagingRequest, tools: &Toolkit) -> Result<Account> {
    let user = &request.conventions.user;
    let owner = tools
        .accounts
        .lookup(user)
        .map_err(|e| Error::provision(format!("determine {} UID/GID", user), e))?;

    own_dirs(
        &[
            request.droplet_dir(),
            request.metadata_dir(),
            request.cache_archive_dir(),
        ],
        &owner,
        tools,
    )
    .map_err(|e| Error::provision("prepare destination directories", e))?;

    own_trees(
        &[
            request.build_dir.as_path(),
            request.cache_dir.as_path(),
            request.conventions.shared_tmp_dir.as_path(),
        ],
        &owner,
        tools,
    )
    .map_err(|e| Error::provision("prepare source directories", e))?;

    init_metadata(&request.output_metadata, &owner, tools)
        .map_err(|e| Error::provision("initialize metadata file", e))?;

    info!("staging directories owned by {}", owner.name);
    Ok(owner)
}

fn make_dir(dir: &Path) -> Result<()> {
    fs::DirBuilder::new()
        .recursive(true)
        .mode(0o777)
        .create(dir)
        .with_path(dir)
}
