use std::ffi::OsString;

use tracing::info;

use crate::config::StagingRequest;
use crate::error::Result;
use crate::hash::ContentVersion;
use crate::toolkit::Toolkit;

use super::{
    buildpack_order, finalize_metadata, invoke_build, provision, provision_buildpacks,
    resolve_content, restore_cache, BuildpackReport,
};

/// builder flag carrying the derived buildpack order
pub const BUILDPACK_ORDER_FLAG: &str = "-buildpackOrder";

/// summary of a successful staging run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    pub version: ContentVersion,
    pub cache_restored: bool,
    pub buildpacks: BuildpackReport,
    /// order read from the buildpack config, when none was given
    pub buildpack_order: Option<String>,
}

/// run every staging step in order, stopping at the first failure
///
/// metadata is only written once the builder has succeeded.
pub fn stage(request: &StagingRequest, tools: &Toolkit) -> Result<StageReport> {
    info!("staging {}", request.app_name);

    let version = resolve_content(request.source.as_ref(), &request.build_dir, tools)?;
    let cache_restored = restore_cache(&request.output_cache, &request.cache_dir, tools)?;
    provision(request, tools)?;
    let buildpacks = provision_buildpacks(
        &request.conventions.registry_dir,
        &request.buildpacks_dir,
        tools,
    )?;

    let mut extra_args: Vec<OsString> = vec![];
    let order = if request.needs_buildpack_order() {
        let names = buildpack_order(&request.buildpack_config())?;
        info!("buildpack order: {}", names);
        extra_args.push(BUILDPACK_ORDER_FLAG.into());
        extra_args.push(names.clone().into());
        Some(names)
    } else {
        None
    };

    invoke_build(request, &extra_args, tools)?;
    finalize_metadata(&request.output_metadata, &request.app_name, &version)?;

    info!("staged {} at {}", request.app_name, version);
    Ok(StageReport {
        version,
        cache_restored,
        buildpacks,
        buildpack_order: order,
    })
}
