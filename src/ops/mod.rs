//! the staging steps, in the order `stage` runs them

mod build;
mod buildpacks;
mod cache;
mod content;
mod metadata;
mod provision;
mod stage;

pub use build::{
    build_env, invoke_build, prepare_build, BuildInvocation, BuildRunner, ProcessRunner,
    STD_STREAMS,
};
pub use buildpacks::{buildpack_order, provision_buildpacks, BuildpackReport};
pub use cache::restore_cache;
pub use content::resolve_content;
pub use metadata::finalize_metadata;
pub use provision::{init_metadata, own_dirs, own_trees, provision};
pub use stage::{stage, StageReport, BUILDPACK_ORDER_FLAG};
