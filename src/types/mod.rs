mod buildpack;
mod metadata;

pub use buildpack::{BuildpackConfig, BuildpackEntry};
pub use metadata::{AppMetadata, PackMetadata, PACK_METADATA_KEY};
