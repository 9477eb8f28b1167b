use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// where the application source comes from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppSource {
    /// a zip archive of the application
    Archive(PathBuf),
    /// a directory containing the application
    Directory(PathBuf),
}

impl AppSource {
    /// pick the app source from PACK_APP_ZIP / PACK_APP_DIR values
    ///
    /// an archive wins over a directory; with neither set the current
    /// working directory is used, if known.
    pub fn select(zip: Option<&str>, dir: Option<&str>, cwd: Option<PathBuf>) -> Option<Self> {
        let zip = zip.filter(|z| !z.is_empty());
        let dir = dir.filter(|d| !d.is_empty());

        match (zip, dir) {
            (Some(zip), _) => Some(AppSource::Archive(PathBuf::from(zip))),
            (None, Some(dir)) => Some(AppSource::Directory(PathBuf::from(dir))),
            (None, None) => cwd.map(AppSource::Directory),
        }
    }
}

/// fixed paths and names of the staging container
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Conventions {
    /// shared, read-only directory of `<checksum>.zip` buildpacks
    pub registry_dir: PathBuf,
    /// scratch space the builder writes to
    pub shared_tmp_dir: PathBuf,
    /// the external lifecycle builder
    pub builder_path: PathBuf,
    /// unprivileged account the builder runs as
    pub user: String,
}

impl Default for Conventions {
    fn default() -> Self {
        Self {
            registry_dir: PathBuf::from("/buildpacks"),
            shared_tmp_dir: PathBuf::from("/home/vcap/tmp"),
            builder_path: PathBuf::from("/lifecycle/builder"),
            user: "vcap".to_string(),
        }
    }
}

/// everything a staging run needs, fixed at process start
#[derive(Clone, Debug)]
pub struct StagingRequest {
    pub app_name: String,
    pub source: Option<AppSource>,

    pub build_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub output_cache: PathBuf,
    pub output_metadata: PathBuf,
    pub output_droplet: PathBuf,

    pub buildpacks_dir: PathBuf,
    pub buildpack_order: Vec<String>,
    pub skip_detect: bool,

    /// arguments forwarded verbatim to the builder
    pub builder_args: Vec<OsString>,
    pub conventions: Conventions,
}

impl StagingRequest {
    /// a request with the lifecycle builder's default paths
    pub fn new(app_name: impl Into<String>, source: Option<AppSource>) -> Self {
        Self {
            app_name: app_name.into(),
            source,
            build_dir: PathBuf::from("/tmp/app"),
            cache_dir: PathBuf::from("/tmp/cache"),
            output_cache: PathBuf::from("/tmp/output-cache"),
            output_metadata: PathBuf::from("/tmp/result.json"),
            output_droplet: PathBuf::from("/tmp/droplet"),
            buildpacks_dir: PathBuf::from("/tmp/buildpacks"),
            buildpack_order: vec![],
            skip_detect: false,
            builder_args: vec![],
            conventions: Conventions::default(),
        }
    }

    /// directory holding the output cache archive
    pub fn cache_archive_dir(&self) -> &Path {
        parent_or_root(&self.output_cache)
    }

    /// directory holding the metadata file
    pub fn metadata_dir(&self) -> &Path {
        parent_or_root(&self.output_metadata)
    }

    /// directory holding the droplet
    pub fn droplet_dir(&self) -> &Path {
        parent_or_root(&self.output_droplet)
    }

    /// buildpack list written next to the unpacked buildpacks
    pub fn buildpack_config(&self) -> PathBuf {
        self.buildpacks_dir.join("config.json")
    }

    /// true when no buildpack order was given explicitly
    pub fn needs_buildpack_order(&self) -> bool {
        self.buildpack_order.concat().is_empty() && !self.skip_detect
    }
}

fn parent_or_root(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}
