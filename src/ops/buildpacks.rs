use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{Error, IoResultExt, Result};
use crate::toolkit::Toolkit;
use crate::types::{BuildpackConfig, BuildpackEntry};

/// outcome of copying buildpacks out of the registry
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildpackReport {
    /// buildpacks unpacked by this run
    pub unpacked: Vec<BuildpackEntry>,
    /// buildpacks already present in the buildpacks dir
    pub present: Vec<BuildpackEntry>,
    /// entries that failed to unpack, with the reason
    pub skipped: Vec<(BuildpackEntry, String)>,
}

impl BuildpackReport {
    pub fn is_empty(&self) -> bool {
        self.unpacked.is_empty() && self.present.is_empty() && self.skipped.is_empty()
    }
}

/// unpack every `<checksum>.zip` in `registry` into `buildpacks_dir/<checksum>`
///
/// a missing registry is not an error. entries that fail to unpack are
/// logged and reported as skipped rather than aborting the run.
pub fn provision_buildpacks(
    registry: &Path,
    buildpacks_dir: &Path,
    tools: &Toolkit,
) -> Result<BuildpackReport> {
    let mut report = BuildpackReport::default();

    let listing = match fs::read_dir(registry) {
        Ok(listing) => listing,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("no buildpack registry at {}", registry.display());
            return Ok(report);
        }
        Err(e) => {
            let source = Error::Io {
                path: registry.to_path_buf(),
                source: e,
            };
            return Err(Error::provision("add buildpacks", source));
        }
    };

    let mut entries = Vec::new();
    for dirent in listing {
        let dirent = dirent
            .with_path(registry)
            .map_err(|e| Error::provision("add buildpacks", e))?;
        let name = dirent.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        match BuildpackEntry::from_file_name(registry, name) {
            Some(entry) => entries.push(entry),
            None => debug!("ignoring {} in buildpack registry", name),
        }
    }
    entries.sort();

    for entry in entries {
        let target = entry.target_dir(buildpacks_dir);
        if is_populated(&target) {
            debug!("buildpack {} already present", entry);
            report.present.push(entry);
            continue;
        }
        match unpack(&entry, &target, tools) {
            Ok(()) => {
                debug!("unpacked buildpack {} into {}", entry, target.display());
                report.unpacked.push(entry);
            }
            Err(e) => {
                warn!("skipping buildpack {}: {}", entry.archive().display(), e);
                report.skipped.push((entry, e.to_string()));
            }
        }
    }

    info!(
        "buildpacks: {} unpacked, {} present, {} skipped",
        report.unpacked.len(),
        report.present.len(),
        report.skipped.len()
    );
    Ok(report)
}

fn unpack(entry: &BuildpackEntry, target: &Path, tools: &Toolkit) -> Result<()> {
    fs::create_dir_all(target).with_path(target)?;
    tools.archiver.unzip(entry.archive(), target)
}

fn is_populated(dir: &Path) -> bool {
    fs::read_dir(dir)
        .map(|mut listing| listing.next().is_some())
        .unwrap_or(false)
}

/// comma-joined buildpack names from the buildpacks `config.json`, in order
pub fn buildpack_order(config_path: &Path) -> Result<String> {
    let parse_error = |reason: String| Error::ConfigParseError {
        path: config_path.to_path_buf(),
        reason,
    };

    let data = fs::read(config_path).map_err(|e| parse_error(e.to_string()))?;
    let configs: Vec<BuildpackConfig> =
        serde_json::from_slice(&data).map_err(|e| parse_error(e.to_string()))?;

    let names: Vec<&str> = configs.iter().map(|c| c.name.as_str()).collect();
    Ok(names.join(","))
}
