//! staging environment handed to the lifecycle builder

use std::collections::BTreeMap;

use serde::Serialize;
use uuid::Uuid;

use crate::error::{Error, Result};

const DEFAULT_MEM_MB: u64 = 1024;
const DEFAULT_DISK_MB: u64 = 1024;
const DEFAULT_FDS: u64 = 16384;

/// supplies application-specific variables for the build step
pub trait AppEnv {
    fn staging_env(&self) -> Result<BTreeMap<String, String>>;
}

/// resource limits advertised to buildpacks
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Limits {
    pub disk: u64,
    pub fds: u64,
    pub mem: u64,
}

#[derive(Serialize)]
struct VcapApplication<'a> {
    application_id: &'a str,
    application_name: &'a str,
    application_uris: &'a [String],
    application_version: &'a str,
    limits: &'a Limits,
    name: &'a str,
    space_id: &'a str,
    space_name: &'a str,
    uris: &'a [String],
    version: &'a str,
}

/// the CF-style staging environment for one application
#[derive(Clone, Debug)]
pub struct StagingEnv {
    pub name: String,
    pub uris: Vec<String>,
    pub limits: Limits,
    pub services: String,
    app_id: String,
    space_id: String,
    version: String,
}

impl StagingEnv {
    pub fn new(name: impl Into<String>, limits: Limits) -> Self {
        let name = name.into();
        Self {
            uris: vec![format!("{}.local", name)],
            name,
            limits,
            services: "{}".to_string(),
            app_id: Uuid::new_v4().to_string(),
            space_id: Uuid::new_v4().to_string(),
            version: Uuid::new_v4().to_string(),
        }
    }

    /// build from PACK_APP_* variables of this process
    pub fn from_process() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// build from an arbitrary variable lookup
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let name = get("PACK_APP_NAME").unwrap_or_default();
        let limits = Limits {
            disk: parse_limit(&get, "PACK_APP_DISK", DEFAULT_DISK_MB)?,
            fds: parse_limit(&get, "PACK_APP_FDS", DEFAULT_FDS)?,
            mem: parse_limit(&get, "PACK_APP_MEM", DEFAULT_MEM_MB)?,
        };

        let mut env = Self::new(name, limits);
        if let Some(uri) = get("PACK_APP_URI").filter(|u| !u.is_empty()) {
            env.uris = vec![uri];
        }
        if let Some(services) = get("VCAP_SERVICES").filter(|s| !s.is_empty()) {
            env.services = services;
        }
        Ok(env)
    }

    fn vcap_application(&self) -> Result<String> {
        let app = VcapApplication {
            application_id: &self.app_id,
            application_name: &self.name,
            application_uris: &self.uris,
            application_version: &self.version,
            limits: &self.limits,
            name: &self.name,
            space_id: &self.space_id,
            space_name: "pack-space",
            uris: &self.uris,
            version: &self.version,
        };
        serde_json::to_string(&app)
            .map_err(|e| Error::InvalidEnv(format!("encode VCAP_APPLICATION: {}", e)))
    }
}

impl AppEnv for StagingEnv {
    fn staging_env(&self) -> Result<BTreeMap<String, String>> {
        let mut env = BTreeMap::new();
        env.insert("CF_STACK".to_string(), "cflinuxfs2".to_string());
        env.insert("HOME".to_string(), "/home/vcap".to_string());
        env.insert("LANG".to_string(), "en_US.UTF-8".to_string());
        env.insert("MEMORY_LIMIT".to_string(), format!("{}m", self.limits.mem));
        env.insert("PATH".to_string(), "/usr/local/bin:/usr/bin:/bin".to_string());
        env.insert("USER".to_string(), "vcap".to_string());
        env.insert("VCAP_APPLICATION".to_string(), self.vcap_application()?);
        env.insert("VCAP_SERVICES".to_string(), self.services.clone());
        Ok(env)
    }
}

/// reads the staging environment from this process when asked
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl AppEnv for ProcessEnv {
    fn staging_env(&self) -> Result<BTreeMap<String, String>> {
        StagingEnv::from_process()?.staging_env()
    }
}

fn parse_limit(get: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> Result<u64> {
    match get(key).filter(|v| !v.is_empty()) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| {
            Error::InvalidEnv(format!("{} must be a whole number, got {:?}", key, value))
        }),
    }
}
