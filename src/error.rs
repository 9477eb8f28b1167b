use std::path::PathBuf;
use std::process::ExitStatus;

/// exit code for failures without a more specific code
pub const CODE_FAILED: u8 = 1;
/// exit code for unparseable flags or a missing app source
pub const CODE_INVALID_ARGS: u8 = 3;
/// exit code for a broken staging environment
pub const CODE_INVALID_ENV: u8 = 4;
/// exit code for a failed lifecycle build
pub const CODE_FAILED_BUILD: u8 = 7;

/// error type for staging operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to {action}: {source}")]
    CopyFailure {
        action: String,
        #[source]
        source: Box<Error>,
    },

    #[error("failed to extract cache {path}: {source}")]
    CacheCorrupt {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    #[error("failed to {action}: {source}")]
    ProvisionFailure {
        action: String,
        #[source]
        source: Box<Error>,
    },

    #[error("failed to parse {path}: {reason}")]
    ConfigParseError { path: PathBuf, reason: String },

    #[error("invalid staging environment: {0}")]
    InvalidEnv(String),

    #[error("build failed: {0}")]
    BuildFailed(#[source] BuildFailure),

    #[error("failed to write metadata to {path}: {reason}")]
    MetadataWriteFailure { path: PathBuf, reason: String },

    #[error("account not found: {0}")]
    AccountNotFound(String),

    #[error("archive error at {path}: {message}")]
    Archive { path: PathBuf, message: String },

    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// why the lifecycle builder did not succeed
#[derive(Debug, thiserror::Error)]
pub enum BuildFailure {
    #[error("could not start {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}")]
    Exit { program: PathBuf, status: ExitStatus },
}

impl Error {
    pub(crate) fn copy(action: impl Into<String>, source: Error) -> Self {
        Error::CopyFailure {
            action: action.into(),
            source: Box::new(source),
        }
    }

    pub(crate) fn provision(action: impl Into<String>, source: Error) -> Self {
        Error::ProvisionFailure {
            action: action.into(),
            source: Box::new(source),
        }
    }

    /// process exit code reported for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::InvalidInput(_) => CODE_INVALID_ARGS,
            Error::InvalidEnv(_) => CODE_INVALID_ENV,
            Error::BuildFailed(_) => CODE_FAILED_BUILD,
            _ => CODE_FAILED,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// helper to wrap io errors with path context
pub trait IoResultExt<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| Error::Io {
            path: path.into(),
            source,
        })
    }
}
