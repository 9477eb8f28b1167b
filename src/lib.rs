//! stager - droplet staging driver
//!
//! prepares a container for the lifecycle builder and runs it as an
//! unprivileged account. a staging run goes through these steps in order:
//!
//! - **content**: copy the app (zip archive or directory) into the build dir
//!   and fingerprint it
//! - **cache**: restore the previous build cache archive, if there is one
//! - **provision**: create the working directories and hand them to the
//!   build account
//! - **buildpacks**: unpack `<checksum>.zip` buildpacks from the registry
//! - **order**: derive `-buildpackOrder` from `config.json` when none was given
//! - **build**: run the builder with dropped privileges
//! - **metadata**: record the app name and content version in the result file
//!
//! # Content version
//!
//! archive sources are versioned by the SHA-1 of the archive bytes,
//! directory sources by their git revision (empty when unknown).
//!
//! # Example usage
//!
//! ```no_run
//! use stager::{ops, AppSource, StagingRequest, Toolkit};
//!
//! let source = AppSource::Directory("/home/me/app".into());
//! let request = StagingRequest::new("myapp", Some(source));
//!
//! let report = ops::stage(&request, &Toolkit::system()).unwrap();
//! println!("staged {}", report.version);
//! ```

mod account;
mod config;
mod env;
mod error;
mod hash;
mod revision;
mod toolkit;

pub mod fs;
pub mod ops;
pub mod types;

#[cfg(test)]
mod testutil;

pub use account::{Account, Accounts, SystemAccounts};
pub use config::{AppSource, Conventions, StagingRequest};
pub use env::{AppEnv, Limits, ProcessEnv, StagingEnv};
pub use error::{
    BuildFailure, Error, IoResultExt, Result, CODE_FAILED, CODE_FAILED_BUILD, CODE_INVALID_ARGS,
    CODE_INVALID_ENV,
};
pub use hash::ContentVersion;
pub use revision::{GitRevision, RevisionResolver};
pub use toolkit::Toolkit;
