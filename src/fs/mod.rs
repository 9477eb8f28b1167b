pub mod archive;
pub mod copy;
pub mod owner;
pub mod select;

pub use archive::{Archiver, NativeArchiver};
pub use copy::{copy_app_dir, copy_files};
pub use owner::{Chown, Ownership};
pub use select::{app_files_in_dir, AppFile, IgnoreRules, DEFAULT_IGNORES};
