//! mediasort - sort the media files of a directory into category folders
//!
//! Files directly inside one directory are classified by extension (audio,
//! image and video by default), the needed category folders are created and
//! each matching file is moved into its folder. Existing files are never
//! overwritten: a colliding name gets a `_copy(N)` suffix instead.

pub mod cli;
pub mod config;
pub mod error;
pub mod file_category;
pub mod file_organizer;
pub mod logging;
pub mod output;

pub use config::{ConfigError, MediasortConfig};
pub use error::{OrganizeError, OrganizeResult};
pub use file_category::{Category, CategoryMapping, ExtensionCase};
pub use file_organizer::{MoveOperation, MoveReport, Organizer};

pub use cli::{OrganizeCommand, run_cli};
