//! Error types for directory organization.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while listing, classifying or moving entries.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// The directory given at construction is not absolute.
    #[error("Directory path must be absolute: {0}")]
    InvalidPath(PathBuf),

    /// The resolved path does not reference a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// A filesystem call failed.
    #[error("Failed to {operation} {}: {source}", path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A computed path would leave the managed directory.
    #[error("Refusing to move '{name}': destination {} is outside the managed directory", destination.display())]
    PathEscape { name: String, destination: PathBuf },

    /// Every `_copy(N)` candidate was already taken.
    #[error("No free name for {} after {attempts} attempts", destination.display())]
    MoveConflictResolution { destination: PathBuf, attempts: u32 },

    /// Failed to create a category directory.
    #[error("Failed to create directory {}: {source}", path.display())]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to rename a file into its category directory.
    #[error("Failed to move {} to {}: {source}", source_path.display(), destination.display())]
    FileMove {
        source_path: PathBuf,
        destination: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;
