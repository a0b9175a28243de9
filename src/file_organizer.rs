//! Moves the files of one directory into category subdirectories.
//!
//! The [`Organizer`] owns a resolved absolute directory and an immutable
//! [`CategoryMapping`]. Every operation re-reads the directory; nothing is
//! cached between calls.

use crate::config::DEFAULT_MAX_COPY_ATTEMPTS;
use crate::error::{OrganizeError, OrganizeResult};
use crate::file_category::{Category, CategoryMapping, classify, split_extension};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

/// A single file move, either performed or planned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveOperation {
    /// The entry name inside the organized directory.
    pub file_name: String,
    /// The path of the file before the move.
    pub original_path: PathBuf,
    /// The path of the file after the move.
    pub new_path: PathBuf,
    /// The category the file was routed to.
    pub category: String,
}

/// Outcome of a pass over the directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MoveReport {
    /// Moves in the order they happened.
    pub moved: Vec<MoveOperation>,
    /// Entries left in place: no matching category, or a directory.
    pub skipped: Vec<String>,
}

impl MoveReport {
    /// Counts moved files per category folder.
    pub fn category_counts(&self) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for op in &self.moved {
            *counts.entry(op.category.clone()).or_insert(0) += 1;
        }
        counts
    }
}

#[derive(Debug)]
struct Entry {
    name: String,
    is_dir: bool,
}

/// Sorts the entries of a single directory into category folders.
#[derive(Debug, Clone)]
pub struct Organizer {
    root: PathBuf,
    mapping: CategoryMapping,
    max_copy_attempts: u32,
}

impl Organizer {
    /// Creates an organizer for `directory`.
    ///
    /// The path must be absolute. It is normalized lexically (`.` and `..`
    /// removed); the filesystem is not touched.
    ///
    /// # Examples
    ///
    /// ```
    /// use mediasort::{CategoryMapping, OrganizeError, Organizer};
    ///
    /// let err = Organizer::new("relative/dir", CategoryMapping::default()).unwrap_err();
    /// assert!(matches!(err, OrganizeError::InvalidPath(_)));
    /// ```
    pub fn new(directory: impl AsRef<Path>, mapping: CategoryMapping) -> OrganizeResult<Self> {
        let directory = directory.as_ref();
        if !directory.is_absolute() {
            return Err(OrganizeError::InvalidPath(directory.to_path_buf()));
        }

        Ok(Self {
            root: normalize(directory),
            mapping,
            max_copy_attempts: DEFAULT_MAX_COPY_ATTEMPTS,
        })
    }

    /// Creates an organizer using the built-in audio, image and video table.
    pub fn with_defaults(directory: impl AsRef<Path>) -> OrganizeResult<Self> {
        Self::new(directory, CategoryMapping::default())
    }

    /// Sets how many `_copy(N)` names are tried before a move fails.
    /// Values below 1 are raised to 1.
    pub fn with_max_copy_attempts(mut self, attempts: u32) -> Self {
        self.max_copy_attempts = attempts.max(1);
        self
    }

    /// The resolved directory all operations work on.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn mapping(&self) -> &CategoryMapping {
        &self.mapping
    }

    /// Returns the extension of `file_name`, dot included.
    pub fn classify(file_name: &str) -> Option<&str> {
        classify(file_name)
    }

    /// Lists the names directly inside the directory, sorted.
    ///
    /// # Errors
    ///
    /// `NotADirectory` if the resolved path is missing or not a directory,
    /// `Io` if it cannot be read.
    pub fn list_entries(&self) -> OrganizeResult<Vec<String>> {
        Ok(self.snapshot()?.into_iter().map(|e| e.name).collect())
    }

    /// Returns the extension of every entry, or an empty string when it has none.
    pub fn file_extensions(&self) -> OrganizeResult<Vec<String>> {
        Ok(self
            .snapshot()?
            .iter()
            .map(|e| classify(&e.name).unwrap_or_default().to_string())
            .collect())
    }

    /// Creates the folder of every category that has at least one matching
    /// file in the directory. Returns the folders that were newly created.
    pub fn ensure_category_folders(&self) -> OrganizeResult<Vec<PathBuf>> {
        let entries = self.snapshot()?;
        let mut created = Vec::new();

        for category in self.mapping.categories() {
            let needed = entries.iter().any(|e| {
                !e.is_dir
                    && self
                        .mapping
                        .category_for(&e.name)
                        .is_some_and(|c| c.name() == category.name())
            });
            if !needed {
                continue;
            }

            let folder = self.category_dir(category);
            if create_folder_if_missing(&folder)? {
                info!(folder = %folder.display(), "created category folder");
                created.push(folder);
            }
        }

        Ok(created)
    }

    /// Moves every matching entry into its category folder.
    ///
    /// The listing is taken once at the start. The first failure aborts the
    /// pass; files already moved stay where they are.
    pub fn move_files(&self) -> OrganizeResult<MoveReport> {
        let mut report = MoveReport::default();
        for entry in self.snapshot()? {
            match self.move_entry(&entry.name)? {
                Some(op) => report.moved.push(op),
                None => report.skipped.push(entry.name),
            }
        }
        Ok(report)
    }

    /// Creates the needed folders, then moves the files.
    pub fn organize(&self) -> OrganizeResult<MoveReport> {
        self.ensure_category_folders()?;
        self.move_files()
    }

    /// Computes what [`move_files`](Self::move_files) would do without
    /// touching the filesystem. Planned names are unique against each other
    /// and against files already present.
    pub fn plan_moves(&self) -> OrganizeResult<MoveReport> {
        let mut report = MoveReport::default();
        let mut claimed: Vec<PathBuf> = Vec::new();

        for entry in self.snapshot()? {
            let target = if entry.is_dir {
                None
            } else {
                self.target_for(&entry.name)?
            };
            let Some((category, source, destination)) = target else {
                report.skipped.push(entry.name);
                continue;
            };

            let new_path =
                self.unique_destination(&destination, |p| claimed.iter().any(|c| c == p) || exists(p))?;
            claimed.push(new_path.clone());
            report.moved.push(MoveOperation {
                file_name: entry.name,
                original_path: source,
                new_path,
                category: category.name().to_string(),
            });
        }

        Ok(report)
    }

    /// Moves a single entry of the directory into its category folder.
    ///
    /// Returns `None` when the entry is a directory or matches no category.
    ///
    /// # Errors
    ///
    /// `PathEscape` if `file_name` is not a single path component or would
    /// resolve outside its category folder;
    /// nothing is moved in that case.
    pub fn move_entry(&self, file_name: &str) -> OrganizeResult<Option<MoveOperation>> {
        let Some((category, source, destination)) = self.target_for(file_name)? else {
            debug!(file = file_name, "no category, leaving in place");
            return Ok(None);
        };

        match fs::symlink_metadata(&source) {
            Ok(meta) if meta.is_dir() => {
                debug!(file = file_name, "directory, leaving in place");
                return Ok(None);
            }
            Ok(_) => {}
            Err(e) => {
                return Err(OrganizeError::Io {
                    operation: "inspect",
                    path: source,
                    source: e,
                });
            }
        }

        let folder = self.category_dir(category);
        if create_folder_if_missing(&folder)? {
            info!(folder = %folder.display(), "created category folder");
        }

        let new_path = self.unique_destination(&destination, exists)?;
        fs::rename(&source, &new_path).map_err(|e| OrganizeError::FileMove {
            source_path: source.clone(),
            destination: new_path.clone(),
            source: e,
        })?;
        info!(file = file_name, to = %new_path.display(), "moved file");

        Ok(Some(MoveOperation {
            file_name: file_name.to_string(),
            original_path: source,
            new_path,
            category: category.name().to_string(),
        }))
    }

    fn category_dir(&self, category: &Category) -> PathBuf {
        self.root.join(category.dir_name())
    }

    /// Resolves category, source and intended destination for an entry name,
    /// enforcing that both paths stay inside the managed tree.
    fn target_for<'a>(
        &'a self,
        file_name: &str,
    ) -> OrganizeResult<Option<(&'a Category, PathBuf, PathBuf)>> {
        let mut components = Path::new(file_name).components();
        let single_name = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !single_name {
            warn!(file = file_name, "entry name is not a single path component");
            return Err(OrganizeError::PathEscape {
                name: file_name.to_string(),
                destination: self.root.join(file_name),
            });
        }

        let Some(category) = self.mapping.category_for(file_name) else {
            return Ok(None);
        };

        let folder = self.category_dir(category);
        let source = normalize(&self.root.join(file_name));
        let destination = normalize(&folder.join(file_name));

        let inside = source.starts_with(&self.root)
            && source != self.root
            && destination.starts_with(&folder)
            && destination != folder;
        if !inside {
            warn!(file = file_name, "entry name escapes the managed directory");
            return Err(OrganizeError::PathEscape {
                name: file_name.to_string(),
                destination,
            });
        }

        Ok(Some((category, source, destination)))
    }

    /// Returns `destination` if free, else the first free
    /// `<base>_copy(N)<ext>` sibling with N counting from 1.
    fn unique_destination(
        &self,
        destination: &Path,
        taken: impl Fn(&Path) -> bool,
    ) -> OrganizeResult<PathBuf> {
        if !taken(destination) {
            return Ok(destination.to_path_buf());
        }

        let dir = destination.parent().unwrap_or(&self.root);
        let file_name = destination
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let (base, ext) = split_extension(&file_name);
        let ext = ext.unwrap_or_default();

        for n in 1..=self.max_copy_attempts {
            let candidate = dir.join(format!("{}_copy({}){}", base, n, ext));
            if !taken(&candidate) {
                debug!(from = %destination.display(), to = %candidate.display(), "name collision resolved");
                return Ok(candidate);
            }
        }

        Err(OrganizeError::MoveConflictResolution {
            destination: destination.to_path_buf(),
            attempts: self.max_copy_attempts,
        })
    }

    fn snapshot(&self) -> OrganizeResult<Vec<Entry>> {
        match fs::metadata(&self.root) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Err(OrganizeError::NotADirectory(self.root.clone())),
            Err(e)
                if matches!(
                    e.kind(),
                    std::io::ErrorKind::NotFound | std::io::ErrorKind::NotADirectory
                ) =>
            {
                return Err(OrganizeError::NotADirectory(self.root.clone()));
            }
            Err(e) => {
                return Err(OrganizeError::Io {
                    operation: "inspect",
                    path: self.root.clone(),
                    source: e,
                });
            }
        }

        let read_dir = fs::read_dir(&self.root).map_err(|e| OrganizeError::Io {
            operation: "read directory",
            path: self.root.clone(),
            source: e,
        })?;

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| OrganizeError::Io {
                operation: "read directory",
                path: self.root.clone(),
                source: e,
            })?;
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            match entry.file_name().into_string() {
                Ok(name) => entries.push(Entry { name, is_dir }),
                Err(raw) => warn!(name = ?raw, "skipping entry with a non UTF-8 name"),
            }
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

fn exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Returns true if the folder was created, false if it already existed.
fn create_folder_if_missing(folder: &Path) -> OrganizeResult<bool> {
    match fs::symlink_metadata(folder) {
        Ok(meta) if meta.is_dir() => Ok(false),
        Ok(_) => Err(OrganizeError::DirectoryCreation {
            path: folder.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                "a non-directory entry already uses this name",
            ),
        }),
        Err(_) => match fs::create_dir(folder) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists && folder.is_dir() => Ok(false),
            Err(e) => Err(OrganizeError::DirectoryCreation {
                path: folder.to_path_buf(),
                source: e,
            }),
        },
    }
}

/// Removes `.` and `..` components without consulting the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn organizer(temp_dir: &TempDir) -> Organizer {
        Organizer::with_defaults(temp_dir.path()).expect("temp dir is absolute")
    }

    #[test]
    fn test_new_rejects_relative_path() {
        let result = Organizer::with_defaults("media/inbox");
        assert!(matches!(result, Err(OrganizeError::InvalidPath(_))));
    }

    #[test]
    fn test_new_normalizes_path() {
        let organizer = Organizer::with_defaults("/srv/media/./inbox/../inbox").unwrap();
        assert_eq!(organizer.root(), Path::new("/srv/media/inbox"));
    }

    #[test]
    fn test_normalize_does_not_climb_above_root() {
        assert_eq!(normalize(Path::new("/../../etc")), PathBuf::from("/etc"));
    }

    #[test]
    fn test_list_entries_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let organizer = Organizer::with_defaults(temp_dir.path().join("missing")).unwrap();
        assert!(matches!(
            organizer.list_entries(),
            Err(OrganizeError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_list_entries_on_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("song.mp3");
        fs::write(&file, b"x").unwrap();
        let organizer = Organizer::with_defaults(&file).unwrap();
        assert!(matches!(
            organizer.list_entries(),
            Err(OrganizeError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_list_entries_is_flat_and_sorted() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("b.jpg"), b"x").unwrap();
        fs::write(temp_dir.path().join("a.mp3"), b"x").unwrap();
        fs::create_dir(temp_dir.path().join("sub")).unwrap();
        fs::write(temp_dir.path().join("sub").join("deep.png"), b"x").unwrap();

        let names = organizer(&temp_dir).list_entries().unwrap();
        assert_eq!(names, vec!["a.mp3", "b.jpg", "sub"]);
    }

    #[test]
    fn test_file_extensions() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.mp3"), b"x").unwrap();
        fs::write(temp_dir.path().join("README"), b"x").unwrap();

        let exts = organizer(&temp_dir).file_extensions().unwrap();
        assert_eq!(exts, vec!["", ".mp3"]);
        assert_eq!(Organizer::classify("a.mp3"), Some(".mp3"));
    }

    #[test]
    fn test_unique_destination_appends_copy_suffix() {
        let temp_dir = TempDir::new().unwrap();
        let organizer = organizer(&temp_dir);
        let dest = temp_dir.path().join("Image").join("photo.jpg");

        let taken = |p: &Path| p == dest || p.ends_with("photo_copy(1).jpg");
        let resolved = organizer.unique_destination(&dest, taken).unwrap();
        assert_eq!(resolved, temp_dir.path().join("Image").join("photo_copy(2).jpg"));
    }

    #[test]
    fn test_unique_destination_without_extension() {
        let temp_dir = TempDir::new().unwrap();
        let organizer = organizer(&temp_dir);
        let dest = temp_dir.path().join("notes");

        let resolved = organizer.unique_destination(&dest, |p| p == dest).unwrap();
        assert_eq!(resolved, temp_dir.path().join("notes_copy(1)"));
    }

    #[test]
    fn test_unique_destination_is_bounded() {
        let temp_dir = TempDir::new().unwrap();
        let organizer = organizer(&temp_dir).with_max_copy_attempts(3);
        let dest = temp_dir.path().join("a.mp3");

        let result = organizer.unique_destination(&dest, |_| true);
        assert!(matches!(
            result,
            Err(OrganizeError::MoveConflictResolution { attempts: 3, .. })
        ));
    }

    #[test]
    fn test_target_for_rejects_parent_segments() {
        let temp_dir = TempDir::new().unwrap();
        let organizer = organizer(&temp_dir);

        for name in ["../escape.jpg", "../../escape.jpg", "x/../../escape.mp3"] {
            assert!(
                matches!(
                    organizer.target_for(name),
                    Err(OrganizeError::PathEscape { .. })
                ),
                "{} should be rejected",
                name
            );
        }
    }

    #[test]
    fn test_target_for_rejects_nested_names() {
        let temp_dir = TempDir::new().unwrap();
        let organizer = organizer(&temp_dir);

        for name in ["nested/x.mp3", "./x.mp3", "/x.mp3", ".", ""] {
            assert!(
                matches!(
                    organizer.target_for(name),
                    Err(OrganizeError::PathEscape { .. })
                ),
                "{:?} should be rejected",
                name
            );
        }
        assert!(organizer.target_for("x.mp3").unwrap().is_some());
    }

    #[test]
    fn test_list_entries_below_a_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("song.mp3"), b"x").unwrap();
        let organizer = Organizer::with_defaults(temp_dir.path().join("song.mp3").join("inner")).unwrap();
        assert!(matches!(
            organizer.list_entries(),
            Err(OrganizeError::NotADirectory(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_list_entries_stat_failure_is_io() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a");
        let b = temp_dir.path().join("b");
        std::os::unix::fs::symlink(&b, &a).unwrap();
        std::os::unix::fs::symlink(&a, &b).unwrap();

        let organizer = Organizer::with_defaults(&a).unwrap();
        assert!(matches!(
            organizer.list_entries(),
            Err(OrganizeError::Io { operation: "inspect", .. })
        ));
    }

    #[test]
    fn test_create_folder_if_missing_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let folder = temp_dir.path().join("Audio");
        assert!(create_folder_if_missing(&folder).unwrap());
        assert!(!create_folder_if_missing(&folder).unwrap());
    }

    #[test]
    fn test_create_folder_blocked_by_file() {
        let temp_dir = TempDir::new().unwrap();
        let folder = temp_dir.path().join("Audio");
        fs::write(&folder, b"not a dir").unwrap();
        assert!(matches!(
            create_folder_if_missing(&folder),
            Err(OrganizeError::DirectoryCreation { .. })
        ));
    }

    #[test]
    fn test_move_entry_skips_directories() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("album.mp3")).unwrap();

        let result = organizer(&temp_dir).move_entry("album.mp3").unwrap();
        assert!(result.is_none());
        assert!(temp_dir.path().join("album.mp3").is_dir());
    }

    #[test]
    fn test_plan_moves_does_not_touch_disk() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.mp3"), b"x").unwrap();
        fs::write(temp_dir.path().join("c.txt"), b"x").unwrap();

        let report = organizer(&temp_dir).plan_moves().unwrap();
        assert_eq!(report.moved.len(), 1);
        assert_eq!(report.moved[0].new_path, temp_dir.path().join("Audio").join("a.mp3"));
        assert_eq!(report.skipped, vec!["c.txt"]);
        assert!(!temp_dir.path().join("Audio").exists());
        assert!(temp_dir.path().join("a.mp3").exists());
    }
}
