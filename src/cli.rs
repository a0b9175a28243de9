//! Command-line interface module for mediasort.
//!
//! This module handles:
//! - Argument parsing (clap)
//! - Configuration loading
//! - Dispatch to the organizer and reporting of the outcome

use crate::config::MediasortConfig;
use crate::error::OrganizeResult;
use crate::file_organizer::Organizer;
use crate::output::OutputFormatter;
use clap::{Parser, Subcommand, ValueHint};
use std::path::{Path, PathBuf};

/// Sort audio, image and video files into category subfolders.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (defaults to .mediasortrc.toml, then ~/.config/mediasort/config.toml).
    #[arg(long, global = true, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create category folders and move matching files into them.
    Organize {
        #[arg(value_name = "DIR", value_hint = ValueHint::DirPath)]
        directory: PathBuf,

        /// Show where files would go without changing anything.
        #[arg(long)]
        dry_run: bool,

        /// Print the move report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Only create the category folders that current files need.
    Folders {
        #[arg(value_name = "DIR", value_hint = ValueHint::DirPath)]
        directory: PathBuf,
    },
    /// List the extension of every entry in the directory.
    Extensions {
        #[arg(value_name = "DIR", value_hint = ValueHint::DirPath)]
        directory: PathBuf,
    },
}

/// Represents a CLI operation to execute against one directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrganizeCommand {
    /// Create folders and move files.
    Organize {
        /// If true, simulate the operation without making changes.
        dry_run: bool,
        /// If true, print the report as JSON instead of a table.
        json: bool,
    },
    /// Create the needed category folders only.
    Folders,
    /// List entry extensions only.
    Extensions,
}

impl Command {
    /// Splits the parsed subcommand into the operation and its directory.
    pub fn into_parts(self) -> (OrganizeCommand, PathBuf) {
        match self {
            Command::Organize {
                directory,
                dry_run,
                json,
            } => (OrganizeCommand::Organize { dry_run, json }, directory),
            Command::Folders { directory } => (OrganizeCommand::Folders, directory),
            Command::Extensions { directory } => (OrganizeCommand::Extensions, directory),
        }
    }
}

/// Runs a command against `dir_path` using the default configuration lookup.
///
/// ```no_run
/// use mediasort::cli::{run_cli, OrganizeCommand};
/// use std::path::Path;
///
/// let result = run_cli(
///     OrganizeCommand::Organize { dry_run: true, json: false },
///     Path::new("/home/me/Downloads"),
/// );
/// if let Err(e) = result {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run_cli(command: OrganizeCommand, dir_path: &Path) -> Result<(), String> {
    run_cli_with_config(command, dir_path, None)
}

/// Runs a command with an optional explicit configuration file.
///
/// A relative `dir_path` is resolved against the current directory.
pub fn run_cli_with_config(
    command: OrganizeCommand,
    dir_path: &Path,
    config_path: Option<&Path>,
) -> Result<(), String> {
    let config = MediasortConfig::load(config_path)
        .map_err(|e| format!("Error loading configuration: {}", e))?;

    let directory = std::path::absolute(dir_path)
        .map_err(|e| format!("Error resolving {}: {}", dir_path.display(), e))?;
    let organizer = Organizer::new(&directory, config.mapping())
        .map_err(|e| e.to_string())?
        .with_max_copy_attempts(config.max_copy_attempts);

    match command {
        OrganizeCommand::Organize { dry_run, json } => organize(&organizer, dry_run, json),
        OrganizeCommand::Folders => create_folders(&organizer),
        OrganizeCommand::Extensions => list_extensions(&organizer),
    }
}

fn organize(organizer: &Organizer, dry_run: bool, json: bool) -> Result<(), String> {
    let root = organizer.root();

    let result = if dry_run {
        organizer.plan_moves()
    } else {
        organizer.organize()
    };
    let report = result.map_err(|e| format!("Error moving files: {}", e))?;

    if json {
        let text = OutputFormatter::report_json(&report)
            .map_err(|e| format!("Error serializing report: {}", e))?;
        println!("{}", text);
        return Ok(());
    }

    if report.moved.is_empty() {
        OutputFormatter::info(&format!("No media files to sort in {}", root.display()));
        return Ok(());
    }

    if dry_run {
        OutputFormatter::dry_run_notice(&format!("Files in {} would be sorted as follows:", root.display()));
    } else {
        OutputFormatter::info(&format!("Sorted contents of {}:", root.display()));
    }
    OutputFormatter::moves(&report, root, dry_run);
    OutputFormatter::summary_table(
        &report.category_counts(),
        report.moved.len(),
        report.skipped.len(),
    );

    if dry_run {
        OutputFormatter::success("Dry run complete. No files were modified.");
    } else {
        OutputFormatter::success("Files moved successfully");
    }
    Ok(())
}

fn create_folders(organizer: &Organizer) -> Result<(), String> {
    let created = organizer
        .ensure_category_folders()
        .map_err(|e| format!("Error creating folders: {}", e))?;

    for folder in &created {
        OutputFormatter::plain(&format!(" - {}", folder.display()));
    }
    if created.is_empty() {
        OutputFormatter::info("All needed folders already exist");
    } else {
        OutputFormatter::success("Folders created successfully");
    }
    Ok(())
}

fn list_extensions(organizer: &Organizer) -> Result<(), String> {
    let lines = extension_lines(organizer)
        .map_err(|e| format!("Error reading extensions: {}", e))?;

    if lines.is_empty() {
        OutputFormatter::warning("Directory is empty");
        return Ok(());
    }

    for line in &lines {
        OutputFormatter::plain(line);
    }
    Ok(())
}

/// One line per entry: its extension and the folder it would be sorted into.
fn extension_lines(organizer: &Organizer) -> OrganizeResult<Vec<String>> {
    let mapping = organizer.mapping();
    Ok(organizer
        .file_extensions()?
        .iter()
        .map(|ext| {
            let folder = mapping
                .category_for_extension(ext)
                .map(|c| c.dir_name())
                .unwrap_or_else(|| "-".to_string());
            let shown = if ext.is_empty() { "(none)" } else { ext.as_str() };
            format!("{:<8} {}", shown, folder)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_organize() {
        let args = Args::try_parse_from(["mediasort", "organize", "/tmp/in", "--dry-run"]).unwrap();
        let (command, dir) = args.command.into_parts();
        assert_eq!(
            command,
            OrganizeCommand::Organize {
                dry_run: true,
                json: false
            }
        );
        assert_eq!(dir, PathBuf::from("/tmp/in"));
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let args =
            Args::try_parse_from(["mediasort", "folders", "/tmp/in", "-vv", "--config", "c.toml"])
                .unwrap();
        assert_eq!(args.verbose, 2);
        assert_eq!(args.config, Some(PathBuf::from("c.toml")));
        assert_eq!(args.command.into_parts().0, OrganizeCommand::Folders);
    }

    #[test]
    fn test_extension_lines_follow_listing() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("a.mp3"), b"x").unwrap();
        std::fs::write(temp_dir.path().join("b.txt"), b"x").unwrap();
        std::fs::write(temp_dir.path().join("c"), b"x").unwrap();
        let organizer = Organizer::with_defaults(temp_dir.path()).unwrap();

        let lines = extension_lines(&organizer).unwrap();
        assert_eq!(
            lines,
            vec![
                format!("{:<8} {}", ".mp3", "Audio"),
                format!("{:<8} {}", ".txt", "-"),
                format!("{:<8} {}", "(none)", "-"),
            ]
        );
    }

    #[test]
    fn test_parse_requires_directory() {
        assert!(Args::try_parse_from(["mediasort", "extensions"]).is_err());
    }
}
