//! Output formatting and styling module.
//!
//! All human-facing CLI output goes through here: coloured status lines,
//! the per-category summary table and the JSON report.

use crate::file_organizer::MoveReport;
use colored::*;
use std::collections::HashMap;
use std::path::Path;

/// Manages all CLI output with consistent styling and formatting.
///
/// - Success messages (green with ✓)
/// - Error messages (red with ✗)
/// - Warning messages (yellow with ⚠)
/// - Info messages (cyan)
/// - Summary tables with statistics
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// ```no_run
    /// use mediasort::output::OutputFormatter;
    /// OutputFormatter::success("Folders created");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark, on stderr.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    pub fn plain(message: &str) {
        println!("{}", message);
    }

    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Prints one line per move, relative to `base` where possible.
    pub fn moves(report: &MoveReport, base: &Path, dry_run: bool) {
        for op in &report.moved {
            let shown = op.new_path.strip_prefix(base).unwrap_or(op.new_path.as_path());
            if dry_run {
                println!(" - {} {} {}", op.file_name, "→ would move to".dimmed(), shown.display());
            } else {
                println!(" - {} {} {}", op.file_name, "→".green(), shown.display());
            }
        }
    }

    /// Prints a summary table with file counts by category.
    ///
    /// ```no_run
    /// use mediasort::output::OutputFormatter;
    /// use std::collections::HashMap;
    ///
    /// let mut counts = HashMap::new();
    /// counts.insert("audio".to_string(), 3);
    /// counts.insert("image".to_string(), 8);
    /// OutputFormatter::summary_table(&counts, 11, 2);
    /// ```
    pub fn summary_table(category_counts: &HashMap<String, usize>, total_files: usize, skipped: usize) {
        Self::header("SUMMARY");

        let mut categories: Vec<_> = category_counts.iter().collect();
        categories.sort_by_key(|&(name, _)| name);

        let width = categories
            .iter()
            .map(|(name, _)| name.len())
            .max()
            .unwrap_or(0)
            .max(8); // "Category"

        println!("{:<width$} | {}", "Category".bold(), "Files".bold(), width = width);
        println!("{}", "-".repeat(width + 10));

        for (category, count) in &categories {
            println!(
                "{:<width$} | {} {}",
                category,
                count.to_string().green(),
                plural(**count),
                width = width
            );
        }

        println!("{}", "-".repeat(width + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            plural(total_files),
            width = width
        );
        if skipped > 0 {
            println!(
                "{:<width$} | {} {}",
                "Left",
                skipped.to_string().yellow(),
                if skipped == 1 { "entry" } else { "entries" },
                width = width
            );
        }
    }

    /// Renders the report as pretty JSON.
    pub fn report_json(report: &MoveReport) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(report)
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}
