//! `mkstar convert` command implementation.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use mkstar_config::Config;
use mkstar_migrate::{SectionPlan, SectionReport, convert, plan};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the convert command.
#[derive(Args)]
pub(crate) struct ConvertArgs {
    /// Path to configuration file (default: auto-discover mkstar.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output (per-section details and info logs).
    #[arg(short, long)]
    pub verbose: bool,

    /// Show what would be converted without making changes.
    #[arg(short, long)]
    dry_run: bool,
}

impl ConvertArgs {
    /// Execute the convert command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or any section reports errors.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = Config::load(self.config.as_deref())?;
        if config.is_default() {
            output.warning("Configuration file not found, using default configuration");
            output.info("Tip: create an mkstar.toml file to customize conversion settings");
        } else if let Some(path) = config.config_path.as_deref().filter(|_| self.verbose) {
            output.info(&format!("Loaded configuration from: {}", path.display()));
        }

        if self.verbose {
            output.info(&format!("Sections: {}", config.sections.len()));
            for (index, section) in config.sections.iter().enumerate() {
                output.info(&format!("  {}. {} ({})", index + 1, section.name, section.slug));
                output.info(&format!("     Input: {}", section.source_dir.display()));
                output.info(&format!("     Output: {}", section.content_dir.display()));
            }
        }

        if self.dry_run {
            print_plan(&output, &plan(&config));
            return Ok(());
        }

        output.heading("Starting conversion...");
        let started = Instant::now();
        let reports = convert(&config);
        let totals = Totals::from_reports(&reports);

        for report in &reports {
            print_report(&output, report, self.verbose);
        }
        print_totals(&output, &totals, reports.len());
        output.info(&format!(
            "Completed in {}ms",
            started.elapsed().as_millis()
        ));

        if totals.errors > 0 {
            return Err(CliError::Failed(totals.errors));
        }
        Ok(())
    }
}

/// Sums over all section reports.
#[derive(Debug, Default, PartialEq, Eq)]
struct Totals {
    processed: usize,
    markdown_files: usize,
    asset_files: usize,
    admonitions: usize,
    tab_groups: usize,
    errors: usize,
}

impl Totals {
    fn from_reports(reports: &[SectionReport]) -> Self {
        reports.iter().fold(Self::default(), |mut totals, report| {
            totals.processed += report.processed;
            totals.markdown_files += report.markdown_files;
            totals.asset_files += report.asset_files;
            totals.admonitions += report.stats.admonitions;
            totals.tab_groups += report.stats.tab_groups;
            totals.errors += report.errors.len();
            totals
        })
    }
}

fn print_plan(output: &Output, plans: &[SectionPlan]) {
    output.heading("Dry run mode - no files will be modified");
    output.info(&format!("Would process {} section(s):", plans.len()));
    for plan in plans {
        output.info(&format!(
            "  - {}: {} -> {} ({} markdown, {} assets)",
            plan.name,
            plan.source_dir.display(),
            plan.content_dir.display(),
            plan.markdown_files,
            plan.asset_files
        ));
        if let Some(error) = &plan.error {
            output.warning(&format!("    {error}"));
        }
    }
}

fn print_report(output: &Output, report: &SectionReport, verbose: bool) {
    if verbose {
        output.info(&format!("Section {}:", report.slug));
        output.field("Processed", format_args!("{} files", report.processed));
        output.field("Markdown", format_args!("{} files", report.markdown_files));
        output.field("Assets", format_args!("{} files", report.asset_files));
    }
    if !report.is_ok() {
        output.error(&format!(
            "Section {}: {} error(s)",
            report.slug,
            report.errors.len()
        ));
        for error in &report.errors {
            output.error(&format!("  - {error}"));
        }
    }
}

fn print_totals(output: &Output, totals: &Totals, sections: usize) {
    output.heading("Summary:");
    output.field("Total files processed", totals.processed);
    output.field("Markdown files", totals.markdown_files);
    output.field("Asset files", totals.asset_files);
    output.field(
        "Converted blocks",
        format_args!(
            "{} admonition(s), {} tab group(s)",
            totals.admonitions, totals.tab_groups
        ),
    );
    output.field("Sections", sections);

    if totals.errors > 0 {
        output.error(&format!("  Errors: {}", totals.errors));
    } else {
        output.success("  No errors");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn test_totals_from_reports() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default_with_base(dir.path());
        let source = &config.sections[0].source_dir;
        fs::create_dir_all(source).unwrap();
        fs::write(source.join("a.md"), "!!! tip\n\n    x\n").unwrap();
        fs::write(source.join("b.md"), "=== \"A\"\n\n    y\n").unwrap();
        fs::write(source.join("c.csv"), "1,2\n").unwrap();

        let reports = convert(&config);

        assert_eq!(
            Totals::from_reports(&reports),
            Totals {
                processed: 3,
                markdown_files: 2,
                asset_files: 1,
                admonitions: 1,
                tab_groups: 1,
                errors: 0,
            }
        );
    }

    #[test]
    fn test_totals_count_section_errors() {
        let dir = tempfile::tempdir().unwrap();
        let reports = convert(&Config::default_with_base(dir.path()));

        assert_eq!(Totals::from_reports(&reports).errors, 1);
    }
}
