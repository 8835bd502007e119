//! Compare command implementation.

use std::path::{Path, PathBuf};

use serde::Serialize;

use listings::errors::{ListingsError, Result};
use listings::interface::{compare_listings, Context, ListingReport, Outcome, Validator};
use listings::DiffResult;

use super::helpers::for_each_file;

/// Options for the compare command.
#[derive(Debug, Clone, Default)]
pub struct CompareOptions {
    /// Print the line diff of every listing that does not match.
    pub diff: bool,
    /// Print one JSON document instead of text.
    pub json: bool,
    /// Only report listings with this result.
    pub only: Option<DiffResult>,
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Serialize)]
struct FileReport {
    file: PathBuf,
    listings: Vec<ListingReport>,
    /// Counted before `--only` filtering.
    #[serde(skip)]
    unresolved: usize,
}

/// Compares every listing with the source file it names.
pub fn compare(ctx: &Context, options: CompareOptions) -> Result<()> {
    let validator = ctx.validator();
    let mut collected = Vec::new();

    let result = for_each_file(ctx, &options.files, |path| {
        let report = compare_file(ctx, &validator, path, options.only)?;
        let unresolved = report.unresolved;

        if !options.json {
            print!("{}", render_reports(path, &report.listings, options.diff));
        }
        collected.push(report);

        if unresolved > 0 {
            return Err(ListingsError::Other(format!(
                "{} listings could not be resolved",
                unresolved
            )));
        }
        Ok(())
    });

    if options.json {
        println!("{}", render_json(&collected)?);
    }
    result
}

fn compare_file(
    ctx: &Context,
    validator: &Validator<'_>,
    path: &Path,
    only: Option<DiffResult>,
) -> Result<FileReport> {
    let doc = ctx.load_document(path)?;
    let reports = compare_listings(&doc, validator);
    let unresolved = reports.iter().filter(|r| r.is_unresolved()).count();

    Ok(FileReport {
        file: path.to_path_buf(),
        listings: reports
            .into_iter()
            .filter(|r| only.is_none() || r.result() == only)
            .collect(),
        unresolved,
    })
}

fn render_json(reports: &[FileReport]) -> Result<String> {
    serde_json::to_string_pretty(reports)
        .map_err(|e| ListingsError::Other(format!("Failed to serialize report: {}", e)))
}

fn render_reports(path: &Path, reports: &[ListingReport], diff: bool) -> String {
    let mut out = String::new();
    for report in reports {
        let location = format!("{}:{}", path.display(), report.line);
        match &report.outcome {
            Outcome::Compared { file, comparison } => {
                out.push_str(&format!(
                    "{} {} ({}): {}\n",
                    location,
                    report.source_file_name,
                    file.display(),
                    comparison.result.description()
                ));
                if diff && !comparison.is_match() {
                    for line in &comparison.lines {
                        out.push_str(&format!("    {}\n", line));
                    }
                }
            }
            Outcome::Unresolved { message } => {
                out.push_str(&format!("{} {}: {}\n", location, report.source_file_name, message))
            }
        }
    }
    out
}
