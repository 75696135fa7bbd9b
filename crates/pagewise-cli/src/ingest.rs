//! One ingest run: filter inputs, convert sequentially, write the outputs.

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use pagewise_backend::{convert_to_sections, doc_name, BackendOptions, DocumentConverter};
use pagewise_core::fs::{ensure_dir, write_text_atomic};
use pagewise_core::{
    error_log, is_supported_path, IngestResult, PageRecord, ReportBuilder, SectionRecord,
    COMBINED_FILE, ERRORS_FILE, NO_CONTENT, NO_SUPPORTED_FILES,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// JSON export name inside the output directory
pub const COMBINED_JSON_FILE: &str = "combined.json";

/// Resolved settings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOptions {
    /// Directory receiving `combined.txt` and `_errors.txt`
    pub out_dir: PathBuf,
    /// Page/slide limit per PDF or PPTX
    pub max_pages: Option<usize>,
    /// Also write `combined.json`
    pub json: bool,
}

/// What a run produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// No input had a supported extension; placeholder outputs were written
    NoSupportedFiles,
    /// Candidates were processed
    Completed {
        /// Number of candidate files
        files: usize,
        /// Number of files that failed to convert
        errors: usize,
    },
}

impl IngestOutcome {
    /// Console summary line
    #[must_use = "returns the summary line"]
    pub fn summary(&self) -> String {
        match self {
            Self::NoSupportedFiles => NO_SUPPORTED_FILES.to_string(),
            Self::Completed { errors, .. } => {
                let status = if *errors > 0 { "errors" } else { "no errors" };
                format!("Wrote: {COMBINED_FILE}, {ERRORS_FILE} ({status})")
            }
        }
    }
}

/// One `combined.json` entry
#[derive(Debug, Serialize)]
struct JsonEntry<'a> {
    doc_name: &'a str,
    markdown: &'a str,
    sections: &'a [SectionRecord],
    pages: &'a [PageRecord],
}

/// Inputs whose extension is one of the supported ones, in input order
#[must_use = "returns the candidate files"]
pub fn select_candidates(paths: &[PathBuf]) -> Vec<PathBuf> {
    paths
        .iter()
        .filter(|path| is_supported_path(path))
        .cloned()
        .collect()
}

fn write_output(out_dir: &Path, name: &str, content: &str) -> Result<()> {
    let path = out_dir.join(name);
    write_text_atomic(&path, content)
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Run the pipeline over `paths`.
///
/// Conversion failures are collected into `_errors.txt` and never abort the
/// run. `progress` is advanced once per candidate.
///
/// # Errors
///
/// Returns an error if the output directory cannot be created or an output
/// file cannot be written.
pub fn run_ingest(
    paths: &[PathBuf],
    options: &IngestOptions,
    progress: &ProgressBar,
) -> Result<IngestOutcome> {
    ensure_dir(&options.out_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            options.out_dir.display()
        )
    })?;

    let candidates = select_candidates(paths);
    if candidates.is_empty() {
        log::info!("none of {} input path(s) has a supported extension", paths.len());
        write_output(&options.out_dir, ERRORS_FILE, NO_SUPPORTED_FILES)?;
        write_output(&options.out_dir, COMBINED_FILE, NO_CONTENT)?;
        return Ok(IngestOutcome::NoSupportedFiles);
    }

    let converter =
        DocumentConverter::with_options(BackendOptions::new().with_max_pages(options.max_pages));
    let mut report = ReportBuilder::new(candidates.len());
    let mut errors: Vec<String> = Vec::new();
    let mut converted: Vec<(String, IngestResult)> = Vec::new();

    progress.set_length(candidates.len() as u64);
    for path in &candidates {
        let name = doc_name(path);
        progress.set_message(name.clone());

        let (result, error) = convert_to_sections(&converter, path);
        match error {
            Some(message) => {
                log::warn!("{message}");
                errors.push(message);
            }
            None => {
                report.add_file(&name, &result);
                converted.push((name, result));
            }
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    write_output(&options.out_dir, COMBINED_FILE, &report.finish(errors.len()))?;
    write_output(&options.out_dir, ERRORS_FILE, &error_log(&errors))?;

    if options.json {
        let entries: Vec<JsonEntry<'_>> = converted
            .iter()
            .map(|(name, result)| JsonEntry {
                doc_name: name,
                markdown: &result.markdown,
                sections: &result.sections,
                pages: &result.pages,
            })
            .collect();
        let json = serde_json::to_string_pretty(&entries)
            .context("Failed to serialize combined JSON")?;
        write_output(&options.out_dir, COMBINED_JSON_FILE, &json)?;
    }

    Ok(IngestOutcome::Completed {
        files: candidates.len(),
        errors: errors.len(),
    })
}
