//! Directory synchronization: one block dump in, one text file out.
//!
//! The output tree mirrors the input tree. Each run brings the output up
//! to date: new or changed dumps are reconstructed, text files whose dump
//! disappeared are deleted, and output directories with no input
//! counterpart are removed.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::layout::{LayoutAnalyzer, LayoutOptions};
use crate::render::{LayoutStats, RenderOptions};
use crate::Reflow;

const OUTPUT_EXTENSION: &str = "txt";

/// Options for [`sync_directory`].
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Extension of input block dumps, without the dot
    pub input_extension: String,

    /// Regenerate every output, even when up to date
    pub force: bool,

    /// Layout options applied to every document
    pub layout: LayoutOptions,

    /// Render options applied to every document
    pub render: RenderOptions,
}

impl SyncOptions {
    /// Create new sync options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the input extension.
    pub fn with_input_extension(mut self, extension: impl Into<String>) -> Self {
        self.input_extension = extension.into();
        self
    }

    /// Regenerate every output.
    pub fn force(mut self) -> Self {
        self.force = true;
        self
    }

    /// Set layout options.
    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout;
        self
    }

    /// Set render options.
    pub fn with_render(mut self, render: RenderOptions) -> Self {
        self.render = render;
        self
    }
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            input_extension: "json".to_string(),
            force: false,
            layout: LayoutOptions::default(),
            render: RenderOptions::default(),
        }
    }
}

/// A document that could not be processed.
#[derive(Debug, Clone, Serialize)]
pub struct SyncFailure {
    /// Input file
    pub path: PathBuf,
    /// Error message
    pub message: String,
}

/// Outcome of a synchronization run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    /// Text files written
    pub extracted: usize,
    /// Inputs whose output was already up to date
    pub skipped: usize,
    /// Inputs that produced no text
    pub empty: usize,
    /// Text files deleted because their input is gone, empty or failing
    pub deleted: usize,
    /// Orphan output directories removed
    pub removed_dirs: usize,
    /// Inputs that failed to load or reconstruct
    pub failed: Vec<SyncFailure>,
    /// Layout statistics summed over the documents written this run
    pub stats: LayoutStats,
}

impl SyncReport {
    /// Check if the run changed nothing on disk.
    pub fn is_noop(&self) -> bool {
        self.extracted == 0 && self.deleted == 0 && self.removed_dirs == 0
    }
}

/// Mirror a tree of block dumps to a tree of text files.
///
/// A failure on one document is recorded in the report and the run goes on;
/// only problems with the roots themselves or invalid options abort.
pub fn sync_directory<P: AsRef<Path>, Q: AsRef<Path>>(
    input_root: P,
    output_root: Q,
    options: &SyncOptions,
) -> Result<SyncReport> {
    let input_root = input_root.as_ref();
    let output_root = output_root.as_ref();

    if !input_root.is_dir() {
        return Err(Error::Sync {
            path: input_root.to_path_buf(),
            message: "input directory does not exist".to_string(),
        });
    }
    // Fail once on bad options instead of once per document
    LayoutAnalyzer::new(options.layout.clone())?;
    fs::create_dir_all(output_root).map_err(|e| sync_error(output_root, e))?;

    let reflow = Reflow::new()
        .with_layout_options(options.layout.clone())
        .with_render_options(options.render.clone());

    let mut report = SyncReport::default();
    let mut expected: HashSet<PathBuf> = HashSet::new();

    for entry in WalkDir::new(input_root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let input = entry.path();
        if !input
            .extension()
            .is_some_and(|ext| ext == options.input_extension.as_str())
        {
            continue;
        }
        let Ok(relative) = input.strip_prefix(input_root) else {
            continue;
        };
        let output = output_root.join(relative).with_extension(OUTPUT_EXTENSION);

        if !options.force && is_up_to_date(input, &output) {
            expected.insert(output);
            report.skipped += 1;
            continue;
        }

        // Outputs of empty or failed inputs stay unexpected, so the orphan
        // pass deletes text left over from an earlier version of the input.
        match sync_one(&reflow, input, &output) {
            Ok(Some(stats)) => {
                log::info!("Extracted {}", input.display());
                expected.insert(output);
                report.extracted += 1;
                report.stats.merge(&stats);
            }
            Ok(None) => {
                log::warn!("{} has no usable text blocks", input.display());
                report.empty += 1;
            }
            Err(e) => {
                log::warn!("Failed to process {}: {}", input.display(), e);
                report.failed.push(SyncFailure {
                    path: input.to_path_buf(),
                    message: e.to_string(),
                });
            }
        }
    }

    remove_orphans(input_root, output_root, &expected, &mut report)?;

    log::info!(
        "Sync finished: {} extracted, {} skipped, {} empty, {} deleted, {} dirs removed, {} failed",
        report.extracted,
        report.skipped,
        report.empty,
        report.deleted,
        report.removed_dirs,
        report.failed.len()
    );
    Ok(report)
}

/// Reconstruct one document; returns its statistics if text was written.
fn sync_one(reflow: &Reflow, input: &Path, output: &Path) -> Result<Option<LayoutStats>> {
    let result = reflow.process_file(input)?;
    if result.is_empty() {
        return Ok(None);
    }
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent).map_err(|e| sync_error(parent, e))?;
    }
    fs::write(output, result.text()).map_err(|e| sync_error(output, e))?;
    Ok(Some(result.stats().clone()))
}

/// An output is current when it exists, is non-empty and is not older
/// than its input. Unknown modification times count as current.
fn is_up_to_date(input: &Path, output: &Path) -> bool {
    let Ok(out_meta) = fs::metadata(output) else {
        return false;
    };
    if out_meta.len() == 0 {
        return false;
    }
    let input_modified = fs::metadata(input).and_then(|m| m.modified());
    match (input_modified, out_meta.modified()) {
        (Ok(input_time), Ok(output_time)) => output_time >= input_time,
        _ => true,
    }
}

fn remove_orphans(
    input_root: &Path,
    output_root: &Path,
    expected: &HashSet<PathBuf>,
    report: &mut SyncReport,
) -> Result<()> {
    let entries: Vec<_> = WalkDir::new(output_root)
        .min_depth(1)
        .contents_first(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .collect();

    for entry in entries {
        let path = entry.path();
        let Ok(relative) = path.strip_prefix(output_root) else {
            continue;
        };

        if entry.file_type().is_dir() {
            if !input_root.join(relative).is_dir() && path.exists() {
                fs::remove_dir_all(path).map_err(|e| sync_error(path, e))?;
                log::info!("Removed orphan directory {}", path.display());
                report.removed_dirs += 1;
            }
        } else if path.extension().is_some_and(|ext| ext == OUTPUT_EXTENSION)
            && !expected.contains(path)
        {
            fs::remove_file(path).map_err(|e| sync_error(path, e))?;
            log::info!("Deleted orphan {}", path.display());
            report.deleted += 1;
        }
    }
    Ok(())
}

fn sync_error(path: &Path, err: std::io::Error) -> Error {
    Error::Sync {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}
