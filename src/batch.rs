//! Batch conversion
//!
//! This module provides functions for converting whole directory trees of
//! `.dat` string tables to editable tables and back, including parallel
//! processing and file discovery. Per-file failures are collected and
//! reported; they never abort the rest of the run.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::converter::{convert_dat_to_table, convert_table_to_dat};
use crate::formats::text::{ExportFormat, TextConfig};

/// Result of a batch conversion
#[derive(Debug, Clone)]
pub struct BatchTextResult {
    /// Number of successful conversions
    pub success_count: usize,
    /// Number of failed conversions
    pub fail_count: usize,
    /// Messages for each file processed
    pub results: Vec<String>,
}

/// Find all .dat files in a directory recursively
///
/// # Returns
/// A sorted list of paths to .dat files found in the directory tree.
pub fn find_dat_files<P: AsRef<Path>>(dir: P) -> Vec<PathBuf> {
    find_by_extension(dir, &["dat"])
}

/// Find all table (.tsv/.csv) files in a directory recursively
///
/// # Returns
/// A sorted list of paths to table files found in the directory tree.
pub fn find_table_files<P: AsRef<Path>>(dir: P) -> Vec<PathBuf> {
    find_by_extension(dir, &["tsv", "csv"])
}

fn find_by_extension<P: AsRef<Path>>(dir: P, extensions: &[&str]) -> Vec<PathBuf> {
    let mut files: Vec<_> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| {
            e.path().is_file()
                && e.path().extension().is_some_and(|ext| {
                    extensions.iter().any(|wanted| ext.eq_ignore_ascii_case(wanted))
                })
        })
        .map(|e| e.path().to_path_buf())
        .collect();

    files.sort();
    files
}

/// Batch convert .dat files to editable tables in parallel
///
/// Converts each file into `dest_base`, mirroring the source directory
/// structure. Sibling `.tbl` AHTB tables are picked up per file.
///
/// # Arguments
/// * `files` - List of .dat files to convert
/// * `source_base` - Base directory of the source (for relative paths)
/// * `dest_base` - Destination directory for table files
/// * `config` - Variable table
/// * `format` - Output table format
/// * `remap_chars` - Whether to remap private-use glyphs
/// * `progress` - Callback invoked per file with (current, total, name)
///
/// # Returns
/// Summary of the batch conversion.
pub fn batch_export<F>(
    files: &[PathBuf],
    source_base: &Path,
    dest_base: &Path,
    config: &TextConfig,
    format: ExportFormat,
    remap_chars: bool,
    progress: F,
) -> BatchTextResult
where
    F: Fn(usize, usize, &str) + Send + Sync,
{
    run_batch(files, source_base, progress, |source, relative| {
        let dest = dest_base.join(relative).with_extension(format.extension());
        create_parent_dirs(&dest)?;
        convert_dat_to_table(source, &dest, config, format, remap_chars)
    })
}

/// Batch convert editable tables back to .dat files in parallel
///
/// The mirror image of [`batch_export`].
pub fn batch_import<F>(
    files: &[PathBuf],
    source_base: &Path,
    dest_base: &Path,
    config: &TextConfig,
    format: ExportFormat,
    remap_chars: bool,
    progress: F,
) -> BatchTextResult
where
    F: Fn(usize, usize, &str) + Send + Sync,
{
    run_batch(files, source_base, progress, |source, relative| {
        let dest = dest_base.join(relative).with_extension("dat");
        create_parent_dirs(&dest)?;
        convert_table_to_dat(source, &dest, config, format, remap_chars)
    })
}

/// `create_dir_all` is idempotent, so concurrent workers may create the
/// same destination directory without error.
fn create_parent_dirs(dest: &Path) -> crate::error::Result<()> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn run_batch<F, C>(files: &[PathBuf], source_base: &Path, progress: F, convert: C) -> BatchTextResult
where
    F: Fn(usize, usize, &str) + Send + Sync,
    C: Fn(&Path, &Path) -> crate::error::Result<usize> + Send + Sync,
{
    let success_counter = AtomicUsize::new(0);
    let fail_counter = AtomicUsize::new(0);
    let processed = AtomicUsize::new(0);
    let total = files.len();

    let results: Vec<String> = files
        .par_iter()
        .map(|source| {
            let relative = source.strip_prefix(source_base).unwrap_or(source.as_path());
            let display_path = relative.to_string_lossy();

            let current = processed.fetch_add(1, Ordering::SeqCst) + 1;
            progress(current, total, &display_path);

            match convert(source, relative) {
                Ok(lines) => {
                    success_counter.fetch_add(1, Ordering::SeqCst);
                    format!("Converted: {display_path} ({lines} lines)")
                }
                Err(e) => {
                    fail_counter.fetch_add(1, Ordering::SeqCst);
                    format!("Failed {display_path}: {e}")
                }
            }
        })
        .collect();

    BatchTextResult {
        success_count: success_counter.load(Ordering::SeqCst),
        fail_count: fail_counter.load(Ordering::SeqCst),
        results,
    }
}
