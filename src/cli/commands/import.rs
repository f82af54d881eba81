//! CLI command: import edited tables back into DAT string tables

use std::path::Path;

use crate::batch::{batch_import, find_table_files};
use crate::converter::convert_table_to_dat;
use crate::formats::text::{ExportFormat, TextConfig};

use super::export::{print_summary, progress_bar};

/// Import a single table file or a directory tree of them.
pub fn run(
    source: &Path,
    destination: Option<&Path>,
    config: &TextConfig,
    remap: bool,
    quiet: bool,
) -> anyhow::Result<()> {
    if source.is_dir() {
        run_batch(source, destination, config, remap, quiet)
    } else {
        let format = format_for(source)?;
        let dest = destination
            .map(Path::to_path_buf)
            .unwrap_or_else(|| source.with_extension("dat"));
        let lines = convert_table_to_dat(source, &dest, config, format, remap)?;
        if !quiet {
            println!("Imported {} lines to {}", lines, dest.display());
        }
        Ok(())
    }
}

fn run_batch(
    source: &Path,
    destination: Option<&Path>,
    config: &TextConfig,
    remap: bool,
    quiet: bool,
) -> anyhow::Result<()> {
    let files = find_table_files(source);
    if files.is_empty() {
        println!("No table files found in: {}", source.display());
        return Ok(());
    }

    let dest_base = destination.unwrap_or(source);
    if !quiet {
        println!("Found {} table files to import", files.len());
    }

    // Batch conversion reads each file's format from its own extension, so
    // mixed .tsv/.csv trees import in two passes.
    let mut success = 0;
    let mut failed = 0;
    let mut messages = Vec::new();
    let pb = progress_bar(files.len() as u64, "Importing", quiet);
    for format in [ExportFormat::Tsv, ExportFormat::Csv] {
        let matching: Vec<_> = files
            .iter()
            .filter(|path| {
                path.extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(format.extension()))
            })
            .cloned()
            .collect();
        if matching.is_empty() {
            continue;
        }

        let result = batch_import(
            &matching,
            source,
            dest_base,
            config,
            format,
            remap,
            |_, _, name| {
                pb.set_message(name.to_string());
                pb.inc(1);
            },
        );
        success += result.success_count;
        failed += result.fail_count;
        messages.extend(result.results);
    }
    pb.finish_and_clear();

    print_summary(&messages, success, failed, quiet);
    if failed > 0 {
        anyhow::bail!("{} of {} files failed", failed, files.len());
    }
    Ok(())
}

fn format_for(path: &Path) -> anyhow::Result<ExportFormat> {
    path.extension()
        .and_then(|ext| ExportFormat::from_extension(&ext.to_string_lossy()))
        .ok_or_else(|| anyhow::anyhow!("cannot tell table format from: {}", path.display()))
}
