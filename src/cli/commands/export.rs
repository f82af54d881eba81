//! CLI command: export DAT string tables to editable tables

use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};

use crate::batch::{batch_export, find_dat_files};
use crate::converter::convert_dat_to_table;
use crate::formats::text::{ExportFormat, TextConfig};

/// Export a single .dat file or a directory tree of them.
pub fn run(
    source: &Path,
    destination: Option<&Path>,
    config: &TextConfig,
    format: ExportFormat,
    remap: bool,
    quiet: bool,
) -> anyhow::Result<()> {
    if source.is_dir() {
        run_batch(source, destination, config, format, remap, quiet)
    } else {
        let dest = destination
            .map(Path::to_path_buf)
            .unwrap_or_else(|| source.with_extension(format.extension()));
        let lines = convert_dat_to_table(source, &dest, config, format, remap)?;
        if !quiet {
            println!("Exported {} lines to {}", lines, dest.display());
        }
        Ok(())
    }
}

fn run_batch(
    source: &Path,
    destination: Option<&Path>,
    config: &TextConfig,
    format: ExportFormat,
    remap: bool,
    quiet: bool,
) -> anyhow::Result<()> {
    let files = find_dat_files(source);
    if files.is_empty() {
        println!("No DAT files found in: {}", source.display());
        return Ok(());
    }

    let dest_base = destination.unwrap_or(source);
    if !quiet {
        println!("Found {} DAT files to export", files.len());
    }

    let pb = progress_bar(files.len() as u64, "Exporting", quiet);
    let result = batch_export(
        &files,
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
    pb.finish_and_clear();

    print_summary(&result.results, result.success_count, result.fail_count, quiet);
    if result.fail_count > 0 {
        anyhow::bail!("{} of {} files failed", result.fail_count, files.len());
    }
    Ok(())
}

pub(super) fn progress_bar(total: u64, msg: &str, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%)")
            .expect("valid template"),
    );
    pb.set_message(msg.to_string());
    pb
}

pub(super) fn print_summary(results: &[String], success: usize, failed: usize, quiet: bool) {
    if !quiet {
        for line in results {
            println!("  {line}");
        }
    }
    if failed > 0 {
        println!(
            "{} succeeded, {} {}",
            success,
            failed,
            console::style("failed").red()
        );
    } else if !quiet {
        println!("{} {}", success, console::style("succeeded").green());
    }
}
