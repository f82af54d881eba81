//! CLI command: show the decoded lines of a DAT string table

use std::path::Path;

use crate::formats::text::{TextConfig, read_text};

/// Print the decoded lines of a file, index and flags first.
pub fn run(path: &Path, config: &TextConfig, remap: bool, limit: usize) -> anyhow::Result<()> {
    let file = read_text(path, config, remap)?;

    println!("{}: {} lines", path.display(), file.len());
    for (index, line) in file.lines.iter().take(limit).enumerate() {
        println!("{index:5}  {:04X}  {}", line.flags, line.text);
    }
    if file.len() > limit {
        println!("  ... {} more (raise --limit to see them)", file.len() - limit);
    }

    Ok(())
}
