//! CLI command: inspect an AHTB name-hash table

use std::path::Path;

use crate::formats::ahtb::read_ahtb;

/// Print the entries of a name-hash table. Reading verifies every hash, so
/// a clean listing doubles as an integrity check.
pub fn run(path: &Path, limit: usize) -> anyhow::Result<()> {
    let table = read_ahtb(path)?;

    println!("{}: {} entries", path.display(), table.len());
    for entry in table.entries.iter().take(limit) {
        println!("{:016X}  {}", entry.hash(), entry.name);
    }
    if table.len() > limit {
        println!("  ... {} more (raise --limit to see them)", table.len() - limit);
    }

    Ok(())
}
