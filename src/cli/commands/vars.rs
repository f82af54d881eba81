//! CLI command: list the variable table

use crate::formats::text::TextConfig;

/// Print every variable mapping as `CODE=NAME`.
pub fn run(config: &TextConfig) -> anyhow::Result<()> {
    for (code, name) in config.variables() {
        println!("{code:04X}={name}");
    }
    Ok(())
}
