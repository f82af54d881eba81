//! gftext command-line binary

fn main() -> anyhow::Result<()> {
    gftext::cli::run_cli()
}
