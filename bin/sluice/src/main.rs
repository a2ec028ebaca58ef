//! Sluice fee-market engine binary.

mod cli;

fn main() -> eyre::Result<()> {
    cli::run()
}
