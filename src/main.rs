use clap::Parser;
use stratbuilder::cli::{Cli, run};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
