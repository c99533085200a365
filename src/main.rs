use clap::Parser;
use cotsignal::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    cotsignal::cli::init_tracing(cli.verbose);
    run(cli)
}
