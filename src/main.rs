use std::process::ExitCode;

use clap::Parser;
use pixelforge::cli::{self, CliArgs};
use pixelforge::logger::{self, Level};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let level = if args.verbose { Level::Info } else { Level::Warn };
    match logger::init(level) {
        Ok(_) => logger::install_panic_hook(),
        Err(e) => eprintln!("warning: session log unavailable: {}", e),
    }

    cli::run(args)
}
