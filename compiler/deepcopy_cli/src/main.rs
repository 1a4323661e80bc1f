//! deepcopy-gen: generate Go deep-copy methods from a package model.

use deepcopy_cli::{run, CliError, USAGE};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(error) = run(&args) {
        eprintln!("error: {error}");
        if matches!(error, CliError::Usage(_)) {
            eprintln!();
            eprintln!("{USAGE}");
        }
        std::process::exit(error.exit_code());
    }
}
