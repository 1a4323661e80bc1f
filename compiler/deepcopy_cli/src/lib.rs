//! Command-line driver for the deep-copy generator.
//!
//! Reads a JSON package model, runs the engine and writes one
//! `zz_generated.deepcopy.go` per package.

mod args;
mod commands;
mod error;
mod tracing_setup;

pub use args::{parse_args, CliOptions, Command, USAGE};
pub use commands::{execute, gen_config, output_path, run_engine, Summary};
pub use error::CliError;
pub use tracing_setup::init_tracing;

/// Entry point shared by the binary and the tests. `args` excludes the
/// program name.
pub fn run(args: &[String]) -> Result<(), CliError> {
    match parse_args(args)? {
        Command::Help => {
            println!("{USAGE}");
            Ok(())
        }
        Command::Generate(options) => {
            init_tracing(options.verbose);
            let summary = execute(&options)?;
            if options.verify_only {
                println!("{} generated file(s) up to date", summary.unchanged.len());
            } else {
                println!(
                    "{} file(s) written, {} unchanged",
                    summary.written.len(),
                    summary.unchanged.len()
                );
            }
            Ok(())
        }
    }
}
