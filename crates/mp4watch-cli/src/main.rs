use mp4watch_core::logging;

mod cli;

use crate::cli::CliCommand;

fn main() {
    // File logging when the state dir is writable, stderr otherwise.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    if let Err(err) = CliCommand::run_from_args() {
        eprintln!("mp4watch error: {:#}", err);
        std::process::exit(1);
    }
}
