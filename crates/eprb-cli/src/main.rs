use eprb_core::logging;

mod cli;

use crate::cli::Cli;

fn main() {
    // Initialize logging as early as possible; fall back to stderr if the state dir is unusable.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    // Bad arguments exit with status 2 inside parse_args.
    let cli = Cli::parse_args();
    if let Err(err) = cli.run() {
        tracing::error!("{:#}", err);
        eprintln!("eprb error: {:#}", err);
        std::process::exit(1);
    }
}
