use remote2oss_core::logging;

mod cli;

fn main() {
    // Initialize logging as early as possible.
    let logging_ready = match logging::init_logging() {
        Ok(()) => true,
        Err(err) => {
            eprintln!("remote2oss: {:#}", err);
            false
        }
    };

    if let Err(err) = cli::run_from_args() {
        if logging_ready {
            tracing::error!("exited with error: {:#}", err);
        } else {
            eprintln!("remote2oss error: {:#}", err);
        }
        std::process::exit(1);
    }
}
