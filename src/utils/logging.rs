//! Tracing subscriber setup shared by every binary

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Pick the log level from the verbosity flags
pub fn log_level(verbose: bool, quiet: bool) -> Level {
    if quiet {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        Level::INFO
    }
}

/// Install the global subscriber
///
/// Safe to call more than once; later calls are ignored.
pub fn setup_logging(verbose: bool, quiet: bool) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level(verbose, quiet))
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(verbose)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
