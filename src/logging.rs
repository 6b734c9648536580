use env_logger::{Builder, Env};
use log::LevelFilter;

/// Installs the global logger. `verbose` lowers the default level to debug, which shows every
/// state transition; `RUST_LOG` still overrides either default.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let env = Env::default().default_filter_or(level.to_string());
    let mut builder = Builder::from_env(env);
    builder.format_timestamp(None);

    // `try_init` only fails if a logger was already set, e.g. by a test
    // harness or an embedding application. Keep whichever logger is there.
    if builder.try_init().is_err() {
        log::debug!("logger already initialized; keeping it");
    }
}

// ---------------------------------------------------------------------------------------------------------------------
