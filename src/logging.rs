use env_logger::{Builder, Env, Target};
use log::LevelFilter;
use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

/// Set when records go to stderr, i.e. share the screen with the game.
static LOGS_TO_STDERR: AtomicBool = AtomicBool::new(false);

/// Initializes the global logger.
///
/// The terminal is owned by the game while it runs, so records go to
/// `log_file` when one is given. Without a file only warnings and errors are
/// shown unless `verbose` is set. `RUST_LOG` always wins.
pub fn init(verbose: bool, log_file: Option<&Path>) -> io::Result<()> {
    let level = match (verbose, log_file) {
        (true, _) => LevelFilter::Debug,
        (false, Some(_)) => LevelFilter::Info,
        (false, None) => LevelFilter::Warn,
    };

    LOGS_TO_STDERR.store(log_file.is_none(), Ordering::Relaxed);

    let env = Env::default().default_filter_or(level.to_string());
    let mut builder = Builder::from_env(env);
    if let Some(path) = log_file {
        let file = File::create(path)?;
        builder.target(Target::Pipe(Box::new(file)));
    }

    // `try_init` only fails if a logger was already set. Ignore that case so
    // tests can call `init` multiple times without panicking.
    let _ = builder.try_init();
    Ok(())
}

/// Silences logging while alive if records would otherwise be written to
/// stderr over the game's frames. File logging is left alone.
#[derive(Debug)]
pub struct StderrMute {
    saved: Option<LevelFilter>,
}

impl StderrMute {
    pub fn new() -> Self {
        let saved = LOGS_TO_STDERR.load(Ordering::Relaxed).then(|| {
            let level = log::max_level();
            log::set_max_level(LevelFilter::Off);
            level
        });
        Self { saved }
    }
}

impl Default for StderrMute {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for StderrMute {
    fn drop(&mut self) {
        if let Some(level) = self.saved {
            log::set_max_level(level);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // One test only: both cases touch process-wide logger state.
    #[test]
    fn mute_applies_to_stderr_only_and_restores_the_level() {
        log::set_max_level(LevelFilter::Info);

        LOGS_TO_STDERR.store(false, Ordering::Relaxed);
        let mute = StderrMute::new();
        assert_eq!(log::max_level(), LevelFilter::Info);
        drop(mute);

        LOGS_TO_STDERR.store(true, Ordering::Relaxed);
        let mute = StderrMute::new();
        assert_eq!(log::max_level(), LevelFilter::Off);
        drop(mute);
        assert_eq!(log::max_level(), LevelFilter::Info);

        LOGS_TO_STDERR.store(false, Ordering::Relaxed);
    }
}
