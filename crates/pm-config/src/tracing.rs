use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

static INITIALISED: OnceLock<()> = OnceLock::new();
static CHROME_GUARD: OnceLock<Mutex<Option<tracing_chrome::FlushGuard>>> = OnceLock::new();

const CHROME_ENV: &str = "PHASEMAP_TRACE_CHROME";

/// Configures the global tracing subscriber.
///
/// The filter honours `RUST_LOG` and falls back to `info`. When
/// `PHASEMAP_TRACE_CHROME` names a file, a chrome trace of every span is
/// written there as well.
pub fn init_tracing() -> Result<(), InitError> {
    INITIALISED
        .set(())
        .map_err(|_| InitError::AlreadyInitialised)?;

    let ansi = std::io::stdout().is_terminal();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(ansi);

    match chrome_trace_path()? {
        Some(path) => {
            let (chrome_layer, guard) = tracing_chrome::ChromeLayerBuilder::new()
                .file(path)
                .include_args(true)
                .build();
            let cell = CHROME_GUARD.get_or_init(|| Mutex::new(None));
            if let Ok(mut slot) = cell.lock() {
                *slot = Some(guard);
            }
            Registry::default()
                .with(filter)
                .with(fmt_layer)
                .with(chrome_layer)
                .init();
        }
        None => {
            Registry::default().with(filter).with(fmt_layer).init();
        }
    }

    Ok(())
}

fn chrome_trace_path() -> Result<Option<PathBuf>, InitError> {
    match std::env::var(CHROME_ENV) {
        Ok(raw) if !raw.trim().is_empty() => Ok(Some(PathBuf::from(raw))),
        Ok(_) => Ok(None),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(InitError::Env(err)),
    }
}

/// Errors emitted when configuring the tracing subscriber.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("tracing has already been initialised")]
    AlreadyInitialised,
    #[error("failed to read PHASEMAP_TRACE_CHROME: {0}")]
    Env(std::env::VarError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_initialisation_is_rejected() {
        // Another test binary may already own the global subscriber, so only
        // the second call is asserted.
        let _ = init_tracing();
        assert!(matches!(init_tracing(), Err(InitError::AlreadyInitialised)));
    }
}
