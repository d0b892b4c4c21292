use rosunity_core::error::{CoreError, Severity};
use tracing_subscriber::EnvFilter;

/// Emit `err` at the tracing level matching its severity.
pub fn log_core_error(err: &CoreError) {
    match err.severity {
        Severity::Trace => tracing::trace!(domain = ?err.domain, kind = ?err.kind, "{err}"),
        Severity::Debug => tracing::debug!(domain = ?err.domain, kind = ?err.kind, "{err}"),
        Severity::Info => tracing::info!(domain = ?err.domain, kind = ?err.kind, "{err}"),
        Severity::Warn => tracing::warn!(domain = ?err.domain, kind = ?err.kind, "{err}"),
        Severity::Error | Severity::Fatal => {
            tracing::error!(domain = ?err.domain, kind = ?err.kind, "{err}")
        }
    }
}

/// Install a fmt subscriber filtered by `RUST_LOG` (default `info`).
///
/// Returns `false` if the host already installed a global subscriber.
pub fn try_init() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).try_init().is_ok()
}
