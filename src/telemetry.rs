//! Logging setup.

use tracing_subscriber::EnvFilter;

/// Installs a formatted `tracing` subscriber filtered by `filter`.
///
/// Does nothing if a global subscriber is already installed, so embedding
/// applications can bring their own.
pub fn init_tracing(filter: &str) {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_tracing("debug");
        init_tracing("not a valid directive ===");
        tracing::info!("still logging");
    }
}
