pub mod authorization;
pub mod config;
pub mod models;
pub mod pipeline;
pub mod quiz;
pub mod rag;
pub mod roster;
pub mod session_store;
pub mod store;
pub mod wizard;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for a host application that has no subscriber of its
/// own. Safe to call more than once; embedders with their own subscriber
/// can skip this entirely.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();

    tracing::info!("Tailboard core v{}", config::APP_VERSION);
}
