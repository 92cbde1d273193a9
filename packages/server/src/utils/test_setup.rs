use dotenvy::dotenv;
use std::sync::Once;

static INIT: Once = Once::new();

/// Loads `.env` if present and routes tracing output through the test harness.
pub fn setup_test_env() {
    INIT.call_once(|| {
        dotenv().ok();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "mafia_server=debug,mafia_rules=debug".into()),
            )
            .with_test_writer()
            .try_init();
    });
}
