pub mod builders;
pub mod fakes;

use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Default directives: this project's own targets at debug, dependencies at
/// warn. `RUST_LOG` overrides as usual.
const DEFAULT_TEST_FILTER: &str = "leafbuild=debug,warn";

/// Set up tracing once for the whole test binary. Output goes through the
/// test writer, so it only shows up for failing tests (or `-- --nocapture`).
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_TEST_FILTER));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .init();
    });
}

/// Bound a future that should settle quickly. A wedged watcher, debouncer
/// or scheduler then fails its test instead of hanging the suite.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(Duration::from_secs(5), f)
        .await
        .expect("future did not settle within 5 seconds")
}
