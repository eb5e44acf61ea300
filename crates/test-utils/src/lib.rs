//! Shared helpers for the `pollwatch` integration tests.

pub mod fixture;
pub mod recording_runner;

pub use fixture::TreeFixture;
pub use recording_runner::RecordingRunner;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

/// Upper bound for any single awaited step in a test.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

static TRACING: Once = Once::new();

/// Route `tracing` output through the test harness.
///
/// The filter is read from `WATCH_LOG` like the binary does, and falls back
/// to `debug` for this crate so failing tests show each poll cycle.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_env(pollwatch::logging::LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new("pollwatch=debug"));
        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Await `fut`, panicking if it takes longer than [`TEST_TIMEOUT`].
pub async fn with_timeout<F: Future>(fut: F) -> F::Output {
    match tokio::time::timeout(TEST_TIMEOUT, fut).await {
        Ok(out) => out,
        Err(_) => panic!("test step did not finish within {TEST_TIMEOUT:?}"),
    }
}
