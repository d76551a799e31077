use std::{future::Future, time::Duration};

use tokio::time::{self, Instant};

/// Polls `probe` every `poll_interval` until it yields a value or `timeout` elapses.
/// The probe always runs at least once.
pub async fn wait_until<T, F, Fut>(
    timeout: Duration,
    poll_interval: Duration,
    mut probe: F,
) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let deadline = Instant::now() + timeout;

    loop {
        if let Some(value) = probe().await {
            return Some(value);
        }

        let now = Instant::now();
        if now >= deadline {
            return None;
        }
        time::sleep(poll_interval.min(deadline - now)).await;
    }
}
