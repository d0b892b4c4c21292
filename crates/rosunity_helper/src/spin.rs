use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::runtime::RosRuntime;

/// Poll-loop timing.
#[derive(Debug, Copy, Clone)]
pub(crate) struct SpinTiming {
    pub(crate) step_timeout: Duration,
    pub(crate) delay: Duration,
}

/// Drain the node's work until `token` is cancelled.
///
/// Cancellation is observed at the top of each iteration and during the delay,
/// never inside a step: worst case shutdown latency is one `step_timeout` plus
/// scheduling. A failed step ends the loop and is returned.
pub(crate) async fn spin_loop<R: RosRuntime>(
    runtime: Arc<R>,
    node: Arc<R::Node>,
    token: CancellationToken,
    timing: SpinTiming,
) -> Result<(), R::Error> {
    let mut steps: u64 = 0;

    while !token.is_cancelled() {
        if runtime.ok() {
            let runtime = Arc::clone(&runtime);
            let node = Arc::clone(&node);
            let timeout = timing.step_timeout;
            let step = tokio::task::spawn_blocking(move || runtime.spin_once(&node, timeout)).await;

            match step {
                Ok(Ok(())) => {
                    steps += 1;
                    trace!(steps, "spin step done");
                }
                Ok(Err(err)) => {
                    warn!(error = %err, steps, "spin step failed, stopping poll loop");
                    return Err(err);
                }
                Err(join) if join.is_panic() => std::panic::resume_unwind(join.into_panic()),
                // The tokio runtime is shutting down underneath us.
                Err(_) => break,
            }
        }

        tokio::select! {
            _ = token.cancelled() => break,
            _ = tokio::time::sleep(timing.delay) => {}
        }
    }

    debug!(steps, "poll loop stopped");
    Ok(())
}
