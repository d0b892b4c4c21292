use std::sync::{Mutex, MutexGuard, OnceLock};
use std::time::Duration;

use ::rclrs::{Context, Executor, IntoNodeOptions, RclrsErrorFilter, SpinOptions};
use rosunity_core::error::{CoreError, Domain, ErrorKind};
use tracing::{debug, warn};

use super::error::Result;
use super::node::RclrsNode;
use crate::runtime::RosRuntime;

/// Process-wide rclrs state: one context and the executor every node is added to.
///
/// `spin_once` holds the executor for the whole step, so node creation from
/// another thread waits for the current step to finish.
#[derive(Default)]
pub struct RclrsRuntime {
    context: OnceLock<Context>,
    executor: Mutex<Option<Executor>>,
}

impl RclrsRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    fn executor(&self) -> MutexGuard<'_, Option<Executor>> {
        match self.executor.lock() {
            Ok(guard) => guard,
            Err(poison) => {
                warn!("rclrs executor mutex poisoned");
                poison.into_inner()
            }
        }
    }
}

fn not_initialized() -> CoreError {
    CoreError::error()
        .domain(Domain::Transport)
        .kind(ErrorKind::InvalidState)
        .msg("rclrs runtime used before init()")
        .build()
}

impl RosRuntime for RclrsRuntime {
    type Error = super::Error;
    type Node = RclrsNode;

    fn init(&self) -> Result<()> {
        let mut executor = self.executor();
        if executor.is_some() {
            return Ok(());
        }

        let context = Context::default_from_env()?;
        *executor = Some(context.create_basic_executor());
        let _ = self.context.set(context);
        debug!("rclrs context created");
        Ok(())
    }

    fn ok(&self) -> bool {
        self.context.get().is_some_and(|context| context.ok())
    }

    fn create_node(&self, name: &str, namespace: &str) -> Result<RclrsNode> {
        let executor = self.executor();
        let executor = executor.as_ref().ok_or_else(not_initialized)?;
        let node = executor.create_node(name.namespace(namespace))?;
        Ok(RclrsNode::new(node))
    }

    fn spin_once(&self, _node: &RclrsNode, timeout: Duration) -> Result<()> {
        // The executor spins every node it created, not only `_node`.
        let mut executor = self.executor();
        let executor = executor.as_mut().ok_or_else(not_initialized)?;
        executor
            .spin(SpinOptions::spin_once().timeout(timeout))
            .timeout_ok()
            .first_error()?;
        Ok(())
    }
}
