use std::sync::Arc;
use std::time::Duration;

use rosunity_core::action::{default_cancel_response, default_goal_response};
use rosunity_core::config::HelperConfig;
use rosunity_core::error::{CoreError, Domain, ErrorKind};
use rosunity_core::msg::{ActionDefinition, Header, RosMessage, ServiceDefinition, Time};
use rosunity_core::qos::QosProfile;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::logging::log_core_error;
use crate::runtime::{
    ActionServerCallbacks, CancelCallback, CreateActionClient, CreateActionServer, CreateClient,
    CreateGuardCondition, CreatePublisher, CreateService, CreateSubscription, GoalCallback,
    NodeHandle, RosRuntime,
};
use crate::spin::{spin_loop, SpinTiming};

/// Node name derived from the host object: `"{root}_{name}_{|instance_id|}"`.
pub fn node_name(transform_root_name: &str, name: &str, instance_id: i32) -> String {
    format!("{transform_root_name}_{name}_{}", instance_id.unsigned_abs())
}

/// Node adapter: owns one node of the underlying client library, keeps a
/// background poll loop draining its work, and hands every factory call
/// straight through to it.
///
/// Two states:
/// - Uninitialized: no node; factories return `Ok(None)`
/// - Running: node present, poll loop active until `cancel_spin()`
///
/// Factory results are `Result<Option<_>, E>`: `Ok(None)` means "not ready yet",
/// `Err(e)` is the client library's own error, unchanged.
pub struct Ros2Helper<R: RosRuntime> {
    runtime: Arc<R>,
    config: HelperConfig,
    tick_rate: f32,
    token: CancellationToken,
    node: Option<Arc<R::Node>>,
    node_name: Option<String>,
    spin_task: Option<JoinHandle<std::result::Result<(), R::Error>>>,
}

/// Public API (host application facing).
impl<R: RosRuntime> Ros2Helper<R> {
    pub fn new(runtime: R) -> Self {
        Self::with_config(runtime, HelperConfig::default())
    }

    pub fn with_config(runtime: R, config: HelperConfig) -> Self {
        Self {
            runtime: Arc::new(runtime),
            tick_rate: config.tick_rate,
            config,
            token: CancellationToken::new(),
            node: None,
            node_name: None,
            spin_task: None,
        }
    }

    /// Bring up the client library, create the node and start the poll loop.
    ///
    /// Must be called from within a tokio runtime. Client library failures come
    /// back as `Error::Runtime` and leave the adapter uninitialized.
    pub fn initialize(
        &mut self,
        transform_root_name: &str,
        name: &str,
        instance_id: i32,
    ) -> Result<(), R::Error> {
        if let Some(existing) = &self.node_name {
            let err = CoreError::already_initialized(existing.clone());
            log_core_error(&err);
            return Err(err.into());
        }

        let handle = tokio::runtime::Handle::try_current().map_err(|e| {
            let err = CoreError::error()
                .domain(Domain::Spin)
                .kind(ErrorKind::InvalidState)
                .msgf(format_args!("initialize requires a tokio runtime: {e}"))
                .build();
            log_core_error(&err);
            err
        })?;

        self.runtime.init().map_err(Error::Runtime)?;

        let node_name = node_name(transform_root_name, name, instance_id);
        let node = self
            .runtime
            .create_node(&node_name, transform_root_name)
            .map_err(Error::Runtime)?;
        let node = Arc::new(node);

        let timing = SpinTiming {
            step_timeout: self.config.spin_timeout,
            delay: self.config.spin_delay,
        };
        let task = handle.spawn(spin_loop(
            Arc::clone(&self.runtime),
            Arc::clone(&node),
            self.token.clone(),
            timing,
        ));

        info!(
            node = %node.name(),
            namespace = transform_root_name,
            step_timeout = ?timing.step_timeout,
            "node adapter initialized"
        );

        self.node = Some(node);
        self.node_name = Some(node_name);
        self.spin_task = Some(task);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.node.is_some()
    }

    /// Name the node was created with, once initialized.
    pub fn node_name(&self) -> Option<&str> {
        self.node_name.as_deref()
    }

    /// Escape hatch to the underlying node.
    pub fn node(&self) -> Option<&Arc<R::Node>> {
        self.node.as_ref()
    }

    pub fn config(&self) -> &HelperConfig {
        &self.config
    }

    /// A fresh header stamped with the node clock.
    ///
    /// Before initialization the stamp is zero.
    pub fn create_header(&self, frame_id: &str) -> std::result::Result<Header, R::Error> {
        let stamp = match &self.node {
            Some(node) => node.now()?,
            None => Time::default(),
        };
        Ok(Header::new(frame_id, stamp))
    }

    /// Ask the poll loop to stop. Does not wait; see [`Self::spin_stopped`].
    pub fn cancel_spin(&self) {
        if !self.token.is_cancelled() {
            debug!(node = ?self.node_name, "poll loop cancellation requested");
        }
        self.token.cancel();
    }

    pub fn is_spin_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait for the poll loop to exit and report how it ended.
    ///
    /// Returns at once if no loop was started or it was already awaited. Does not
    /// cancel by itself: without a prior `cancel_spin()` this waits until a step fails.
    pub async fn spin_stopped(&mut self) -> Result<(), R::Error> {
        let Some(task) = self.spin_task.take() else {
            return Ok(());
        };

        match task.await {
            Ok(outcome) => outcome.map_err(Error::Runtime),
            Err(join) if join.is_panic() => std::panic::resume_unwind(join.into_panic()),
            Err(_) => Ok(()),
        }
    }

    /// Stored tick rate. Not consulted by the poll loop.
    pub fn tick_rate(&self) -> f32 {
        self.tick_rate
    }

    pub fn set_tick_rate(&mut self, tick_rate: f32) {
        self.tick_rate = tick_rate;
    }

    pub fn create_subscription<T, F>(
        &self,
        topic: &str,
        callback: F,
        qos: Option<&QosProfile>,
    ) -> std::result::Result<Option<<R::Node as CreateSubscription<T>>::Subscription>, R::Error>
    where
        T: RosMessage,
        F: FnMut(T) + Send + 'static,
        R::Node: CreateSubscription<T>,
    {
        self.node
            .as_deref()
            .map(|node| {
                <R::Node as CreateSubscription<T>>::create_subscription(
                    node,
                    topic,
                    Box::new(callback),
                    qos,
                )
            })
            .transpose()
    }

    pub fn create_publisher<T>(
        &self,
        topic: &str,
        qos: Option<&QosProfile>,
    ) -> std::result::Result<Option<<R::Node as CreatePublisher<T>>::Publisher>, R::Error>
    where
        T: RosMessage,
        R::Node: CreatePublisher<T>,
    {
        self.node
            .as_deref()
            .map(|node| <R::Node as CreatePublisher<T>>::create_publisher(node, topic, qos))
            .transpose()
    }

    pub fn create_service<S, F>(
        &self,
        service_name: &str,
        callback: F,
    ) -> std::result::Result<Option<<R::Node as CreateService<S>>::Service>, R::Error>
    where
        S: ServiceDefinition,
        F: FnMut(S::Request) -> S::Response + Send + 'static,
        R::Node: CreateService<S>,
    {
        self.node
            .as_deref()
            .map(|node| {
                <R::Node as CreateService<S>>::create_service(node, service_name, Box::new(callback))
            })
            .transpose()
    }

    pub fn create_client<S>(
        &self,
        service_name: &str,
    ) -> std::result::Result<Option<<R::Node as CreateClient<S>>::Client>, R::Error>
    where
        S: ServiceDefinition,
        R::Node: CreateClient<S>,
    {
        self.node
            .as_deref()
            .map(|node| <R::Node as CreateClient<S>>::create_client(node, service_name))
            .transpose()
    }

    pub fn create_timer<F>(
        &self,
        period: Duration,
        callback: F,
    ) -> std::result::Result<Option<<R::Node as NodeHandle>::Timer>, R::Error>
    where
        F: FnMut(Duration) + Send + 'static,
    {
        self.node
            .as_deref()
            .map(|node| node.create_timer(period, Box::new(callback)))
            .transpose()
    }

    pub fn create_guard_condition<F>(
        &self,
        callback: F,
    ) -> std::result::Result<Option<<R::Node as CreateGuardCondition>::GuardCondition>, R::Error>
    where
        F: Fn() + Send + Sync + 'static,
        R::Node: CreateGuardCondition,
    {
        self.node
            .as_deref()
            .map(|node| node.create_guard_condition(Box::new(callback)))
            .transpose()
    }

    pub fn create_action_client<A>(
        &self,
        action_name: &str,
    ) -> std::result::Result<Option<<R::Node as CreateActionClient<A>>::ActionClient>, R::Error>
    where
        A: ActionDefinition,
        R::Node: CreateActionClient<A>,
    {
        self.node
            .as_deref()
            .map(|node| <R::Node as CreateActionClient<A>>::create_action_client(node, action_name))
            .transpose()
    }

    /// Without a goal callback every goal is accepted and executed; without a
    /// cancel callback every cancel request is rejected.
    pub fn create_action_server<A, F>(
        &self,
        action_name: &str,
        accepted_callback: F,
        goal_callback: Option<GoalCallback<A>>,
        cancel_callback: Option<CancelCallback<<R::Node as CreateActionServer<A>>::GoalHandle>>,
    ) -> std::result::Result<Option<<R::Node as CreateActionServer<A>>::ActionServer>, R::Error>
    where
        A: ActionDefinition,
        F: FnMut(<R::Node as CreateActionServer<A>>::GoalHandle) + Send + 'static,
        R::Node: CreateActionServer<A>,
    {
        let Some(node) = self.node.as_deref() else {
            return Ok(None);
        };

        let goal: GoalCallback<A> = match goal_callback {
            Some(callback) => callback,
            None => Box::new(default_goal_response::<A::Goal>),
        };
        let cancel: CancelCallback<<R::Node as CreateActionServer<A>>::GoalHandle> =
            match cancel_callback {
                Some(callback) => callback,
                None => Box::new(
                    default_cancel_response::<<R::Node as CreateActionServer<A>>::GoalHandle>,
                ),
            };

        let callbacks = ActionServerCallbacks {
            accepted: Box::new(accepted_callback),
            goal,
            cancel,
        };

        <R::Node as CreateActionServer<A>>::create_action_server(node, action_name, callbacks)
            .map(Some)
    }
}

impl<R: RosRuntime> Drop for Ros2Helper<R> {
    fn drop(&mut self) {
        // The loop holds its own handle to the node; it must not outlive the adapter.
        self.token.cancel();
    }
}
