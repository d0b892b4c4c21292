//! Seam to the underlying ROS 2 client library.
//!
//! The adapter does no protocol work itself: every factory call lands on one of
//! these traits. Each primitive has its own trait so a transport only claims the
//! primitives its client library actually offers; asking an adapter for anything
//! else fails to compile.

use std::error::Error as StdError;
use std::time::Duration;

use rosunity_core::action::{CancelResponse, GoalResponse};
use rosunity_core::msg::{ActionDefinition, RosMessage, ServiceDefinition, Time};
use rosunity_core::qos::QosProfile;
use uuid::Uuid;

pub type SubscriptionCallback<T> = Box<dyn FnMut(T) + Send + 'static>;

pub type ServiceCallback<S> = Box<
    dyn FnMut(<S as ServiceDefinition>::Request) -> <S as ServiceDefinition>::Response
        + Send
        + 'static,
>;

/// Receives the time elapsed since the previous tick (or since creation).
pub type TimerCallback = Box<dyn FnMut(Duration) + Send + 'static>;

pub type GuardConditionCallback = Box<dyn Fn() + Send + Sync + 'static>;

pub type GoalCallback<A> =
    Box<dyn FnMut(Uuid, &<A as ActionDefinition>::Goal) -> GoalResponse + Send + 'static>;

pub type CancelCallback<H> = Box<dyn FnMut(&H) -> CancelResponse + Send + 'static>;

pub type AcceptedCallback<H> = Box<dyn FnMut(H) + Send + 'static>;

/// Process-wide runtime state plus node creation and the poll step.
pub trait RosRuntime: Send + Sync + 'static {
    type Error: StdError + Send + Sync + 'static;
    type Node: NodeHandle<Error = Self::Error>;

    /// Bring up the client library. Must be idempotent.
    fn init(&self) -> Result<(), Self::Error>;

    /// Whether the client library is still operational.
    fn ok(&self) -> bool;

    fn create_node(&self, name: &str, namespace: &str) -> Result<Self::Node, Self::Error>;

    /// Process whatever work is ready for `node`, waiting at most `timeout`.
    ///
    /// Running out of time with nothing to do is not an error.
    fn spin_once(&self, node: &Self::Node, timeout: Duration) -> Result<(), Self::Error>;
}

/// A live node: clock access plus timers.
pub trait NodeHandle: Send + Sync + 'static {
    type Error: StdError + Send + Sync + 'static;
    type Timer;

    /// Node name as the client library reports it.
    fn name(&self) -> String;

    /// Current time on the node's clock.
    fn now(&self) -> Result<Time, Self::Error>;

    fn create_timer(
        &self,
        period: Duration,
        callback: TimerCallback,
    ) -> Result<Self::Timer, Self::Error>;
}

/// Guard conditions the host can trigger to wake the node's wait set.
pub trait CreateGuardCondition: NodeHandle {
    type GuardCondition;

    fn create_guard_condition(
        &self,
        callback: GuardConditionCallback,
    ) -> Result<Self::GuardCondition, Self::Error>;
}

pub trait CreatePublisher<T: RosMessage>: NodeHandle {
    type Publisher;

    fn create_publisher(
        &self,
        topic: &str,
        qos: Option<&QosProfile>,
    ) -> Result<Self::Publisher, Self::Error>;
}

pub trait CreateSubscription<T: RosMessage>: NodeHandle {
    type Subscription;

    fn create_subscription(
        &self,
        topic: &str,
        callback: SubscriptionCallback<T>,
        qos: Option<&QosProfile>,
    ) -> Result<Self::Subscription, Self::Error>;
}

pub trait CreateService<S: ServiceDefinition>: NodeHandle {
    type Service;

    fn create_service(
        &self,
        name: &str,
        callback: ServiceCallback<S>,
    ) -> Result<Self::Service, Self::Error>;
}

pub trait CreateClient<S: ServiceDefinition>: NodeHandle {
    type Client;

    fn create_client(&self, name: &str) -> Result<Self::Client, Self::Error>;
}

pub trait CreateActionClient<A: ActionDefinition>: NodeHandle {
    type ActionClient;

    fn create_action_client(&self, name: &str) -> Result<Self::ActionClient, Self::Error>;
}

/// Callbacks an action server is built with. The adapter fills in the default
/// goal/cancel policies before a transport sees them.
pub struct ActionServerCallbacks<A: ActionDefinition, H> {
    pub accepted: AcceptedCallback<H>,
    pub goal: GoalCallback<A>,
    pub cancel: CancelCallback<H>,
}

pub trait CreateActionServer<A: ActionDefinition>: NodeHandle {
    type ActionServer;
    type GoalHandle: Send + 'static;

    fn create_action_server(
        &self,
        name: &str,
        callbacks: ActionServerCallbacks<A, Self::GoalHandle>,
    ) -> Result<Self::ActionServer, Self::Error>;
}
