//! Scripted in-process runtime standing in for a ROS 2 client library.
#![allow(dead_code)]

use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rosunity_helper::runtime::{
    ActionServerCallbacks, CreateActionClient, CreateActionServer, CreateClient,
    CreateGuardCondition, CreatePublisher, CreateService, CreateSubscription,
    GuardConditionCallback, NodeHandle, RosRuntime, ServiceCallback, SubscriptionCallback,
    TimerCallback,
};
use rosunity_helper::{
    ActionDefinition, CancelResponse, GoalResponse, HelperConfig, QosProfile, RosMessage,
    ServiceDefinition, Time,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("mock runtime: {0}")]
pub struct MockError(pub String);

/// Shared view into what the runtime has been asked to do.
#[derive(Debug)]
pub struct Recorder {
    pub inits: AtomicUsize,
    pub steps: AtomicUsize,
    pub operational: AtomicBool,
    pub nodes: Mutex<Vec<(String, String)>>,
    pub timeouts: Mutex<Vec<Duration>>,
}

impl Recorder {
    pub fn inits(&self) -> usize {
        self.inits.load(Ordering::SeqCst)
    }

    pub fn steps(&self) -> usize {
        self.steps.load(Ordering::SeqCst)
    }

    pub fn set_operational(&self, ok: bool) {
        self.operational.store(ok, Ordering::SeqCst);
    }

    pub fn nodes(&self) -> Vec<(String, String)> {
        self.nodes.lock().unwrap().clone()
    }
}

pub struct MockRuntime {
    recorder: Arc<Recorder>,
    step_time: Duration,
    fail_init: bool,
    fail_on_step: Option<usize>,
    clock_nanos: i64,
}

impl MockRuntime {
    pub fn new() -> Self {
        Self {
            recorder: Arc::new(Recorder {
                inits: AtomicUsize::new(0),
                steps: AtomicUsize::new(0),
                operational: AtomicBool::new(true),
                nodes: Mutex::new(Vec::new()),
                timeouts: Mutex::new(Vec::new()),
            }),
            step_time: Duration::from_millis(2),
            fail_init: false,
            fail_on_step: None,
            clock_nanos: 0,
        }
    }

    pub fn recorder(&self) -> Arc<Recorder> {
        Arc::clone(&self.recorder)
    }

    /// How long each `spin_once` blocks.
    pub fn step_time(mut self, step_time: Duration) -> Self {
        self.step_time = step_time;
        self
    }

    pub fn failing_init(mut self) -> Self {
        self.fail_init = true;
        self
    }

    /// The `n`th step (1-based) returns an error.
    pub fn fail_on_step(mut self, n: usize) -> Self {
        self.fail_on_step = Some(n);
        self
    }

    pub fn clock_nanos(mut self, nanos: i64) -> Self {
        self.clock_nanos = nanos;
        self
    }
}

impl RosRuntime for MockRuntime {
    type Error = MockError;
    type Node = MockNode;

    fn init(&self) -> Result<(), MockError> {
        self.recorder.inits.fetch_add(1, Ordering::SeqCst);
        if self.fail_init {
            return Err(MockError("init failed".into()));
        }
        Ok(())
    }

    fn ok(&self) -> bool {
        self.recorder.operational.load(Ordering::SeqCst)
    }

    fn create_node(&self, name: &str, namespace: &str) -> Result<MockNode, MockError> {
        if name.is_empty() || name.contains(' ') {
            return Err(MockError(format!("invalid node name: {name:?}")));
        }
        self.recorder
            .nodes
            .lock()
            .unwrap()
            .push((name.to_string(), namespace.to_string()));
        Ok(MockNode {
            name: name.to_string(),
            clock_nanos: self.clock_nanos,
        })
    }

    fn spin_once(&self, _node: &MockNode, timeout: Duration) -> Result<(), MockError> {
        let step = self.recorder.steps.fetch_add(1, Ordering::SeqCst) + 1;
        self.recorder.timeouts.lock().unwrap().push(timeout);
        if self.fail_on_step == Some(step) {
            return Err(MockError(format!("step {step} failed")));
        }
        std::thread::sleep(self.step_time.min(timeout));
        Ok(())
    }
}

pub struct MockNode {
    name: String,
    clock_nanos: i64,
}

fn check_name(kind: &str, name: &str) -> Result<(), MockError> {
    if name.is_empty() || name.contains(' ') {
        return Err(MockError(format!("invalid {kind} name: {name:?}")));
    }
    Ok(())
}

pub struct MockTimer {
    pub period: Duration,
    callback: TimerCallback,
}

impl MockTimer {
    pub fn fire(&mut self, elapsed: Duration) {
        (self.callback)(elapsed);
    }
}

pub struct MockGuardCondition {
    callback: GuardConditionCallback,
}

impl MockGuardCondition {
    pub fn trigger(&self) {
        (self.callback)();
    }
}

impl NodeHandle for MockNode {
    type Error = MockError;
    type Timer = MockTimer;

    fn name(&self) -> String {
        self.name.clone()
    }

    fn now(&self) -> Result<Time, MockError> {
        Ok(Time::from_nanos(self.clock_nanos))
    }

    fn create_timer(&self, period: Duration, callback: TimerCallback) -> Result<MockTimer, MockError> {
        if period.is_zero() {
            return Err(MockError("timer period must be positive".into()));
        }
        Ok(MockTimer { period, callback })
    }
}

impl CreateGuardCondition for MockNode {
    type GuardCondition = MockGuardCondition;

    fn create_guard_condition(
        &self,
        callback: GuardConditionCallback,
    ) -> Result<MockGuardCondition, MockError> {
        Ok(MockGuardCondition { callback })
    }
}

pub struct MockPublisher<T> {
    pub topic: String,
    pub qos: Option<QosProfile>,
    _msg: PhantomData<T>,
}

impl<T: RosMessage> CreatePublisher<T> for MockNode {
    type Publisher = MockPublisher<T>;

    fn create_publisher(
        &self,
        topic: &str,
        qos: Option<&QosProfile>,
    ) -> Result<MockPublisher<T>, MockError> {
        check_name("topic", topic)?;
        Ok(MockPublisher {
            topic: topic.to_string(),
            qos: qos.copied(),
            _msg: PhantomData,
        })
    }
}

pub struct MockSubscription<T> {
    pub topic: String,
    pub qos: Option<QosProfile>,
    callback: SubscriptionCallback<T>,
}

impl<T> MockSubscription<T> {
    pub fn deliver(&mut self, msg: T) {
        (self.callback)(msg);
    }
}

impl<T: RosMessage> CreateSubscription<T> for MockNode {
    type Subscription = MockSubscription<T>;

    fn create_subscription(
        &self,
        topic: &str,
        callback: SubscriptionCallback<T>,
        qos: Option<&QosProfile>,
    ) -> Result<MockSubscription<T>, MockError> {
        check_name("topic", topic)?;
        Ok(MockSubscription {
            topic: topic.to_string(),
            qos: qos.copied(),
            callback,
        })
    }
}

pub struct MockService<S: ServiceDefinition> {
    pub name: String,
    callback: ServiceCallback<S>,
}

impl<S: ServiceDefinition> MockService<S> {
    pub fn call(&mut self, request: S::Request) -> S::Response {
        (self.callback)(request)
    }
}

impl<S: ServiceDefinition> CreateService<S> for MockNode {
    type Service = MockService<S>;

    fn create_service(
        &self,
        name: &str,
        callback: ServiceCallback<S>,
    ) -> Result<MockService<S>, MockError> {
        check_name("service", name)?;
        Ok(MockService {
            name: name.to_string(),
            callback,
        })
    }
}

pub struct MockClient<S> {
    pub name: String,
    _srv: PhantomData<S>,
}

impl<S: ServiceDefinition> CreateClient<S> for MockNode {
    type Client = MockClient<S>;

    fn create_client(&self, name: &str) -> Result<MockClient<S>, MockError> {
        check_name("service", name)?;
        Ok(MockClient {
            name: name.to_string(),
            _srv: PhantomData,
        })
    }
}

pub struct MockActionClient<A> {
    pub name: String,
    _action: PhantomData<A>,
}

impl<A: ActionDefinition> CreateActionClient<A> for MockNode {
    type ActionClient = MockActionClient<A>;

    fn create_action_client(&self, name: &str) -> Result<MockActionClient<A>, MockError> {
        check_name("action", name)?;
        Ok(MockActionClient {
            name: name.to_string(),
            _action: PhantomData,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockGoalHandle {
    pub goal_id: Uuid,
}

pub struct MockActionServer<A: ActionDefinition> {
    pub name: String,
    callbacks: ActionServerCallbacks<A, MockGoalHandle>,
}

impl<A: ActionDefinition> MockActionServer<A> {
    /// Run a goal request through the goal callback, then `accepted` if it was accepted.
    pub fn submit(&mut self, goal_id: Uuid, goal: A::Goal) -> GoalResponse {
        let response = (self.callbacks.goal)(goal_id, &goal);
        if response.is_accepted() {
            (self.callbacks.accepted)(MockGoalHandle { goal_id });
        }
        response
    }

    pub fn cancel(&mut self, goal_id: Uuid) -> CancelResponse {
        (self.callbacks.cancel)(&MockGoalHandle { goal_id })
    }
}

impl<A: ActionDefinition> CreateActionServer<A> for MockNode {
    type ActionServer = MockActionServer<A>;
    type GoalHandle = MockGoalHandle;

    fn create_action_server(
        &self,
        name: &str,
        callbacks: ActionServerCallbacks<A, MockGoalHandle>,
    ) -> Result<MockActionServer<A>, MockError> {
        check_name("action", name)?;
        Ok(MockActionServer {
            name: name.to_string(),
            callbacks,
        })
    }
}

// ---------------- Test message types ----------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StringMsg {
    pub data: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddTwoIntsRequest {
    pub a: i64,
    pub b: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddTwoIntsResponse {
    pub sum: i64,
}

pub struct AddTwoInts;

impl ServiceDefinition for AddTwoInts {
    type Request = AddTwoIntsRequest;
    type Response = AddTwoIntsResponse;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FibonacciGoal {
    pub order: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FibonacciResult {
    pub sequence: Vec<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FibonacciFeedback {
    pub partial_sequence: Vec<i32>,
}

pub struct Fibonacci;

impl ActionDefinition for Fibonacci {
    type Goal = FibonacciGoal;
    type Result = FibonacciResult;
    type Feedback = FibonacciFeedback;
}

/// Short poll-step bound and delay so the loop turns over quickly in tests.
pub fn fast_config() -> HelperConfig {
    HelperConfig::default()
        .with_spin_timeout(Duration::from_millis(50))
        .with_spin_delay(Duration::from_millis(1))
}

/// Poll `cond` until it holds or `limit` passes.
pub async fn wait_until<F: Fn() -> bool>(cond: F, limit: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + limit;
    while tokio::time::Instant::now() < deadline {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    cond()
}
