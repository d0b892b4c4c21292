use std::marker::PhantomData;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use ::rclrs::{IntoPrimitiveOptions, MessageIDL, ServiceIDL, TimerOptions};
use rosunity_core::msg::{RosMessage, ServiceDefinition, Time};
use rosunity_core::qos::QosProfile;

use super::error::{Error, Result};
use super::qos::to_rclrs;
use crate::runtime::{
    CreateClient, CreatePublisher, CreateService, CreateSubscription, NodeHandle,
    ServiceCallback, SubscriptionCallback, TimerCallback,
};

/// A node created on the rclrs executor.
///
/// rclrs exposes no public guard condition constructor, so this node does not
/// implement `CreateGuardCondition`.
#[derive(Clone)]
pub struct RclrsNode {
    node: ::rclrs::Node,
}

impl RclrsNode {
    pub(crate) fn new(node: ::rclrs::Node) -> Self {
        Self { node }
    }

    pub fn inner(&self) -> &::rclrs::Node {
        &self.node
    }
}

/// Binds an rclrs service type to the adapter's request/response capability.
///
/// `helper.create_service::<RclrsService<AddTwoInts>, _>(..)`
pub struct RclrsService<S>(PhantomData<fn() -> S>);

impl<S> ServiceDefinition for RclrsService<S>
where
    S: ServiceIDL + 'static,
    S::Request: RosMessage,
    S::Response: RosMessage,
{
    type Request = S::Request;
    type Response = S::Response;
}

impl NodeHandle for RclrsNode {
    type Error = Error;
    type Timer = ::rclrs::Timer;

    fn name(&self) -> String {
        self.node.name()
    }

    fn now(&self) -> Result<Time> {
        let now = self.node.get_clock().now();
        Ok(Time::from_nanos(now.nsec))
    }

    fn create_timer(&self, period: Duration, mut callback: TimerCallback) -> Result<::rclrs::Timer> {
        let mut last = Instant::now();
        let timer = self
            .node
            .create_timer_repeating(TimerOptions::new(period), move || {
                let now = Instant::now();
                callback(now.duration_since(last));
                last = now;
            })?;
        Ok(timer)
    }
}

/// rclrs invokes subscription and service callbacks through a shared reference.
pub(super) fn lock_callback<C: ?Sized>(callback: &Mutex<Box<C>>) -> MutexGuard<'_, Box<C>> {
    match callback.lock() {
        Ok(guard) => guard,
        Err(poison) => poison.into_inner(),
    }
}

impl<T> CreatePublisher<T> for RclrsNode
where
    T: RosMessage + MessageIDL,
{
    type Publisher = ::rclrs::Publisher<T>;

    fn create_publisher(&self, topic: &str, qos: Option<&QosProfile>) -> Result<Self::Publisher> {
        let publisher = match qos {
            Some(qos) => self.node.create_publisher::<T>(topic.qos(to_rclrs(qos)))?,
            None => self.node.create_publisher::<T>(topic)?,
        };
        Ok(publisher)
    }
}

impl<T> CreateSubscription<T> for RclrsNode
where
    T: RosMessage + MessageIDL,
{
    type Subscription = ::rclrs::Subscription<T>;

    fn create_subscription(
        &self,
        topic: &str,
        callback: SubscriptionCallback<T>,
        qos: Option<&QosProfile>,
    ) -> Result<Self::Subscription> {
        let callback = Mutex::new(callback);
        let deliver = move |msg: T| {
            let mut callback = lock_callback(&callback);
            callback(msg)
        };
        let subscription = match qos {
            Some(qos) => self
                .node
                .create_subscription::<T, _>(topic.qos(to_rclrs(qos)), deliver)?,
            None => self.node.create_subscription::<T, _>(topic, deliver)?,
        };
        Ok(subscription)
    }
}

impl<S> CreateService<RclrsService<S>> for RclrsNode
where
    S: ServiceIDL + 'static,
    S::Request: RosMessage,
    S::Response: RosMessage,
{
    type Service = ::rclrs::Service<S>;

    fn create_service(
        &self,
        name: &str,
        callback: ServiceCallback<RclrsService<S>>,
    ) -> Result<Self::Service> {
        let callback = Mutex::new(callback);
        let service = self
            .node
            .create_service::<S, _>(name, move |request: S::Request| {
                let mut callback = lock_callback(&callback);
                callback(request)
            })?;
        Ok(service)
    }
}

impl<S> CreateClient<RclrsService<S>> for RclrsNode
where
    S: ServiceIDL + 'static,
    S::Request: RosMessage,
    S::Response: RosMessage,
{
    type Client = ::rclrs::Client<S>;

    fn create_client(&self, name: &str) -> Result<Self::Client> {
        Ok(self.node.create_client::<S>(name)?)
    }
}
