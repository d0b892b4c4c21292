//! Action client and server over the rclrs action API.
//!
//! rclrs runs each accepted goal as an async task that must end in a
//! `TerminatedGoal`. The host instead receives an [`RclrsGoalHandle`] and drives
//! the goal through it; the task forwards those events to rclrs and routes
//! cancel requests to the adapter's cancel callback.

use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard};

use ::rclrs::{ActionIDL, GoalUuid, RequestedGoal, TerminatedGoal};
use rosunity_core::action::{CancelResponse, GoalResponse};
use rosunity_core::msg::{ActionDefinition, RosMessage};
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

use super::error::Result;
use super::node::RclrsNode;
use crate::runtime::{ActionServerCallbacks, CreateActionClient, CreateActionServer};

/// Binds an rclrs action type to the adapter's goal/result/feedback capability.
///
/// `helper.create_action_server::<RclrsAction<Fibonacci>, _>(..)`
pub struct RclrsAction<A>(PhantomData<fn() -> A>);

impl<A> ActionDefinition for RclrsAction<A>
where
    A: ActionIDL + 'static,
    A::Goal: RosMessage,
    A::Result: RosMessage,
    A::Feedback: RosMessage,
{
    type Goal = A::Goal;
    type Result = A::Result;
    type Feedback = A::Feedback;
}

enum GoalEvent<A: ActionIDL> {
    Execute,
    Feedback(A::Feedback),
    Succeeded(A::Result),
    Aborted(A::Result),
}

/// An accepted goal as the host sees it.
///
/// Clones drive the same goal. Dropping every clone before finishing aborts it.
pub struct RclrsGoalHandle<A: ActionIDL> {
    goal_id: Uuid,
    goal: A::Goal,
    events: mpsc::UnboundedSender<GoalEvent<A>>,
}

impl<A> Clone for RclrsGoalHandle<A>
where
    A: ActionIDL,
    A::Goal: Clone,
{
    fn clone(&self) -> Self {
        Self {
            goal_id: self.goal_id,
            goal: self.goal.clone(),
            events: self.events.clone(),
        }
    }
}

impl<A: ActionIDL> RclrsGoalHandle<A> {
    pub fn goal_id(&self) -> Uuid {
        self.goal_id
    }

    pub fn goal(&self) -> &A::Goal {
        &self.goal
    }

    /// Start a goal accepted with `AcceptAndDefer`. No-op once it is executing.
    pub fn execute(&self) {
        self.send(GoalEvent::Execute);
    }

    pub fn publish_feedback(&self, feedback: A::Feedback) {
        self.send(GoalEvent::Feedback(feedback));
    }

    pub fn succeed(self, result: A::Result) {
        self.send(GoalEvent::Succeeded(result));
    }

    pub fn abort(self, result: A::Result) {
        self.send(GoalEvent::Aborted(result));
    }

    fn send(&self, event: GoalEvent<A>) {
        if self.events.send(event).is_err() {
            debug!(goal = %self.goal_id, "goal already terminated");
        }
    }
}

impl<A> CreateActionClient<RclrsAction<A>> for RclrsNode
where
    A: ActionIDL + 'static,
    A::Goal: RosMessage,
    A::Result: RosMessage,
    A::Feedback: RosMessage,
{
    type ActionClient = ::rclrs::ActionClient<A>;

    fn create_action_client(&self, name: &str) -> Result<Self::ActionClient> {
        Ok(self.inner().create_action_client::<A>(name)?)
    }
}

type SharedCallbacks<A> = Arc<Mutex<ActionServerCallbacks<RclrsAction<A>, RclrsGoalHandle<A>>>>;

fn lock<A: ActionIDL>(
    callbacks: &SharedCallbacks<A>,
) -> MutexGuard<'_, ActionServerCallbacks<RclrsAction<A>, RclrsGoalHandle<A>>> {
    match callbacks.lock() {
        Ok(guard) => guard,
        Err(poison) => poison.into_inner(),
    }
}

fn goal_id(uuid: &GoalUuid) -> Uuid {
    Uuid::from_bytes(uuid.0)
}

impl<A> CreateActionServer<RclrsAction<A>> for RclrsNode
where
    A: ActionIDL + 'static,
    A::Goal: RosMessage,
    A::Result: RosMessage,
    A::Feedback: RosMessage,
{
    type ActionServer = ::rclrs::ActionServer<A>;
    type GoalHandle = RclrsGoalHandle<A>;

    fn create_action_server(
        &self,
        name: &str,
        callbacks: ActionServerCallbacks<RclrsAction<A>, RclrsGoalHandle<A>>,
    ) -> Result<Self::ActionServer> {
        let callbacks: SharedCallbacks<A> = Arc::new(Mutex::new(callbacks));
        let server = self
            .inner()
            .create_action_server::<A, _>(name, move |requested: RequestedGoal<A>| {
                run_goal(Arc::clone(&callbacks), requested)
            })?;
        Ok(server)
    }
}

/// Lifetime of one goal on the rclrs side, from request to terminal state.
async fn run_goal<A>(callbacks: SharedCallbacks<A>, requested: RequestedGoal<A>) -> TerminatedGoal
where
    A: ActionIDL + 'static,
    A::Goal: RosMessage,
    A::Result: RosMessage,
    A::Feedback: RosMessage,
{
    let goal_id = goal_id(requested.uuid());
    let goal = requested.goal().clone();

    let response = (lock(&callbacks).goal)(goal_id, &goal);
    if !response.is_accepted() {
        debug!(goal = %goal_id, "goal rejected");
        return requested.reject();
    }

    let (events_tx, mut events) = mpsc::unbounded_channel();
    // The task only keeps a weak sender so dropping every host handle closes the channel.
    let weak_events = events_tx.downgrade();
    let accepted = requested.accept();
    let handle = RclrsGoalHandle {
        goal_id,
        goal: goal.clone(),
        events: events_tx,
    };
    (lock(&callbacks).accepted)(handle);

    let mut pending = None;
    if response == GoalResponse::AcceptAndDefer {
        match events.recv().await {
            Some(GoalEvent::Execute) | None => {}
            Some(event) => pending = Some(event),
        }
    }
    let executing = accepted.begin();

    let mut watch_cancel = true;
    loop {
        let event = match pending.take() {
            Some(event) => Some(event),
            None if watch_cancel => match executing.unless_cancel_requested(events.recv()).await {
                Ok(event) => event,
                Err(_) => {
                    let Some(sender) = weak_events.upgrade() else {
                        debug!(goal = %goal_id, "cancel requested after host released the goal");
                        return executing.cancelled_with(Default::default());
                    };
                    let handle = RclrsGoalHandle {
                        goal_id,
                        goal: goal.clone(),
                        events: sender,
                    };
                    let decision = (lock(&callbacks).cancel)(&handle);
                    match decision {
                        CancelResponse::Accept => {
                            debug!(goal = %goal_id, "goal cancelled");
                            return executing.cancelled_with(Default::default());
                        }
                        CancelResponse::Reject => {
                            watch_cancel = false;
                            continue;
                        }
                    }
                }
            },
            None => events.recv().await,
        };

        match event {
            Some(GoalEvent::Execute) => {}
            Some(GoalEvent::Feedback(feedback)) => executing.publish_feedback(feedback),
            Some(GoalEvent::Succeeded(result)) => return executing.succeeded_with(result),
            Some(GoalEvent::Aborted(result)) => return executing.aborted_with(result),
            None => {
                warn!(goal = %goal_id, "goal handle dropped before completion, aborting");
                return executing.aborted_with(Default::default());
            }
        }
    }
}
