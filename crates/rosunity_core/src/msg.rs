//! Message capabilities and the few schema records the adapter itself produces.
//!
//! Field names follow `builtin_interfaces`, `std_msgs` and `geometry_msgs` so the
//! records serialize the same way the ROS definitions do.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// "Is a ROS message": serializable and default-constructible.
///
/// Implemented for every type meeting the bounds, so generated message crates
/// (built with their serde feature) qualify without extra glue.
pub trait RosMessage: Serialize + DeserializeOwned + Clone + Default + Send + 'static {}

impl<T> RosMessage for T where T: Serialize + DeserializeOwned + Clone + Default + Send + 'static {}

/// Binds a service definition to its request/response pair.
pub trait ServiceDefinition: 'static {
    type Request: RosMessage;
    type Response: RosMessage;
}

/// Binds an action definition to its goal/result/feedback triad.
pub trait ActionDefinition: 'static {
    type Goal: RosMessage;
    type Result: RosMessage;
    type Feedback: RosMessage;
}

const NANOS_PER_SEC: i64 = 1_000_000_000;

/// `builtin_interfaces/msg/Time`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Time {
    pub sec: i32,
    pub nanosec: u32,
}

impl Time {
    /// Split a signed nanosecond count into seconds and a non-negative remainder.
    ///
    /// Seconds saturate at the `i32` range.
    pub fn from_nanos(nanos: i64) -> Self {
        let sec = nanos.div_euclid(NANOS_PER_SEC);
        let nanosec = nanos.rem_euclid(NANOS_PER_SEC) as u32;
        let sec = sec.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
        Self { sec, nanosec }
    }

    pub fn as_nanos(&self) -> i64 {
        i64::from(self.sec) * NANOS_PER_SEC + i64::from(self.nanosec)
    }

    pub fn is_zero(&self) -> bool {
        self.sec == 0 && self.nanosec == 0
    }
}

/// `std_msgs/msg/Header`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub stamp: Time,
    pub frame_id: String,
}

impl Header {
    pub fn new(frame_id: impl Into<String>, stamp: Time) -> Self {
        Self {
            stamp,
            frame_id: frame_id.into(),
        }
    }
}

/// `geometry_msgs/msg/Vector3`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// `geometry_msgs/msg/Quaternion`.
///
/// Note: `Default` is the all-zero quaternion, like the generated message type,
/// not the identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}
