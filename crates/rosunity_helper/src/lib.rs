//! rosunity_helper
//!
//! Node adapter between a host application and a ROS 2 client library.
//! Owns one node, keeps a background poll loop draining its work, and forwards
//! every publisher/subscription/service/client/timer/guard-condition/action
//! request to it, plus the host <-> ROS coordinate converters.
//!
//! Design rules:
//! - No protocol work here; the client library sits behind `runtime` traits.
//! - "Not initialized yet" is `Ok(None)`, distinct from a client library error.
//! - Client library errors pass through unmodified.

pub mod error;
pub mod helper;
pub mod logging;
pub mod runtime;
mod spin;
pub mod transport;

pub use error::{Error, Result};
pub use helper::{node_name, Ros2Helper};

// Re-export core types that adapter users will commonly need
pub use rosunity_core::action::{CancelResponse, GoalResponse};
pub use rosunity_core::config::HelperConfig;
pub use rosunity_core::coords::{
    ros_quaternion_from_unity, ros_vector_from_unity, unity_quaternion_from_ros,
    unity_vector_from_ros,
};
pub use rosunity_core::error::CoreError;
pub use rosunity_core::msg::{
    ActionDefinition, Header, Quaternion, RosMessage, ServiceDefinition, Time, Vector3,
};
pub use rosunity_core::qos::QosProfile;
