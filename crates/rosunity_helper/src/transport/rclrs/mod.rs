//! rclrs (ros2_rust) transport.
//!
//! Implements the `runtime` seam on top of `rclrs`. The runtime owns the
//! context and a basic executor; the adapter's poll loop drives that executor one
//! `spin_once` at a time. Service and action types are bound through
//! [`RclrsService`] and [`RclrsAction`]. rclrs has no public guard condition
//! constructor, so guard conditions are not offered here.

mod action;
mod error;
mod node;
mod qos;
mod runtime;

pub use action::{RclrsAction, RclrsGoalHandle};
pub use error::{Error, Result};
pub use node::{RclrsNode, RclrsService};
pub use runtime::RclrsRuntime;
