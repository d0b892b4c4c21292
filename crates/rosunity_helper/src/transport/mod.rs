//! Client library bindings for the `runtime` traits.

#[cfg(feature = "rclrs")]
pub mod rclrs;
