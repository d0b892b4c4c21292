//! rosunity_core: ROS-agnostic building blocks for the rosunity node adapter.
//!
//! Design goals:
//! - Pure, testable logic (no ROS deps).
//! - Explicit types; no macro wizardry.
//! - Small, stable public API surface.

pub mod error;

/// Adapter settings with environment overrides.
pub mod config;

/// Message capabilities + the header/time/geometry records the adapter builds.
pub mod msg;

/// QoS profile handed through to the transport.
pub mod qos;

/// Goal/cancel decisions for action servers.
pub mod action;

/// Host frame <-> ROS frame conversions.
pub mod coords;

pub use error::{CoreError, Result};
