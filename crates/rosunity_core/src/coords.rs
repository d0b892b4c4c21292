//! Axis remaps between the host's left-handed, Y-up frame and the ROS REP-103
//! right-handed frame (x forward, y left, z up).
//!
//! Downstream consumers depend on the exact sign and axis order, so these are
//! plain component swaps with no normalization.

use crate::msg::{Quaternion, Vector3};

/// Host `(x, y, z)` to ROS `(z, -x, y)`.
pub fn ros_vector_from_unity(x: f32, y: f32, z: f32) -> Vector3 {
    Vector3 {
        x: f64::from(z),
        y: -f64::from(x),
        z: f64::from(y),
    }
}

/// Host `(x, y, z, w)` to ROS `(z, -x, y, -w)`.
pub fn ros_quaternion_from_unity(x: f32, y: f32, z: f32, w: f32) -> Quaternion {
    Quaternion {
        x: f64::from(z),
        y: -f64::from(x),
        z: f64::from(y),
        w: -f64::from(w),
    }
}

/// Inverse of [`ros_vector_from_unity`]. Components narrow to `f32`.
pub fn unity_vector_from_ros(v: &Vector3) -> [f32; 3] {
    [-v.y as f32, v.z as f32, v.x as f32]
}

/// Inverse of [`ros_quaternion_from_unity`]. Components narrow to `f32`.
pub fn unity_quaternion_from_ros(q: &Quaternion) -> [f32; 4] {
    [-q.y as f32, q.z as f32, q.x as f32, -q.w as f32]
}
