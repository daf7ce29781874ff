// Forward kinematics for the quadruped legs
//
// Provides:
// - Homogeneous transform primitives (rotations about X/Y/Z, translations)
// - Single-leg transform chain (joint angles -> end-effector position)
// - Multi-leg robot model driven by named joint states

pub mod leg;
pub mod quadruped;
pub mod transform;

pub use leg::{
    forward_kinematics, forward_kinematics_or_fallback, JointAngles, LegGeometry,
    JOINTS_PER_LEG,
};
pub use quadruped::{Leg, Quadruped};
pub use transform::{
    rotation_about, rotation_x, rotation_y, rotation_z, translation, Axis, Transform,
};
