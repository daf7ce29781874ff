// Error types shared by the kinematics core and joint-state handling

/// Errors surfaced by the kinematics core
///
/// These only ever describe malformed caller input. The transform chain itself
/// has no failure modes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KinematicsError {
    #[error("Unsupported rotation axis '{0}' (expected x, y or z)")]
    UnsupportedAxis(String),

    #[error("Expected {expected} joint angles, got {actual}")]
    AngleCount { expected: usize, actual: usize },

    #[error("Joint '{0}' not present in joint state")]
    MissingJoint(String),

    #[error("Malformed joint state: {names} names but {positions} positions")]
    MalformedJointState { names: usize, positions: usize },
}

pub type Result<T> = std::result::Result<T, KinematicsError>;
