pub mod config;
pub mod error;
pub mod kinematics;
pub mod messages;
pub mod runtime;
pub mod sink;
