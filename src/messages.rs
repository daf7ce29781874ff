// Define message types for the runtime

use nalgebra::Vector3;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{KinematicsError, Result};
use crate::kinematics::JointAngles;

// Joint state from the sensor feed -> runtime
// Ordered mapping of joint name to angle (radians), split into parallel lists
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JointState {
    pub name: Vec<String>,
    pub position: Vec<f64>,
}

impl JointState {
    /// Build a joint state from (name, angle) pairs
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut state = Self::default();
        for (name, angle) in pairs {
            state.name.push(name.into());
            state.position.push(angle);
        }
        state
    }

    /// Check that every name has exactly one position
    pub fn validate(&self) -> Result<()> {
        if self.name.len() != self.position.len() {
            return Err(KinematicsError::MalformedJointState {
                names: self.name.len(),
                positions: self.position.len(),
            });
        }
        Ok(())
    }

    /// Look up the angle of a joint by name
    pub fn position_of(&self, joint: &str) -> Result<f64> {
        self.validate()?;
        self.name
            .iter()
            .position(|name| name == joint)
            .map(|index| self.position[index])
            .ok_or_else(|| KinematicsError::MissingJoint(joint.to_string()))
    }

    /// Resolve one leg's joints by name into its angle triple
    pub fn angles_for<S: AsRef<str>>(&self, joints: &[S; 3]) -> Result<JointAngles> {
        Ok(JointAngles::new(
            self.position_of(joints[0].as_ref())?,
            self.position_of(joints[1].as_ref())?,
            self.position_of(joints[2].as_ref())?,
        ))
    }
}

/// Evaluation result for one leg
#[derive(Debug, Clone, PartialEq)]
pub struct LegSample {
    pub leg: String,
    /// Short suffix used in log keys ("f", "b", ...)
    pub tag: String,
    /// None until the leg's joints have been observed
    pub angles: Option<JointAngles>,
    pub position: Vector3<f64>,
}

// Position output from runtime -> log and subscribers
//
// Serializes flat, one key per leg field:
// {"time_stamp": .., "theta1_f": .., .., "end_effector_position_f": [x, y, z], ..}
#[derive(Debug, Clone, PartialEq)]
pub struct PositionSample {
    /// Seconds since the runtime started
    pub time_stamp: f64,
    pub legs: Vec<LegSample>,
}

impl PositionSample {
    pub fn leg(&self, name: &str) -> Option<&LegSample> {
        self.legs.iter().find(|sample| sample.leg == name)
    }
}

impl Serialize for PositionSample {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1 + self.legs.len() * 4))?;
        map.serialize_entry("time_stamp", &self.time_stamp)?;

        for sample in &self.legs {
            let angles = sample.angles.map(|a| a.as_array());
            for joint in 0..3 {
                let key = format!("theta{}_{}", joint + 1, sample.tag);
                map.serialize_entry(&key, &angles.map(|a| a[joint]))?;
            }
        }

        for sample in &self.legs {
            let key = format!("end_effector_position_{}", sample.tag);
            let p = &sample.position;
            map.serialize_entry(&key, &[p.x, p.y, p.z])?;
        }

        map.end()
    }
}

/// Health status of the runtime
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeHealth {
    Ok,
    NoJointState,
}
