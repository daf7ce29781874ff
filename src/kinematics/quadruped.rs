// Multi-leg robot model
//
// Every leg shares the same transform chain; a leg is just a name, the joint
// names it reads from the joint state, and its geometry. Adding a leg means
// adding a parameter set.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use super::leg::{forward_kinematics, forward_kinematics_or_fallback, JointAngles, LegGeometry};
use crate::error::Result;
use crate::messages::{JointState, LegSample};

/// One leg of the robot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "LegEntry")]
pub struct Leg {
    pub name: String,
    /// Short suffix used in log keys (the leg name when not given)
    pub tag: String,
    /// Joint names in chain order (hip yaw, hip pitch/roll, knee)
    pub joints: [String; 3],
    #[serde(flatten)]
    pub geometry: LegGeometry,
}

// Leg as written in a geometry file, where the tag is optional
#[derive(Deserialize)]
struct LegEntry {
    name: String,
    #[serde(default)]
    tag: Option<String>,
    joints: [String; 3],
    #[serde(flatten)]
    geometry: LegGeometry,
}

impl From<LegEntry> for Leg {
    fn from(entry: LegEntry) -> Self {
        Self {
            tag: entry.tag.unwrap_or_else(|| entry.name.clone()),
            name: entry.name,
            joints: entry.joints,
            geometry: entry.geometry,
        }
    }
}

impl Leg {
    pub fn new(name: &str, tag: &str, joints: [&str; 3], geometry: LegGeometry) -> Self {
        Self {
            name: name.to_string(),
            tag: tag.to_string(),
            joints: joints.map(str::to_string),
            geometry,
        }
    }

    /// Extract this leg's angles from a joint state by name
    pub fn angles_from(&self, state: &JointState) -> Result<JointAngles> {
        state.angles_for(&self.joints)
    }

    pub fn position(&self, angles: &JointAngles) -> Vector3<f64> {
        forward_kinematics(&self.geometry, angles)
    }

    /// Evaluate from the last known angles (zero position if never observed)
    pub fn sample(&self, last_known: Option<JointAngles>) -> LegSample {
        LegSample {
            leg: self.name.clone(),
            tag: self.tag.clone(),
            angles: last_known,
            position: forward_kinematics_or_fallback(&self.geometry, None, last_known.as_ref()),
        }
    }
}

/// Ordered set of legs evaluated together
#[derive(Debug, Clone, PartialEq)]
pub struct Quadruped {
    legs: Vec<Leg>,
}

impl Quadruped {
    pub fn new(legs: Vec<Leg>) -> Self {
        Self { legs }
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    pub fn leg(&self, name: &str) -> Option<&Leg> {
        self.legs.iter().find(|leg| leg.name == name)
    }

    pub fn len(&self) -> usize {
        self.legs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    /// Evaluate every leg from one joint state
    ///
    /// Fails on the first leg whose joints are missing from the state.
    pub fn evaluate(&self, state: &JointState) -> Result<Vec<LegSample>> {
        self.legs
            .iter()
            .map(|leg| Ok(leg.sample(Some(leg.angles_from(state)?))))
            .collect()
    }

    /// Evaluate every leg from caller-owned last known angles, indexed like `legs()`
    pub fn evaluate_known(&self, last_known: &[Option<JointAngles>]) -> Vec<LegSample> {
        self.legs
            .iter()
            .enumerate()
            .map(|(i, leg)| leg.sample(last_known.get(i).copied().flatten()))
            .collect()
    }
}
