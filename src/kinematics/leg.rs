// Single-leg forward kinematics
//
// Composes the fixed four-transform chain of one leg and extracts the
// end-effector position in the base frame. Leg geometry is a plain value so
// every leg shares the same chain code.

use std::f64::consts::{FRAC_PI_2, PI};

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use super::transform::{
    rotation_x, rotation_y, rotation_z, translation_by, translation_part, Transform,
};
use crate::error::{KinematicsError, Result};

/// Number of actuated joints per leg
pub const JOINTS_PER_LEG: usize = 3;

/// Stanford Pupper V3 dimensions (meters)
pub const PUPPER_BASE_OFFSET_FRONT_LEFT: [f64; 3] = [0.075, 0.0445, 0.0];
pub const PUPPER_BASE_OFFSET_BACK_LEFT: [f64; 3] = [-0.075, 0.0445, 0.0];
pub const PUPPER_LINK1_OFFSET: [f64; 3] = [0.0, 0.0, 0.04];
pub const PUPPER_LINK2_OFFSET: [f64; 3] = [0.0, -0.0494, 0.0685]; // upper leg
pub const PUPPER_LINK3_OFFSET: [f64; 3] = [0.06231, 0.06216, 0.018]; // lower leg

/// Joint angles of one leg in radians
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct JointAngles {
    pub theta1: f64, // hip yaw
    pub theta2: f64, // hip pitch/roll
    pub theta3: f64, // knee
}

impl JointAngles {
    pub fn new(theta1: f64, theta2: f64, theta3: f64) -> Self {
        Self {
            theta1,
            theta2,
            theta3,
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Returns angles as array [theta1, theta2, theta3]
    pub fn as_array(&self) -> [f64; JOINTS_PER_LEG] {
        [self.theta1, self.theta2, self.theta3]
    }
}

impl From<[f64; JOINTS_PER_LEG]> for JointAngles {
    fn from(angles: [f64; JOINTS_PER_LEG]) -> Self {
        Self::new(angles[0], angles[1], angles[2])
    }
}

impl TryFrom<&[f64]> for JointAngles {
    type Error = KinematicsError;

    fn try_from(angles: &[f64]) -> Result<Self> {
        match angles {
            &[theta1, theta2, theta3] => Ok(Self::new(theta1, theta2, theta3)),
            _ => Err(KinematicsError::AngleCount {
                expected: JOINTS_PER_LEG,
                actual: angles.len(),
            }),
        }
    }
}

/// Fixed offsets of one leg
///
/// The joint-frame orientation offsets are the same for every leg and live in
/// the chain itself; only the translations differ between legs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegGeometry {
    /// Base link to the first joint
    pub base_offset: Vector3<f64>,
    pub link1_offset: Vector3<f64>,
    pub link2_offset: Vector3<f64>,
    /// Last joint to the foot
    pub link3_offset: Vector3<f64>,
}

impl LegGeometry {
    pub fn new(
        base_offset: [f64; 3],
        link1_offset: [f64; 3],
        link2_offset: [f64; 3],
        link3_offset: [f64; 3],
    ) -> Self {
        Self {
            base_offset: Vector3::from(base_offset),
            link1_offset: Vector3::from(link1_offset),
            link2_offset: Vector3::from(link2_offset),
            link3_offset: Vector3::from(link3_offset),
        }
    }

    /// Pupper leg with the given base placement and the shared link offsets
    pub fn pupper(base_offset: [f64; 3]) -> Self {
        Self::new(
            base_offset,
            PUPPER_LINK1_OFFSET,
            PUPPER_LINK2_OFFSET,
            PUPPER_LINK3_OFFSET,
        )
    }

    pub fn pupper_front_left() -> Self {
        Self::pupper(PUPPER_BASE_OFFSET_FRONT_LEFT)
    }

    pub fn pupper_back_left() -> Self {
        Self::pupper(PUPPER_BASE_OFFSET_BACK_LEFT)
    }

    /// Same leg mounted at a different base offset
    pub fn with_base_offset(&self, base_offset: [f64; 3]) -> Self {
        Self {
            base_offset: Vector3::from(base_offset),
            ..self.clone()
        }
    }

    /// Per-joint transforms [T_0_1, T_1_2, T_2_3, T_3_ee]
    pub fn joint_transforms(&self, angles: &JointAngles) -> [Transform; 4] {
        // base_link -> joint 1
        let t_0_1 = translation_by(&self.base_offset)
            * rotation_x(FRAC_PI_2)
            * rotation_z(angles.theta1);

        // joint 1 -> joint 2
        let t_1_2 = translation_by(&self.link1_offset)
            * rotation_z(-FRAC_PI_2)
            * rotation_y(FRAC_PI_2)
            * rotation_x(FRAC_PI_2)
            * rotation_z(angles.theta2);

        // joint 2 -> joint 3
        let t_2_3 = translation_by(&self.link2_offset)
            * rotation_z(PI)
            * rotation_y(FRAC_PI_2)
            * rotation_z(angles.theta3);

        // joint 3 -> foot
        let t_3_ee = translation_by(&self.link3_offset);

        [t_0_1, t_1_2, t_2_3, t_3_ee]
    }

    /// Composed transform from the base frame to the end effector
    pub fn end_effector_transform(&self, angles: &JointAngles) -> Transform {
        let [t_0_1, t_1_2, t_2_3, t_3_ee] = self.joint_transforms(angles);
        t_0_1 * t_1_2 * t_2_3 * t_3_ee
    }
}

/// Compute the end-effector position of one leg in the base frame
///
/// The translation column of the composed chain has its Y and Z components
/// negated to map the chain frame onto the base frame's display convention.
pub fn forward_kinematics(geometry: &LegGeometry, angles: &JointAngles) -> Vector3<f64> {
    let position = translation_part(&geometry.end_effector_transform(angles));
    Vector3::new(position.x, -position.y, -position.z)
}

/// Forward kinematics with a caller-owned fallback
///
/// Uses `angles` when given, otherwise `last_known`. With neither, returns the
/// zero vector, which callers must treat as "unknown".
pub fn forward_kinematics_or_fallback(
    geometry: &LegGeometry,
    angles: Option<&JointAngles>,
    last_known: Option<&JointAngles>,
) -> Vector3<f64> {
    match angles.or(last_known) {
        Some(angles) => forward_kinematics(geometry, angles),
        None => Vector3::zeros(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinematics::transform::rotation_part;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::f64::consts::TAU;

    const EPS: f64 = 1e-9;

    // Home pose (all joints at zero) for the Pupper left legs
    const HOME_FRONT_LEFT: [f64; 3] = [0.06881, 0.0135, -0.11156];
    const HOME_BACK_LEFT: [f64; 3] = [-0.08119, 0.0135, -0.11156];

    fn assert_position(actual: Vector3<f64>, expected: [f64; 3]) {
        assert_abs_diff_eq!(actual.x, expected[0], epsilon = EPS);
        assert_abs_diff_eq!(actual.y, expected[1], epsilon = EPS);
        assert_abs_diff_eq!(actual.z, expected[2], epsilon = EPS);
    }

    fn random_angles(rng: &mut StdRng, range: f64) -> JointAngles {
        JointAngles::new(
            rng.gen_range(-range..range),
            rng.gen_range(-range..range),
            rng.gen_range(-range..range),
        )
    }

    #[test]
    fn test_home_pose_front_left() {
        let position = forward_kinematics(&LegGeometry::pupper_front_left(), &JointAngles::zero());
        assert_position(position, HOME_FRONT_LEFT);
    }

    #[test]
    fn test_home_pose_back_left() {
        let position = forward_kinematics(&LegGeometry::pupper_back_left(), &JointAngles::zero());
        assert_position(position, HOME_BACK_LEFT);
    }

    #[test]
    fn test_bent_pose_front_left() {
        // Reference values composed independently from the same chain
        let angles = JointAngles::new(0.3, -0.5, 1.2);
        let front = forward_kinematics(&LegGeometry::pupper_front_left(), &angles);
        assert_position(
            front,
            [-0.05538269237123322, 0.07362157287521492, -0.07005377366333884],
        );

        let back = forward_kinematics(&LegGeometry::pupper_back_left(), &angles);
        assert_position(
            back,
            [-0.20538269237123324, 0.07362157287521492, -0.07005377366333884],
        );
    }

    #[test]
    fn test_hip_yaw_moves_foot_off_home() {
        let geometry = LegGeometry::pupper_front_left();
        let home = forward_kinematics(&geometry, &JointAngles::zero());
        let yawed = forward_kinematics(&geometry, &JointAngles::new(0.4, 0.0, 0.0));
        assert!((home - yawed).norm() > 1e-3);
    }

    #[test]
    fn test_each_joint_is_periodic() {
        let geometry = LegGeometry::pupper_front_left();
        let mut rng = StdRng::seed_from_u64(17);

        for _ in 0..200 {
            let angles = random_angles(&mut rng, 2.0 * PI);
            let base = forward_kinematics(&geometry, &angles);

            for joint in 0..JOINTS_PER_LEG {
                let mut shifted = angles.as_array();
                shifted[joint] += TAU;
                let wrapped = forward_kinematics(&geometry, &JointAngles::from(shifted));
                assert!(
                    (base - wrapped).amax() < EPS,
                    "joint {} not periodic at {:?}",
                    joint + 1,
                    angles
                );
            }
        }
    }

    #[test]
    fn test_mirrored_legs_differ_only_along_x() {
        let front = LegGeometry::pupper_front_left();
        let back = LegGeometry::pupper_back_left();
        let offset_diff = front.base_offset.x - back.base_offset.x;
        let mut rng = StdRng::seed_from_u64(23);

        for _ in 0..200 {
            let angles = random_angles(&mut rng, PI);
            let p_front = forward_kinematics(&front, &angles);
            let p_back = forward_kinematics(&back, &angles);

            assert_abs_diff_eq!(p_front.x - p_back.x, offset_diff, epsilon = EPS);
            assert_abs_diff_eq!(p_front.y, p_back.y, epsilon = EPS);
            assert_abs_diff_eq!(p_front.z, p_back.z, epsilon = EPS);
        }
    }

    #[test]
    fn test_output_is_finite_for_any_angles() {
        let geometry = LegGeometry::pupper_back_left();
        let mut rng = StdRng::seed_from_u64(29);

        for _ in 0..500 {
            let angles = random_angles(&mut rng, 1.0e6);
            let position = forward_kinematics(&geometry, &angles);
            assert!(position.iter().all(|v| v.is_finite()), "{:?}", angles);
        }
    }

    #[test]
    fn test_foot_stays_within_reach() {
        // Chain of rigid links: the foot can never be farther from the base
        // origin than the sum of the offset lengths.
        let geometry = LegGeometry::pupper_front_left();
        let reach = geometry.base_offset.norm()
            + geometry.link1_offset.norm()
            + geometry.link2_offset.norm()
            + geometry.link3_offset.norm();
        let mut rng = StdRng::seed_from_u64(31);

        for _ in 0..500 {
            let position = forward_kinematics(&geometry, &random_angles(&mut rng, PI));
            assert!(position.norm() <= reach + EPS);
        }
    }

    #[test]
    fn test_joint_transforms_are_rigid() {
        let geometry = LegGeometry::pupper_front_left();
        let angles = JointAngles::new(0.1, 0.2, 0.3);
        let mut transforms = geometry.joint_transforms(&angles).to_vec();
        transforms.push(geometry.end_effector_transform(&angles));

        for t in &transforms {
            let block = rotation_part(t);
            assert_abs_diff_eq!(block.determinant(), 1.0, epsilon = EPS);
            assert_abs_diff_eq!(t[(3, 3)], 1.0, epsilon = EPS);
            let bottom = t[(3, 0)].abs() + t[(3, 1)].abs() + t[(3, 2)].abs();
            assert_abs_diff_eq!(bottom, 0.0, epsilon = EPS);
        }
    }

    #[test]
    fn test_fallback_prefers_explicit_angles() {
        let geometry = LegGeometry::pupper_front_left();
        let explicit = JointAngles::new(0.3, -0.5, 1.2);
        let last = JointAngles::new(-1.0, 0.2, 0.0);

        let position = forward_kinematics_or_fallback(&geometry, Some(&explicit), Some(&last));
        assert_eq!(position, forward_kinematics(&geometry, &explicit));
    }

    #[test]
    fn test_fallback_uses_last_known_angles() {
        let geometry = LegGeometry::pupper_front_left();
        let last = JointAngles::new(-1.0, 0.2, 0.0);

        let position = forward_kinematics_or_fallback(&geometry, None, Some(&last));
        assert_eq!(position, forward_kinematics(&geometry, &last));
    }

    #[test]
    fn test_fallback_without_observation_is_zero() {
        let position =
            forward_kinematics_or_fallback(&LegGeometry::pupper_front_left(), None, None);
        assert_eq!(position, Vector3::zeros());
    }

    #[test]
    fn test_angles_from_slice() {
        let angles = JointAngles::try_from(&[0.1, 0.2, 0.3][..]).unwrap();
        assert_eq!(angles, JointAngles::new(0.1, 0.2, 0.3));

        assert_eq!(
            JointAngles::try_from(&[0.1, 0.2][..]),
            Err(KinematicsError::AngleCount {
                expected: 3,
                actual: 2
            })
        );
        assert!(JointAngles::try_from(&[0.0; 6][..]).is_err());
    }

    #[test]
    fn test_with_base_offset_keeps_links() {
        let right = LegGeometry::pupper_front_left().with_base_offset([0.075, -0.0445, 0.0]);
        assert_eq!(right.base_offset, Vector3::new(0.075, -0.0445, 0.0));
        assert_eq!(right.link2_offset, Vector3::from(PUPPER_LINK2_OFFSET));
        assert_eq!(right.link3_offset, Vector3::from(PUPPER_LINK3_OFFSET));
    }
}
