// Homogeneous transform primitives
//
// Right-handed elementary rotations about the principal axes plus pure
// translations, all as 4x4 homogeneous matrices. Each rotation evaluates
// sine and cosine once (`sin_cos`) so the 3x3 block stays orthonormal.

use std::fmt;
use std::str::FromStr;

use nalgebra::{Matrix2, Matrix3, Matrix4, Vector2, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{KinematicsError, Result};

/// 4x4 homogeneous transform (3x3 rotation block + translation column)
pub type Transform = Matrix4<f64>;

/// Principal rotation axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl FromStr for Axis {
    type Err = KinematicsError;

    /// Parse an axis label, exactly "x", "y" or "z"
    fn from_str(label: &str) -> Result<Self> {
        match label {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            "z" => Ok(Axis::Z),
            _ => Err(KinematicsError::UnsupportedAxis(label.to_string())),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(label)
    }
}

/// 3x3 rotation matrix about `axis` by `angle` radians
#[rustfmt::skip]
pub fn rotation_matrix(axis: Axis, angle: f64) -> Matrix3<f64> {
    let (sin_a, cos_a) = angle.sin_cos();

    match axis {
        Axis::X => Matrix3::new(
            1.0,   0.0,    0.0,
            0.0, cos_a, -sin_a,
            0.0, sin_a,  cos_a,
        ),
        Axis::Y => Matrix3::new(
             cos_a, 0.0, sin_a,
               0.0, 1.0,   0.0,
            -sin_a, 0.0, cos_a,
        ),
        Axis::Z => Matrix3::new(
            cos_a, -sin_a, 0.0,
            sin_a,  cos_a, 0.0,
              0.0,    0.0, 1.0,
        ),
    }
}

/// Homogeneous rotation about `axis` by `angle` radians
///
/// No wraparound is applied; any real angle is accepted.
pub fn rotation_about(axis: Axis, angle: f64) -> Transform {
    rotation_matrix(axis, angle).to_homogeneous()
}

pub fn rotation_x(angle: f64) -> Transform {
    rotation_about(Axis::X, angle)
}

pub fn rotation_y(angle: f64) -> Transform {
    rotation_about(Axis::Y, angle)
}

pub fn rotation_z(angle: f64) -> Transform {
    rotation_about(Axis::Z, angle)
}

/// Pure translation (identity rotation block)
pub fn translation(x: f64, y: f64, z: f64) -> Transform {
    Matrix4::new_translation(&Vector3::new(x, y, z))
}

/// Pure translation from an offset vector
pub fn translation_by(offset: &Vector3<f64>) -> Transform {
    Matrix4::new_translation(offset)
}

/// Translation column of a homogeneous transform
pub fn translation_part(transform: &Transform) -> Vector3<f64> {
    Vector3::new(transform[(0, 3)], transform[(1, 3)], transform[(2, 3)])
}

/// Upper-left 3x3 rotation block of a homogeneous transform
pub fn rotation_part(transform: &Transform) -> Matrix3<f64> {
    Matrix3::from_fn(|row, col| transform[(row, col)])
}

/// Apply a homogeneous transform to a point
pub fn transform_point(transform: &Transform, point: &Vector3<f64>) -> Vector3<f64> {
    (transform * point.push(1.0)).xyz()
}

/// Rotate a planar point by `theta` radians about the origin
pub fn rotate_2d(theta: f64, point: &Vector2<f64>) -> Vector2<f64> {
    let (sin_t, cos_t) = theta.sin_cos();
    Matrix2::new(cos_t, -sin_t, sin_t, cos_t) * point
}

/// Rotate a point by `theta` radians about a principal axis
pub fn rotate_point(theta: f64, axis: Axis, point: &Vector3<f64>) -> Vector3<f64> {
    rotation_matrix(axis, theta) * point
}

/// Rotate a point about a principal axis given by its label
pub fn rotate_point_labeled(theta: f64, axis: &str, point: &Vector3<f64>) -> Result<Vector3<f64>> {
    let axis: Axis = axis.parse()?;
    Ok(rotate_point(theta, axis, point))
}

/// Apply a sequence of rotations to a point, first element first
pub fn rotate_point_sequence(rotations: &[(f64, Axis)], point: &Vector3<f64>) -> Vector3<f64> {
    rotations
        .iter()
        .fold(*point, |acc, &(theta, axis)| rotate_point(theta, axis, &acc))
}
