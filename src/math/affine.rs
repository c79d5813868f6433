//! 3×3 homogeneous transform for 2D
//!
//! Column-major (glam layout) throughout, including GPU upload. Composition
//! always starts from [`Affine2D::IDENTITY`] and post-multiplies, so
//! `IDENTITY.translate(p).scale(s).rotate(a)` applies rotate first, then
//! scale, then translate to a point.

use glam::{Mat3, Vec2};
use serde::{Deserialize, Serialize};
use std::ops::Mul;

use crate::error::TransformError;

/// Determinant magnitude at or below which a matrix is treated as singular
pub const SINGULAR_EPSILON: f32 = f32::EPSILON;

/// An affine 2D transform stored as a homogeneous 3×3 matrix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Affine2D(Mat3);

impl Default for Affine2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine2D {
    pub const IDENTITY: Self = Self(Mat3::IDENTITY);

    #[inline]
    pub const fn from_mat3(m: Mat3) -> Self {
        Self(m)
    }

    #[inline]
    pub fn as_mat3(&self) -> &Mat3 {
        &self.0
    }

    /// Post-multiply a translation
    #[inline]
    pub fn translate(self, offset: Vec2) -> Self {
        Self(self.0 * Mat3::from_translation(offset))
    }

    /// Post-multiply a (possibly non-uniform) scale
    #[inline]
    pub fn scale(self, factor: Vec2) -> Self {
        Self(self.0 * Mat3::from_scale(factor))
    }

    /// Post-multiply a counter-clockwise rotation (radians)
    #[inline]
    pub fn rotate(self, angle: f32) -> Self {
        Self(self.0 * Mat3::from_angle(angle))
    }

    #[inline]
    pub fn determinant(&self) -> f32 {
        self.0.determinant()
    }

    /// Inverse, or an error when the determinant is numerically zero
    pub fn try_inverse(&self) -> Result<Self, TransformError> {
        let determinant = self.determinant();
        if determinant.abs() <= SINGULAR_EPSILON || !determinant.is_finite() {
            return Err(TransformError::Singular { determinant });
        }
        Ok(Self(self.0.inverse()))
    }

    #[inline]
    pub fn transpose(&self) -> Self {
        Self(self.0.transpose())
    }

    /// Apply to a point with implicit w = 1; the projective row is ignored
    #[inline]
    pub fn transform_point(&self, p: Vec2) -> Vec2 {
        let m = &self.0;
        Vec2::new(
            m.x_axis.x * p.x + m.y_axis.x * p.y + m.z_axis.x,
            m.x_axis.y * p.x + m.y_axis.y * p.y + m.z_axis.y,
        )
    }

    /// Apply to a direction (no translation)
    #[inline]
    pub fn transform_vector(&self, v: Vec2) -> Vec2 {
        let m = &self.0;
        Vec2::new(
            m.x_axis.x * v.x + m.y_axis.x * v.y,
            m.x_axis.y * v.x + m.y_axis.y * v.y,
        )
    }

    /// Translation column
    #[inline]
    pub fn translation(&self) -> Vec2 {
        self.0.z_axis.truncate()
    }

    /// Column-major components, ready for a uniform buffer
    #[inline]
    pub fn to_cols_array(&self) -> [f32; 9] {
        self.0.to_cols_array()
    }
}

impl Mul for Affine2D {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self(self.0 * rhs.0)
    }
}
