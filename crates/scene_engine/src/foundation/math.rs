//! Math utilities and types
//!
//! Provides the fundamental math types used by the scene graph, the camera and
//! the shading code. All matrices are column-major `nalgebra` matrices and
//! compose right-to-left: `parent * child` maps child space into parent space.

pub use nalgebra::{Matrix3, Matrix4, Unit, Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Angle in degrees
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Deg(pub f32);

/// Angle in radians
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Rad(pub f32);

impl From<Deg> for Rad {
    fn from(deg: Deg) -> Self {
        Self(deg.0.to_radians())
    }
}

impl From<Rad> for Deg {
    fn from(rad: Rad) -> Self {
        Self(rad.0.to_degrees())
    }
}

/// Extension trait for Mat4 with additional convenience methods
pub trait Mat4Ext {
    /// Create a translation matrix
    fn translation(offset: &Vec3) -> Mat4;

    /// Create a rotation matrix around an arbitrary axis.
    ///
    /// The axis does not need to be normalized. A zero axis yields identity.
    fn rotation(angle: Rad, axis: &Vec3) -> Mat4;

    /// Create a rotation matrix around the X axis
    fn rotation_x(angle: Rad) -> Mat4;

    /// Create a rotation matrix around the Y axis
    fn rotation_y(angle: Rad) -> Mat4;

    /// Create a rotation matrix around the Z axis
    fn rotation_z(angle: Rad) -> Mat4;

    /// Create a (possibly non-uniform) scaling matrix
    fn scaling(factors: &Vec3) -> Mat4;

    /// Translation part of an affine matrix
    fn translation_part(&self) -> Vec3;

    /// Copy of `self` with the translation column replaced by `position`.
    ///
    /// The upper 3x3 rotation/scale block is left untouched.
    fn with_translation(&self, position: &Vec3) -> Mat4;

    /// Upper-left 3x3 rotation/scale block
    fn rotation_scaling(&self) -> Mat3;

    /// First column of the rotation/scale block (the local +X axis)
    fn right(&self) -> Vec3;

    /// Second column of the rotation/scale block (the local +Y axis)
    fn up(&self) -> Vec3;

    /// Third column of the rotation/scale block (the local +Z axis)
    fn backward(&self) -> Vec3;

    /// Inverse-transpose of the upper 3x3 block, used to transform normals.
    ///
    /// Singular blocks (e.g. a zero scale) return identity rather than NaNs.
    fn normal_matrix(&self) -> Mat3;
}

impl Mat4Ext for Mat4 {
    fn translation(offset: &Vec3) -> Mat4 {
        Mat4::new_translation(offset)
    }

    fn rotation(angle: Rad, axis: &Vec3) -> Mat4 {
        match Unit::try_new(*axis, f32::EPSILON) {
            Some(axis) => Mat4::from_axis_angle(&axis, angle.0),
            None => Mat4::identity(),
        }
    }

    fn rotation_x(angle: Rad) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::x_axis(), angle.0)
    }

    fn rotation_y(angle: Rad) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::y_axis(), angle.0)
    }

    fn rotation_z(angle: Rad) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::z_axis(), angle.0)
    }

    fn scaling(factors: &Vec3) -> Mat4 {
        Mat4::new_nonuniform_scaling(factors)
    }

    fn translation_part(&self) -> Vec3 {
        Vec3::new(self[(0, 3)], self[(1, 3)], self[(2, 3)])
    }

    fn with_translation(&self, position: &Vec3) -> Mat4 {
        let mut result = *self;
        result.fixed_view_mut::<3, 1>(0, 3).copy_from(position);
        result
    }

    fn rotation_scaling(&self) -> Mat3 {
        self.fixed_view::<3, 3>(0, 0).into_owned()
    }

    fn right(&self) -> Vec3 {
        self.fixed_view::<3, 1>(0, 0).into_owned()
    }

    fn up(&self) -> Vec3 {
        self.fixed_view::<3, 1>(0, 1).into_owned()
    }

    fn backward(&self) -> Vec3 {
        self.fixed_view::<3, 1>(0, 2).into_owned()
    }

    fn normal_matrix(&self) -> Mat3 {
        const EPSILON: f32 = 1e-8;
        let block = self.rotation_scaling();
        if block.determinant().abs() < EPSILON {
            return Mat3::identity();
        }
        block
            .try_inverse()
            .map_or_else(Mat3::identity, |inverse| inverse.transpose())
    }
}
