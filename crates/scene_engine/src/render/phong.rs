//! Phong shading model
//!
//! [`PhongShader`] holds the parameters shared by every primitive;
//! [`PhongUniforms`] is the per-draw block a backend uploads. The light
//! position is given in camera space.

use crate::core::LightingConfig;
use crate::foundation::math::{Mat3, Mat4, Mat4Ext, Vec4};
use crate::render::{Color3, Color4};

/// Shared Phong shader parameters
#[derive(Debug, Clone, PartialEq)]
pub struct PhongShader {
    light_position: Vec4,
    ambient_color: Color4,
    specular_color: Color4,
    shininess: f32,
}

impl Default for PhongShader {
    fn default() -> Self {
        Self::from_config(&LightingConfig::default())
    }
}

impl PhongShader {
    /// Build a shader from lighting configuration
    pub fn from_config(config: &LightingConfig) -> Self {
        Self {
            light_position: Vec4::from(config.light_position),
            ambient_color: Color3::rgb(config.ambient_color).opaque(),
            specular_color: Color3::rgb(config.specular_color).opaque(),
            shininess: config.shininess,
        }
    }

    /// Set the camera-space light position (`w = 0` for directional)
    pub fn with_light_position(mut self, position: Vec4) -> Self {
        self.light_position = position;
        self
    }

    /// Set the ambient color
    pub fn with_ambient_color(mut self, color: Color4) -> Self {
        self.ambient_color = color;
        self
    }

    /// Set the specular color
    pub fn with_specular_color(mut self, color: Color4) -> Self {
        self.specular_color = color;
        self
    }

    /// Set the specular exponent
    pub fn with_shininess(mut self, shininess: f32) -> Self {
        self.shininess = shininess;
        self
    }

    /// Light position
    pub fn light_position(&self) -> Vec4 {
        self.light_position
    }

    /// Ambient color
    pub fn ambient_color(&self) -> Color4 {
        self.ambient_color
    }

    /// Specular color
    pub fn specular_color(&self) -> Color4 {
        self.specular_color
    }

    /// Specular exponent
    pub fn shininess(&self) -> f32 {
        self.shininess
    }

    /// Uniforms for one draw call
    pub fn uniforms(&self, transformation: &Mat4, projection: &Mat4, diffuse_color: Color4) -> PhongUniforms {
        PhongUniforms {
            transformation: *transformation,
            projection: *projection,
            normal_matrix: transformation.normal_matrix(),
            light_position: self.light_position,
            diffuse_color,
            ambient_color: self.ambient_color,
            specular_color: self.specular_color,
            shininess: self.shininess,
        }
    }
}

/// Per-draw Phong uniform block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhongUniforms {
    /// Model-view matrix
    pub transformation: Mat4,
    /// Projection matrix
    pub projection: Mat4,
    /// Inverse-transpose of the model-view rotation/scale
    pub normal_matrix: Mat3,
    /// Camera-space light position
    pub light_position: Vec4,
    /// Diffuse color of the drawable
    pub diffuse_color: Color4,
    /// Ambient color
    pub ambient_color: Color4,
    /// Specular color
    pub specular_color: Color4,
    /// Specular exponent
    pub shininess: f32,
}

impl PhongUniforms {
    /// Number of floats in the std140 layout
    pub const STD140_FLOATS: usize = 64;

    /// Flatten into std140 layout.
    ///
    /// Matrices are column-major, each `mat3` column is padded to a `vec4`,
    /// and the trailing `shininess` is padded to a full `vec4`.
    pub fn to_std140(&self) -> [f32; Self::STD140_FLOATS] {
        let mut block = [0.0; Self::STD140_FLOATS];
        block[0..16].copy_from_slice(self.transformation.as_slice());
        block[16..32].copy_from_slice(self.projection.as_slice());
        for column in 0..3 {
            for row in 0..3 {
                block[32 + column * 4 + row] = self.normal_matrix[(row, column)];
            }
        }
        block[44..48].copy_from_slice(self.light_position.as_slice());
        block[48..52].copy_from_slice(&self.diffuse_color.to_array());
        block[52..56].copy_from_slice(&self.ambient_color.to_array());
        block[56..60].copy_from_slice(&self.specular_color.to_array());
        block[60] = self.shininess;
        block
    }

    /// std140 block as bytes, ready for a uniform buffer upload
    pub fn to_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.to_std140()).to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Rad, Vec3};
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_default_lighting() {
        let shader = PhongShader::default();
        assert_eq!(shader.light_position(), Vec4::new(13.0, 2.0, 5.0, 0.0));
        assert_eq!(shader.specular_color(), Color4::new(1.0, 1.0, 1.0, 1.0));
        assert_relative_eq!(shader.ambient_color().r, 17.0 / 255.0, epsilon = EPSILON);
        assert_eq!(shader.shininess(), 80.0);
    }

    #[test]
    fn test_uniforms_carry_normal_matrix() {
        let shader = PhongShader::default().with_shininess(12.0);
        let transformation = Mat4::translation(&Vec3::new(1.0, 2.0, 3.0))
            * Mat4::rotation_y(Rad(0.5))
            * Mat4::scaling(&Vec3::new(2.0, 2.0, 2.0));
        let projection = Mat4::new_perspective(1.0, 1.0, 0.1, 10.0);
        let diffuse = Color3::from_hue(75.0).opaque();

        let uniforms = shader.uniforms(&transformation, &projection, diffuse);

        assert_eq!(uniforms.diffuse_color, diffuse);
        assert_eq!(uniforms.shininess, 12.0);
        assert_relative_eq!(uniforms.normal_matrix, transformation.normal_matrix(), epsilon = EPSILON);
        let expected = Mat4::rotation_y(Rad(0.5)).rotation_scaling() * 0.5;
        assert_relative_eq!(uniforms.normal_matrix, expected, epsilon = EPSILON);
    }

    #[test]
    fn test_std140_layout() {
        let shader = PhongShader::default();
        let transformation = Mat4::translation(&Vec3::new(4.0, 5.0, 6.0));
        let uniforms = shader.uniforms(&transformation, &Mat4::identity(), Color4::new(0.1, 0.2, 0.3, 1.0));
        let block = uniforms.to_std140();

        // Translation lives in the fourth column
        assert_eq!(&block[12..15], &[4.0, 5.0, 6.0]);
        assert_eq!(block[16], 1.0);
        assert_eq!(&block[32..36], &[1.0, 0.0, 0.0, 0.0]);
        assert_eq!(&block[44..48], &[13.0, 2.0, 5.0, 0.0]);
        assert_eq!(&block[48..52], &[0.1, 0.2, 0.3, 1.0]);
        assert_eq!(block[60], 80.0);
        assert_eq!(uniforms.to_bytes().len(), PhongUniforms::STD140_FLOATS * 4);
    }
}
