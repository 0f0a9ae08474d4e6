//! Shaded mesh drawable

use std::rc::Rc;

use crate::foundation::math::Mat4;
use crate::render::{Color4, Mesh, PhongShader, RenderBackend, RenderError};
use crate::scene::{Camera, Drawable};

/// A mesh drawn with a shared Phong shader in a single diffuse color
#[derive(Debug, Clone)]
pub struct Primitive {
    mesh: Rc<Mesh>,
    shader: Rc<PhongShader>,
    color: Color4,
}

impl Primitive {
    /// Create a primitive from shared mesh and shader handles
    pub fn new(mesh: Rc<Mesh>, shader: Rc<PhongShader>, color: Color4) -> Self {
        Self { mesh, shader, color }
    }

    /// Mesh handle
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Shader parameters
    pub fn shader(&self) -> &PhongShader {
        &self.shader
    }

    /// Diffuse color
    pub fn color(&self) -> Color4 {
        self.color
    }
}

impl Drawable for Primitive {
    fn draw(&self, transformation: &Mat4, camera: &Camera, backend: &mut dyn RenderBackend) -> Result<(), RenderError> {
        let uniforms = self
            .shader
            .uniforms(transformation, camera.projection_matrix(), self.color);
        backend.draw(&self.mesh, &uniforms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Mat4Ext, Vec3};
    use crate::platform::headless::RecordingBackend;
    use crate::render::{Color3, MeshData};
    use crate::scene::{SceneGraph, TransformFrame};
    use approx::assert_relative_eq;

    #[test]
    fn test_primitive_draw_emits_uniforms() {
        let mut backend = RecordingBackend::new();
        let mesh = Rc::new(Mesh::compile(&mut backend, "cube", &MeshData::cube_solid()).unwrap());
        let shader = Rc::new(PhongShader::default());
        let color = Color3::from_hue(35.0).opaque();

        let mut graph = SceneGraph::new();
        let camera_node = graph.add_node(graph.root()).unwrap();
        graph
            .translate(camera_node, &Vec3::new(0.0, 0.0, 5.0), TransformFrame::Parent)
            .unwrap();
        let camera = Camera::new(&graph, camera_node).unwrap();
        let group = graph.add_group("drawables");
        graph
            .attach_drawable_at(
                graph.root(),
                group,
                Vec3::new(0.0, 0.0, -8.0),
                Primitive::new(mesh.clone(), shader.clone(), color),
            )
            .unwrap();

        camera.draw(&graph, group, &mut backend).unwrap();

        let calls = backend.take_draw_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].mesh, mesh.id());
        let uniforms = &calls[0].uniforms;
        assert_eq!(uniforms.diffuse_color, color);
        assert_eq!(uniforms.projection, *camera.projection_matrix());
        assert_relative_eq!(
            uniforms.transformation.translation_part(),
            Vec3::new(0.0, 0.0, -13.0),
            epsilon = 1e-5
        );
        assert_eq!(uniforms.light_position, shader.light_position());
        // The test handle plus the one held by the primitive
        assert_eq!(Rc::strong_count(&shader), 2);
    }
}
