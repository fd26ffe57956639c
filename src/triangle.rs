use bytemuck::{Pod, Zeroable};
use gl;

use crate::render_gl::buffer::{self, VertexAttrib, VertexLayout};
use crate::render_gl::GlApi;

/// Interleaved vertex: position followed by color.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl Vertex {
    const ATTRIBS: [VertexAttrib; 2] = [
        VertexAttrib {
            location: 0,
            components: 3,
            offset: 0,
        },
        VertexAttrib {
            location: 1,
            components: 3,
            offset: 3 * std::mem::size_of::<f32>(),
        },
    ];

    pub const LAYOUT: VertexLayout = VertexLayout {
        stride: 6 * std::mem::size_of::<f32>(),
        attribs: &Vertex::ATTRIBS,
    };
}

pub const TRIANGLE_VERTICES: [Vertex; 3] = [
    // bottom left
    Vertex {
        position: [-0.5, -0.5, 0.0],
        color: [1.0, 0.0, 0.0],
    },
    // bottom right
    Vertex {
        position: [0.5, -0.5, 0.0],
        color: [0.0, 1.0, 0.0],
    },
    // top
    Vertex {
        position: [0.0, 0.5, 0.0],
        color: [0.0, 0.0, 1.0],
    },
];

// Field order is teardown order: buffer first, then vertex array.
pub struct Triangle<G: GlApi> {
    vbo: buffer::ArrayBuffer<G>,
    vao: buffer::VertexArray<G>,
    gl: G,
}

impl<G: GlApi> Triangle<G> {
    pub fn new(gl: &G) -> Self {
        let vbo = buffer::ArrayBuffer::new(gl);
        vbo.bind();
        vbo.static_draw_data(&TRIANGLE_VERTICES);
        vbo.unbind();

        let vao = buffer::VertexArray::new(gl);
        vao.bind();
        vbo.bind();
        vao.set_float_attribs(&Vertex::LAYOUT);
        vbo.unbind();
        vao.unbind();

        Self {
            vbo,
            vao,
            gl: gl.clone(),
        }
    }

    pub fn render(&self) {
        self.vao.bind();
        self.gl
            .draw_arrays(gl::TRIANGLES, 0, TRIANGLE_VERTICES.len() as i32);
    }

    /// Reads the uploaded vertices back from device memory.
    #[cfg(test)]
    pub fn read_back(&self) -> Vec<Vertex> {
        self.vbo.bind();
        let vertices = self.vbo.read_data(TRIANGLE_VERTICES.len());
        self.vbo.unbind();
        vertices
    }
}
