use bytemuck::Pod;
use gl;
use gl::types::{GLint, GLsizei, GLuint};

use super::api::GlApi;

/// One float attribute slot inside an interleaved vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttrib {
    pub location: GLuint,
    pub components: GLint,
    pub offset: usize,
}

/// Byte layout of one interleaved vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexLayout {
    pub stride: usize,
    pub attribs: &'static [VertexAttrib],
}

pub struct ArrayBuffer<G: GlApi> {
    gl: G,
    vbo: GLuint,
}

impl<G: GlApi> ArrayBuffer<G> {
    pub fn new(gl: &G) -> Self {
        let vbo = gl.gen_buffer();
        Self { gl: gl.clone(), vbo }
    }

    pub fn bind(&self) {
        self.gl.bind_buffer(gl::ARRAY_BUFFER, self.vbo);
    }

    pub fn unbind(&self) {
        self.gl.bind_buffer(gl::ARRAY_BUFFER, 0);
    }

    /// Copies `data` into the bound buffer. Neither the slice nor the buffer
    /// handle changes hands.
    pub fn static_draw_data<T: Pod>(&self, data: &[T]) {
        self.gl.buffer_data(
            gl::ARRAY_BUFFER,
            bytemuck::cast_slice(data),
            gl::STATIC_DRAW,
        );
    }

    /// Reads the first `len` elements back from the bound buffer.
    #[cfg(test)]
    pub fn read_data<T: Pod>(&self, len: usize) -> Vec<T> {
        let mut data = vec![T::zeroed(); len];
        self.gl
            .get_buffer_sub_data(gl::ARRAY_BUFFER, 0, bytemuck::cast_slice_mut(&mut data));
        data
    }

    #[cfg(test)]
    pub fn id(&self) -> GLuint {
        self.vbo
    }
}

impl<G: GlApi> Drop for ArrayBuffer<G> {
    fn drop(&mut self) {
        self.gl.delete_buffer(self.vbo);
    }
}

pub struct VertexArray<G: GlApi> {
    gl: G,
    vao: GLuint,
}

impl<G: GlApi> VertexArray<G> {
    pub fn new(gl: &G) -> Self {
        let vao = gl.gen_vertex_array();
        Self { gl: gl.clone(), vao }
    }

    pub fn bind(&self) {
        self.gl.bind_vertex_array(self.vao);
    }

    pub fn unbind(&self) {
        self.gl.bind_vertex_array(0);
    }

    /// Declares and enables every slot of `layout` against the currently
    /// bound array buffer. The vertex array must be bound.
    pub fn set_float_attribs(&self, layout: &VertexLayout) {
        for attrib in layout.attribs {
            self.gl.vertex_attrib_pointer_f32(
                attrib.location,
                attrib.components,
                false,
                layout.stride as GLsizei,
                attrib.offset,
            );
            self.gl.enable_vertex_attrib_array(attrib.location);
        }
    }

    #[cfg(test)]
    pub fn id(&self) -> GLuint {
        self.vao
    }
}

impl<G: GlApi> Drop for VertexArray<G> {
    fn drop(&mut self) {
        self.gl.delete_vertex_array(self.vao);
    }
}
