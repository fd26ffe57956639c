use gl;
use na::{Vector3, Vector4};
use nalgebra as na;

use super::api::GlApi;

pub struct ColorBuffer {
    pub color: Vector4<f32>,
}

impl ColorBuffer {
    pub fn from_color(color: Vector3<f32>) -> Self {
        Self {
            color: color.push(1.0),
        }
    }

    pub fn set_used<G: GlApi>(&self, gl: &G) {
        gl.clear_color(self.color.x, self.color.y, self.color.z, self.color.w);
    }

    pub fn clear<G: GlApi>(&self, gl: &G) {
        gl.clear(gl::COLOR_BUFFER_BIT);
    }
}
