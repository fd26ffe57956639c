use std::path::PathBuf;

use log::info;
use na::Vector3;
use nalgebra as na;

use crate::render_gl::{self, GlApi};
use crate::resources::Resources;
use crate::triangle::Triangle;

/// What the load step needs to build a [`Scene`].
#[derive(Debug, Clone)]
pub struct SceneConfig {
    pub resources: Resources,
    pub vertex_shader: PathBuf,
    pub fragment_shader: PathBuf,
    pub width: i32,
    pub height: i32,
}

/// Every GPU object the renderer owns.
///
/// Fields drop in declaration order, so teardown deletes the vertex buffer,
/// then the vertex array, then the program.
pub struct Scene<G: GlApi> {
    triangle: Triangle<G>,
    program: render_gl::Program<G>,
    color_buffer: render_gl::ColorBuffer,
    gl: G,
}

impl<G: GlApi> Scene<G> {
    pub fn load(gl: &G, config: &SceneConfig) -> Result<Self, render_gl::ShaderError> {
        let viewport = render_gl::Viewport::for_window(config.width, config.height);
        viewport.set_used(gl);

        let color_buffer = render_gl::ColorBuffer::from_color(Vector3::zeros());
        color_buffer.set_used(gl);

        let triangle = Triangle::new(gl);

        let program = render_gl::Program::from_files(
            gl,
            &config.resources,
            &config.vertex_shader,
            &config.fragment_shader,
        )?;
        info!(
            "program {} linked from {} and {}",
            program.id(),
            config.resources.resolve(&config.vertex_shader).display(),
            config.resources.resolve(&config.fragment_shader).display()
        );

        Ok(Self {
            triangle,
            program,
            color_buffer,
            gl: gl.clone(),
        })
    }

    /// Draws one frame. `_delta` is the time since the previous frame in
    /// seconds; the triangle is static so it goes unused.
    pub fn render(&self, _delta: f64) {
        self.color_buffer.clear(&self.gl);
        self.program.set_used();
        self.triangle.render();
    }
}
