use std::ffi::CStr;
use std::path::Path;

use gl::types::GLuint;
use log::{debug, error};
use thiserror::Error;

use super::api::{GlApi, ShaderKind};
use crate::resources::{self, Resources};

#[derive(Error, Debug)]
pub enum ShaderError {
    #[error("resource load error: {name}")]
    ResourceLoad {
        name: String,
        source: resources::ResError,
    },
    #[error("shader source contains nil: {name}")]
    SourceContainsNil { name: String },
    #[error("{kind} shader compile error: {name}\nmessage: {message}")]
    CompileError {
        kind: ShaderKind,
        name: String,
        message: String,
    },
    #[error("shader link error: {name}\nmessage: {message}")]
    LinkError { name: String, message: String },
}

/// A compiled shader unit. The unit is deleted on drop.
pub struct Shader<G: GlApi> {
    gl: G,
    id: GLuint,
}

impl<G: GlApi> Shader<G> {
    pub fn from_source(
        gl: &G,
        source: &CStr,
        name: &str,
        kind: ShaderKind,
    ) -> Result<Shader<G>, ShaderError> {
        let id = shader_from_source(gl, source, name, kind)?;
        debug!("compiled {} shader {}", kind, name);
        Ok(Shader {
            gl: gl.clone(),
            id,
        })
    }

    pub fn from_res(
        gl: &G,
        res: &Resources,
        path: &Path,
        kind: ShaderKind,
    ) -> Result<Shader<G>, ShaderError> {
        let name = path.display().to_string();
        let source = res.load_cstring(path).map_err(|e| match e {
            resources::ResError::FileContainsNil => ShaderError::SourceContainsNil {
                name: name.clone(),
            },
            e => ShaderError::ResourceLoad {
                name: name.clone(),
                source: e,
            },
        })?;

        Self::from_source(gl, &source, &name, kind)
    }

    pub fn id(&self) -> GLuint {
        self.id
    }
}

impl<G: GlApi> Drop for Shader<G> {
    fn drop(&mut self) {
        self.gl.delete_shader(self.id);
    }
}

/// A linked shader program. The program is deleted on drop.
pub struct Program<G: GlApi> {
    gl: G,
    id: GLuint,
}

impl<G: GlApi> Program<G> {
    /// Links `shaders` into a program. The shaders are detached afterwards,
    /// whether or not the link succeeded.
    pub fn from_shaders(gl: &G, name: &str, shaders: &[Shader<G>]) -> Result<Program<G>, ShaderError> {
        let program_id = gl.create_program();
        for shader in shaders {
            gl.attach_shader(program_id, shader.id());
        }
        gl.link_program(program_id);
        let success = gl.program_link_status(program_id);
        for shader in shaders {
            gl.detach_shader(program_id, shader.id());
        }
        if !success {
            let message = gl.program_info_log(program_id);
            gl.delete_program(program_id);
            error!("failed to link program {}: {}", name, message);
            return Err(ShaderError::LinkError {
                name: name.to_string(),
                message,
            });
        }
        debug!("linked program {}", name);
        Ok(Program {
            gl: gl.clone(),
            id: program_id,
        })
    }

    /// Reads, compiles and links a vertex/fragment pair.
    ///
    /// The intermediate shader units are released before this returns, on
    /// the error paths as well.
    pub fn from_files(
        gl: &G,
        res: &Resources,
        vertex_path: &Path,
        fragment_path: &Path,
    ) -> Result<Program<G>, ShaderError> {
        let shaders = vec![
            Shader::from_res(gl, res, vertex_path, ShaderKind::Vertex)?,
            Shader::from_res(gl, res, fragment_path, ShaderKind::Fragment)?,
        ];
        let name = format!("{} + {}", vertex_path.display(), fragment_path.display());

        Program::from_shaders(gl, &name, &shaders[..])
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn set_used(&self) {
        self.gl.use_program(self.id);
    }
}

impl<G: GlApi> Drop for Program<G> {
    fn drop(&mut self) {
        self.gl.delete_program(self.id);
    }
}

fn shader_from_source<G: GlApi>(
    gl: &G,
    source: &CStr,
    name: &str,
    kind: ShaderKind,
) -> Result<GLuint, ShaderError> {
    let id = gl.create_shader(kind);
    gl.shader_source(id, source);
    gl.compile_shader(id);
    if !gl.shader_compile_status(id) {
        let message = gl.shader_info_log(id);
        gl.delete_shader(id);
        error!("failed to compile {} shader {}: {}", kind, name, message);
        return Err(ShaderError::CompileError {
            kind,
            name: name.to_string(),
            message,
        });
    }
    Ok(id)
}
