//! Software stand-in for the driver, used by unit tests.
//!
//! It keeps just enough state to answer the queries the renderer makes:
//! compile status is decided by a few structural checks on the source, link
//! status by matching fragment inputs against vertex outputs. Every call is
//! appended to a log so tests can assert on exact call sequences. Using a
//! handle that was never created, or was already deleted, panics.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::ffi::CStr;
use std::rc::Rc;

use gl;
use gl::types::{GLbitfield, GLenum, GLfloat, GLint, GLsizei, GLuint};

use super::api::{GlApi, ShaderKind};

pub const VALID_VERTEX_SOURCE: &str = include_str!("../../vertex_shader.glsl");
pub const VALID_FRAGMENT_SOURCE: &str = include_str!("../../fragment_shader.glsl");

#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    CreateShader(ShaderKind, GLuint),
    CompileShader(GLuint),
    DeleteShader(GLuint),
    CreateProgram(GLuint),
    AttachShader(GLuint, GLuint),
    DetachShader(GLuint, GLuint),
    LinkProgram(GLuint),
    UseProgram(GLuint),
    DeleteProgram(GLuint),
    GenVertexArray(GLuint),
    BindVertexArray(GLuint),
    DeleteVertexArray(GLuint),
    GenBuffer(GLuint),
    BindBuffer(GLenum, GLuint),
    BufferData {
        target: GLenum,
        len: usize,
        usage: GLenum,
    },
    DeleteBuffer(GLuint),
    VertexAttribPointer {
        index: GLuint,
        size: GLint,
        normalized: bool,
        stride: GLsizei,
        offset: usize,
    },
    EnableVertexAttribArray(GLuint),
    Viewport(GLint, GLint, GLsizei, GLsizei),
    ClearColor(GLfloat, GLfloat, GLfloat, GLfloat),
    Clear(GLbitfield),
    DrawArrays {
        mode: GLenum,
        first: GLint,
        count: GLsizei,
    },
}

struct ShaderObject {
    kind: ShaderKind,
    source: String,
    compiled: Option<Result<(), String>>,
}

#[derive(Default)]
struct ProgramObject {
    attached: Vec<GLuint>,
    linked: Option<Result<(), String>>,
}

#[derive(Default)]
struct State {
    next_name: GLuint,
    shaders: HashMap<GLuint, ShaderObject>,
    programs: HashMap<GLuint, ProgramObject>,
    vertex_arrays: HashSet<GLuint>,
    buffers: HashMap<GLuint, Vec<u8>>,
    bound_buffer: HashMap<GLenum, GLuint>,
    calls: Vec<GlCall>,
}

impl State {
    fn gen_name(&mut self) -> GLuint {
        self.next_name += 1;
        self.next_name
    }

    fn shader(&mut self, shader: GLuint) -> &mut ShaderObject {
        self.shaders
            .get_mut(&shader)
            .unwrap_or_else(|| panic!("shader {} is not alive", shader))
    }

    fn program(&mut self, program: GLuint) -> &mut ProgramObject {
        self.programs
            .get_mut(&program)
            .unwrap_or_else(|| panic!("program {} is not alive", program))
    }

    fn bound_buffer_data(&mut self, target: GLenum) -> &mut Vec<u8> {
        let buffer = *self
            .bound_buffer
            .get(&target)
            .unwrap_or_else(|| panic!("no buffer bound to {:#x}", target));
        self.buffers
            .get_mut(&buffer)
            .unwrap_or_else(|| panic!("buffer {} is not alive", buffer))
    }
}

#[derive(Clone, Default)]
pub struct RecordingGl {
    state: Rc<RefCell<State>>,
}

impl RecordingGl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<GlCall> {
        self.state.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    pub fn draw_calls(&self) -> Vec<GlCall> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, GlCall::DrawArrays { .. }))
            .collect()
    }

    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn live_vertex_arrays(&self) -> usize {
        self.state.borrow().vertex_arrays.len()
    }

    pub fn live_buffers(&self) -> usize {
        self.state.borrow().buffers.len()
    }

    fn record(&self, call: GlCall) {
        self.state.borrow_mut().calls.push(call);
    }
}

impl GlApi for RecordingGl {
    fn create_shader(&self, kind: ShaderKind) -> GLuint {
        let mut state = self.state.borrow_mut();
        let name = state.gen_name();
        state.shaders.insert(
            name,
            ShaderObject {
                kind,
                source: String::new(),
                compiled: None,
            },
        );
        state.calls.push(GlCall::CreateShader(kind, name));
        name
    }

    fn shader_source(&self, shader: GLuint, source: &CStr) {
        let mut state = self.state.borrow_mut();
        state.shader(shader).source = source.to_string_lossy().into_owned();
    }

    fn compile_shader(&self, shader: GLuint) {
        let mut state = self.state.borrow_mut();
        let object = state.shader(shader);
        object.compiled = Some(check_compile(&object.source));
        state.calls.push(GlCall::CompileShader(shader));
    }

    fn shader_compile_status(&self, shader: GLuint) -> bool {
        let mut state = self.state.borrow_mut();
        matches!(state.shader(shader).compiled, Some(Ok(())))
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        let mut state = self.state.borrow_mut();
        match &state.shader(shader).compiled {
            Some(Err(log)) => log.clone(),
            _ => String::new(),
        }
    }

    fn delete_shader(&self, shader: GLuint) {
        let mut state = self.state.borrow_mut();
        state.shader(shader);
        state.shaders.remove(&shader);
        state.calls.push(GlCall::DeleteShader(shader));
    }

    fn create_program(&self) -> GLuint {
        let mut state = self.state.borrow_mut();
        let name = state.gen_name();
        state.programs.insert(name, ProgramObject::default());
        state.calls.push(GlCall::CreateProgram(name));
        name
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        let mut state = self.state.borrow_mut();
        state.shader(shader);
        state.program(program).attached.push(shader);
        state.calls.push(GlCall::AttachShader(program, shader));
    }

    fn detach_shader(&self, program: GLuint, shader: GLuint) {
        let mut state = self.state.borrow_mut();
        state.program(program).attached.retain(|s| *s != shader);
        state.calls.push(GlCall::DetachShader(program, shader));
    }

    fn link_program(&self, program: GLuint) {
        let mut state = self.state.borrow_mut();
        let attached = state.program(program).attached.clone();
        let stages = attached
            .iter()
            .map(|name| {
                let object = &state.shaders[name];
                (object.kind, object.source.clone(), object.compiled.clone())
            })
            .collect::<Vec<_>>();
        state.program(program).linked = Some(check_link(&stages));
        state.calls.push(GlCall::LinkProgram(program));
    }

    fn program_link_status(&self, program: GLuint) -> bool {
        let mut state = self.state.borrow_mut();
        matches!(state.program(program).linked, Some(Ok(())))
    }

    fn program_info_log(&self, program: GLuint) -> String {
        let mut state = self.state.borrow_mut();
        match &state.program(program).linked {
            Some(Err(log)) => log.clone(),
            _ => String::new(),
        }
    }

    fn use_program(&self, program: GLuint) {
        let mut state = self.state.borrow_mut();
        assert!(
            matches!(state.program(program).linked, Some(Ok(()))),
            "program {} used without a successful link",
            program
        );
        state.calls.push(GlCall::UseProgram(program));
    }

    fn delete_program(&self, program: GLuint) {
        let mut state = self.state.borrow_mut();
        state.program(program);
        state.programs.remove(&program);
        state.calls.push(GlCall::DeleteProgram(program));
    }

    fn gen_vertex_array(&self) -> GLuint {
        let mut state = self.state.borrow_mut();
        let name = state.gen_name();
        state.vertex_arrays.insert(name);
        state.calls.push(GlCall::GenVertexArray(name));
        name
    }

    fn bind_vertex_array(&self, vao: GLuint) {
        let mut state = self.state.borrow_mut();
        assert!(
            vao == 0 || state.vertex_arrays.contains(&vao),
            "vertex array {} is not alive",
            vao
        );
        state.calls.push(GlCall::BindVertexArray(vao));
    }

    fn delete_vertex_array(&self, vao: GLuint) {
        let mut state = self.state.borrow_mut();
        assert!(
            state.vertex_arrays.remove(&vao),
            "vertex array {} is not alive",
            vao
        );
        state.calls.push(GlCall::DeleteVertexArray(vao));
    }

    fn gen_buffer(&self) -> GLuint {
        let mut state = self.state.borrow_mut();
        let name = state.gen_name();
        state.buffers.insert(name, Vec::new());
        state.calls.push(GlCall::GenBuffer(name));
        name
    }

    fn bind_buffer(&self, target: GLenum, buffer: GLuint) {
        let mut state = self.state.borrow_mut();
        if buffer == 0 {
            state.bound_buffer.remove(&target);
        } else {
            assert!(
                state.buffers.contains_key(&buffer),
                "buffer {} is not alive",
                buffer
            );
            state.bound_buffer.insert(target, buffer);
        }
        state.calls.push(GlCall::BindBuffer(target, buffer));
    }

    fn buffer_data(&self, target: GLenum, data: &[u8], usage: GLenum) {
        let mut state = self.state.borrow_mut();
        *state.bound_buffer_data(target) = data.to_vec();
        state.calls.push(GlCall::BufferData {
            target,
            len: data.len(),
            usage,
        });
    }

    fn get_buffer_sub_data(&self, target: GLenum, offset: usize, data: &mut [u8]) {
        let mut state = self.state.borrow_mut();
        let stored = state.bound_buffer_data(target);
        data.copy_from_slice(&stored[offset..offset + data.len()]);
    }

    fn delete_buffer(&self, buffer: GLuint) {
        let mut state = self.state.borrow_mut();
        assert!(
            state.buffers.remove(&buffer).is_some(),
            "buffer {} is not alive",
            buffer
        );
        state.bound_buffer.retain(|_, bound| *bound != buffer);
        state.calls.push(GlCall::DeleteBuffer(buffer));
    }

    fn vertex_attrib_pointer_f32(
        &self,
        index: GLuint,
        size: GLint,
        normalized: bool,
        stride: GLsizei,
        offset: usize,
    ) {
        self.record(GlCall::VertexAttribPointer {
            index,
            size,
            normalized,
            stride,
            offset,
        });
    }

    fn enable_vertex_attrib_array(&self, index: GLuint) {
        self.record(GlCall::EnableVertexAttribArray(index));
    }

    fn viewport(&self, x: GLint, y: GLint, width: GLsizei, height: GLsizei) {
        self.record(GlCall::Viewport(x, y, width, height));
    }

    fn clear_color(&self, r: GLfloat, g: GLfloat, b: GLfloat, a: GLfloat) {
        self.record(GlCall::ClearColor(r, g, b, a));
    }

    fn clear(&self, mask: GLbitfield) {
        self.record(GlCall::Clear(mask));
    }

    fn draw_arrays(&self, mode: GLenum, first: GLint, count: GLsizei) {
        self.record(GlCall::DrawArrays { mode, first, count });
    }
}

fn check_compile(source: &str) -> Result<(), String> {
    let first_line = source.lines().find(|line| !line.trim().is_empty());
    if !first_line.map_or(false, |line| line.trim_start().starts_with("#version")) {
        return Err("0:1(1): error: missing #version directive".to_string());
    }

    let mut depth = 0i32;
    for (number, line) in source.lines().enumerate() {
        for c in line.chars() {
            match c {
                '{' | '(' => depth += 1,
                '}' | ')' => depth -= 1,
                _ => {}
            }
            if depth < 0 {
                return Err(format!(
                    "0:{}(1): error: syntax error, unexpected '{}'",
                    number + 1,
                    c
                ));
            }
        }
    }
    if depth != 0 {
        return Err(format!(
            "0:{}(1): error: syntax error, unexpected end of file",
            source.lines().count()
        ));
    }

    if !source.contains("void main") {
        return Err("error: entry point `main` not found".to_string());
    }
    Ok(())
}

fn check_link(stages: &[(ShaderKind, String, Option<Result<(), String>>)]) -> Result<(), String> {
    if stages.iter().any(|(_, _, compiled)| !matches!(compiled, Some(Ok(())))) {
        return Err("error: linking with uncompiled shader".to_string());
    }
    let vertex = stages
        .iter()
        .find(|(kind, _, _)| *kind == ShaderKind::Vertex)
        .ok_or_else(|| "error: program lacks a vertex shader".to_string())?;
    let fragment = stages
        .iter()
        .find(|(kind, _, _)| *kind == ShaderKind::Fragment)
        .ok_or_else(|| "error: program lacks a fragment shader".to_string())?;

    let outputs = interface_names(&vertex.1, "out");
    for input in interface_names(&fragment.1, "in") {
        if !outputs.contains(&input) {
            return Err(format!(
                "error: fragment shader input `{}` has no matching output in the vertex shader",
                input
            ));
        }
    }
    Ok(())
}

// Names of global `in`/`out` declarations, e.g. `layout (location = 0) in vec3 aPos;`.
fn interface_names(source: &str, qualifier: &str) -> Vec<String> {
    source
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            let line = match line.strip_prefix("layout") {
                Some(rest) => &rest[rest.find(')')? + 1..],
                None => line,
            };
            let mut tokens = line.split_whitespace();
            if tokens.next()? != qualifier {
                return None;
            }
            let _ty = tokens.next()?;
            let name = tokens.next()?.trim_end_matches(';');
            Some(name.to_string())
        })
        .collect()
}

mod tests {
    use super::*;

    #[test]
    fn check_compile_accepts_shipped_shaders() {
        assert_eq!(check_compile(VALID_VERTEX_SOURCE), Ok(()));
        assert_eq!(check_compile(VALID_FRAGMENT_SOURCE), Ok(()));
    }

    #[test]
    fn interface_names_skip_layout_qualifiers() {
        assert_eq!(
            interface_names(VALID_VERTEX_SOURCE, "out"),
            vec!["ourColor".to_string()]
        );
        assert_eq!(
            interface_names(VALID_VERTEX_SOURCE, "in"),
            vec!["aPos".to_string(), "aColor".to_string()]
        );
        assert_eq!(
            interface_names(VALID_FRAGMENT_SOURCE, "in"),
            vec!["ourColor".to_string()]
        );
    }

    #[test]
    fn buffer_contents_survive_until_delete() {
        let gl = RecordingGl::new();
        let vbo = gl.gen_buffer();
        gl.bind_buffer(gl::ARRAY_BUFFER, vbo);
        gl.buffer_data(gl::ARRAY_BUFFER, &[1, 2, 3, 4], gl::STATIC_DRAW);
        let mut out = [0u8; 2];
        gl.get_buffer_sub_data(gl::ARRAY_BUFFER, 1, &mut out);
        assert_eq!(out, [2, 3]);
        gl.delete_buffer(vbo);
        assert_eq!(gl.live_buffers(), 0);
    }
}
