use std::time::Instant;

use log::{debug, info};
use sdl2;
use thiserror::Error;

use crate::render_gl::NativeGl;

/// The three things a window tells the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowEvent {
    Load,
    Render { delta: f64 },
    Close,
}

/// Source of window events plus frame presentation.
pub trait EventSource {
    /// Returns `Load` once, then `Render` every tick until the window is
    /// closed, then `Close`.
    fn next_event(&mut self) -> WindowEvent;

    /// Shows the frame rendered since the last call.
    fn present(&mut self);
}

#[derive(Error, Debug)]
pub enum WindowError {
    #[error("sdl error: {0}")]
    Sdl(String),
    #[error(transparent)]
    WindowBuild(#[from] sdl2::video::WindowBuildError),
    #[error("failed to create OpenGL context: {0}")]
    Context(String),
}

#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

pub struct SdlWindow {
    event_pump: sdl2::EventPump,
    _gl_context: sdl2::video::GLContext,
    window: sdl2::video::Window,
    video_subsystem: sdl2::VideoSubsystem,
    _sdl: sdl2::Sdl,
    loaded: bool,
    closed: bool,
    last_frame: Instant,
}

impl SdlWindow {
    pub fn new(config: &WindowConfig) -> Result<Self, WindowError> {
        let sdl = sdl2::init().map_err(WindowError::Sdl)?;
        let video_subsystem = sdl.video().map_err(WindowError::Sdl)?;

        {
            let gl_attr = video_subsystem.gl_attr();
            gl_attr.set_context_profile(sdl2::video::GLProfile::Core);
            gl_attr.set_context_version(3, 3);
            let (major, minor) = gl_attr.context_version();
            info!("init OpenGL: version={}.{}", major, minor);
        }

        let window = video_subsystem
            .window(&config.title, config.width, config.height)
            .opengl()
            .position_centered()
            .build()?;

        let gl_context = window.gl_create_context().map_err(WindowError::Context)?;
        let event_pump = sdl.event_pump().map_err(WindowError::Sdl)?;
        debug!(
            "window \"{}\" created at {}x{}",
            config.title, config.width, config.height
        );

        Ok(Self {
            event_pump,
            _gl_context: gl_context,
            window,
            video_subsystem,
            _sdl: sdl,
            loaded: false,
            closed: false,
            last_frame: Instant::now(),
        })
    }

    /// Loads OpenGL function pointers for this window's context.
    pub fn load_gl(&self) -> NativeGl {
        let video_subsystem = &self.video_subsystem;
        NativeGl::load_with(|s| video_subsystem.gl_get_proc_address(s) as *const std::os::raw::c_void)
    }
}

impl EventSource for SdlWindow {
    fn next_event(&mut self) -> WindowEvent {
        if !self.loaded {
            self.loaded = true;
            self.last_frame = Instant::now();
            return WindowEvent::Load;
        }
        if self.closed {
            return WindowEvent::Close;
        }

        for event in self.event_pump.poll_iter() {
            use sdl2::event::Event;
            use sdl2::keyboard::Keycode;
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => self.closed = true,
                _ => {}
            }
        }
        if self.closed {
            return WindowEvent::Close;
        }

        let now = Instant::now();
        let delta = now.duration_since(self.last_frame).as_secs_f64();
        self.last_frame = now;
        WindowEvent::Render { delta }
    }

    fn present(&mut self) {
        self.window.gl_swap_window();
    }
}
