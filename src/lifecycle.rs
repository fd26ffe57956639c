use std::fmt;

use log::{debug, info};
use thiserror::Error;

use crate::render_gl::{GlApi, ShaderError};
use crate::scene::{Scene, SceneConfig};
use crate::window::WindowEvent;

pub const LOADED_MESSAGE: &str = "Shader loaded successfully! Rendering a colorful triangle.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Loaded,
    Closed,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleState::Uninitialized => write!(f, "uninitialized"),
            LifecycleState::Loaded => write!(f, "loaded"),
            LifecycleState::Closed => write!(f, "closed"),
        }
    }
}

#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error(transparent)]
    Shader(#[from] ShaderError),
    #[error("{event:?} is not valid in the {state} state")]
    InvalidTransition {
        state: LifecycleState,
        event: WindowEvent,
    },
}

enum Stage<G: GlApi> {
    Uninitialized,
    Loaded(Scene<G>),
    Closed,
}

/// Drives a [`Scene`] through load, render and close.
pub struct Lifecycle<G: GlApi> {
    gl: G,
    config: SceneConfig,
    stage: Stage<G>,
}

impl<G: GlApi> Lifecycle<G> {
    pub fn new(gl: G, config: SceneConfig) -> Self {
        Self {
            gl,
            config,
            stage: Stage::Uninitialized,
        }
    }

    pub fn state(&self) -> LifecycleState {
        match self.stage {
            Stage::Uninitialized => LifecycleState::Uninitialized,
            Stage::Loaded(_) => LifecycleState::Loaded,
            Stage::Closed => LifecycleState::Closed,
        }
    }

    pub fn handle(&mut self, event: WindowEvent) -> Result<LifecycleState, LifecycleError> {
        match (self.state(), event) {
            (LifecycleState::Uninitialized, WindowEvent::Load) => self.load()?,
            (LifecycleState::Loaded, WindowEvent::Render { delta }) => self.render(delta),
            (LifecycleState::Loaded, WindowEvent::Close) => self.close(),
            (state, event) => return Err(LifecycleError::InvalidTransition { state, event }),
        }
        Ok(self.state())
    }

    fn load(&mut self) -> Result<(), ShaderError> {
        let scene = Scene::load(&self.gl, &self.config)?;
        self.stage = Stage::Loaded(scene);
        println!("{}", LOADED_MESSAGE);
        info!("state: {} -> {}", LifecycleState::Uninitialized, self.state());
        Ok(())
    }

    fn render(&self, delta: f64) {
        if let Stage::Loaded(scene) = &self.stage {
            scene.render(delta);
        }
    }

    fn close(&mut self) {
        // dropping the scene deletes buffer, vertex array and program
        self.stage = Stage::Closed;
        info!("state: {} -> {}", LifecycleState::Loaded, self.state());
        debug!("gpu resources released");
    }
}
