use std::path::PathBuf;

use anyhow::{Context, Result};
use structopt::StructOpt;

pub mod render_gl;
pub mod resources;

mod app;
mod lifecycle;
mod logging;
mod scene;
mod triangle;
mod window;

use lifecycle::LifecycleError;
use resources::Resources;
use scene::SceneConfig;
use window::{SdlWindow, WindowConfig};

#[derive(StructOpt, Debug)]
#[structopt(
    name = "glsl-triangle",
    about = "Draw a colored triangle with a GLSL vertex/fragment shader pair."
)]
struct Opt {
    #[structopt(
        parse(from_os_str),
        long,
        default_value = "vertex_shader.glsl",
        help = "vertex shader source"
    )]
    vertex: PathBuf,
    #[structopt(
        parse(from_os_str),
        long,
        default_value = "fragment_shader.glsl",
        help = "fragment shader source"
    )]
    fragment: PathBuf,
    #[structopt(
        parse(from_os_str),
        long,
        help = "directory shader paths are relative to [default: working directory]"
    )]
    assets: Option<PathBuf>,
    #[structopt(default_value = "800", long, help = "window width")]
    width: u32,
    #[structopt(default_value = "600", long, help = "window height")]
    height: u32,
    #[structopt(default_value = "First Shader - OpenGL", long, help = "window title")]
    title: String,
    #[structopt(long, help = "log filter, env_logger syntax (falls back to RUST_LOG)")]
    log_filter: Option<String>,
}

fn main() -> Result<()> {
    let opt = Opt::from_args();
    logging::init(opt.log_filter.as_deref());

    let resources = match opt.assets {
        Some(root) => Resources::from_path(root),
        None => Resources::from_current_dir().context("resource path error")?,
    };

    let mut window = SdlWindow::new(&WindowConfig {
        title: opt.title,
        width: opt.width,
        height: opt.height,
    })
    .context("window init error")?;
    let gl = window.load_gl();

    let config = SceneConfig {
        resources,
        vertex_shader: opt.vertex,
        fragment_shader: opt.fragment,
        width: opt.width as i32,
        height: opt.height as i32,
    };
    app::run(gl, &mut window, config).map_err(|e| {
        let context = error_context(&e);
        anyhow::Error::new(e).context(context)
    })?;

    Ok(())
}

fn error_context(error: &LifecycleError) -> &'static str {
    match error {
        LifecycleError::Shader(_) => "shader load error",
        LifecycleError::InvalidTransition { .. } => "render loop error",
    }
}
