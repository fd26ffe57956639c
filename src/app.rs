use log::debug;

use crate::lifecycle::{Lifecycle, LifecycleError, LifecycleState};
use crate::render_gl::GlApi;
use crate::scene::SceneConfig;
use crate::window::{EventSource, WindowEvent};

/// Pumps `window` events into a fresh lifecycle until the window closes.
///
/// Returns the number of frames presented.
pub fn run<G, W>(gl: G, window: &mut W, config: SceneConfig) -> Result<u64, LifecycleError>
where
    G: GlApi,
    W: EventSource,
{
    let mut lifecycle = Lifecycle::new(gl, config);
    let mut frames = 0u64;

    loop {
        let event = window.next_event();
        let state = lifecycle.handle(event)?;
        if let WindowEvent::Render { .. } = event {
            window.present();
            frames += 1;
        }
        if state == LifecycleState::Closed {
            break;
        }
    }

    debug!("presented {} frames", frames);
    Ok(frames)
}
