mod api;
pub use self::api::{GlApi, NativeGl};

mod shader;
pub use self::shader::{Program, ShaderError};

mod viewport;
pub use self::viewport::Viewport;

mod color_buffer;
pub use self::color_buffer::ColorBuffer;

pub mod buffer;

#[cfg(test)]
pub mod recording;
