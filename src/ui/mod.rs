pub mod animation;
pub mod presentation;
pub mod renderer;
pub mod text;
#[cfg(windows)]
pub mod window;

pub use renderer::SceneRenderer;
pub use text::TextPainter;
