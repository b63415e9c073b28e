mod resolver;
mod renderer;
mod job;

pub use resolver::{resolve_renderer, RendererKind};
pub use renderer::{render_preview, renderer_for, ChannelRenderer, PreviewCard, PreviewMedia, PreviewRenderer};
pub use job::{JobPreview, JobPreviewField};
