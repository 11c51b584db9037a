use stage_audio::AudioError;
use stage_core::StageError;
use stage_render::RenderError;

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Stage(#[from] StageError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Audio(#[from] AudioError),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
}
