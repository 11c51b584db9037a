pub mod error;
pub mod gpu_context;
pub mod presenter;
pub mod projection;
pub mod vertex;

pub use error::RenderError;
pub use gpu_context::GpuContext;
pub use presenter::GpuPresenter;
pub use projection::{ScreenProjection, ScreenUniform};
pub use vertex::FrameVertex;
