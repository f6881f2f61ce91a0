pub mod clock;
pub mod gpu_context;
pub mod input_adapter;
pub mod task;
pub mod timer;
pub mod viewport;

pub use clock::Clock;
pub use gpu_context::GpuContext;
pub use input_adapter::{PointerEvent, PointerTracker};
pub use task::{CancelHandle, FrameTask};
pub use timer::{FpsCounter, Throttled};
pub use viewport::Viewport;
