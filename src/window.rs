use std::sync::Arc;

use winit::window::Window as WinitWindow;

use crate::core::Viewport;

/// Wrapper around the winit window hosting the scene
pub struct Window {
    inner: Arc<WinitWindow>,
}

impl Window {
    pub fn new(window: Arc<WinitWindow>) -> Self {
        Self { inner: window }
    }

    pub fn inner(&self) -> &Arc<WinitWindow> {
        &self.inner
    }

    /// Current logical size and pixel density of the window
    pub fn viewport(&self) -> Viewport {
        let size = self.inner.inner_size();
        Viewport::from_physical(size.width, size.height, self.inner.scale_factor())
    }

    pub fn scale_factor(&self) -> f64 {
        self.inner.scale_factor()
    }

    pub fn request_redraw(&self) {
        self.inner.request_redraw();
    }
}
