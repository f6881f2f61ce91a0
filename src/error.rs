use thiserror::Error;

/// Failure signal surfaced to the host when a scene instance cannot be built or drawn
#[derive(Debug, Error)]
pub enum SceneError {
    /// No adapter, device, or surface could be obtained
    #[error("rendering context unavailable: {0}")]
    ContextUnavailable(String),

    /// A GPU buffer for scene data could not be allocated
    #[error("failed to allocate {what}: {reason}")]
    Allocation { what: &'static str, reason: String },

    #[error("invalid viewport {width}x{height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SceneError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = SceneError::InvalidViewport { width: 0, height: 600 };
        assert_eq!(err.to_string(), "invalid viewport 0x600");

        let err = SceneError::Allocation {
            what: "particle buffer",
            reason: "out of memory".to_string(),
        };
        assert_eq!(err.to_string(), "failed to allocate particle buffer: out of memory");
    }

    #[test]
    fn test_surface_error_converts() {
        let err: SceneError = wgpu::SurfaceError::Timeout.into();
        assert!(matches!(err, SceneError::Surface(wgpu::SurfaceError::Timeout)));
    }
}
