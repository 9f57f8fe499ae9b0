//! GPU error types.

use thiserror::Error;

/// Errors that can occur while setting up the GPU side of picking.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Failed to create wgpu adapter.
    #[error("failed to create graphics adapter")]
    AdapterCreationFailed,

    /// Failed to create wgpu device.
    #[error("failed to create graphics device: {0}")]
    DeviceCreationFailed(#[from] wgpu::RequestDeviceError),

    /// Shader compilation failed.
    #[error("shader compilation failed: {0}")]
    ShaderCompilationFailed(String),

    /// Invalid picking configuration.
    #[error(transparent)]
    Config(#[from] tilepick_core::PickError),
}

/// A specialized Result type for GPU picking operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;
