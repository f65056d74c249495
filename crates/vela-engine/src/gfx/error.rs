use std::fmt;

/// Errors returned by fallible renderer calls (init, resource creation).
///
/// Per-frame calls never return errors; misuse there is logged and the draw
/// is dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum GfxError {
    NotInitialized,
    AlreadyInitialized,
    /// The requested backend needs a window but `PlatformData` has none.
    MissingWindow,
    InvalidHandle,
    InvalidLayout(String),
    /// Vertex data length is not a multiple of the layout stride.
    LayoutMismatch { len: usize, stride: u16 },
    EmptyBuffer,
    ShaderNotFound(String),
    /// A shader was found but is not of the expected stage.
    WrongShaderStage(String),
    HandlesExhausted,
    /// Device or surface failure reported by the backend.
    Backend(String),
}

impl fmt::Display for GfxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GfxError::NotInitialized => write!(f, "renderer is not initialized"),
            GfxError::AlreadyInitialized => write!(f, "renderer is already initialized"),
            GfxError::MissingWindow => write!(f, "renderer backend requires a window handle"),
            GfxError::InvalidHandle => write!(f, "invalid resource handle"),
            GfxError::InvalidLayout(msg) => write!(f, "invalid vertex layout: {msg}"),
            GfxError::LayoutMismatch { len, stride } => write!(
                f,
                "vertex data of {len} bytes is not a multiple of the {stride}-byte stride"
            ),
            GfxError::EmptyBuffer => write!(f, "buffer data is empty"),
            GfxError::ShaderNotFound(name) => write!(f, "shader `{name}` not found"),
            GfxError::WrongShaderStage(name) => write!(f, "shader `{name}` has the wrong stage"),
            GfxError::HandlesExhausted => write!(f, "no free resource handles"),
            GfxError::Backend(msg) => write!(f, "renderer backend error: {msg}"),
        }
    }
}

impl std::error::Error for GfxError {}
