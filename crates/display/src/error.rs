use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayError {
    /// The window or drawing surface failed.
    Surface(String),
    /// Texture allocation or upload failed.
    Texture(String),
    /// Releasing a texture or program failed during shutdown.
    ResourceTeardown(String),
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayError::Surface(msg) => write!(f, "surface error: {}", msg),
            DisplayError::Texture(msg) => write!(f, "texture error: {}", msg),
            DisplayError::ResourceTeardown(msg) => write!(f, "resource teardown failed: {}", msg),
        }
    }
}

impl std::error::Error for DisplayError {}

#[cfg(feature = "window")]
impl From<minifb::Error> for DisplayError {
    fn from(error: minifb::Error) -> Self {
        DisplayError::Surface(error.to_string())
    }
}
