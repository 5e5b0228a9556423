use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum VideoError {
    DeviceUnavailable(String),
    Stream(String),
    TransformFailure(String),
    InvalidFrame(String),
    Channel(String),
}

impl fmt::Display for VideoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoError::DeviceUnavailable(msg) => write!(f, "device unavailable: {msg}"),
            VideoError::Stream(msg) => write!(f, "stream error: {msg}"),
            VideoError::TransformFailure(msg) => write!(f, "transform failed: {msg}"),
            VideoError::InvalidFrame(msg) => write!(f, "invalid frame: {msg}"),
            VideoError::Channel(msg) => write!(f, "channel error: {msg}"),
        }
    }
}

impl std::error::Error for VideoError {}

impl From<std::io::Error> for VideoError {
    fn from(err: std::io::Error) -> Self {
        VideoError::DeviceUnavailable(err.to_string())
    }
}

#[cfg(feature = "v4l2")]
impl From<crates_image::ImageError> for VideoError {
    fn from(err: crates_image::ImageError) -> Self {
        VideoError::Stream(format!("decode: {err}"))
    }
}
