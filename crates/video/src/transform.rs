use {
    crate::*,
    std::panic::{AssertUnwindSafe, catch_unwind},
};

/// External image-processing step, applied in place on the capture thread.
///
/// Implementations may change the frame's layout (e.g. write a single-channel
/// result) as long as the frame stays continuous. They should return quickly:
/// they run on the capture thread's real-time path.
pub trait Transform: Send + Sync {
    fn apply(&self, frame: &mut Frame) -> Result<(), VideoError>;
}

impl<F> Transform for F
where
    F: Fn(&mut Frame) -> Result<(), VideoError> + Send + Sync,
{
    fn apply(&self, frame: &mut Frame) -> Result<(), VideoError> {
        self(frame)
    }
}

/// Run `transform`, folding panics and broken output into `TransformFailure`.
pub(crate) fn run_transform(transform: &dyn Transform, frame: &mut Frame) -> Result<(), VideoError> {
    match catch_unwind(AssertUnwindSafe(|| transform.apply(frame))) {
        Ok(Ok(())) => frame
            .ensure_continuous()
            .map_err(|error| VideoError::TransformFailure(error.to_string())),
        Ok(Err(VideoError::TransformFailure(msg))) => Err(VideoError::TransformFailure(msg)),
        Ok(Err(error)) => Err(VideoError::TransformFailure(error.to_string())),
        Err(panic) => {
            let msg = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "panicked".to_string());
            Err(VideoError::TransformFailure(msg))
        }
    }
}
