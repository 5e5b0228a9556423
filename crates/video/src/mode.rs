use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Whether captured frames go through the external transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineMode {
    PassThrough,
    Processed,
}

impl PipelineMode {
    pub fn toggled(self) -> Self {
        match self {
            PipelineMode::PassThrough => PipelineMode::Processed,
            PipelineMode::Processed => PipelineMode::PassThrough,
        }
    }
}

/// Shared, lock-free view of the current mode. The capture thread reads it per frame.
#[derive(Debug, Clone)]
pub struct ModeHandle {
    processed: Arc<AtomicBool>,
}

impl ModeHandle {
    pub fn new(mode: PipelineMode) -> Self {
        Self {
            processed: Arc::new(AtomicBool::new(mode == PipelineMode::Processed)),
        }
    }

    pub fn get(&self) -> PipelineMode {
        if self.processed.load(Ordering::Acquire) {
            PipelineMode::Processed
        } else {
            PipelineMode::PassThrough
        }
    }

    fn set(&self, mode: PipelineMode) {
        self.processed
            .store(mode == PipelineMode::Processed, Ordering::Release);
    }
}

/// Presentation layers the mode controller shows or hides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Raw camera preview.
    Preview,
    /// Processed output drawn over the preview.
    Overlay,
}

pub trait LayerVisibility {
    fn set_visible(&mut self, layer: Layer, visible: bool);
}

/// Switches between pass-through and processed output.
///
/// Only the mode flag and layer visibility change; the capture session keeps
/// running untouched.
pub struct ModeController<V: LayerVisibility> {
    mode: ModeHandle,
    layers: V,
}

impl<V: LayerVisibility> ModeController<V> {
    pub fn new(mode: ModeHandle, layers: V) -> Self {
        let mut controller = Self { mode, layers };
        let current = controller.mode.get();
        controller.apply(current);
        controller
    }

    pub fn mode(&self) -> PipelineMode {
        self.mode.get()
    }

    pub fn layers(&self) -> &V {
        &self.layers
    }

    /// Flip the mode and update visibility before returning. Returns the new mode.
    pub fn toggle(&mut self) -> PipelineMode {
        let mode = self.mode.get().toggled();
        self.set(mode);
        mode
    }

    pub fn set(&mut self, mode: PipelineMode) {
        self.mode.set(mode);
        self.apply(mode);
        log::info!("pipeline mode: {:?}", mode);
    }

    fn apply(&mut self, mode: PipelineMode) {
        // the preview stays up in both modes, the overlay only shows processed output
        self.layers.set_visible(Layer::Preview, true);
        self.layers
            .set_visible(Layer::Overlay, mode == PipelineMode::Processed);
    }
}
