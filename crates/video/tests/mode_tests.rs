use {
    std::collections::HashMap,
    video::*,
};

#[derive(Default)]
struct Layers {
    visible: HashMap<Layer, bool>,
    changes: usize,
}

impl LayerVisibility for Layers {
    fn set_visible(&mut self, layer: Layer, visible: bool) {
        self.visible.insert(layer, visible);
        self.changes += 1;
    }
}

impl Layers {
    fn is_visible(&self, layer: Layer) -> bool {
        self.visible.get(&layer).copied().unwrap_or(false)
    }
}

#[test]
fn test_initial_mode_is_applied() {
    let controller = ModeController::new(ModeHandle::new(PipelineMode::PassThrough), Layers::default());
    assert!(controller.layers().is_visible(Layer::Preview));
    assert!(!controller.layers().is_visible(Layer::Overlay));

    let controller = ModeController::new(ModeHandle::new(PipelineMode::Processed), Layers::default());
    assert!(controller.layers().is_visible(Layer::Preview));
    assert!(controller.layers().is_visible(Layer::Overlay));
}

#[test]
fn test_toggle_flips_mode_and_visibility() {
    let handle = ModeHandle::new(PipelineMode::PassThrough);
    let mut controller = ModeController::new(handle.clone(), Layers::default());

    assert_eq!(controller.toggle(), PipelineMode::Processed);
    // visible to the capture side immediately
    assert_eq!(handle.get(), PipelineMode::Processed);
    assert!(controller.layers().is_visible(Layer::Overlay));
    assert!(controller.layers().is_visible(Layer::Preview));

    assert_eq!(controller.toggle(), PipelineMode::PassThrough);
    assert_eq!(handle.get(), PipelineMode::PassThrough);
    assert!(!controller.layers().is_visible(Layer::Overlay));
    assert!(controller.layers().is_visible(Layer::Preview));
}

#[test]
fn test_set_is_idempotent() {
    let mut controller = ModeController::new(ModeHandle::new(PipelineMode::PassThrough), Layers::default());
    controller.set(PipelineMode::Processed);
    controller.set(PipelineMode::Processed);
    assert_eq!(controller.mode(), PipelineMode::Processed);
    assert!(controller.layers().is_visible(Layer::Overlay));
}

#[test]
fn test_toggled() {
    assert_eq!(PipelineMode::PassThrough.toggled(), PipelineMode::Processed);
    assert_eq!(PipelineMode::Processed.toggled().toggled(), PipelineMode::Processed);
}
