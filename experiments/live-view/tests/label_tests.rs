use {base::Vec2, live_view::*, video::*};

#[test]
fn test_title_follows_status_and_mode() {
    let mut label = StatusLabel::default();
    let mut controller = ModeController::new(ModeHandle::new(PipelineMode::PassThrough), Layers::default());
    assert_eq!(
        label.title(controller.layers()),
        "Live View [raw] Starting camera - T toggles, ESC exits"
    );

    label.update(&Status::CameraStarted(Vec2::new(640, 480)));
    label.update(&Status::CaptureTiming { fps: 30.0, millis: 2.0 });
    controller.toggle();
    assert_eq!(
        label.title(controller.layers()),
        "Live View [edges] Camera started: 640x480 | FPS: 30.0 MS: 2.0 - T toggles, ESC exits"
    );

    label.update(&Status::CameraStopped);
    assert_eq!(
        label.title(controller.layers()),
        "Live View [edges] Camera stopped - T toggles, ESC exits"
    );
}

#[test]
fn test_layers() {
    let mut layers = Layers::default();
    layers.set_visible(Layer::Preview, true);
    layers.set_visible(Layer::Overlay, true);
    layers.set_visible(Layer::Overlay, false);
    assert_eq!(
        layers,
        Layers {
            preview: true,
            overlay: false,
        }
    );
}
