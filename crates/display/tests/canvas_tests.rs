use {
    base::Vec2,
    display::*,
    std::{
        sync::Arc,
        time::{Duration, Instant},
    },
    video::*,
};

fn rgb_2x2() -> Frame {
    Frame::new(
        Vec2::new(2, 2),
        PixelLayout::Rgb,
        vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12],
    )
    .unwrap()
}

#[test]
fn test_image_is_upright() {
    let frames = Arc::new(FrameBuffer::new());
    let mut render =
        RenderLoop::new(Canvas::new(Vec2::new(2, 2)), Arc::clone(&frames), &PipelineConfig::default())
            .unwrap();
    frames.publish(rgb_2x2());
    render.tick();

    let canvas = render.surface();
    assert_eq!(canvas.pixel(0, 0), 0x010203);
    assert_eq!(canvas.pixel(1, 0), 0x040506);
    assert_eq!(canvas.pixel(0, 1), 0x070809);
    assert_eq!(canvas.pixel(1, 1), 0x0a0b0c);
    assert_eq!(canvas.presented(), 1);
}

#[test]
fn test_texture_is_scaled_to_canvas() {
    let frames = Arc::new(FrameBuffer::new());
    let mut render =
        RenderLoop::new(Canvas::new(Vec2::new(4, 4)), Arc::clone(&frames), &PipelineConfig::default())
            .unwrap();
    frames.publish(rgb_2x2());
    render.tick();

    let canvas = render.surface();
    assert_eq!(canvas.pixel(0, 0), 0x010203);
    assert_eq!(canvas.pixel(1, 1), 0x010203);
    assert_eq!(canvas.pixel(3, 0), 0x040506);
    assert_eq!(canvas.pixel(3, 3), 0x0a0b0c);
}

#[test]
fn test_luminance_is_grey() {
    let frames = Arc::new(FrameBuffer::new());
    let mut render =
        RenderLoop::new(Canvas::new(Vec2::new(1, 1)), Arc::clone(&frames), &PipelineConfig::default())
            .unwrap();
    frames.publish(Frame::new(Vec2::new(1, 1), PixelLayout::Luma, vec![0x50]).unwrap());
    render.tick();
    assert_eq!(render.surface().pixel(0, 0), 0x505050);
}

#[test]
fn test_placeholder_is_black() {
    let frames = Arc::new(FrameBuffer::new());
    let mut render =
        RenderLoop::new(Canvas::new(Vec2::new(3, 3)), frames, &PipelineConfig::default()).unwrap();
    render.tick();
    assert!(render.surface().pixels().iter().all(|&p| p == 0));
}

#[test]
fn test_shutdown_frees_every_handle() {
    let frames = Arc::new(FrameBuffer::new());
    let mut render =
        RenderLoop::new(Canvas::new(Vec2::new(3, 3)), frames, &PipelineConfig::default()).unwrap();
    assert_eq!(render.surface().live_handles(), 2);
    render.shutdown();
    assert_eq!(render.surface().live_handles(), 0);
}

#[test]
fn test_canvas_resize_is_reported_once() {
    let mut canvas = Canvas::new(Vec2::new(3, 3));
    canvas.resize(Vec2::new(3, 3));
    assert_eq!(canvas.poll_resize(), None);
    canvas.resize(Vec2::new(5, 4));
    assert_eq!(canvas.poll_resize(), Some(Vec2::new(5, 4)));
    assert_eq!(canvas.poll_resize(), None);
    assert_eq!(canvas.pixels().len(), 20);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_live_session_reaches_the_screen() {
    let driver = Arc::new(PatternDriver::new(PatternConfig {
        size: Vec2::new(16, 12),
        layout: PixelLayout::Rgb,
        frame_interval: Duration::from_millis(5),
    }));
    let config = PipelineConfig::default().with_capture_timeout(Duration::from_millis(10));
    let frames = Arc::new(FrameBuffer::new());
    let (status, mut statuses) = status_channel();
    let sink = FrameSink::new(
        Arc::clone(&frames),
        ModeHandle::new(PipelineMode::PassThrough),
        Arc::new(|_: &mut Frame| Ok(())),
        status.clone(),
    );
    let session = CaptureSession::new(driver.clone(), sink, &config);
    let supervisor = Supervisor::new(session, &config, status).spawn();

    let mut render =
        RenderLoop::new(Canvas::new(Vec2::new(16, 12)), Arc::clone(&frames), &config).unwrap();
    let deadline = Instant::now() + Duration::from_secs(2);
    while render.textures().uploads() == 0 {
        assert!(Instant::now() < deadline, "no frame reached the render loop");
        tokio::time::sleep(Duration::from_millis(5)).await;
        render.tick();
    }

    let spec = render.textures().spec().unwrap();
    assert_eq!(spec.size, Vec2::new(16, 12));
    assert_eq!(spec.format, PixelFormat::Rgb);
    let texture = render.textures().texture().unwrap();
    assert_eq!(render.surface().texture_spec(texture), Some(spec));

    supervisor.shutdown().await.unwrap();
    render.shutdown();

    assert_eq!(driver.opened(), vec![DeviceSelector::Any]);
    let statuses = statuses.drain();
    assert!(!statuses.iter().any(|s| matches!(s, Status::NoFramesRetrying(_))));
}
