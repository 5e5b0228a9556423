use {
    anyhow::Context,
    base::{Vec2, log},
    display::{Key, RenderLoop, WindowSurface},
    live_view::*,
    std::sync::Arc,
    video::*,
};

const WINDOW_SIZE: Vec2<usize> = Vec2::new(640, 480);

fn main() -> anyhow::Result<()> {
    let options = Options::parse(std::env::args().skip(1))?;
    match &options.log_dir {
        Some(dir) => base::init_file_logger(dir.clone())?,
        None => base::init_stdout_logger(),
    }
    log::info!("Live View ({:?} driver)", options.driver);

    let config = PipelineConfig::default();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")?;

    // capture side
    let frames = Arc::new(FrameBuffer::new());
    let (status, mut statuses) = status_channel();
    let mode = ModeHandle::new(config.initial_mode());
    let sink = FrameSink::new(
        Arc::clone(&frames),
        mode.clone(),
        Arc::new(EdgeTransform::default()),
        status.clone(),
    );
    let session = CaptureSession::new(options.driver.build(), sink, &config);
    let supervisor = {
        let _guard = runtime.enter();
        Supervisor::new(session, &config, status).spawn()
    };

    // render side, on this thread
    let surface = WindowSurface::new("Live View", WINDOW_SIZE)?;
    let mut render = RenderLoop::new(surface, frames, &config)?;
    let mut controller = ModeController::new(mode, Layers::default());
    let mut label = StatusLabel::default();
    let mut title = String::new();

    render.run(|window| {
        if !window.is_open() || window.is_key_down(Key::Escape) {
            return false;
        }
        if window.is_key_pressed(Key::T) {
            controller.toggle();
        }
        for status in statuses.drain() {
            label.update(&status);
        }
        let next = label.title(controller.layers());
        if next != title {
            window.set_title(&next);
            title = next;
        }
        true
    });

    // timer, then session, then GPU resources
    if let Err(error) = runtime.block_on(supervisor.shutdown()) {
        log::warn!("{}", error);
    }
    render.shutdown();

    log::info!("Exiting...");
    Ok(())
}
