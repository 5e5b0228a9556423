use {
    crate::*,
    base::Vec2,
    std::{
        sync::{Arc, mpsc},
        thread,
        time::Instant,
    },
    video::{FrameBuffer, PipelineConfig},
};

/// Work marshalled onto the render thread.
pub type RenderTask<S> = Box<dyn FnOnce(&mut S) + Send>;

enum RenderMessage<S> {
    Run(RenderTask<S>),
    Teardown,
}

/// Sends work to a [`RenderLoop`] from any thread.
pub struct RenderHandle<S> {
    sender: mpsc::Sender<RenderMessage<S>>,
}

impl<S> Clone for RenderHandle<S> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<S> RenderHandle<S> {
    /// Run `task` on the render thread at the start of the next tick.
    pub fn queue(&self, task: impl FnOnce(&mut S) + Send + 'static) -> Result<(), DisplayError> {
        self.sender
            .send(RenderMessage::Run(Box::new(task)))
            .map_err(|_| DisplayError::Surface("render loop is gone".to_string()))
    }

    /// Ask the render loop to release its resources and stop ticking.
    pub fn request_teardown(&self) -> Result<(), DisplayError> {
        self.sender
            .send(RenderMessage::Teardown)
            .map_err(|_| DisplayError::Surface("render loop is gone".to_string()))
    }
}

/// Consumes published frames and draws them, on the thread that owns the surface.
///
/// Every GPU-side handle is created, used and released here; other threads
/// only reach the surface through a [`RenderHandle`].
pub struct RenderLoop<S: Surface> {
    surface: S,
    frames: Arc<FrameBuffer>,
    textures: TexturePipeline,
    cadence: FrameCadence,
    viewport: Option<Vec2<usize>>,
    receiver: mpsc::Receiver<RenderMessage<S>>,
    sender: mpsc::Sender<RenderMessage<S>>,
    teardown_requested: bool,
    released: bool,
    ticks: u64,
}

impl<S: Surface> RenderLoop<S> {
    pub fn new(
        mut surface: S,
        frames: Arc<FrameBuffer>,
        config: &PipelineConfig,
    ) -> Result<Self, DisplayError> {
        let mut textures = TexturePipeline::new();
        textures.init(&mut surface)?;
        let (sender, receiver) = mpsc::channel();
        Ok(Self {
            surface,
            frames,
            textures,
            cadence: FrameCadence::new(config.frame_budget()),
            viewport: None,
            receiver,
            sender,
            teardown_requested: false,
            released: false,
            ticks: 0,
        })
    }

    pub fn handle(&self) -> RenderHandle<S> {
        RenderHandle {
            sender: self.sender.clone(),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn textures(&self) -> &TexturePipeline {
        &self.textures
    }

    pub fn cadence(&self) -> FrameCadence {
        self.cadence
    }

    /// Last size reported by the surface, `None` before the first resize.
    pub fn viewport(&self) -> Option<Vec2<usize>> {
        self.viewport
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Run one render pass. Returns `false` once the loop has been torn down.
    ///
    /// Without a new frame the previously uploaded texture is drawn again.
    /// Surface failures are logged and the pass is skipped; the next tick
    /// tries again.
    pub fn tick(&mut self) -> bool {
        self.run_queued();
        if self.teardown_requested {
            self.shutdown();
        }
        if self.released {
            return false;
        }

        if let Some(size) = self.surface.poll_resize() {
            log::debug!("render: viewport {}", size);
            self.viewport = Some(size);
            self.surface.set_viewport(size);
        }

        if let Some(frame) = self.frames.consume_if_dirty() {
            log::trace!("render: uploading frame {}", frame.sequence);
            if let Err(error) = self.textures.upload(&mut self.surface, &frame) {
                log::warn!("render: dropping frame {}: {}", frame.sequence, error);
            }
            self.frames.recycle(frame);
        }

        if let Err(error) = self.draw() {
            log::warn!("render: skipping draw: {}", error);
        }
        self.ticks += 1;
        true
    }

    fn draw(&mut self) -> Result<(), DisplayError> {
        let (Some(program), Some(texture)) = (self.textures.program(), self.textures.texture())
        else {
            return Ok(());
        };
        self.surface.clear();
        self.surface.draw_quad(program, texture, &Quad::FULL_SCREEN)?;
        self.surface.present()
    }

    /// Tick at the configured cadence until `keep_running` says stop or the
    /// loop is torn down. A slow tick is followed by the next one right away.
    pub fn run(&mut self, mut keep_running: impl FnMut(&mut S) -> bool) {
        while keep_running(&mut self.surface) {
            let started = Instant::now();
            if !self.tick() {
                break;
            }
            let wait = self.cadence.wait_after(started.elapsed());
            if !wait.is_zero() {
                thread::sleep(wait);
            }
        }
    }

    /// Flush queued render work, then release the texture and program.
    ///
    /// Runs at most once; later calls do nothing. Release failures are logged
    /// and swallowed.
    pub fn shutdown(&mut self) {
        if self.released {
            return;
        }
        self.run_queued();
        if let Err(error) = self.textures.release(&mut self.surface) {
            log::warn!("render: {}", error);
        }
        self.released = true;
        log::info!("render: released after {} ticks", self.ticks);
    }

    fn run_queued(&mut self) {
        while let Ok(message) = self.receiver.try_recv() {
            match message {
                RenderMessage::Run(task) => task(&mut self.surface),
                RenderMessage::Teardown => self.teardown_requested = true,
            }
        }
    }
}

impl<S: Surface> Drop for RenderLoop<S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
