use {
    base::Vec2,
    std::{path::PathBuf, sync::Arc},
    video::*,
};

pub const USAGE: &str = "usage: live-view [pattern|v4l2] [--log-dir DIR]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverKind {
    Pattern,
    V4l2,
}

impl DriverKind {
    pub fn build(&self) -> Arc<dyn CaptureDriver> {
        match self {
            DriverKind::Pattern => Arc::new(PatternDriver::new(PatternConfig::default())),
            DriverKind::V4l2 => Arc::new(V4l2Driver::new(V4l2Config::default())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub driver: DriverKind,
    pub log_dir: Option<PathBuf>,
}

impl Options {
    /// Parse command line arguments, program name excluded.
    pub fn parse(args: impl IntoIterator<Item = String>) -> anyhow::Result<Self> {
        let mut driver = DriverKind::V4l2;
        let mut log_dir = None;
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "pattern" => driver = DriverKind::Pattern,
                "v4l2" => driver = DriverKind::V4l2,
                "--log-dir" => match args.next() {
                    Some(dir) => log_dir = Some(PathBuf::from(dir)),
                    None => anyhow::bail!("--log-dir needs a directory\n{}", USAGE),
                },
                other => anyhow::bail!("unknown argument: {}\n{}", other, USAGE),
            }
        }
        Ok(Self { driver, log_dir })
    }
}

// gradient magnitude above this becomes an edge
const EDGE_THRESHOLD: u32 = 100;

/// Sobel edge detector: replaces the frame with a single-channel edge map,
/// edges white on black.
#[derive(Debug, Clone, Copy)]
pub struct EdgeTransform {
    threshold: u32,
}

impl Default for EdgeTransform {
    fn default() -> Self {
        Self {
            threshold: EDGE_THRESHOLD,
        }
    }
}

impl EdgeTransform {
    pub fn new(threshold: u32) -> Self {
        Self { threshold }
    }
}

fn luma(frame: &Frame) -> Vec<u8> {
    match frame.layout {
        PixelLayout::Luma => frame.data.clone(),
        PixelLayout::Rgb | PixelLayout::Rgba => frame
            .data
            .chunks_exact(frame.channels())
            .map(|p| ((77 * p[0] as u32 + 150 * p[1] as u32 + 29 * p[2] as u32) >> 8) as u8)
            .collect(),
    }
}

impl Transform for EdgeTransform {
    fn apply(&self, frame: &mut Frame) -> Result<(), VideoError> {
        frame.ensure_continuous()?;
        let Vec2 { x: width, y: height } = frame.size;
        let grey = luma(frame);
        let mut edges = vec![0u8; width * height];

        // borders stay black
        for y in 1..height.saturating_sub(1) {
            for x in 1..width.saturating_sub(1) {
                let at = |dx: usize, dy: usize| grey[(y + dy - 1) * width + x + dx - 1] as i32;
                let gx = at(2, 0) + 2 * at(2, 1) + at(2, 2) - at(0, 0) - 2 * at(0, 1) - at(0, 2);
                let gy = at(0, 2) + 2 * at(1, 2) + at(2, 2) - at(0, 0) - 2 * at(1, 0) - at(2, 0);
                let magnitude = gx.unsigned_abs() + gy.unsigned_abs();
                if magnitude > self.threshold {
                    edges[y * width + x] = 255;
                }
            }
        }

        frame.layout = PixelLayout::Luma;
        frame.data = edges;
        Ok(())
    }
}

/// Which layers are up, shown in the window title.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Layers {
    pub preview: bool,
    pub overlay: bool,
}

impl LayerVisibility for Layers {
    fn set_visible(&mut self, layer: Layer, visible: bool) {
        match layer {
            Layer::Preview => self.preview = visible,
            Layer::Overlay => self.overlay = visible,
        }
    }
}

/// On-screen text: latest lifecycle status plus the latest capture timing.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusLabel {
    message: String,
    timing: Option<String>,
}

impl Default for StatusLabel {
    fn default() -> Self {
        Self {
            message: "Starting camera".to_string(),
            timing: None,
        }
    }
}

impl StatusLabel {
    pub fn update(&mut self, status: &Status) {
        match status {
            Status::CaptureTiming { .. } => self.timing = Some(status.to_string()),
            Status::CameraStopped => {
                self.message = status.to_string();
                self.timing = None;
            }
            _ => self.message = status.to_string(),
        }
    }

    pub fn title(&self, layers: &Layers) -> String {
        let mode = if layers.overlay { "edges" } else { "raw" };
        match &self.timing {
            Some(timing) => format!(
                "Live View [{}] {} | {} - T toggles, ESC exits",
                mode, self.message, timing
            ),
            None => format!(
                "Live View [{}] {} - T toggles, ESC exits",
                mode, self.message
            ),
        }
    }
}
