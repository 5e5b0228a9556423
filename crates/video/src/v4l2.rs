use {
    crate::*,
    base::Vec2,
    std::{io, path::PathBuf, time::Duration},
    v4l::{
        Device, Format, FourCC, buffer::Type, io::mmap::Stream as MmapStream,
        io::traits::CaptureStream, video::Capture,
    },
};

// nodes probed for DeviceSelector::Any
const ANY_DEVICE_CANDIDATES: usize = 8;

#[derive(Debug, Clone)]
pub struct V4l2Config {
    /// Nodes tried in order for `DeviceSelector::Any`; the first that opens wins.
    pub any: Vec<PathBuf>,
    pub back: PathBuf,
    pub front: PathBuf,
    /// Requested capture size, device default if `None`.
    pub size: Option<Vec2<usize>>,
    pub buffer_count: u32,
}

impl Default for V4l2Config {
    fn default() -> Self {
        Self {
            any: (0..ANY_DEVICE_CANDIDATES)
                .map(|index| PathBuf::from(format!("/dev/video{index}")))
                .collect(),
            back: PathBuf::from("/dev/video0"),
            front: PathBuf::from("/dev/video1"),
            size: Some(Vec2::new(640, 480)),
            buffer_count: 4,
        }
    }
}

/// Linux V4L2 capture driver.
pub struct V4l2Driver {
    config: V4l2Config,
}

impl V4l2Driver {
    pub fn new(config: V4l2Config) -> Self {
        Self { config }
    }

    fn open_path(&self, path: &PathBuf) -> Result<V4l2Device, VideoError> {
        let device = Device::with_path(path)
            .map_err(|error| VideoError::DeviceUnavailable(format!("{}: {}", path.display(), error)))?;
        let device_format = Capture::format(&device)?;

        // prefer YUYV, which needs no decoder, at the requested size
        let size = self.config.size.unwrap_or(Vec2::new(
            device_format.width as usize,
            device_format.height as usize,
        ));
        let actual = Capture::set_format(
            &device,
            &Format::new(size.x as u32, size.y as u32, FourCC::new(b"YUYV")),
        )?;
        let encoding = match &actual.fourcc.repr {
            b"YUYV" => Encoding::Yuyv,
            b"GREY" => Encoding::Grey,
            b"MJPG" => Encoding::Mjpeg,
            _ => {
                return Err(VideoError::DeviceUnavailable(format!(
                    "{}: unsupported pixel format {}",
                    path.display(),
                    actual.fourcc
                )));
            }
        };
        let size = Vec2::new(actual.width as usize, actual.height as usize);

        let stream = MmapStream::with_buffers(&device, Type::VideoCapture, self.config.buffer_count)
            .map_err(|error| VideoError::Stream(error.to_string()))?;

        log::info!(
            "v4l2: opened {} at {} ({})",
            path.display(),
            size,
            actual.fourcc
        );
        Ok(V4l2Device {
            stream: Some(stream),
            size,
            encoding,
        })
    }
}

impl CaptureDriver for V4l2Driver {
    fn name(&self) -> &str {
        "v4l2"
    }

    fn open(&self, selector: DeviceSelector) -> Result<Box<dyn CaptureDevice>, VideoError> {
        match selector {
            DeviceSelector::Back => Ok(Box::new(self.open_path(&self.config.back)?)),
            DeviceSelector::Front => Ok(Box::new(self.open_path(&self.config.front)?)),
            DeviceSelector::Any => {
                let mut last_error =
                    VideoError::DeviceUnavailable("no capture device candidates".to_string());
                for path in &self.config.any {
                    match self.open_path(path) {
                        Ok(device) => return Ok(Box::new(device)),
                        Err(error) => {
                            log::debug!("v4l2: skipping {}: {}", path.display(), error);
                            last_error = error;
                        }
                    }
                }
                Err(last_error)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    Yuyv,
    Grey,
    Mjpeg,
}

struct V4l2Device {
    stream: Option<MmapStream<'static>>,
    size: Vec2<usize>,
    encoding: Encoding,
}

impl V4l2Device {
    fn decode(&self, data: &[u8]) -> Result<Frame, VideoError> {
        match self.encoding {
            Encoding::Yuyv => {
                let rgb = convert::yuyv_to_rgb(data, self.size.x, self.size.y).ok_or_else(|| {
                    VideoError::Stream(format!("short YUYV buffer: {} bytes", data.len()))
                })?;
                Frame::new(self.size, PixelLayout::Rgb, rgb)
            }
            Encoding::Grey => {
                let len = Frame::byte_len(self.size, PixelLayout::Luma);
                if data.len() < len {
                    return Err(VideoError::Stream(format!(
                        "short GREY buffer: {} bytes",
                        data.len()
                    )));
                }
                Frame::new(self.size, PixelLayout::Luma, data[..len].to_vec())
            }
            Encoding::Mjpeg => {
                let rgb = crates_image::load_from_memory(data)?.to_rgb8();
                let size = Vec2::new(rgb.width() as usize, rgb.height() as usize);
                Frame::new(size, PixelLayout::Rgb, rgb.into_raw())
            }
        }
    }
}

impl CaptureDevice for V4l2Device {
    fn size(&self) -> Vec2<usize> {
        self.size
    }

    fn blocking_capture(&mut self, timeout: Duration) -> Result<Option<Frame>, VideoError> {
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| VideoError::Stream("No stream".to_string()))?;
        stream.set_timeout(timeout);
        let data = match CaptureStream::next(stream) {
            // the buffer is only valid until the next dequeue
            Ok((data, _metadata)) => data.to_vec(),
            Err(error) if error.kind() == io::ErrorKind::TimedOut => return Ok(None),
            Err(error) => return Err(VideoError::Stream(error.to_string())),
        };
        self.decode(&data).map(Some)
    }

    fn close(&mut self) {
        self.stream.take();
    }
}
