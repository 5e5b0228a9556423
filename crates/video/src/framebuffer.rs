use {
    crate::*,
    arc_swap::ArcSwapOption,
    std::sync::{
        Arc, Mutex,
        atomic::{AtomicU64, Ordering},
    },
};

// spare buffers kept for reuse; the oldest goes first when full
const MAX_SPARES: usize = 4;

/// Single-slot, latest-wins handoff between the capture thread and the render thread.
///
/// `publish` replaces whatever is in the slot; an unconsumed frame is dropped,
/// never queued. `consume_if_dirty` takes the frame out in one atomic swap, so
/// the dirty check and the read can't be split by a concurrent publish.
///
/// Pixel storage circulates: the render side hands consumed frames back with
/// [`FrameBuffer::recycle`] and the capture side draws from those spares with
/// [`FrameBuffer::acquire`]. Spares are matched by byte length, so a capture
/// path that needs several buffers per frame (work copy plus RGBA output) only
/// allocates when a frame size changes.
pub struct FrameBuffer {
    slot: ArcSwapOption<Frame>,
    spares: Mutex<Vec<Vec<u8>>>,
    published: AtomicU64,
    dropped: AtomicU64,
    allocations: AtomicU64,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            slot: ArcSwapOption::empty(),
            spares: Mutex::new(Vec::with_capacity(MAX_SPARES)),
            published: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            allocations: AtomicU64::new(0),
        }
    }

    /// Overwrite the slot with `frame` and mark it dirty. Never blocks.
    pub fn publish(&self, frame: Frame) {
        let previous = self.slot.swap(Some(Arc::new(frame)));
        self.published.fetch_add(1, Ordering::Relaxed);
        if let Some(previous) = previous {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            if let Ok(frame) = Arc::try_unwrap(previous) {
                self.recycle(frame);
            }
        }
    }

    /// Take the pending frame if one was published since the last call.
    pub fn consume_if_dirty(&self) -> Option<Frame> {
        self.slot
            .swap(None)
            .map(|frame| Arc::try_unwrap(frame).unwrap_or_else(|shared| (*shared).clone()))
    }

    pub fn is_dirty(&self) -> bool {
        self.slot.load().is_some()
    }

    /// Return a consumed frame's storage for reuse.
    pub fn recycle(&self, frame: Frame) {
        // never wait on the spares, losing a buffer only costs an allocation
        if let Ok(mut spares) = self.spares.try_lock() {
            if spares.len() == MAX_SPARES {
                spares.remove(0);
            }
            spares.push(frame.data);
        }
    }

    /// A zeroed-or-stale buffer of exactly `len` bytes, reusing a spare of that length when possible.
    pub fn acquire(&self, len: usize) -> Vec<u8> {
        let spare = self.spares.try_lock().ok().and_then(|mut spares| {
            let index = spares.iter().rposition(|buffer| buffer.len() == len)?;
            Some(spares.remove(index))
        });
        match spare {
            Some(buffer) => buffer,
            None => {
                self.allocations.fetch_add(1, Ordering::Relaxed);
                vec![0; len]
            }
        }
    }

    /// Total number of publishes.
    pub fn published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }

    /// Publishes that overwrote a frame nobody consumed.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Times `acquire` found no spare of the right size.
    pub fn allocations(&self) -> u64 {
        self.allocations.load(Ordering::Relaxed)
    }
}
