//! Frame loop of the realtime pipeline.

use pixel_filters::{FastFilter, FilterChain, PixelFilter};

use super::buffers::ScanlineBuffers;
use super::scanline;
use super::{FilterSelector, FrameOutcome, PipelineStats};
use crate::error::{PipelineError, ScanlineError};
use crate::frame::{Frame, FrameGuard, FrameSource};
use crate::memory::FastMemory;
use crate::models::DeviceConfig;
use crate::transport::{DisplayBus, DmaDisplay};

/// Pipeline context: scanline buffers, transport, filters and counters.
///
/// Created once by the run loop and passed around explicitly. Call
/// [`init`](Self::init) before processing and [`deinit`](Self::deinit) to
/// give the bus and the fast memory back.
pub struct Pipeline<B: DisplayBus, M: FastMemory> {
    display: DmaDisplay<B>,
    memory: M,
    buffers: Option<ScanlineBuffers>,
    width: usize,
    height: usize,
    active: bool,
    stats: PipelineStats,
    preview: FilterChain<FastFilter>,
    singles: FilterChain<FastFilter>,
}

/// Last addressable coordinate of a `len`-pixel span.
fn last_coord(len: usize) -> u16 {
    len.saturating_sub(1).min(u16::MAX as usize) as u16
}

impl<B: DisplayBus, M: FastMemory> Pipeline<B, M> {
    pub fn new(display: DmaDisplay<B>, memory: M, config: &DeviceConfig) -> Self {
        Self {
            display,
            memory,
            buffers: None,
            width: config.display.width,
            height: config.display.height,
            active: true,
            stats: PipelineStats::default(),
            preview: FilterChain::from_kinds(&config.preview_chain, &config.filters),
            singles: FilterChain::with_all_kinds(&config.filters),
        }
    }

    pub fn from_config(bus: B, memory: M, config: &DeviceConfig) -> Self {
        Self::new(DmaDisplay::from_config(bus, config), memory, config)
    }

    /// Allocate both scanline buffers and bring up the transport.
    ///
    /// A no-op when already initialized. On failure everything acquired so
    /// far is returned, so no partial state remains.
    pub fn init(&mut self) -> Result<(), PipelineError> {
        if self.buffers.is_some() {
            tracing::debug!("Pipeline already initialized");
            return Ok(());
        }
        if self.width == 0 || self.height == 0 {
            return Err(ScanlineError::ZeroWidth.into());
        }

        let requested = self.width * std::mem::size_of::<u16>();
        let first = self
            .memory
            .alloc_scanline(self.width)
            .ok_or_else(|| PipelineError::OutOfFastMemory {
                requested,
                available: self.memory.available_bytes(),
            })?;
        let Some(second) = self.memory.alloc_scanline(self.width) else {
            let available = self.memory.available_bytes();
            self.memory.free_scanline(first);
            tracing::warn!(requested, available, "No fast memory for second scanline buffer");
            return Err(PipelineError::OutOfFastMemory {
                requested,
                available,
            });
        };

        if let Err(e) = self.display.init() {
            self.memory.free_scanline(first);
            self.memory.free_scanline(second);
            return Err(e.into());
        }

        self.buffers = Some(ScanlineBuffers::new(first, second));
        tracing::info!(
            width = self.width,
            height = self.height,
            fast_bytes_free = self.memory.available_bytes(),
            "Pipeline initialized"
        );
        Ok(())
    }

    /// Release the transport, then return the buffers to fast memory.
    pub fn deinit(&mut self) {
        let Some(buffers) = self.buffers.take() else {
            return;
        };
        self.display.deinit();
        for buffer in buffers.into_inner() {
            self.memory.free_scanline(buffer);
        }
        tracing::info!("Pipeline deinitialized");
    }

    /// Initialized and not degraded by a transport fault.
    pub fn is_available(&self) -> bool {
        self.buffers.is_some() && self.display.is_initialized()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Stop processing from the next frame on.
    pub fn cancel(&mut self) {
        if self.active {
            tracing::info!("Pipeline cancelled");
        }
        self.active = false;
    }

    /// Resume processing; the next frame starts with a fresh window.
    pub fn resume(&mut self) {
        if !self.active {
            tracing::info!("Pipeline resumed");
        }
        self.active = true;
    }

    pub fn stats(&self) -> PipelineStats {
        PipelineStats {
            transfers_completed: self.display.completions(),
            ..self.stats
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// The preview chain, for toggling filters or adjusting parameters.
    pub fn preview_mut(&mut self) -> &mut FilterChain<FastFilter> {
        &mut self.preview
    }

    pub fn preview(&self) -> &FilterChain<FastFilter> {
        &self.preview
    }

    pub fn transport(&self) -> &DmaDisplay<B> {
        &self.display
    }

    pub fn memory(&self) -> &M {
        &self.memory
    }

    /// Tear down and hand back the transport and the memory pool.
    pub fn into_parts(mut self) -> (DmaDisplay<B>, M) {
        self.deinit();
        (self.display, self.memory)
    }

    /// Capture a frame from `source`, display it and release it.
    ///
    /// A failed capture is reported as [`FrameOutcome::Skipped`]; nothing is
    /// transferred or released in that case.
    pub fn process_camera_frame<S: FrameSource + ?Sized>(
        &mut self,
        source: &mut S,
        selector: FilterSelector,
    ) -> Result<FrameOutcome, PipelineError> {
        if self.buffers.is_none() {
            return Err(PipelineError::NotInitialized);
        }
        if !self.active {
            return Ok(FrameOutcome::Cancelled);
        }

        let Some(guard) = FrameGuard::acquire(source) else {
            self.stats.frames_skipped += 1;
            tracing::warn!("Frame capture failed, skipping");
            return Ok(FrameOutcome::Skipped);
        };
        self.process_frame(&guard, selector)
    }

    /// Run up to `frames` loop iterations against `source`.
    ///
    /// Stops early on cancellation or when a transport fault degrades the
    /// pipeline. That fault is logged and counted in [`stats`](Self::stats)
    /// rather than returned; any other error is. Returns the iterations run.
    pub fn run<S: FrameSource + ?Sized>(
        &mut self,
        source: &mut S,
        selector: FilterSelector,
        frames: u64,
    ) -> Result<u64, PipelineError> {
        let mut iterations = 0;
        while iterations < frames {
            match self.process_camera_frame(&mut *source, selector) {
                Ok(FrameOutcome::Cancelled) => break,
                Ok(_) => iterations += 1,
                Err(e @ PipelineError::Transport(_)) => {
                    tracing::error!(%e, iterations, "Run stopped by transport fault");
                    iterations += 1;
                    break;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(iterations)
    }

    /// Stream one frame to the display, row by row.
    ///
    /// A transport failure degrades the pipeline: it tears itself down and
    /// [`is_available`](Self::is_available) turns false.
    pub fn process_frame<S: FrameSource + ?Sized>(
        &mut self,
        guard: &FrameGuard<'_, S>,
        selector: FilterSelector,
    ) -> Result<FrameOutcome, PipelineError> {
        let Some(capacity) = self.buffers.as_ref().map(ScanlineBuffers::capacity) else {
            return Err(PipelineError::NotInitialized);
        };
        if !self.active {
            return Ok(FrameOutcome::Cancelled);
        }

        let frame = guard.frame();
        validate_frame(frame)?;
        scanline::check_widths(frame.width(), self.width, capacity)?;

        match self.transfer_frame(frame, selector) {
            Ok(()) => {
                self.stats.frames_processed += 1;
                tracing::debug!(
                    frame = self.stats.frames_processed,
                    transfers = self.display.completions(),
                    "Frame displayed"
                );
                Ok(FrameOutcome::Displayed)
            }
            Err(e @ PipelineError::Transport(_)) => {
                self.stats.faults += 1;
                tracing::warn!(%e, "Transport fault, pipeline degraded");
                self.deinit();
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    fn transfer_frame(&mut self, frame: &Frame, selector: FilterSelector) -> Result<(), PipelineError> {
        let Self {
            display,
            buffers,
            preview,
            singles,
            width,
            height,
            ..
        } = self;
        let Some(buffers) = buffers.as_mut() else {
            return Err(PipelineError::NotInitialized);
        };
        let (width, height) = (*width, *height);
        let (src_width, src_height) = (frame.width(), frame.height());
        let vscale = scanline::scale_factor(src_height, height);

        display.set_window(0, 0, last_coord(width), last_coord(height))?;

        for y in 0..height {
            let src_y = scanline::source_row(y, vscale, src_height);
            let src = &frame.pixels()[src_y * src_width..(src_y + 1) * src_width];

            scanline::process_scanline(src, buffers.fill_mut(), width, y, height, |line, geometry| {
                match selector {
                    FilterSelector::Passthrough => {}
                    FilterSelector::Single(kind) => {
                        if let Some(filter) = singles.get_mut(kind.name()) {
                            filter.apply(line, geometry);
                        }
                    }
                    FilterSelector::Preview => preview.process(line, geometry),
                }
            })?;

            // The only suspension point: the other buffer must finish draining
            // before this one is queued.
            if buffers.drain_pending() {
                display.wait_complete()?;
                buffers.complete_drain();
            }
            if let Some(line) = buffers.begin_drain() {
                display.send_async(&line[..width])?;
            }
        }

        display.wait_complete()?;
        buffers.complete_drain();
        Ok(())
    }
}

fn validate_frame(frame: &Frame) -> Result<(), PipelineError> {
    let (width, height) = (frame.width(), frame.height());
    let expected = width.checked_mul(height).unwrap_or(usize::MAX);
    let actual = frame.pixels().len();
    if width == 0 || height == 0 || actual < expected {
        return Err(PipelineError::InvalidFrame {
            width,
            height,
            expected,
            actual,
        });
    }
    Ok(())
}
