//! Ping-pong scanline buffers.

/// Two scanline buffers that alternate between being filled by the CPU and
/// drained by DMA.
///
/// Exactly one buffer is filling at any time and at most one is draining;
/// they are never the same buffer. [`fill_mut`](Self::fill_mut) can only
/// reach the filling buffer, and a new drain cannot start until the previous
/// one was completed.
#[derive(Debug)]
pub struct ScanlineBuffers {
    buffers: [Vec<u16>; 2],
    fill: usize,
    draining: Option<usize>,
}

impl ScanlineBuffers {
    pub fn new(first: Vec<u16>, second: Vec<u16>) -> Self {
        Self {
            buffers: [first, second],
            fill: 0,
            draining: None,
        }
    }

    /// Pixels every buffer can hold.
    pub fn capacity(&self) -> usize {
        self.buffers[0].len().min(self.buffers[1].len())
    }

    /// The buffer being filled.
    pub fn fill_mut(&mut self) -> &mut [u16] {
        &mut self.buffers[self.fill]
    }

    pub fn fill_index(&self) -> usize {
        self.fill
    }

    pub fn draining_index(&self) -> Option<usize> {
        self.draining
    }

    pub fn drain_pending(&self) -> bool {
        self.draining.is_some()
    }

    /// Hand the filled buffer to DMA and start filling the other one.
    ///
    /// Returns the buffer to transfer, or `None` while a previous drain is
    /// still pending.
    pub fn begin_drain(&mut self) -> Option<&[u16]> {
        if self.draining.is_some() {
            return None;
        }
        let drained = self.fill;
        self.draining = Some(drained);
        self.fill = 1 - drained;
        Some(&self.buffers[drained])
    }

    /// The draining buffer's transfer completed; it may be filled again.
    pub fn complete_drain(&mut self) {
        self.draining = None;
    }

    /// Give both buffers back, e.g. to return them to their pool.
    pub fn into_inner(self) -> [Vec<u16>; 2] {
        self.buffers
    }
}
