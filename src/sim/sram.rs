use crate::memory::FastMemory;
use crate::models::PipelineConfig;

/// Fast memory with a fixed byte budget.
#[derive(Debug, Clone)]
pub struct SramPool {
    capacity: usize,
    used: usize,
    allocations: usize,
    frees: usize,
}

impl SramPool {
    pub fn new(capacity_bytes: usize) -> Self {
        Self {
            capacity: capacity_bytes,
            used: 0,
            allocations: 0,
            frees: 0,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.fast_memory_bytes)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn used_bytes(&self) -> usize {
        self.used
    }

    /// Successful allocations so far.
    pub fn allocations(&self) -> usize {
        self.allocations
    }

    pub fn frees(&self) -> usize {
        self.frees
    }

    /// Buffers handed out and not yet returned.
    pub fn outstanding(&self) -> usize {
        self.allocations - self.frees
    }
}

impl FastMemory for SramPool {
    fn alloc_scanline(&mut self, pixels: usize) -> Option<Vec<u16>> {
        let bytes = pixels.checked_mul(std::mem::size_of::<u16>())?;
        if bytes > self.available_bytes() {
            tracing::debug!(bytes, available = self.available_bytes(), "SRAM pool exhausted");
            return None;
        }
        self.used += bytes;
        self.allocations += 1;
        Some(vec![0; pixels])
    }

    fn free_scanline(&mut self, buffer: Vec<u16>) {
        let bytes = buffer.len() * std::mem::size_of::<u16>();
        self.used = self.used.saturating_sub(bytes);
        self.frees += 1;
    }

    fn available_bytes(&self) -> usize {
        self.capacity - self.used
    }
}
