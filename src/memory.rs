/// Small, fast memory that scanline buffers are carved from.
///
/// On a device this is internal SRAM; [`crate::sim::SramPool`] models it on
/// a host with a byte budget.
pub trait FastMemory {
    /// Allocate a zeroed buffer of `pixels` RGB565 pixels, or `None` when
    /// the pool cannot hold it.
    fn alloc_scanline(&mut self, pixels: usize) -> Option<Vec<u16>>;

    /// Return a buffer obtained from [`alloc_scanline`](Self::alloc_scanline).
    fn free_scanline(&mut self, buffer: Vec<u16>);

    /// Bytes still available.
    fn available_bytes(&self) -> usize;
}

impl<M: FastMemory + ?Sized> FastMemory for &mut M {
    fn alloc_scanline(&mut self, pixels: usize) -> Option<Vec<u16>> {
        (**self).alloc_scanline(pixels)
    }

    fn free_scanline(&mut self, buffer: Vec<u16>) {
        (**self).free_scanline(buffer)
    }

    fn available_bytes(&self) -> usize {
        (**self).available_bytes()
    }
}
