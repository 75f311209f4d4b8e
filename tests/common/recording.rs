//! Collaborators that log every call into a shared event list, so tests can
//! check the order in which the pipeline acquires and releases resources.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use viewfinder::memory::FastMemory;
use viewfinder::models::BusConfig;
use viewfinder::sim::{SimPanel, SramPool};
use viewfinder::transport::{DcMode, DisplayBus};
use viewfinder::BusError;

/// Shared, ordered record of events
#[derive(Clone, Default)]
pub struct EventLog(Rc<RefCell<Vec<&'static str>>>);

impl EventLog {
    pub fn push(&self, event: &'static str) {
        self.0.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<&'static str> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

/// SimPanel that logs bus ownership changes
pub struct LoggingBus {
    pub inner: SimPanel,
    log: EventLog,
}

impl LoggingBus {
    pub fn new(inner: SimPanel, log: EventLog) -> Self {
        Self { inner, log }
    }
}

impl DisplayBus for LoggingBus {
    fn configure(&mut self, config: &BusConfig) -> Result<(), BusError> {
        self.log.push("bus.configure");
        self.inner.configure(config)
    }

    fn release(&mut self) {
        self.log.push("bus.release");
        self.inner.release()
    }

    fn write_blocking(&mut self, dc: DcMode, bytes: &[u8]) -> Result<(), BusError> {
        self.inner.write_blocking(dc, bytes)
    }

    fn queue(&mut self, dc: DcMode, pixels: &[u16]) -> Result<(), BusError> {
        self.inner.queue(dc, pixels)
    }

    fn await_transfer(&mut self, timeout: Duration) -> Result<(), BusError> {
        self.log.push("bus.await");
        self.inner.await_transfer(timeout)
    }
}

/// SramPool that logs allocations and frees
pub struct LoggingMemory {
    pub inner: SramPool,
    log: EventLog,
}

impl LoggingMemory {
    pub fn new(inner: SramPool, log: EventLog) -> Self {
        Self { inner, log }
    }
}

impl FastMemory for LoggingMemory {
    fn alloc_scanline(&mut self, pixels: usize) -> Option<Vec<u16>> {
        let buffer = self.inner.alloc_scanline(pixels);
        self.log.push(if buffer.is_some() {
            "mem.alloc"
        } else {
            "mem.alloc_failed"
        });
        buffer
    }

    fn free_scanline(&mut self, buffer: Vec<u16>) {
        self.log.push("mem.free");
        self.inner.free_scanline(buffer)
    }

    fn available_bytes(&self) -> usize {
        self.inner.available_bytes()
    }
}
