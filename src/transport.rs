//! Display transport: a bus abstraction plus the DMA driver on top of it.
//!
//! [`DisplayBus`] is the hardware seam (an SPI peripheral with DMA on a
//! device, [`crate::sim::SimPanel`] on a host). [`DmaDisplay`] speaks the
//! panel protocol over it and bounds every wait.

use serde::Serialize;
use std::time::Duration;

use crate::error::{BusError, TransportError};
use crate::models::{BusConfig, DeviceConfig, DisplayConfig};

/// Panel controller commands used by the driver.
pub mod command {
    /// Column address set
    pub const CASET: u8 = 0x2A;
    /// Row address set
    pub const RASET: u8 = 0x2B;
    /// Memory write
    pub const RAMWR: u8 = 0x2C;
}

/// Level of the data/command select line for one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DcMode {
    Command,
    Data,
}

/// A display bus with an asynchronous transfer queue.
///
/// The D/C level travels with each transaction so it is always set for
/// exactly the bytes it qualifies.
pub trait DisplayBus {
    /// Claim and configure the bus.
    fn configure(&mut self, config: &BusConfig) -> Result<(), BusError>;

    /// Release the bus. Safe to call on a bus that was never configured.
    fn release(&mut self);

    /// Send bytes and return once they are on the wire.
    fn write_blocking(&mut self, dc: DcMode, bytes: &[u8]) -> Result<(), BusError>;

    /// Enqueue a pixel transfer and return immediately.
    ///
    /// Pixels are shifted out most significant byte first. The caller keeps
    /// `pixels` unmodified until [`await_transfer`](Self::await_transfer)
    /// reports the transfer complete.
    fn queue(&mut self, dc: DcMode, pixels: &[u16]) -> Result<(), BusError>;

    /// Wait at most `timeout` for the oldest queued transfer to complete.
    fn await_transfer(&mut self, timeout: Duration) -> Result<(), BusError>;
}

impl<B: DisplayBus + ?Sized> DisplayBus for &mut B {
    fn configure(&mut self, config: &BusConfig) -> Result<(), BusError> {
        (**self).configure(config)
    }

    fn release(&mut self) {
        (**self).release()
    }

    fn write_blocking(&mut self, dc: DcMode, bytes: &[u8]) -> Result<(), BusError> {
        (**self).write_blocking(dc, bytes)
    }

    fn queue(&mut self, dc: DcMode, pixels: &[u16]) -> Result<(), BusError> {
        (**self).queue(dc, pixels)
    }

    fn await_transfer(&mut self, timeout: Duration) -> Result<(), BusError> {
        (**self).await_transfer(timeout)
    }
}

/// Panel driver: control-plane commands plus one-at-a-time async pixel DMA.
#[derive(Debug)]
pub struct DmaDisplay<B: DisplayBus> {
    bus: B,
    bus_config: BusConfig,
    x_offset: u16,
    y_offset: u16,
    timeout: Duration,
    initialized: bool,
    in_flight: bool,
    completions: u64,
}

impl<B: DisplayBus> DmaDisplay<B> {
    pub fn new(bus: B, bus_config: BusConfig, display: &DisplayConfig, timeout: Duration) -> Self {
        Self {
            bus,
            bus_config,
            x_offset: display.x_offset,
            y_offset: display.y_offset,
            timeout,
            initialized: false,
            in_flight: false,
            completions: 0,
        }
    }

    pub fn from_config(bus: B, config: &DeviceConfig) -> Self {
        Self::new(
            bus,
            config.bus,
            &config.display,
            config.pipeline.transfer_timeout(),
        )
    }

    /// Configure the bus. On failure the bus is released again, so no
    /// half-configured state survives.
    pub fn init(&mut self) -> Result<(), TransportError> {
        if self.initialized {
            return Ok(());
        }
        if let Err(e) = self.bus.configure(&self.bus_config) {
            self.bus.release();
            tracing::warn!(%e, "Display bus configuration failed");
            return Err(TransportError::Init(e));
        }
        self.initialized = true;
        self.in_flight = false;
        tracing::info!(
            clock_hz = self.bus_config.clock_hz,
            queue_depth = self.bus_config.queue_depth,
            dc_pin = self.bus_config.dc_pin,
            "Display transport initialized"
        );
        Ok(())
    }

    /// Wait out any in-flight transfer, then release the bus. A transfer
    /// that already timed out is not awaited again.
    pub fn deinit(&mut self) {
        if !self.initialized {
            return;
        }
        if self.in_flight {
            if let Err(e) = self.bus.await_transfer(self.timeout) {
                tracing::debug!(%e, "Abandoning in-flight transfer");
            }
            self.in_flight = false;
        }
        self.bus.release();
        self.initialized = false;
        tracing::info!("Display transport released");
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn ensure_initialized(&self) -> Result<(), TransportError> {
        if self.initialized {
            Ok(())
        } else {
            Err(TransportError::NotInitialized)
        }
    }

    /// Queue one data-mode pixel transfer without waiting for it.
    pub fn send_async(&mut self, pixels: &[u16]) -> Result<(), TransportError> {
        self.ensure_initialized()?;
        self.bus.queue(DcMode::Data, pixels)?;
        self.in_flight = true;
        Ok(())
    }

    /// Wait for the most recent transfer, bounded by the configured timeout.
    ///
    /// Returns immediately when nothing is in flight. A timeout is reported
    /// as [`TransportError::Timeout`] and the transfer is abandoned: it is
    /// neither retried here nor awaited again by [`Self::deinit`].
    pub fn wait_complete(&mut self) -> Result<(), TransportError> {
        self.ensure_initialized()?;
        if !self.in_flight {
            return Ok(());
        }
        match self.bus.await_transfer(self.timeout) {
            Ok(()) => {
                self.in_flight = false;
                self.completions += 1;
                Ok(())
            }
            Err(BusError::Timeout { timeout_ms }) => {
                tracing::warn!(timeout_ms, "Display transfer timed out, abandoning it");
                self.in_flight = false;
                Err(TransportError::Timeout { timeout_ms })
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Transfers that completed since construction.
    pub fn completions(&self) -> u64 {
        self.completions
    }

    pub fn send_command(&mut self, cmd: u8) -> Result<(), TransportError> {
        self.ensure_initialized()?;
        self.bus.write_blocking(DcMode::Command, &[cmd])?;
        Ok(())
    }

    pub fn send_data(&mut self, byte: u8) -> Result<(), TransportError> {
        self.ensure_initialized()?;
        self.bus.write_blocking(DcMode::Data, &[byte])?;
        Ok(())
    }

    fn send_address(&mut self, cmd: u8, start: u16, end: u16) -> Result<(), TransportError> {
        self.send_command(cmd)?;
        for byte in start.to_be_bytes().into_iter().chain(end.to_be_bytes()) {
            self.send_data(byte)?;
        }
        Ok(())
    }

    /// Select the inclusive rectangle the next pixel writes fill, then start
    /// a memory write.
    ///
    /// Fails with [`TransportError::WindowOutOfRange`] before anything is
    /// sent when a coordinate plus the panel offset leaves the u16 range.
    pub fn set_window(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), TransportError> {
        let (x0, x1) = (with_offset(x0, self.x_offset)?, with_offset(x1, self.x_offset)?);
        let (y0, y1) = (with_offset(y0, self.y_offset)?, with_offset(y1, self.y_offset)?);
        self.send_address(command::CASET, x0, x1)?;
        self.send_address(command::RASET, y0, y1)?;
        self.send_command(command::RAMWR)
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn into_bus(self) -> B {
        self.bus
    }
}

fn with_offset(coord: u16, offset: u16) -> Result<u16, TransportError> {
    coord
        .checked_add(offset)
        .ok_or(TransportError::WindowOutOfRange { coord, offset })
}
