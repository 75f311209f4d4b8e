use std::collections::VecDeque;
use std::path::Path;
use std::time::Duration;

use serde::Serialize;

use crate::error::{BusError, ImageError};
use crate::frame::Frame;
use crate::models::{BusConfig, DisplayConfig};
use crate::transport::{command, DcMode, DisplayBus};

/// One bus transaction as the panel saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transaction {
    pub dc: DcMode,
    /// Payload size in bytes
    pub len: usize,
    /// Sent through the async queue rather than blocking
    pub queued: bool,
    /// First byte of a command transaction
    pub opcode: Option<u8>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Window {
    x0: usize,
    x1: usize,
    y0: usize,
    y1: usize,
}

/// A panel controller on a simulated display bus.
///
/// Decodes CASET/RASET/RAMWR and writes pixel data into controller RAM
/// with the usual auto-increment, wrapping at the window edges. Queued
/// transfers land in RAM when they complete, i.e. on
/// [`await_transfer`](DisplayBus::await_transfer).
#[derive(Debug)]
pub struct SimPanel {
    ram_width: usize,
    ram_height: usize,
    ram: Vec<u16>,
    visible: Window,
    configured: bool,
    queue_depth: usize,
    pending: VecDeque<(DcMode, Vec<u8>)>,
    command: Option<u8>,
    params: Vec<u8>,
    window: Window,
    cursor: (usize, usize),
    high_byte: Option<u8>,
    transactions: Vec<Transaction>,
    configure_calls: usize,
    release_calls: usize,
    windows_set: usize,
    completed: u64,
    fail_configure: bool,
    stall_after: Option<u64>,
}

impl SimPanel {
    /// A panel whose controller RAM and visible area are both
    /// `width` x `height`.
    pub fn new(width: usize, height: usize) -> Self {
        let full = Window {
            x0: 0,
            x1: width.saturating_sub(1),
            y0: 0,
            y1: height.saturating_sub(1),
        };
        Self {
            ram_width: width,
            ram_height: height,
            ram: vec![0; width * height],
            visible: full,
            configured: false,
            queue_depth: 1,
            pending: VecDeque::new(),
            command: None,
            params: Vec::new(),
            window: full,
            cursor: (0, 0),
            high_byte: None,
            transactions: Vec::new(),
            configure_calls: 0,
            release_calls: 0,
            windows_set: 0,
            completed: 0,
            fail_configure: false,
            stall_after: None,
        }
    }

    /// A panel for `display`, with enough RAM to cover its offsets.
    pub fn from_display(display: &DisplayConfig) -> Self {
        let (x_off, y_off) = (display.x_offset as usize, display.y_offset as usize);
        let mut panel = Self::new(display.width + x_off, display.height + y_off);
        panel.visible = Window {
            x0: x_off,
            x1: x_off + display.width.saturating_sub(1),
            y0: y_off,
            y1: y_off + display.height.saturating_sub(1),
        };
        panel
    }

    /// Reject the next and every later `configure`.
    pub fn fail_configure(&mut self, fail: bool) {
        self.fail_configure = fail;
    }

    /// Let `completions` transfers finish, then time out every wait.
    pub fn stall_after(&mut self, completions: Option<u64>) {
        self.stall_after = completions;
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }

    pub fn configure_calls(&self) -> usize {
        self.configure_calls
    }

    pub fn release_calls(&self) -> usize {
        self.release_calls
    }

    /// Memory writes started (RAMWR commands).
    pub fn windows_set(&self) -> usize {
        self.windows_set
    }

    pub fn completed(&self) -> u64 {
        self.completed
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn clear_transactions(&mut self) {
        self.transactions.clear();
    }

    /// Queued data-mode transactions, i.e. pixel transfers.
    pub fn pixel_transactions(&self) -> usize {
        self.transactions
            .iter()
            .filter(|t| t.queued && t.dc == DcMode::Data)
            .count()
    }

    /// Visible area of controller RAM, row-major.
    pub fn screen(&self) -> Vec<u16> {
        let v = self.visible;
        if self.ram.is_empty() {
            return Vec::new();
        }
        let mut out = Vec::with_capacity((v.x1 + 1 - v.x0) * (v.y1 + 1 - v.y0));
        for y in v.y0..=v.y1 {
            let start = y * self.ram_width;
            out.extend_from_slice(&self.ram[start + v.x0..=start + v.x1]);
        }
        out
    }

    pub fn screen_frame(&self) -> Frame {
        let v = self.visible;
        Frame::new(v.x1 + 1 - v.x0, v.y1 + 1 - v.y0, self.screen())
    }

    /// Save the visible area as a PNG.
    pub fn write_png(&self, path: &Path) -> Result<(), ImageError> {
        crate::image::write_png(path, &self.screen_frame())
    }

    fn record(&mut self, dc: DcMode, bytes: &[u8], queued: bool) {
        self.transactions.push(Transaction {
            dc,
            len: bytes.len(),
            queued,
            opcode: match dc {
                DcMode::Command => bytes.first().copied(),
                DcMode::Data => None,
            },
        });
    }

    fn feed(&mut self, dc: DcMode, bytes: &[u8]) {
        match dc {
            DcMode::Command => bytes.iter().for_each(|&b| self.on_command(b)),
            DcMode::Data => bytes.iter().for_each(|&b| self.on_data(b)),
        }
    }

    fn on_command(&mut self, cmd: u8) {
        self.command = Some(cmd);
        self.params.clear();
        self.high_byte = None;
        if cmd == command::RAMWR {
            self.cursor = (self.window.x0, self.window.y0);
            self.windows_set += 1;
        }
    }

    fn on_data(&mut self, byte: u8) {
        match self.command {
            Some(command::RAMWR) => match self.high_byte.take() {
                None => self.high_byte = Some(byte),
                Some(high) => self.write_pixel(u16::from_be_bytes([high, byte])),
            },
            Some(cmd @ (command::CASET | command::RASET)) => {
                self.params.push(byte);
                if self.params.len() == 4 {
                    let start = u16::from_be_bytes([self.params[0], self.params[1]]) as usize;
                    let end = u16::from_be_bytes([self.params[2], self.params[3]]) as usize;
                    if cmd == command::CASET {
                        (self.window.x0, self.window.x1) = (start, end);
                    } else {
                        (self.window.y0, self.window.y1) = (start, end);
                    }
                }
            }
            _ => {}
        }
    }

    fn write_pixel(&mut self, pixel: u16) {
        let (x, y) = self.cursor;
        if x < self.ram_width && y < self.ram_height {
            self.ram[y * self.ram_width + x] = pixel;
        }
        self.cursor = if x >= self.window.x1 {
            let next_row = if y >= self.window.y1 { self.window.y0 } else { y + 1 };
            (self.window.x0, next_row)
        } else {
            (x + 1, y)
        };
    }
}

impl DisplayBus for SimPanel {
    fn configure(&mut self, config: &BusConfig) -> Result<(), BusError> {
        self.configure_calls += 1;
        if self.fail_configure {
            return Err(BusError::Configure);
        }
        self.queue_depth = config.queue_depth.max(1);
        self.configured = true;
        Ok(())
    }

    fn release(&mut self) {
        self.release_calls += 1;
        self.configured = false;
        self.pending.clear();
    }

    fn write_blocking(&mut self, dc: DcMode, bytes: &[u8]) -> Result<(), BusError> {
        if !self.configured {
            return Err(BusError::Transfer);
        }
        self.record(dc, bytes, false);
        self.feed(dc, bytes);
        Ok(())
    }

    fn queue(&mut self, dc: DcMode, pixels: &[u16]) -> Result<(), BusError> {
        if !self.configured {
            return Err(BusError::Transfer);
        }
        if self.pending.len() >= self.queue_depth {
            return Err(BusError::QueueFull {
                depth: self.queue_depth,
            });
        }
        let bytes: Vec<u8> = pixels.iter().flat_map(|p| p.to_be_bytes()).collect();
        self.record(dc, &bytes, true);
        self.pending.push_back((dc, bytes));
        Ok(())
    }

    fn await_transfer(&mut self, timeout: Duration) -> Result<(), BusError> {
        if self.pending.is_empty() {
            return Err(BusError::Idle);
        }
        if self.stall_after.is_some_and(|limit| self.completed >= limit) {
            return Err(BusError::Timeout {
                timeout_ms: timeout.as_millis() as u64,
            });
        }
        if let Some((dc, bytes)) = self.pending.pop_front() {
            self.feed(dc, &bytes);
            self.completed += 1;
        }
        Ok(())
    }
}
