//! Viewfinder - realtime camera preview
//!
//! Streams sensor frames to a small SPI panel one scanline at a time:
//! downscale, filter, double-buffered DMA. The hardware seams are traits
//! with host simulations in [`sim`], so the whole loop runs and is tested
//! on a development machine.

pub mod error;
pub mod frame;
pub mod image;
pub mod memory;
pub mod models;
pub mod pipeline;
pub mod sim;
pub mod transport;

pub use error::{BusError, ConfigError, ImageError, PipelineError, ScanlineError, TransportError};
pub use frame::{Frame, FrameGuard, FrameSource, PixelFormat};
pub use memory::FastMemory;
pub use models::DeviceConfig;
pub use pipeline::{FilterMode, FilterSelector, FrameOutcome, Pipeline, PipelineStats};
pub use transport::{DcMode, DisplayBus, DmaDisplay};
