//! Host-side stand-ins for the hardware collaborators.
//!
//! Each type implements one of the pipeline's hardware seams so the full
//! frame loop runs, and can be inspected, on a development machine.

mod panel;
mod sensor;
mod sram;

pub use panel::{SimPanel, Transaction};
pub use sensor::{PatternSensor, QueueSource};
pub use sram::SramPool;

use serde::{Deserialize, Serialize};

/// Image produced by [`PatternSensor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TestPattern {
    /// Eight vertical bars: white, yellow, cyan, green, magenta, red, blue, black
    #[default]
    ColorBars,
    /// Red across, green down, blue the inverse of red
    Gradient,
    /// Seeded random pixels, different every frame
    Noise,
    /// 8x8 black and white squares
    Checkerboard,
}
