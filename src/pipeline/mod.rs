//! Realtime video pipeline: sensor frame -> scanline stage -> filters ->
//! double-buffered DMA -> display.

pub mod buffers;
pub mod engine;
pub mod full_frame;
pub mod scanline;

pub use buffers::ScanlineBuffers;
pub use engine::Pipeline;
pub use full_frame::{apply_chain, apply_filter, apply_grayscale, apply_sepia, apply_vignette, downscale_frame};
pub use scanline::{downscale_scanline, process_scanline};

use pixel_filters::{FilterError, FilterKind};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Which filtering a frame gets on its way to the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterSelector {
    /// Downscale only
    Passthrough,
    /// One fast filter with the configured parameters
    Single(FilterKind),
    /// The configured preview chain
    #[default]
    Preview,
}

impl fmt::Display for FilterSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterSelector::Passthrough => f.write_str("passthrough"),
            FilterSelector::Single(kind) => write!(f, "{kind}"),
            FilterSelector::Preview => f.write_str("preview"),
        }
    }
}

impl FromStr for FilterSelector {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "passthrough" | "off" => Ok(FilterSelector::Passthrough),
            "preview" | "chain" => Ok(FilterSelector::Preview),
            _ => s.parse().map(FilterSelector::Single),
        }
    }
}

/// Size contract for whole-frame filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    /// Frame is already display-sized; anything larger is refused.
    #[default]
    Viewfinder,
    /// Full sensor resolution, e.g. before saving.
    Capture,
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterMode::Viewfinder => f.write_str("viewfinder"),
            FilterMode::Capture => f.write_str("capture"),
        }
    }
}

impl FromStr for FilterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "viewfinder" | "preview" => Ok(FilterMode::Viewfinder),
            "capture" | "full" => Ok(FilterMode::Capture),
            _ => Err(format!("unknown filter mode '{s}' (expected viewfinder or capture)")),
        }
    }
}

/// What happened to one loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FrameOutcome {
    /// Every display row was transferred.
    Displayed,
    /// The source had no frame; nothing was sent or released.
    Skipped,
    /// The pipeline is cancelled; nothing was captured or sent.
    Cancelled,
}

/// Running counters, serializable for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    pub frames_processed: u64,
    pub transfers_completed: u64,
    /// Loop iterations where the source failed to capture
    pub frames_skipped: u64,
    /// Transport failures that degraded the pipeline
    pub faults: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_parse() {
        assert_eq!("none".parse::<FilterSelector>().unwrap(), FilterSelector::Passthrough);
        assert_eq!("Preview".parse::<FilterSelector>().unwrap(), FilterSelector::Preview);
        assert_eq!(
            "sepia".parse::<FilterSelector>().unwrap(),
            FilterSelector::Single(FilterKind::Sepia)
        );
        assert!("posterize".parse::<FilterSelector>().is_err());
    }

    #[test]
    fn test_selector_display_roundtrip() {
        for selector in [
            FilterSelector::Passthrough,
            FilterSelector::Preview,
            FilterSelector::Single(FilterKind::Vignette),
        ] {
            assert_eq!(selector.to_string().parse::<FilterSelector>().unwrap(), selector);
        }
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("capture".parse::<FilterMode>().unwrap(), FilterMode::Capture);
        assert_eq!("Viewfinder".parse::<FilterMode>().unwrap(), FilterMode::Viewfinder);
        assert_eq!(FilterMode::default(), FilterMode::Viewfinder);
        assert!("thumbnail".parse::<FilterMode>().is_err());
    }

    #[test]
    fn test_stats_serialize() {
        let stats = PipelineStats {
            frames_processed: 3,
            transfers_completed: 384,
            frames_skipped: 1,
            faults: 0,
        };
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["transfers_completed"], 384);
        assert_eq!(json["frames_skipped"], 1);
    }
}
