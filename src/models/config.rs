use pixel_filters::{FilterKind, FilterSettings, MAX_FILTERS};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;
use crate::sim::TestPattern;

/// Device configuration loaded from a YAML file
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DeviceConfig {
    /// Panel geometry
    pub display: DisplayConfig,

    /// Display bus wiring and transfer queue
    pub bus: BusConfig,

    /// Frame source (simulated sensor)
    pub sensor: SensorConfig,

    /// Transfer engine limits
    pub pipeline: PipelineConfig,

    /// Parameters for every filter kernel
    pub filters: FilterSettings,

    /// Filters run by the preview selection, in order
    pub preview_chain: Vec<FilterKind>,
}

/// Panel geometry (ST7735 160x128 by default)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub controller: String,
    pub width: usize,
    pub height: usize,
    /// Column offset added to every window address
    pub x_offset: u16,
    /// Row offset added to every window address
    pub y_offset: u16,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            controller: "ST7735".to_string(),
            width: 160,
            height: 128,
            x_offset: 0,
            y_offset: 0,
        }
    }
}

/// Display bus configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct BusConfig {
    #[serde(default = "default_clock_hz")]
    pub clock_hz: u32,

    #[serde(default = "default_mosi_pin")]
    pub mosi_pin: u8,

    #[serde(default = "default_sclk_pin")]
    pub sclk_pin: u8,

    #[serde(default = "default_cs_pin")]
    pub cs_pin: u8,

    #[serde(default = "default_dc_pin")]
    pub dc_pin: u8,

    /// Async transactions the bus may hold at once
    #[serde(default = "default_queue_depth")]
    pub queue_depth: usize,
}

fn default_clock_hz() -> u32 {
    40_000_000 // panel maximum
}

fn default_mosi_pin() -> u8 {
    39
}

fn default_sclk_pin() -> u8 {
    40
}

fn default_cs_pin() -> u8 {
    42
}

fn default_dc_pin() -> u8 {
    2
}

fn default_queue_depth() -> usize {
    7
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            clock_hz: default_clock_hz(),
            mosi_pin: default_mosi_pin(),
            sclk_pin: default_sclk_pin(),
            cs_pin: default_cs_pin(),
            dc_pin: default_dc_pin(),
            queue_depth: default_queue_depth(),
        }
    }
}

/// Simulated sensor output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SensorConfig {
    pub width: usize,
    pub height: usize,
    pub pattern: TestPattern,
    pub seed: u64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
            pattern: TestPattern::ColorBars,
            seed: 0x5EED,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Upper bound on a single transfer-completion wait
    pub transfer_timeout_ms: u64,

    /// Fast memory available for scanline buffers
    pub fast_memory_bytes: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            transfer_timeout_ms: 100,
            fast_memory_bytes: 16 * 1024,
        }
    }
}

impl PipelineConfig {
    pub fn transfer_timeout(&self) -> Duration {
        Duration::from_millis(self.transfer_timeout_ms)
    }
}

impl DeviceConfig {
    /// Load configuration, falling back to defaults if the file is missing or invalid
    pub fn load_from_path(path: &Path) -> Self {
        match Self::load_strict(path) {
            Ok(config) => {
                tracing::info!(
                    path = %path.display(),
                    width = config.display.width,
                    height = config.display.height,
                    preview_filters = config.preview_chain.len(),
                    "Loaded configuration"
                );
                config
            }
            Err(e) => {
                tracing::warn!(%e, path = %path.display(), "Failed to load config, using defaults");
                Self::default()
            }
        }
    }

    /// Load and validate configuration, reporting any problem
    pub fn load_strict(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display.width == 0 || self.display.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "display size {}x{} has a zero dimension",
                self.display.width, self.display.height
            )));
        }
        if self.sensor.width == 0 || self.sensor.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "sensor size {}x{} has a zero dimension",
                self.sensor.width, self.sensor.height
            )));
        }
        let (x_end, y_end) = (
            (self.display.width - 1).saturating_add(usize::from(self.display.x_offset)),
            (self.display.height - 1).saturating_add(usize::from(self.display.y_offset)),
        );
        if x_end > usize::from(u16::MAX) || y_end > usize::from(u16::MAX) {
            return Err(ConfigError::Invalid(format!(
                "display window ends at ({x_end}, {y_end}) with offsets ({}, {}), past the controller address range",
                self.display.x_offset, self.display.y_offset
            )));
        }
        if self.bus.queue_depth == 0 {
            return Err(ConfigError::Invalid("bus queue_depth must be at least 1".into()));
        }
        if self.pipeline.transfer_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "pipeline transfer_timeout_ms must be positive".into(),
            ));
        }
        if self.preview_chain.len() > MAX_FILTERS {
            return Err(ConfigError::Invalid(format!(
                "preview_chain has {} filters, at most {} fit",
                self.preview_chain.len(),
                MAX_FILTERS
            )));
        }
        Ok(())
    }

    /// Bytes needed for the two scanline buffers
    pub fn scanline_buffer_bytes(&self) -> usize {
        2 * self.display.width * std::mem::size_of::<u16>()
    }
}
