//! Test fixtures and constants.

use viewfinder::models::DeviceConfig;
use viewfinder::sim::{SimPanel, SramPool};
use viewfinder::{Frame, Pipeline};

/// Sensor and panel sizes of the reference hardware
pub mod sizes {
    pub const SENSOR_WIDTH: usize = 320;
    pub const SENSOR_HEIGHT: usize = 240;
    pub const PANEL_WIDTH: usize = 160;
    pub const PANEL_HEIGHT: usize = 128;
}

/// Default config with a different panel size
pub fn config_with_panel(width: usize, height: usize) -> DeviceConfig {
    let mut config = DeviceConfig::default();
    config.display.width = width;
    config.display.height = height;
    config
}

/// Pipeline over a simulated panel and an SRAM pool sized by the config
pub fn sim_pipeline(config: &DeviceConfig) -> Pipeline<SimPanel, SramPool> {
    Pipeline::from_config(
        SimPanel::from_display(&config.display),
        SramPool::from_config(&config.pipeline),
        config,
    )
}

/// Same, with a panel prepared by the caller (fault injection)
pub fn sim_pipeline_with(config: &DeviceConfig, panel: SimPanel) -> Pipeline<SimPanel, SramPool> {
    Pipeline::from_config(panel, SramPool::from_config(&config.pipeline), config)
}

/// Frame whose pixel value is its column index
pub fn column_ramp(width: usize, height: usize) -> Frame {
    let pixels = (0..height)
        .flat_map(|_| (0..width).map(|x| x as u16))
        .collect();
    Frame::new(width, height, pixels)
}

/// Frame whose pixel value is its row index
pub fn row_ramp(width: usize, height: usize) -> Frame {
    let pixels = (0..height)
        .flat_map(|y| std::iter::repeat(y as u16).take(width))
        .collect();
    Frame::new(width, height, pixels)
}

pub const SAMPLE_CONFIG: &str = r#"
display:
  controller: ST7735S
  width: 96
  height: 64
  x_offset: 2
  y_offset: 1
bus:
  queue_depth: 3
pipeline:
  transfer_timeout_ms: 25
filters:
  vignette_strength_q8: 200
preview_chain:
  - sepia
  - vignette
"#;
