pub mod config;

pub use config::{BusConfig, DeviceConfig, DisplayConfig, PipelineConfig, SensorConfig};
