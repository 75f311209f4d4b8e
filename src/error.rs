use thiserror::Error;

/// Failure reported by a [`crate::transport::DisplayBus`] implementation.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BusError {
    #[error("Bus configuration rejected")]
    Configure,

    #[error("Transfer queue full (depth {depth})")]
    QueueFull { depth: usize },

    #[error("No transfer in flight")]
    Idle,

    #[error("Transfer did not complete within {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    #[error("Transfer failed")]
    Transfer,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    #[error("Display bus init failed: {0}")]
    Init(BusError),

    #[error("Transport not initialized")]
    NotInitialized,

    #[error("Transfer timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    #[error("Window coordinate {coord} with panel offset {offset} exceeds the address range")]
    WindowOutOfRange { coord: u16, offset: u16 },

    #[error("Bus error: {0}")]
    Bus(#[from] BusError),
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ScanlineError {
    #[error("Destination width must be non-zero")]
    ZeroWidth,

    #[error("Upscaling not supported: destination {dst_width} wider than source {src_width}")]
    Upscale { src_width: usize, dst_width: usize },

    #[error("Destination width {dst_width} exceeds buffer capacity {capacity}")]
    BufferTooSmall { dst_width: usize, capacity: usize },

    #[error("Destination height {dst_height} must be between 1 and source height {src_height}")]
    Height { src_height: usize, dst_height: usize },
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PipelineError {
    #[error("Out of fast memory: {requested} bytes requested, {available} available")]
    OutOfFastMemory { requested: usize, available: usize },

    #[error("Pipeline not initialized")]
    NotInitialized,

    #[error("Invalid frame: {width}x{height} needs {expected} pixels, buffer has {actual}")]
    InvalidFrame {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Viewfinder frame {width}x{height} exceeds display size {max_width}x{max_height}")]
    OversizedViewfinderFrame {
        width: usize,
        height: usize,
        max_width: usize,
        max_height: usize,
    },

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Scanline error: {0}")]
    Scanline(#[from] ScanlineError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("PNG decode error: {0}")]
    PngDecode(String),

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("Unsupported PNG layout: {0}")]
    Unsupported(String),

    #[error("Raw frame is {actual} bytes, {width}x{height} RGB565 needs {expected}")]
    RawSize {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bus_error_timeout() {
        let error = BusError::Timeout { timeout_ms: 100 };
        assert_eq!(error.to_string(), "Transfer did not complete within 100 ms");
    }

    #[test]
    fn test_bus_error_queue_full() {
        let error = BusError::QueueFull { depth: 7 };
        assert_eq!(error.to_string(), "Transfer queue full (depth 7)");
    }

    #[test]
    fn test_transport_error_init() {
        let error = TransportError::Init(BusError::Configure);
        assert_eq!(
            error.to_string(),
            "Display bus init failed: Bus configuration rejected"
        );
    }

    #[test]
    fn test_transport_error_timeout() {
        let error = TransportError::Timeout { timeout_ms: 50 };
        assert_eq!(error.to_string(), "Transfer timed out after 50 ms");
    }

    #[test]
    fn test_transport_error_window_out_of_range() {
        let error = TransportError::WindowOutOfRange {
            coord: 159,
            offset: 65500,
        };
        assert_eq!(
            error.to_string(),
            "Window coordinate 159 with panel offset 65500 exceeds the address range"
        );
    }

    #[test]
    fn test_scanline_error_upscale() {
        let error = ScanlineError::Upscale {
            src_width: 80,
            dst_width: 160,
        };
        assert_eq!(
            error.to_string(),
            "Upscaling not supported: destination 160 wider than source 80"
        );
    }

    #[test]
    fn test_scanline_error_buffer_too_small() {
        let error = ScanlineError::BufferTooSmall {
            dst_width: 200,
            capacity: 160,
        };
        assert_eq!(
            error.to_string(),
            "Destination width 200 exceeds buffer capacity 160"
        );
    }

    #[test]
    fn test_pipeline_error_oversized_viewfinder_frame() {
        let error = PipelineError::OversizedViewfinderFrame {
            width: 1600,
            height: 1200,
            max_width: 160,
            max_height: 128,
        };
        assert_eq!(
            error.to_string(),
            "Viewfinder frame 1600x1200 exceeds display size 160x128"
        );
    }

    #[test]
    fn test_image_error_raw_size() {
        let error = ImageError::RawSize {
            width: 3,
            height: 2,
            expected: 12,
            actual: 10,
        };
        assert_eq!(error.to_string(), "Raw frame is 10 bytes, 3x2 RGB565 needs 12");
    }

    #[test]
    fn test_pipeline_error_out_of_fast_memory() {
        let error = PipelineError::OutOfFastMemory {
            requested: 320,
            available: 100,
        };
        assert_eq!(
            error.to_string(),
            "Out of fast memory: 320 bytes requested, 100 available"
        );
    }

    #[test]
    fn test_pipeline_error_invalid_frame() {
        let error = PipelineError::InvalidFrame {
            width: 4,
            height: 4,
            expected: 16,
            actual: 10,
        };
        assert_eq!(
            error.to_string(),
            "Invalid frame: 4x4 needs 16 pixels, buffer has 10"
        );
    }

    #[test]
    fn test_pipeline_error_from_transport() {
        let error: PipelineError = TransportError::Timeout { timeout_ms: 5 }.into();
        assert!(matches!(
            error,
            PipelineError::Transport(TransportError::Timeout { timeout_ms: 5 })
        ));
        assert_eq!(
            error.to_string(),
            "Transport error: Transfer timed out after 5 ms"
        );
    }

    #[test]
    fn test_pipeline_error_from_scanline() {
        let error: PipelineError = ScanlineError::ZeroWidth.into();
        assert_eq!(
            error.to_string(),
            "Scanline error: Destination width must be non-zero"
        );
    }

    #[test]
    fn test_transport_error_from_bus() {
        let error: TransportError = BusError::Transfer.into();
        assert_eq!(error.to_string(), "Bus error: Transfer failed");
    }

    #[test]
    fn test_config_error_invalid() {
        let error = ConfigError::Invalid("display width is zero".to_string());
        assert_eq!(error.to_string(), "Invalid config: display width is zero");
    }
}
