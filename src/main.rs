use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pixel_filters::{Filter, FilterChain, PixelFilter, MAX_FILTERS};
use viewfinder::models::DeviceConfig;
use viewfinder::pipeline::{self, FilterMode, FilterSelector, Pipeline, PipelineStats};
use viewfinder::sim::{PatternSensor, SimPanel, SramPool};

#[derive(Parser)]
#[command(name = "viewfinder")]
#[command(about = "Realtime scanline camera preview for small SPI panels")]
struct Cli {
    /// Device configuration file (defaults to $CONFIG_FILE)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Drive the pipeline against the simulated sensor and panel
    Run {
        /// Loop iterations to run
        #[arg(short = 'n', long, default_value_t = 30)]
        frames: u64,

        /// "preview", "none", or a single filter name (e.g. "sepia")
        #[arg(short, long, default_value = "preview")]
        filter: FilterSelector,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,

        /// Save the final panel contents as PNG
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Save the final panel contents as raw RGB565
        #[arg(long)]
        raw: Option<PathBuf>,
    },
    /// Apply full-frame filters to a PNG file
    Stylize {
        /// Input PNG
        input: PathBuf,

        /// Output PNG
        output: PathBuf,

        /// Filters to apply in order, comma-separated (e.g. "blur,vignette")
        #[arg(short, long, value_delimiter = ',', required = true)]
        filter: Vec<String>,

        /// "capture" keeps full resolution; "viewfinder" first shrinks the
        /// image to the display size
        #[arg(short, long, default_value = "capture")]
        mode: FilterMode,
    },
}

#[derive(Serialize)]
struct RunReport {
    filter: String,
    #[serde(flatten)]
    stats: PipelineStats,
    iterations: u64,
    /// False when a transport fault ended the run early
    available: bool,
    elapsed_ms: u128,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "viewfinder=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let config_path = cli
        .config
        .or_else(|| std::env::var("CONFIG_FILE").ok().map(PathBuf::from));
    let config = match &config_path {
        Some(path) => DeviceConfig::load_from_path(path),
        None => DeviceConfig::default(),
    };

    match cli.command {
        Some(Commands::Run {
            frames,
            filter,
            json,
            output,
            raw,
        }) => run_command(&config, frames, filter, json, output.as_deref(), raw.as_deref()),
        Some(Commands::Stylize {
            input,
            output,
            filter,
            mode,
        }) => stylize_command(&config, &input, &output, &filter, mode),
        None => {
            status_command(&config, config_path.as_deref());
            Ok(())
        }
    }
}

/// Run the frame loop on the host simulation and report counters
fn run_command(
    config: &DeviceConfig,
    frames: u64,
    selector: FilterSelector,
    json: bool,
    output: Option<&Path>,
    raw: Option<&Path>,
) -> anyhow::Result<()> {
    config.validate()?;

    let mut sensor = PatternSensor::from_config(&config.sensor);
    let mut pipeline = Pipeline::from_config(
        SimPanel::from_display(&config.display),
        SramPool::from_config(&config.pipeline),
        config,
    );
    pipeline.init()?;

    let started = Instant::now();
    let iterations = pipeline.run(&mut sensor, selector, frames)?;
    let elapsed = started.elapsed();
    let available = pipeline.is_available();

    if let Some(path) = output {
        pipeline.transport().bus().write_png(path)?;
        println!("Wrote panel contents to {}", path.display());
    }
    if let Some(path) = raw {
        let screen = pipeline.transport().bus().screen_frame();
        viewfinder::image::write_raw(path, &screen)?;
        println!("Wrote {} raw bytes to {}", screen.len_bytes(), path.display());
    }
    let stats = pipeline.stats();
    pipeline.deinit();

    if json {
        let report = RunReport {
            filter: selector.to_string(),
            stats,
            iterations,
            available,
            elapsed_ms: elapsed.as_millis(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Filter:              {selector}");
        println!("Iterations:          {iterations}/{frames}");
        println!("Frames processed:    {}", stats.frames_processed);
        println!("Transfers completed: {}", stats.transfers_completed);
        println!("Frames skipped:      {}", stats.frames_skipped);
        println!("Transport faults:    {}", stats.faults);
        println!("Pipeline available:  {}", if available { "yes" } else { "no (faulted)" });
        println!("Elapsed:             {elapsed:.2?}");
    }
    if available {
        Ok(())
    } else {
        anyhow::bail!("Pipeline degraded after {} transport fault(s)", stats.faults)
    }
}

/// Filter a PNG file with the reference kernels
fn stylize_command(
    config: &DeviceConfig,
    input: &Path,
    output: &Path,
    names: &[String],
    mode: FilterMode,
) -> anyhow::Result<()> {
    let (max_width, max_height) = (config.display.width, config.display.height);
    let mut frame = viewfinder::image::read_png(input)?;
    if mode == FilterMode::Viewfinder {
        let (width, height) = (frame.width().min(max_width), frame.height().min(max_height));
        if (width, height) != (frame.width(), frame.height()) {
            frame = pipeline::downscale_frame(&frame, width, height)?;
        }
    }

    let mut chain: FilterChain<Filter> = FilterChain::new();
    for name in names {
        if !chain.add(Filter::by_name(name, &config.filters)?) {
            anyhow::bail!("At most {MAX_FILTERS} filters can be chained");
        }
    }
    pipeline::apply_chain(&mut frame, &mut chain, mode, max_width, max_height)?;
    for (filter, _) in chain.iter() {
        tracing::info!(filter = filter.name(), %mode, "Applied filter");
    }
    viewfinder::image::write_png(output, &frame)?;
    println!(
        "Stylized {} -> {} ({}x{})",
        input.display(),
        output.display(),
        frame.width(),
        frame.height()
    );
    Ok(())
}

/// Print the effective configuration
fn status_command(config: &DeviceConfig, path: Option<&Path>) {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    println!("Viewfinder v{VERSION}\n");
    println!(
        "Config: {}",
        path.map(|p| p.display().to_string())
            .unwrap_or_else(|| "(defaults, CONFIG_FILE not set)".to_string())
    );

    let d = &config.display;
    println!("\nDisplay:");
    println!("  {} {}x{} (offset {},{})", d.controller, d.width, d.height, d.x_offset, d.y_offset);

    let b = &config.bus;
    println!("\nBus:");
    println!("  clock      {} Hz", b.clock_hz);
    println!(
        "  pins       MOSI {} SCLK {} CS {} DC {}",
        b.mosi_pin, b.sclk_pin, b.cs_pin, b.dc_pin
    );
    println!("  queue      {}", b.queue_depth);

    let p = &config.pipeline;
    println!("\nPipeline:");
    println!("  timeout    {} ms", p.transfer_timeout_ms);
    println!(
        "  fast mem   {} of {} bytes for scanline buffers",
        config.scanline_buffer_bytes(),
        p.fast_memory_bytes
    );

    let chain: Vec<String> = config.preview_chain.iter().map(|k| k.to_string()).collect();
    println!("\nPreview chain:");
    if chain.is_empty() {
        println!("  (empty)");
    } else {
        println!("  {}", chain.join(" -> "));
    }

    if let Err(e) = config.validate() {
        println!("\nWarning: {e}");
    }
}
