//! CLI entry point for gpio-sampler.
//!
//! Polls one GPIO input pin at a configured frequency and dumps the sampled
//! levels to `<name>.csv`. Requires root, since the GPIO peripheral is reached
//! through a memory mapping of `/dev/mem`.
//!
//! # Usage
//!
//! ```bash
//! # 10,000 samples of pin 5 at 1 kHz on a Pi 4
//! sudo gpio-sampler -p 5 -f 1 -s 10000 -n capture -g 4
//!
//! # 3 seconds of pin 17 at 20 MHz on an overclocked Pi 4
//! sudo gpio-sampler -p 17 -f 20000 -t 3 -n burst -g 4 -a
//! ```
//!
//! Exit codes: `0` success, `-1` incomplete or ambiguous configuration, `-2`
//! overclock gate without acknowledgment, `1` permission/mapping/output
//! failure.

use std::path::Path;
use std::process;

use clap::{ArgGroup, Parser};
use tracing::{error, info};

use gpio_sampler::config::SamplingConfig;
use gpio_sampler::error::{ConfigError, SampleResult, SamplerError};
use gpio_sampler::gpio::{BoardGeneration, GpioMapping};
use gpio_sampler::logging;
use gpio_sampler::sampler::Sampler;
use gpio_sampler::sink::CsvSink;

/// Exit status for missing or conflicting configuration.
const EXIT_USAGE: i32 = -1;
/// Exit status for an unacknowledged overclock-range frequency.
const EXIT_OVERCLOCK: i32 = -2;
/// Exit status for runtime failures (privilege, mapping, output).
const EXIT_FAILURE: i32 = 1;

#[derive(Parser)]
#[command(name = "gpio-sampler")]
#[command(about = "Sample a single GPIO pin at a fixed frequency into a CSV file")]
#[command(group(ArgGroup::new("stop").required(true).multiple(false)))]
struct Cli {
    /// GPIO pin to sample (1-31)
    #[arg(short = 'p')]
    pin: u32,

    /// Sampling frequency in kHz
    #[arg(short = 'f')]
    frequency_khz: u32,

    /// Number of samples to take
    #[arg(short = 's', group = "stop")]
    sample_size: Option<u32>,

    /// Sampling duration in seconds
    #[arg(short = 't', group = "stop")]
    sample_secs: Option<u32>,

    /// Sample name; output lands in <name>.csv
    #[arg(short = 'n')]
    name: String,

    /// Board generation: 3, 4, or 5
    #[arg(short = 'g', value_parser = parse_generation)]
    generation: BoardGeneration,

    /// Acknowledge that frequencies at or above 13 MHz need an overclocked board
    #[arg(short = 'a')]
    overclock_acknowledged: bool,
}

fn parse_generation(value: &str) -> Result<BoardGeneration, String> {
    let generation: u8 = value
        .parse()
        .map_err(|_| format!("unknown board generation '{value}' (expected 3, 4, or 5)"))?;
    BoardGeneration::try_from(generation)
}

fn main() {
    logging::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            process::exit(EXIT_USAGE);
        }
    };

    if let Err(err) = run(cli) {
        error!("{err}");
        process::exit(match &err {
            SamplerError::Config(ConfigError::OverclockRequired(_)) => EXIT_OVERCLOCK,
            SamplerError::Config(_) => EXIT_USAGE,
            _ => EXIT_FAILURE,
        });
    }
}

fn run(cli: Cli) -> SampleResult<()> {
    let config = SamplingConfig {
        pin: cli.pin,
        frequency_hz: cli.frequency_khz.saturating_mul(1_000),
        sample_size: cli.sample_size.unwrap_or(0),
        sample_secs: cli.sample_secs.unwrap_or(0),
        generation: cli.generation,
        overclock_acknowledged: cli.overclock_acknowledged,
        output_name: cli.name,
    }
    .validate()?;

    info!(
        pin = config.pin,
        frequency_hz = config.frequency_hz,
        generation = %config.generation,
        "starting sampling run"
    );

    let mapping = GpioMapping::acquire(config.generation)?;
    let sampler = Sampler::new(config.pin, config.frequency_hz);
    let samples = sampler.run(&mapping, config.stop);

    let sink = CsvSink::new(Path::new("."), &config.output_name);
    sink.write(&samples)?;

    Ok(())
}
