use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pvstretch::io::wav::{read_wav_file, write_wav_file, WavFormat};
use pvstretch::{
    measure_latency, stretch_buffer, OverlapGain, StretchError, StretchParams,
    DEFAULT_FRAME_SIZE, DEFAULT_HOP_SIZE,
};

/// Stretch or compress a WAV file in time without changing its pitch
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input WAV file
    input: PathBuf,

    /// Output WAV file
    output: PathBuf,

    /// Stretch ratio (2.0 = twice as long, 0.5 = half as long)
    #[arg(default_value_t = 2.0)]
    ratio: f64,

    /// Frame (FFT) size in samples
    #[arg(short = 'N', long, default_value_t = DEFAULT_FRAME_SIZE)]
    frame_size: usize,

    /// Analysis hop size in samples
    #[arg(short = 'H', long, default_value_t = DEFAULT_HOP_SIZE)]
    hop_size: usize,

    /// Overlap-add gain
    #[arg(long, value_enum, default_value_t = GainArg::Unity)]
    gain: GainArg,

    /// Output sample format
    #[arg(short, long, value_enum, default_value_t = FormatArg::Pcm16)]
    format: FormatArg,

    /// Time this many stretch runs and report mean +- std before writing
    #[arg(long, value_name = "RUNS")]
    bench: Option<usize>,

    /// Show processing parameters and timing
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GainArg {
    Unity,
    Sqrt2,
}

impl From<GainArg> for OverlapGain {
    fn from(arg: GainArg) -> Self {
        match arg {
            GainArg::Unity => OverlapGain::Unity,
            GainArg::Sqrt2 => OverlapGain::Sqrt2,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Pcm16,
    Pcm24,
    Float,
}

impl From<FormatArg> for WavFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Pcm16 => WavFormat::Pcm16,
            FormatArg::Pcm24 => WavFormat::Pcm24,
            FormatArg::Float => WavFormat::Float32,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "pvstretch=debug" } else { "pvstretch=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(&cli) {
        tracing::error!("{e}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), StretchError> {
    let buffer = read_wav_file(&cli.input)?;
    tracing::info!(
        path = %cli.input.display(),
        frames = buffer.num_frames(),
        sample_rate = buffer.sample_rate,
        channels = buffer.channels,
        "input: {:.2}s",
        buffer.duration_secs()
    );

    let params = StretchParams::new(cli.ratio)
        .with_frame_size(cli.frame_size)
        .with_hop_size(cli.hop_size)
        .with_gain(cli.gain.into());
    tracing::debug!(%params, "parameters");

    if let Some(runs) = cli.bench {
        let stats = measure_latency(runs, || stretch_buffer(&buffer, &params))?;
        println!("phase vocoder avg exec time: {stats}");
    }

    let start = std::time::Instant::now();
    let output = stretch_buffer(&buffer, &params)?;
    let elapsed = start.elapsed();

    tracing::info!(
        frames = output.num_frames(),
        "output: {:.2}s (ratio: {:.4})",
        output.duration_secs(),
        output.num_frames() as f64 / buffer.num_frames() as f64
    );
    let processing_secs = elapsed.as_secs_f64();
    tracing::debug!(
        "processing time: {:.3}s ({:.1}x realtime)",
        processing_secs,
        if processing_secs > 0.0 {
            buffer.duration_secs() / processing_secs
        } else {
            f64::INFINITY
        }
    );

    write_wav_file(&cli.output, &output, cli.format.into())?;
    tracing::info!(path = %cli.output.display(), "written");
    Ok(())
}
