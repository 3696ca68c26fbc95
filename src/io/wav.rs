//! WAV decoding and encoding through `hound`.

use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::core::types::{AudioBuffer, Sample};
use crate::error::StretchError;

/// Sample encoding used when writing WAV data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WavFormat {
    /// 16-bit signed PCM.
    #[default]
    Pcm16,
    /// 24-bit signed PCM.
    Pcm24,
    /// 32-bit IEEE float.
    Float32,
}

impl WavFormat {
    fn spec(self, buffer: &AudioBuffer) -> WavSpec {
        let (bits_per_sample, sample_format) = match self {
            WavFormat::Pcm16 => (16, SampleFormat::Int),
            WavFormat::Pcm24 => (24, SampleFormat::Int),
            WavFormat::Float32 => (32, SampleFormat::Float),
        };
        WavSpec {
            channels: buffer.channels,
            sample_rate: buffer.sample_rate,
            bits_per_sample,
            sample_format,
        }
    }
}

/// Reads a WAV file from a byte slice.
///
/// Integer formats are normalized to `[-1, 1)`.
pub fn read_wav(data: &[u8]) -> Result<AudioBuffer, StretchError> {
    decode(WavReader::new(Cursor::new(data))?)
}

/// Reads a WAV file from disk.
pub fn read_wav_file(path: impl AsRef<Path>) -> Result<AudioBuffer, StretchError> {
    decode(WavReader::open(path)?)
}

fn decode<R: Read>(reader: WavReader<R>) -> Result<AudioBuffer, StretchError> {
    let spec = reader.spec();
    let data: Vec<Sample> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, 32) => reader.into_samples::<f32>().collect::<Result<Vec<_>, _>>()?,
        (SampleFormat::Int, bits @ 1..=32) => {
            let scale = 1.0 / (1u64 << (bits - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<Result<Vec<_>, _>>()?
        }
        (format, bits) => {
            return Err(StretchError::InvalidFormat(format!(
                "unsupported WAV sample format: {:?} {}-bit",
                format, bits
            )))
        }
    };
    tracing::debug!(
        sample_rate = spec.sample_rate,
        channels = spec.channels,
        bits = spec.bits_per_sample,
        samples = data.len(),
        "decoded WAV"
    );
    Ok(AudioBuffer::new(data, spec.sample_rate, spec.channels))
}

fn encode<W: Write + Seek>(
    writer: W,
    buffer: &AudioBuffer,
    format: WavFormat,
) -> Result<(), StretchError> {
    let mut writer = WavWriter::new(writer, format.spec(buffer))?;
    match format {
        WavFormat::Pcm16 => {
            for &sample in &buffer.data {
                writer.write_sample((sample.clamp(-1.0, 1.0) * 32767.0) as i16)?;
            }
        }
        WavFormat::Pcm24 => {
            for &sample in &buffer.data {
                writer.write_sample((sample.clamp(-1.0, 1.0) * 8_388_607.0) as i32)?;
            }
        }
        WavFormat::Float32 => {
            for &sample in &buffer.data {
                writer.write_sample(sample)?;
            }
        }
    }
    writer.finalize()?;
    Ok(())
}

/// Encodes an audio buffer as WAV bytes.
pub fn write_wav(buffer: &AudioBuffer, format: WavFormat) -> Result<Vec<u8>, StretchError> {
    let mut cursor = Cursor::new(Vec::new());
    encode(&mut cursor, buffer, format)?;
    Ok(cursor.into_inner())
}

/// Encodes an audio buffer as a WAV file (16-bit PCM).
pub fn write_wav_16bit(buffer: &AudioBuffer) -> Result<Vec<u8>, StretchError> {
    write_wav(buffer, WavFormat::Pcm16)
}

/// Encodes an audio buffer as a WAV file (24-bit PCM).
pub fn write_wav_24bit(buffer: &AudioBuffer) -> Result<Vec<u8>, StretchError> {
    write_wav(buffer, WavFormat::Pcm24)
}

/// Encodes an audio buffer as a WAV file (32-bit float).
pub fn write_wav_float(buffer: &AudioBuffer) -> Result<Vec<u8>, StretchError> {
    write_wav(buffer, WavFormat::Float32)
}

/// Writes a WAV file to disk.
pub fn write_wav_file(
    path: impl AsRef<Path>,
    buffer: &AudioBuffer,
    format: WavFormat,
) -> Result<(), StretchError> {
    let file = std::io::BufWriter::new(std::fs::File::create(path)?);
    encode(file, buffer, format)
}
