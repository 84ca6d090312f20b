//! Audio ingest: raw bytes of a common container format to a mono waveform
//!
//! Decoding walks an ordered chain of [`DecodeStrategy`] stages and returns the
//! first success:
//! 1. strict 16-bit PCM WAV (hound)
//! 2. ffmpeg reading from stdin
//! 3. ffmpeg reading a temporary file (containers that need random access)
//! 4. symphonia, hinted by the filename extension
//!
//! A failing stage never aborts the chain; its diagnostic is collected into the
//! [`DecodeError`] returned when every stage fails.

use anyhow::{bail, Context, Result};
use hound::{SampleFormat, WavReader};
use std::io::{Cursor, Write};
use std::process::{Command, Stdio};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, info, warn};

use super::waveform::Waveform;
use crate::config::AudioConfig;
use crate::error::{DecodeError, StageFailure};

/// One attempt in the decoder fallback chain
pub trait DecodeStrategy: Send + Sync {
    /// Stage name used in diagnostics
    fn name(&self) -> &str;

    fn decode(&self, bytes: &[u8], filename: Option<&str>) -> Result<Waveform>;
}

/// Lowercased extension of a filename hint, if it has one
pub fn extension_hint(filename: Option<&str>) -> Option<String> {
    let name = filename?;
    let (_, ext) = name.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

// ============================================================================
// Stage 1: WAV
// ============================================================================

/// Strict PCM WAV parsing: 16-bit integer samples, mono or stereo
pub struct WavDecoder;

impl DecodeStrategy for WavDecoder {
    fn name(&self) -> &str {
        "wav"
    }

    fn decode(&self, bytes: &[u8], _filename: Option<&str>) -> Result<Waveform> {
        let reader = WavReader::new(Cursor::new(bytes)).context("Not a WAV container")?;
        let spec = reader.spec();

        if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
            bail!(
                "Only 16-bit PCM WAV is supported (got {}-bit {:?})",
                spec.bits_per_sample,
                spec.sample_format
            );
        }
        if spec.channels == 0 || spec.channels > 2 {
            bail!("Unsupported WAV channel count: {}", spec.channels);
        }

        let samples: Vec<i16> = reader
            .into_samples::<i16>()
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read WAV samples")?;

        Ok(Waveform::from_interleaved_i16(
            &samples,
            spec.channels as usize,
            spec.sample_rate,
        ))
    }
}

// ============================================================================
// Stages 2 and 3: ffmpeg
// ============================================================================

/// Where ffmpeg reads its input from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfmpegInput {
    /// Raw bytes piped through stdin
    Pipe,
    /// Bytes materialized as a temporary file first
    TempFile,
}

/// External decoder producing mono `s16le` at a fixed rate
pub struct FfmpegDecoder {
    binary: String,
    target_sample_rate: u32,
    input: FfmpegInput,
}

impl FfmpegDecoder {
    pub fn new(binary: impl Into<String>, target_sample_rate: u32, input: FfmpegInput) -> Self {
        Self {
            binary: binary.into(),
            target_sample_rate,
            input,
        }
    }

    fn command(&self, source: &str) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args(["-hide_banner", "-loglevel", "error", "-i", source])
            .args(["-f", "s16le", "-acodec", "pcm_s16le", "-ac", "1"])
            .arg("-ar")
            .arg(self.target_sample_rate.to_string())
            .arg("pipe:1")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }

    fn run_piped(&self, bytes: &[u8]) -> Result<std::process::Output> {
        let mut child = self
            .command("pipe:0")
            .stdin(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to launch decoder '{}'", self.binary))?;

        let mut stdin = child.stdin.take().context("Decoder stdin unavailable")?;
        let input = bytes.to_vec();

        // Feed stdin from a separate thread so a full stdout pipe cannot deadlock us
        let writer = std::thread::spawn(move || {
            // ffmpeg may close stdin early once it has rejected the input
            let _ = stdin.write_all(&input);
        });

        let output = child
            .wait_with_output()
            .context("Failed to wait for decoder")?;
        let _ = writer.join();

        Ok(output)
    }

    fn run_from_file(&self, bytes: &[u8], filename: Option<&str>) -> Result<std::process::Output> {
        let suffix = extension_hint(filename)
            .map(|ext| format!(".{}", ext))
            .unwrap_or_default();

        let mut src = tempfile::Builder::new()
            .prefix("vocal-wellness-")
            .suffix(&suffix)
            .tempfile()
            .context("Failed to create temporary audio file")?;
        src.write_all(bytes)
            .context("Failed to write temporary audio file")?;
        src.flush()?;

        let path = src.path().to_string_lossy().to_string();
        debug!("Decoding via temporary file {}", path);

        let output = self
            .command(&path)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("Failed to launch decoder '{}'", self.binary))?;

        // Temporary file is removed when `src` drops
        Ok(output)
    }
}

impl DecodeStrategy for FfmpegDecoder {
    fn name(&self) -> &str {
        match self.input {
            FfmpegInput::Pipe => "ffmpeg-pipe",
            FfmpegInput::TempFile => "ffmpeg-file",
        }
    }

    fn decode(&self, bytes: &[u8], filename: Option<&str>) -> Result<Waveform> {
        let output = match self.input {
            FfmpegInput::Pipe => self.run_piped(bytes)?,
            FfmpegInput::TempFile => self.run_from_file(bytes, filename)?,
        };

        if !output.status.success() || output.stdout.is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "Decoder exited with {} and produced {} bytes: {}",
                output.status,
                output.stdout.len(),
                stderr.trim()
            );
        }

        Ok(Waveform::from_s16le_bytes(
            &output.stdout,
            self.target_sample_rate,
        ))
    }
}

// ============================================================================
// Stage 4: symphonia
// ============================================================================

/// General container decoder driven by the filename extension
pub struct SymphoniaDecoder;

impl DecodeStrategy for SymphoniaDecoder {
    fn name(&self) -> &str {
        "symphonia"
    }

    fn decode(&self, bytes: &[u8], filename: Option<&str>) -> Result<Waveform> {
        let source = Cursor::new(bytes.to_vec());
        let mss = MediaSourceStream::new(Box::new(source), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = extension_hint(filename) {
            hint.with_extension(&ext);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .context("Unrecognized container format")?;
        let mut format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .context("No decodable audio track")?;
        let track_id = track.id;
        let sample_rate = track
            .codec_params
            .sample_rate
            .context("Audio track has no sample rate")?;

        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .context("Unsupported codec")?;

        let mut mono: Vec<i16> = Vec::new();

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break
                }
                Err(SymphoniaError::ResetRequired) => break,
                Err(e) => return Err(e).context("Failed to read packet"),
            };

            if packet.track_id() != track_id {
                continue;
            }

            match decoder.decode(&packet) {
                Ok(decoded) => {
                    let spec = *decoded.spec();
                    let channels = spec.channels.count().max(1);
                    let mut buf = SampleBuffer::<i16>::new(decoded.capacity() as u64, spec);
                    buf.copy_interleaved_ref(decoded);

                    mono.extend(buf.samples().chunks_exact(channels).map(|frame| {
                        let sum: i32 = frame.iter().map(|&s| s as i32).sum();
                        (sum / channels as i32) as i16
                    }));
                }
                Err(SymphoniaError::DecodeError(e)) => {
                    // Corrupt packet: skip it and keep going
                    warn!("Skipping undecodable packet: {}", e);
                }
                Err(e) => return Err(e).context("Decoder failure"),
            }
        }

        Ok(Waveform::from_i16(&mono, sample_rate))
    }
}

// ============================================================================
// Fallback chain
// ============================================================================

/// Ordered fallback chain of decode strategies
pub struct AudioDecoder {
    stages: Vec<Box<dyn DecodeStrategy>>,
}

impl AudioDecoder {
    /// The standard four-stage chain
    pub fn new(config: &AudioConfig) -> Self {
        Self::with_stages(vec![
            Box::new(WavDecoder),
            Box::new(FfmpegDecoder::new(
                config.ffmpeg_path.clone(),
                config.target_sample_rate,
                FfmpegInput::Pipe,
            )),
            Box::new(FfmpegDecoder::new(
                config.ffmpeg_path.clone(),
                config.target_sample_rate,
                FfmpegInput::TempFile,
            )),
            Box::new(SymphoniaDecoder),
        ])
    }

    pub fn with_stages(stages: Vec<Box<dyn DecodeStrategy>>) -> Self {
        Self { stages }
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Run the chain; the first stage to succeed wins
    pub fn decode(&self, bytes: &[u8], filename: Option<&str>) -> Result<Waveform, DecodeError> {
        let mut attempts = Vec::new();

        for stage in &self.stages {
            match stage.decode(bytes, filename) {
                Ok(wave) => {
                    info!(
                        "Decoded {} bytes via {}: {} samples at {}Hz ({:.2}s)",
                        bytes.len(),
                        stage.name(),
                        wave.len(),
                        wave.sample_rate,
                        wave.duration_seconds()
                    );
                    return Ok(wave);
                }
                Err(e) => {
                    debug!("Decode stage {} failed: {:#}", stage.name(), e);
                    attempts.push(StageFailure {
                        stage: stage.name().to_string(),
                        detail: format!("{:#}", e),
                    });
                }
            }
        }

        warn!(
            "All {} decode stages failed for {:?}",
            attempts.len(),
            filename
        );

        Err(DecodeError {
            filename: filename.map(str::to_string),
            attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_hint() {
        assert_eq!(extension_hint(Some("clip.M4A")), Some("m4a".to_string()));
        assert_eq!(extension_hint(Some("archive.tar.mp3")), Some("mp3".to_string()));
        assert_eq!(extension_hint(Some("noext")), None);
        assert_eq!(extension_hint(Some("trailing.")), None);
        assert_eq!(extension_hint(None), None);
    }

    struct Failing(&'static str);

    impl DecodeStrategy for Failing {
        fn name(&self) -> &str {
            self.0
        }

        fn decode(&self, _bytes: &[u8], _filename: Option<&str>) -> Result<Waveform> {
            bail!("{} cannot decode this", self.0)
        }
    }

    struct Fixed;

    impl DecodeStrategy for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn decode(&self, _bytes: &[u8], _filename: Option<&str>) -> Result<Waveform> {
            Ok(Waveform::new(vec![0.25; 4], 8000))
        }
    }

    #[test]
    fn test_chain_first_success_wins() {
        let decoder = AudioDecoder::with_stages(vec![
            Box::new(Failing("a")),
            Box::new(Fixed),
            Box::new(Failing("never-reached")),
        ]);

        let wave = decoder.decode(b"anything", None).unwrap();
        assert_eq!(wave.sample_rate, 8000);
        assert_eq!(wave.len(), 4);
    }

    #[test]
    fn test_chain_accumulates_diagnostics() {
        let decoder =
            AudioDecoder::with_stages(vec![Box::new(Failing("a")), Box::new(Failing("b"))]);

        let err = decoder.decode(b"junk", Some("x.bin")).unwrap_err();
        assert_eq!(err.filename.as_deref(), Some("x.bin"));
        assert_eq!(err.attempts.len(), 2);
        assert_eq!(err.attempts[0].stage, "a");
        assert!(err.attempts[1].detail.contains("b cannot decode"));
        assert!(err.to_string().contains("b cannot decode"));
    }

    #[test]
    fn test_missing_ffmpeg_is_a_stage_failure() {
        let stage = FfmpegDecoder::new("/nonexistent/ffmpeg-binary", 16000, FfmpegInput::Pipe);
        let err = stage.decode(b"junk", None).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to launch decoder"));
    }
}
