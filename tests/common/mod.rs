// Shared helpers for integration tests

#![allow(dead_code)]

use std::f64::consts::PI;
use std::io::Cursor;
use std::path::Path;

use vocal_wellness::config::{AudioConfig, Config, HistoryConfig};
use vocal_wellness::WellnessPipeline;

/// Decoder binary that never exists, so ffmpeg stages fail deterministically
pub const MISSING_FFMPEG: &str = "/nonexistent/vocal-wellness-test/ffmpeg";

pub fn test_config(history_path: &Path) -> Config {
    Config {
        audio: AudioConfig {
            target_sample_rate: 16000,
            ffmpeg_path: MISSING_FFMPEG.to_string(),
        },
        history: HistoryConfig {
            path: history_path.to_path_buf(),
            capacity: 100,
        },
        ..Default::default()
    }
}

pub fn test_pipeline(history_path: &Path) -> WellnessPipeline {
    WellnessPipeline::from_config(&test_config(history_path)).expect("valid test config")
}

pub fn sine_samples(freq: f64, amplitude: f64, sample_rate: u32, len: usize) -> Vec<f32> {
    (0..len)
        .map(|n| (amplitude * (2.0 * PI * freq * n as f64 / sample_rate as f64).sin()) as f32)
        .collect()
}

/// Encode interleaved 16-bit samples as an in-memory WAV file
pub fn wav_bytes_i16(samples: &[i16], channels: u16, sample_rate: u32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).expect("wav writer");
        for &sample in samples {
            writer.write_sample(sample).expect("write sample");
        }
        writer.finalize().expect("finalize wav");
    }
    cursor.into_inner()
}

/// Encode mono 24-bit samples as an in-memory WAV file
pub fn wav_bytes_i24(samples: &[i32], sample_rate: u32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 24,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).expect("wav writer");
        for &sample in samples {
            writer.write_sample(sample).expect("write sample");
        }
        writer.finalize().expect("finalize wav");
    }
    cursor.into_inner()
}
