use serde::Serialize;

/// 16-bit full-scale value used to normalize PCM samples
pub const I16_FULL_SCALE: f32 = 32768.0;

/// Mono audio samples in [-1, 1] at a known sample rate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Waveform {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl Waveform {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Normalize mono 16-bit PCM into floats
    pub fn from_i16(samples: &[i16], sample_rate: u32) -> Self {
        Self::new(
            samples.iter().map(|&s| s as f32 / I16_FULL_SCALE).collect(),
            sample_rate,
        )
    }

    /// Average interleaved 16-bit channels into mono, then normalize
    pub fn from_interleaved_i16(samples: &[i16], channels: usize, sample_rate: u32) -> Self {
        if channels <= 1 {
            return Self::from_i16(samples, sample_rate);
        }

        let mono: Vec<i16> = samples
            .chunks_exact(channels)
            .map(|frame| {
                let sum: i32 = frame.iter().map(|&s| s as i32).sum();
                (sum / channels as i32) as i16
            })
            .collect();

        Self::from_i16(&mono, sample_rate)
    }

    /// Little-endian `s16le` byte stream, as produced by the external decoder
    pub fn from_s16le_bytes(bytes: &[u8], sample_rate: u32) -> Self {
        let samples: Vec<i16> = bytes
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        Self::from_i16(&samples, sample_rate)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}
