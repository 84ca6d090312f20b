use std::borrow::Cow;
use std::f64::consts::PI;

use crate::audio::Waveform;
use crate::error::WellnessError;

/// Overlapping fixed-length windows over a waveform
///
/// Frame `i` covers samples `[i * hop_len, i * hop_len + frame_len)` of the
/// (zero-padded if needed) source. Trailing samples that do not fill a whole
/// frame are not covered.
#[derive(Debug, Clone)]
pub struct FrameSet {
    data: Vec<f32>,
    frame_len: usize,
    hop_len: usize,
}

impl FrameSet {
    /// Split a waveform into frames, zero-padding it to at least one frame
    pub fn frame(waveform: &Waveform, frame_len: usize, hop_len: usize) -> Result<Self, WellnessError> {
        if hop_len == 0 || frame_len < hop_len {
            return Err(WellnessError::InvalidConfig(format!(
                "frame length ({}) must be >= hop length ({}) > 0",
                frame_len, hop_len
            )));
        }

        let samples: Cow<'_, [f32]> = if waveform.samples.len() < frame_len {
            let mut padded = waveform.samples.clone();
            padded.resize(frame_len, 0.0);
            Cow::Owned(padded)
        } else {
            Cow::Borrowed(waveform.samples.as_slice())
        };

        let count = 1 + (samples.len() - frame_len) / hop_len;
        let mut data = Vec::with_capacity(count * frame_len);
        for i in 0..count {
            let start = i * hop_len;
            data.extend_from_slice(&samples[start..start + frame_len]);
        }

        Ok(Self {
            data,
            frame_len,
            hop_len,
        })
    }

    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    pub fn hop_len(&self) -> usize {
        self.hop_len
    }

    pub fn len(&self) -> usize {
        self.data.len() / self.frame_len
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&[f32]> {
        let start = index.checked_mul(self.frame_len)?;
        self.data.get(start..start + self.frame_len)
    }

    pub fn iter(&self) -> impl Iterator<Item = &[f32]> {
        self.data.chunks_exact(self.frame_len)
    }

    /// Multiply every frame by the same window, leaving frame boundaries intact
    pub fn apply_window(&mut self, window: &[f32]) {
        debug_assert_eq!(window.len(), self.frame_len);
        for frame in self.data.chunks_exact_mut(self.frame_len) {
            for (sample, w) in frame.iter_mut().zip(window) {
                *sample *= w;
            }
        }
    }
}

/// Symmetric Hann window, `0.5 - 0.5 cos(2πn / (N - 1))`
pub fn hann_window(len: usize) -> Vec<f32> {
    match len {
        0 => Vec::new(),
        1 => vec![1.0],
        _ => {
            let denom = (len - 1) as f64;
            (0..len)
                .map(|n| (0.5 - 0.5 * (2.0 * PI * n as f64 / denom).cos()) as f32)
                .collect()
        }
    }
}
