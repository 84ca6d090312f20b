use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use super::decode::AudioDecoder;
use super::waveform::Waveform;

/// An audio recording read from disk and decoded to mono
pub struct AudioFile {
    pub path: String,
    pub duration_seconds: f64,
    pub sample_rate: u32,
    pub waveform: Waveform,
}

impl AudioFile {
    /// Read a file and decode it through the fallback chain, using its name as the format hint
    pub fn open(path: impl AsRef<Path>, decoder: &AudioDecoder) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening audio file: {}", path.display());

        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read audio file: {}", path.display()))?;
        let filename = path.file_name().map(|name| name.to_string_lossy().to_string());

        let waveform = decoder
            .decode(&bytes, filename.as_deref())
            .context("Failed to decode audio file")?;

        info!(
            "Audio file loaded: {:.1}s, {}Hz, {} samples",
            waveform.duration_seconds(),
            waveform.sample_rate,
            waveform.len()
        );

        Ok(Self {
            path: path.display().to_string(),
            duration_seconds: waveform.duration_seconds(),
            sample_rate: waveform.sample_rate,
            waveform,
        })
    }
}
