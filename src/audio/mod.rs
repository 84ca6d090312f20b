pub mod decode;
pub mod file;
pub mod waveform;

pub use decode::{AudioDecoder, DecodeStrategy, FfmpegDecoder, FfmpegInput, SymphoniaDecoder, WavDecoder};
pub use file::AudioFile;
pub use waveform::Waveform;
