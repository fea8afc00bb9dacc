use std::io::Cursor;
use std::path::Path;

use crate::audio::{AudioError, SampleBuffer};
use crate::audio_api::SoundSource;

// Fetch and decode a pad's sound, ready to hand to the engine. Decoding runs
// on the blocking pool so a batch of preloads actually overlaps.
pub async fn load(source: &SoundSource, asset_root: &Path, target_rate: u32) -> Result<SampleBuffer, AudioError> {
    match source {
        SoundSource::Bundled(path) => {
            let path = asset_root.join(path);
            tokio::task::spawn_blocking(move || SampleBuffer::open_wav(&path, target_rate)).await?
        }
        SoundSource::Remote(url) => {
            let bytes = reqwest::get(url.as_str())
                .await?
                .error_for_status()?
                .bytes()
                .await?;
            tokio::task::spawn_blocking(move || SampleBuffer::read_wav(Cursor::new(bytes), target_rate)).await?
        }
    }
}
