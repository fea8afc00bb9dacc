use std::fmt;
use std::path::PathBuf;

pub use crate::audio::{SampleBuffer, SampleId};

// Where a pad's sound comes from. Bundled paths are relative to the asset root.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SoundSource {
    Bundled(PathBuf),
    Remote(String),
}

impl fmt::Display for SoundSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SoundSource::Bundled(path) => write!(f, "{}", path.display()),
            SoundSource::Remote(url) => f.write_str(url),
        }
    }
}

#[derive(Clone, Debug)]
pub enum AudioCommand {
    // The engine can't load files (interrupts thread), so buffers are decoded
    // beforehand (see sample_loader.rs) and handed over already resampled
    Register { id: SampleId, buffer: SampleBuffer },

    // Everything after registration is addressed by the sample id
    Replay(SampleId),
    Halt(SampleId),
    SetVolume { id: SampleId, volume: f32 },
    Release(SampleId),
}
