// The seam between the sound registry and whatever actually makes noise.
// A backend turns a SoundSource into a handle, and the handle is the only way
// to drive that sound afterwards. cpal in production, a scripted mock in tests.

use serde::{Deserialize, Serialize};

use crate::audio_api::SoundSource;

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("failed to decode audio: {0}")]
    Decode(#[from] hound::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to fetch sample: {0}")]
    Http(#[from] reqwest::Error),

    #[error("decoder task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("unsupported: {0}")]
    Unsupported(String),

    #[error("no room for another sound, {0} are loaded")]
    TooManySounds(usize),

    #[error("audio engine is not accepting commands")]
    EngineUnavailable,

    #[error("audio device error: {0}")]
    Device(String),
}

// process-wide playback behaviour, applied once at startup
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioMode {
    pub plays_in_silent_mode: bool, // keep playing with the silent switch on
    pub ducks_others: bool, // lower other apps while ours plays, never permanently
    pub stays_active_in_background: bool,
    pub allows_recording: bool,
}

impl Default for AudioMode {
    fn default() -> Self {
        Self {
            plays_in_silent_mode: true,
            ducks_others: true,
            stays_active_in_background: false,
            allows_recording: false,
        }
    }
}

#[allow(async_fn_in_trait)]
pub trait AudioBackend {
    type Handle: SoundHandle;

    // once per session
    async fn configure(&self, mode: &AudioMode) -> Result<(), AudioError>;

    // loaded but not playing
    async fn create(&self, source: &SoundSource) -> Result<Self::Handle, AudioError>;
}

#[allow(async_fn_in_trait)]
pub trait SoundHandle {
    // the handle is dead after this, whatever the result
    async fn release(&self) -> Result<(), AudioError>;

    // from the first frame, even if it's already playing
    async fn replay(&self) -> Result<(), AudioError>;

    async fn halt(&self) -> Result<(), AudioError>;

    async fn set_volume(&self, volume: f32) -> Result<(), AudioError>;
}
