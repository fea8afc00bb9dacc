// drumpad: a grid of pads, each bound to a short sample, preloaded at startup
// and replayed from the start on every tap. audio::SoundRegistry is the core;
// tui and middle are presentation around it.

pub mod audio;
pub mod audio_api;
pub mod loader;
pub mod middle;
pub mod pipeline;
pub mod shared;
pub mod tui;
