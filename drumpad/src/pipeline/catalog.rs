// The pads this app ships with, and the Pad type the store holds.

use std::path::PathBuf;

use crate::audio_api::SoundSource;

pub const SOUNDS_DIR: &str = "assets/sounds";

// (id, label, color); each pad plays assets/sounds/<id>.wav
const DEFAULT_PADS: [(&str, &str, &str); 15] = [
    ("kick", "Kick", "#ff6b6b"),
    ("snare", "Snare", "#4d96ff"),
    ("hihat_closed", "Hi-Hat (Closed)", "#ffd166"),
    ("hihat_open", "Hi-Hat (Open)", "#ffd166"),
    ("tom_high", "Tom High", "#06d6a0"),
    ("tom_mid", "Tom Mid", "#06d6a0"),
    ("tom_low", "Tom Low", "#ffd166"),
    ("clap", "Clap", "#a66cff"),
    ("rimshot", "Rimshot", "#ff9f1c"),
    ("cowbell", "Cowbell", "#f15bb5"),
    ("ride_bell", "Ride Bell", "#2ec4b6"),
    ("crash", "Crash", "#2ec4b6"),
    ("shaker", "Shaker", "#00b4d8"),
    ("bongo", "Bongo", "#ffb4a2"),
    ("clave", "Clave", "#8ac926"),
];

#[derive(Clone, Debug, PartialEq)]
pub struct Pad {
    pub id: String, // unique and stable, the registry key
    pub label: String,
    pub source: SoundSource,
    pub color: String, // "#rrggbb", display only
    pub volume: Option<f32>, // applied after the sound loads, if set
}

impl Pad {
    pub fn new(id: &str, label: &str, source: SoundSource, color: &str) -> Self {
        Self {
            id: id.to_owned(),
            label: label.to_owned(),
            source,
            color: color.to_owned(),
            volume: None,
        }
    }
}

// Partial edit of a pad; fields left as None are kept
#[derive(Clone, Debug, Default)]
pub struct PadUpdate {
    pub label: Option<String>,
    pub source: Option<SoundSource>,
    pub color: Option<String>,
    pub volume: Option<f32>,
}

impl PadUpdate {
    pub fn apply(self, pad: &mut Pad) {
        if let Some(label) = self.label {
            pad.label = label;
        }
        if let Some(source) = self.source {
            pad.source = source;
        }
        if let Some(color) = self.color {
            pad.color = color;
        }
        if self.volume.is_some() {
            pad.volume = self.volume;
        }
    }
}

pub fn default_pads() -> Vec<Pad> {
    DEFAULT_PADS
        .iter()
        .map(|(id, label, color)| {
            let path = PathBuf::from(SOUNDS_DIR).join(format!("{id}.wav"));
            Pad::new(id, label, SoundSource::Bundled(path), color)
        })
        .collect()
}
