// Types the TUI and the middle layer pass back and forth.
//
// Pad keys (grid is 3 wide, read left to right, top to bottom):
//   1 2 3
//   q w e
//   a s d
//   z x c
//   v b n
// A left click on a pad works too.
//   Space         //  stop every pad
//   [ / ]         //  volume of the last tapped pad, -/+ 10%
//   Esc           //  quit
//
// The TUI only turns keys/clicks into InputEvents and draws whatever
// DisplayState it is given. The middle layer decides what a tap means.

pub const NUM_COLUMNS: usize = 3;

// how long a tapped pad stays highlighted
pub const PRESS_FLASH_SECS: f64 = 0.12;

pub const VOLUME_STEP: f32 = 0.1;

#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    Tap(usize), // pad index in the store's order
    StopAll,
    NudgeVolume(f32),
    Quit,
}

// What the middle layer wants done after an input
#[derive(Clone, Debug, PartialEq)]
pub enum PadAction {
    Play(String),
    Stop(String),
    SetVolume(String, f32),
}

#[derive(Clone, Debug)]
pub struct DisplayState {
    pub pads: Vec<PadView>,
    pub loading_percent: Option<u8>, // Some while the preload is in flight
    pub status: String, // last tapped pad and its volume
}

#[derive(Clone, Debug)]
pub struct PadView {
    pub label: String,
    pub color: String,
    pub loading: bool, // load not settled yet
    pub pressed: bool,
}
