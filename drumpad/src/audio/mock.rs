// A scripted backend for tests. It never touches a device; it just records
// every call. Sources steer its behaviour by name:
//   "invalid" in the source -> create fails
//   "sticky"                -> release fails
//   "flaky"                 -> replay/halt/set_volume fail
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tokio::sync::Semaphore;

use crate::audio_api::SoundSource;

use super::backend::{AudioBackend, AudioError, AudioMode, SoundHandle};

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Configure,
    Create { handle: usize, source: String },
    Release(usize),
    Replay(usize),
    Halt(usize),
    SetVolume(usize, f32),
}

#[derive(Clone, Default)]
pub struct MockBackend {
    calls: Rc<RefCell<Vec<Call>>>,
    next_handle: Rc<Cell<usize>>,
    creating: Rc<Cell<usize>>,
    peak_creates: Rc<Cell<usize>>,
    gate: Option<Rc<Semaphore>>, // when set, each create waits for a permit
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    // creates finish only as `open_gate` lets them, in the order they started
    pub fn gated() -> Self {
        Self {
            gate: Some(Rc::new(Semaphore::new(0))),
            ..Self::default()
        }
    }

    pub fn open_gate(&self, creates: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(creates);
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    // handle number that was created for `source` most recently
    pub fn handle_for(&self, source: &str) -> Option<usize> {
        self.calls.borrow().iter().rev().find_map(|c| match c {
            Call::Create { handle, source: s } if s == source => Some(*handle),
            _ => None,
        })
    }

    // most creates that were suspended at the same time
    pub fn peak_creates(&self) -> usize {
        self.peak_creates.get()
    }

    pub fn replays_of(&self, handle: usize) -> usize {
        self.calls.borrow().iter().filter(|c| **c == Call::Replay(handle)).count()
    }

    pub fn is_released(&self, handle: usize) -> bool {
        self.calls.borrow().contains(&Call::Release(handle))
    }

    // handles created and never released (a failed release still counts as released)
    pub fn live_handles(&self) -> Vec<usize> {
        let calls = self.calls.borrow();
        calls
            .iter()
            .filter_map(|c| match c {
                Call::Create { handle, .. } if !calls.contains(&Call::Release(*handle)) => Some(*handle),
                _ => None,
            })
            .collect()
    }
}

impl AudioBackend for MockBackend {
    type Handle = MockSound;

    async fn configure(&self, mode: &AudioMode) -> Result<(), AudioError> {
        self.calls.borrow_mut().push(Call::Configure);
        if mode.allows_recording {
            return Err(AudioError::Unsupported("recording".into()));
        }
        Ok(())
    }

    async fn create(&self, source: &SoundSource) -> Result<MockSound, AudioError> {
        // suspend like a real loader would, so concurrent loads interleave
        self.creating.set(self.creating.get() + 1);
        self.peak_creates.set(self.peak_creates.get().max(self.creating.get()));
        tokio::task::yield_now().await;
        self.creating.set(self.creating.get() - 1);
        if let Some(gate) = &self.gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }

        let source = source.to_string();
        if source.contains("invalid") {
            return Err(AudioError::Device(format!("cannot open {source}")));
        }
        let handle = self.next_handle.get();
        self.next_handle.set(handle + 1);
        self.calls.borrow_mut().push(Call::Create { handle, source: source.clone() });
        Ok(MockSound {
            handle,
            sticky: source.contains("sticky"),
            flaky: source.contains("flaky"),
            calls: self.calls.clone(),
        })
    }
}

pub struct MockSound {
    handle: usize,
    sticky: bool,
    flaky: bool,
    calls: Rc<RefCell<Vec<Call>>>,
}

impl MockSound {
    fn playback(&self, call: Call) -> Result<(), AudioError> {
        self.calls.borrow_mut().push(call);
        if self.flaky {
            return Err(AudioError::Device("playback glitch".into()));
        }
        Ok(())
    }
}

impl SoundHandle for MockSound {
    async fn release(&self) -> Result<(), AudioError> {
        tokio::task::yield_now().await;
        self.calls.borrow_mut().push(Call::Release(self.handle));
        if self.sticky {
            return Err(AudioError::Device("release refused".into()));
        }
        Ok(())
    }

    async fn replay(&self) -> Result<(), AudioError> {
        self.playback(Call::Replay(self.handle))
    }

    async fn halt(&self) -> Result<(), AudioError> {
        self.playback(Call::Halt(self.handle))
    }

    async fn set_volume(&self, volume: f32) -> Result<(), AudioError> {
        self.playback(Call::SetVolume(self.handle, volume))
    }
}
