// The presenter: owns the pad list and load progress, turns taps into plays.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::pipeline::catalog::{default_pads, Pad, PadUpdate};
use crate::pipeline::preload::LoadProgress;
use crate::pipeline::store::DrumStore;
use crate::shared::{DisplayState, InputEvent, PadAction, PadView, PRESS_FLASH_SECS};

const FULL_VOLUME: f32 = 1.0;

pub struct Middle {
    pub store: DrumStore,
    progress: Rc<RefCell<LoadProgress>>, // shared with the preload task
    flash: HashMap<String, f64>, // pad id -> seconds of highlight left
    selected: Option<String>, // last tapped pad, what the volume keys act on
}

impl Middle {
    pub fn new(store: DrumStore) -> Self {
        Self {
            store,
            progress: Rc::new(RefCell::new(LoadProgress::default())),
            flash: HashMap::new(),
            selected: None,
        }
    }

    pub fn progress(&self) -> Rc<RefCell<LoadProgress>> {
        self.progress.clone()
    }

    // First activation installs the catalog and hands back the pads to
    // preload. If pads are already there, nothing gets reloaded.
    pub fn activate(&mut self) -> Option<Vec<Pad>> {
        if self.store.is_empty() {
            let pads = default_pads();
            self.store.set_pads(pads.clone());
            *self.progress.borrow_mut() = LoadProgress::started(pads.len());
            Some(pads)
        } else {
            let ids = self.store.pads().iter().map(|p| p.id.as_str());
            *self.progress.borrow_mut() = LoadProgress::complete(ids);
            None
        }
    }

    // all-or-nothing: no pad takes taps until the whole preload is done
    pub fn taps_enabled(&self) -> bool {
        !self.progress.borrow().is_loading()
    }

    pub fn handle_input(&mut self, event: InputEvent) -> Vec<PadAction> {
        if event == InputEvent::Quit || !self.taps_enabled() {
            return vec![];
        }
        match event {
            InputEvent::Tap(index) => {
                let Some(pad) = self.store.pads().get(index) else {
                    return vec![];
                };
                // pads whose load failed still get a play; the registry no-ops it
                let id = pad.id.clone();
                self.flash.insert(id.clone(), PRESS_FLASH_SECS);
                self.selected = Some(id.clone());
                vec![PadAction::Play(id)]
            }
            InputEvent::StopAll => self
                .store
                .pads()
                .iter()
                .map(|p| PadAction::Stop(p.id.clone()))
                .collect(),
            InputEvent::NudgeVolume(delta) => {
                let Some(pad) = self.selected.as_deref().and_then(|id| self.store.get(id)) else {
                    return vec![];
                };
                let id = pad.id.clone();
                let volume = (pad.volume.unwrap_or(FULL_VOLUME) + delta).clamp(0.0, FULL_VOLUME);
                self.store.update_pad(&id, PadUpdate { volume: Some(volume), ..PadUpdate::default() });
                vec![PadAction::SetVolume(id, volume)]
            }
            InputEvent::Quit => vec![],
        }
    }

    pub fn tick(&mut self, elapsed: f64) {
        self.flash.retain(|_, left| {
            *left -= elapsed;
            *left > 0.0
        });
    }

    pub fn display_state(&self) -> DisplayState {
        let progress = self.progress.borrow();
        DisplayState {
            pads: self
                .store
                .pads()
                .iter()
                .map(|pad| PadView {
                    label: pad.label.clone(),
                    color: pad.color.clone(),
                    loading: !progress.is_settled(&pad.id),
                    pressed: self.flash.contains_key(&pad.id),
                })
                .collect(),
            loading_percent: progress.is_loading().then(|| progress.percent()),
            status: self.status(),
        }
    }

    fn status(&self) -> String {
        match self.selected.as_deref().and_then(|id| self.store.get(id)) {
            Some(pad) => {
                let volume = pad.volume.unwrap_or(FULL_VOLUME);
                format!("{} {:.0}%", pad.label, volume * 100.0)
            }
            None => String::new(),
        }
    }
}
