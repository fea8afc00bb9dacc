// The pad list the UI renders. Owned by main and handed around by reference.

use super::catalog::{Pad, PadUpdate};

#[derive(Clone, Debug, Default)]
pub struct DrumStore {
    pads: Vec<Pad>,
}

impl DrumStore {
    pub fn pads(&self) -> &[Pad] {
        &self.pads
    }

    pub fn is_empty(&self) -> bool {
        self.pads.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Pad> {
        self.pads.iter().find(|p| p.id == id)
    }

    pub fn set_pads(&mut self, pads: Vec<Pad>) {
        self.pads = pads;
    }

    pub fn add_pad(&mut self, pad: Pad) {
        self.pads.push(pad);
    }

    // returns false when no pad has that id
    pub fn update_pad(&mut self, id: &str, update: PadUpdate) -> bool {
        match self.pads.iter_mut().find(|p| p.id == id) {
            Some(pad) => {
                update.apply(pad);
                true
            }
            None => false,
        }
    }

    pub fn remove_pad(&mut self, id: &str) -> Option<Pad> {
        let idx = self.pads.iter().position(|p| p.id == id)?;
        Some(self.pads.remove(idx))
    }
}
