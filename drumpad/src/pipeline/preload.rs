// Bulk load of every pad at startup, plus the progress the loading bar shows.

use std::cell::RefCell;
use std::collections::HashSet;

use futures_util::future::join_all;
use tracing::{info, warn};

use crate::audio::{AudioBackend, SoundRegistry};

use super::catalog::Pad;

// A failed load counts as settled too, so one bad file can't hold the
// loading screen forever. That pad just never gets a sound.
#[derive(Clone, Debug, Default)]
pub struct LoadProgress {
    total: usize,
    settled: usize,
    settled_ids: HashSet<String>,
    in_flight: bool,
}

impl LoadProgress {
    pub fn started(total: usize) -> Self {
        Self {
            total,
            in_flight: true,
            ..Self::default()
        }
    }

    // nothing to wait for: every pad counts as settled already
    pub fn complete<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        let settled_ids: HashSet<String> = ids.into_iter().map(str::to_owned).collect();
        Self {
            total: settled_ids.len(),
            settled: settled_ids.len(),
            settled_ids,
            in_flight: false,
        }
    }

    pub fn settle(&mut self, id: &str) {
        self.settled += 1;
        self.settled_ids.insert(id.to_owned());
    }

    pub fn finish(&mut self) {
        self.in_flight = false;
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight
    }

    pub fn is_settled(&self, id: &str) -> bool {
        self.settled_ids.contains(id)
    }

    pub fn settled(&self) -> usize {
        self.settled
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        let pct = (self.settled as f64 / self.total as f64 * 100.0).round();
        pct.min(100.0) as u8
    }
}

// Fire every load at once, settle each as it finishes, then clear the
// in-flight flag once all of them have.
pub async fn preload<B: AudioBackend>(registry: &SoundRegistry<B>, pads: &[Pad], progress: &RefCell<LoadProgress>) {
    let loads = pads.iter().map(|pad| async move {
        match registry.load(&pad.id, &pad.source).await {
            Ok(()) => {
                if let Some(volume) = pad.volume {
                    registry.set_volume(&pad.id, volume).await;
                }
            }
            Err(e) => warn!(pad = %pad.id, source = %pad.source, error = %e, "failed loading sound"),
        }
        progress.borrow_mut().settle(&pad.id);
    });
    join_all(loads).await;

    let mut progress = progress.borrow_mut();
    progress.finish();
    info!(loaded = registry.len(), total = progress.total(), "preload finished");
}
