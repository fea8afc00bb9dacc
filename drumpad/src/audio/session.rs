use std::rc::Rc;

use tracing::{info, warn};

use super::backend::{AudioBackend, AudioMode};
use super::registry::SoundRegistry;

// Audio lifecycle for the UI's lifetime. shutdown takes self, so the unload
// happens exactly once.
pub struct AudioSession<B: AudioBackend> {
    registry: Rc<SoundRegistry<B>>,
}

impl<B: AudioBackend> AudioSession<B> {
    pub async fn open(registry: Rc<SoundRegistry<B>>, mode: &AudioMode) -> Self {
        if let Err(e) = registry.backend().configure(mode).await {
            warn!(error = %e, "could not configure audio mode, continuing");
        }
        Self { registry }
    }

    pub fn registry(&self) -> &Rc<SoundRegistry<B>> {
        &self.registry
    }

    pub async fn shutdown(self) {
        info!(sounds = self.registry.len(), "unloading sounds");
        self.registry.unload_all().await;
    }
}
