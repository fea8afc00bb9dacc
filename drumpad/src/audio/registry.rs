// Pad id -> loaded sound.
// play/stop/set_volume never fail for the caller: a glitch is logged and the
// beat is just missed. load does report failure.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::audio_api::SoundSource;

use super::backend::{AudioBackend, AudioError, SoundHandle};

// The map is only touched between awaits; handles are shared so an in-flight
// play never keeps a borrow of it alive across a suspension point.
pub struct SoundRegistry<B: AudioBackend> {
    backend: B,
    sounds: RefCell<HashMap<String, Rc<B::Handle>>>,
}

impl<B: AudioBackend> SoundRegistry<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            sounds: RefCell::new(HashMap::new()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    // releases whatever `id` held first; on failure `id` is left unloaded
    pub async fn load(&self, id: &str, source: &SoundSource) -> Result<(), AudioError> {
        let previous = self.sounds.borrow_mut().remove(id);
        if let Some(handle) = previous {
            release(id, &*handle).await;
        }

        let handle = self.backend.create(source).await?;

        // a concurrent load of the same id may have settled while we waited;
        // whoever settles last wins and the loser's handle is freed
        let displaced = self.sounds.borrow_mut().insert(id.to_owned(), Rc::new(handle));
        if let Some(stale) = displaced {
            release(id, &*stale).await;
        }
        Ok(())
    }

    // restart from the beginning, no-op when `id` isn't loaded
    pub async fn play(&self, id: &str) {
        let Some(handle) = self.handle(id) else { return };
        if let Err(e) = handle.replay().await {
            warn!(pad = id, error = %e, "play failed");
        }
    }

    pub async fn stop(&self, id: &str) {
        let Some(handle) = self.handle(id) else { return };
        if let Err(e) = handle.halt().await {
            warn!(pad = id, error = %e, "stop failed");
        }
    }

    // clamped to 0.0..=1.0, anything not finite counts as silent
    pub async fn set_volume(&self, id: &str, volume: f32) {
        let Some(handle) = self.handle(id) else { return };
        if let Err(e) = handle.set_volume(clamp_volume(volume)).await {
            warn!(pad = id, error = %e, "set volume failed");
        }
    }

    // safe to repeat
    pub async fn unload_all(&self) {
        loop {
            // loads can land while we're releasing; keep going until nothing is left
            let drained: Vec<_> = self.sounds.borrow_mut().drain().collect();
            if drained.is_empty() {
                break;
            }
            for (id, handle) in drained {
                release(&id, &*handle).await;
            }
        }
    }

    pub fn is_loaded(&self, id: &str) -> bool {
        self.sounds.borrow().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.sounds.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.borrow().is_empty()
    }

    fn handle(&self, id: &str) -> Option<Rc<B::Handle>> {
        self.sounds.borrow().get(id).cloned()
    }
}

fn clamp_volume(volume: f32) -> f32 {
    if volume.is_finite() { volume.clamp(0.0, 1.0) } else { 0.0 }
}

async fn release<H: SoundHandle>(id: &str, handle: &H) {
    if let Err(e) = handle.release().await {
        debug!(pad = id, error = %e, "release failed, dropping handle anyway");
    }
}

#[cfg(test)]
mod tests {
    use futures_util::future::join_all;

    use super::*;
    use crate::audio::mock::{Call, MockBackend};

    fn src(name: &str) -> SoundSource {
        SoundSource::Bundled(name.into())
    }

    fn registry() -> (SoundRegistry<MockBackend>, MockBackend) {
        let backend = MockBackend::new();
        (SoundRegistry::new(backend.clone()), backend)
    }

    #[tokio::test]
    async fn controls_on_unknown_ids_do_nothing() {
        let (registry, backend) = registry();
        registry.play("kick").await;
        registry.stop("kick").await;
        registry.set_volume("kick", 0.3).await;
        assert!(backend.calls().is_empty());
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn reload_releases_old_handle_before_creating_new() {
        let (registry, backend) = registry();
        registry.load("kick", &src("a.wav")).await.unwrap();
        registry.load("kick", &src("b.wav")).await.unwrap();
        registry.play("kick").await;

        let a = backend.handle_for("a.wav").unwrap();
        let b = backend.handle_for("b.wav").unwrap();
        assert_eq!(
            backend.calls(),
            vec![
                Call::Create { handle: a, source: "a.wav".into() },
                Call::Release(a),
                Call::Create { handle: b, source: "b.wav".into() },
                Call::Replay(b),
            ]
        );
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn failed_release_does_not_block_replacement() {
        let (registry, backend) = registry();
        registry.load("kick", &src("sticky.wav")).await.unwrap();
        registry.load("kick", &src("fresh.wav")).await.unwrap();
        registry.play("kick").await;

        let fresh = backend.handle_for("fresh.wav").unwrap();
        assert_eq!(backend.replays_of(fresh), 1);
    }

    #[tokio::test]
    async fn failed_load_leaves_id_absent() {
        let (registry, backend) = registry();
        registry.load("kick", &src("a.wav")).await.unwrap();

        let err = registry.load("kick", &src("invalid.wav")).await;
        assert!(err.is_err());
        assert!(!registry.is_loaded("kick"));

        // the old handle went away before the attempt, and play is now a no-op
        let a = backend.handle_for("a.wav").unwrap();
        assert!(backend.is_released(a));
        registry.play("kick").await;
        assert_eq!(backend.replays_of(a), 0);
    }

    #[tokio::test]
    async fn playback_errors_are_swallowed() {
        let (registry, backend) = registry();
        registry.load("snare", &src("flaky.wav")).await.unwrap();
        registry.play("snare").await;
        registry.stop("snare").await;
        registry.set_volume("snare", 0.5).await;

        let h = backend.handle_for("flaky.wav").unwrap();
        assert!(backend.calls().contains(&Call::Halt(h)));
        assert!(registry.is_loaded("snare"));
    }

    #[tokio::test]
    async fn back_to_back_plays_restart_without_stop() {
        let (registry, backend) = registry();
        registry.load("hat", &src("hat.wav")).await.unwrap();
        join_all([registry.play("hat"), registry.play("hat"), registry.play("hat")]).await;

        let h = backend.handle_for("hat.wav").unwrap();
        assert_eq!(backend.replays_of(h), 3);
        assert!(!backend.calls().contains(&Call::Halt(h)));
    }

    #[tokio::test]
    async fn volume_is_clamped() {
        let (registry, backend) = registry();
        registry.load("tom", &src("tom.wav")).await.unwrap();
        registry.set_volume("tom", 1.7).await;
        registry.set_volume("tom", -2.0).await;

        let h = backend.handle_for("tom.wav").unwrap();
        let calls = backend.calls();
        assert!(calls.contains(&Call::SetVolume(h, 1.0)));
        assert!(calls.contains(&Call::SetVolume(h, 0.0)));
    }

    #[tokio::test]
    async fn non_finite_volume_is_silent() {
        let (registry, backend) = registry();
        registry.load("tom", &src("tom.wav")).await.unwrap();
        registry.set_volume("tom", f32::NAN).await;
        registry.set_volume("tom", f32::INFINITY).await;

        let h = backend.handle_for("tom.wav").unwrap();
        let volumes: Vec<_> = backend
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::SetVolume(handle, v) if handle == h => Some(v),
                _ => None,
            })
            .collect();
        assert_eq!(volumes, vec![0.0, 0.0]);
    }

    #[tokio::test]
    async fn unload_all_empties_and_is_repeatable() {
        let (registry, backend) = registry();
        registry.load("kick", &src("kick.wav")).await.unwrap();
        registry.load("snare", &src("sticky.wav")).await.unwrap();
        registry.load("hat", &src("hat.wav")).await.unwrap();

        registry.unload_all().await;
        assert!(registry.is_empty());
        assert!(backend.live_handles().is_empty());

        registry.play("kick").await;
        let kick = backend.handle_for("kick.wav").unwrap();
        assert_eq!(backend.replays_of(kick), 0);

        let before = backend.calls().len();
        registry.unload_all().await;
        assert!(registry.is_empty());
        assert_eq!(backend.calls().len(), before);
    }

    #[tokio::test]
    async fn racing_loads_of_one_id_keep_a_single_handle() {
        let (registry, backend) = registry();
        let (one, two) = (src("one.wav"), src("two.wav"));
        let (a, b) = futures_util::join!(
            registry.load("clap", &one),
            registry.load("clap", &two),
        );
        a.unwrap();
        b.unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(backend.live_handles().len(), 1);
    }
}
