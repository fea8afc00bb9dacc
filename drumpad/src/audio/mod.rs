use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;
use std::thread;

use anyhow::Context;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, error, info};

use crate::audio_api::{AudioCommand, SoundSource};
use crate::loader::sample_loader;

mod backend;
mod engine;
mod frame;
#[cfg(test)]
pub mod mock;
mod registry;
mod sample_buffer;
mod sample_id;
mod session;
mod voice;

pub use backend::{AudioBackend, AudioError, AudioMode, SoundHandle};
pub use registry::SoundRegistry;
pub use sample_buffer::SampleBuffer;
pub use sample_id::{next_sample_id, SampleId};
pub use session::AudioSession;

use engine::{Engine, MAX_SOUNDS};

const COMMAND_QUEUE: usize = 1024;

// The real backend: one cpal output stream, one engine mixing every pad.
pub struct CpalBackend {
    tx: Sender<AudioCommand>,
    asset_root: PathBuf,
    sample_rate: u32,
    live: Rc<Cell<usize>>, // sounds registered with the engine and not yet released
    _output_stream: cpal::Stream,
}

impl CpalBackend {
    pub fn start(asset_root: PathBuf) -> anyhow::Result<Self> {
        let (tx, rx) = crossbeam_channel::bounded::<AudioCommand>(COMMAND_QUEUE);

        let host = cpal::default_host();
        let device = host.default_output_device().context("no default output device")?;
        let config = device.default_output_config().context("no default output config")?;

        let sample_rate: u32 = config.sample_rate();
        let channels = config.channels() as usize;

        match config.sample_format() {
            cpal::SampleFormat::F32 => {
                let output_stream = build_output_stream_f32(&device, &config.into(), rx, channels)?;
                output_stream.play().context("failed to play output stream")?;
                info!(sample_rate, channels, "audio output started");

                Ok(Self {
                    tx,
                    asset_root,
                    sample_rate,
                    live: Rc::new(Cell::new(0)),
                    _output_stream: output_stream,
                })
            }
            other => anyhow::bail!("unsupported sample format {other:?} (only f32 supported for now)"),
        }
    }
}

fn build_output_stream_f32(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    rx: Receiver<AudioCommand>,
    channels: usize,
) -> anyhow::Result<cpal::Stream> {
    // released buffers are freed here instead of on the audio thread; the
    // thread ends once the engine (and its sender) goes away with the stream
    let (retired_tx, retired_rx) = crossbeam_channel::bounded::<SampleBuffer>(MAX_SOUNDS);
    thread::Builder::new()
        .name("drumpad-free".into())
        .spawn(move || retired_rx.iter().for_each(drop))
        .context("failed to start buffer release thread")?;
    let mut engine = Engine::new(retired_tx);

    let stream = device.build_output_stream(
        config,
        move |data: &mut [f32], _info| {
            while let Ok(cmd) = rx.try_recv() {
                engine.handle_cmd(cmd);
            }
            engine.render_interleaved(data, channels);
        },
        |err| error!("audio output stream error: {err}"),
        None,
    )?;

    Ok(stream)
}

fn send(tx: &Sender<AudioCommand>, cmd: AudioCommand) -> Result<(), AudioError> {
    tx.try_send(cmd).map_err(|_| AudioError::EngineUnavailable)
}

impl AudioBackend for CpalBackend {
    type Handle = CpalSound;

    async fn configure(&self, mode: &AudioMode) -> Result<(), AudioError> {
        if mode.allows_recording {
            return Err(AudioError::Unsupported("recording, no input stream is opened".into()));
        }
        // desktop hosts have no silent switch and no ducking to ask for
        debug!(?mode, "audio mode accepted");
        Ok(())
    }

    async fn create(&self, source: &SoundSource) -> Result<CpalSound, AudioError> {
        // the slot is claimed before decoding so concurrent loads can't overshoot
        claim_slot(&self.live)?;
        let registered = self.register(source).await;
        if registered.is_err() {
            self.live.set(self.live.get() - 1);
        }
        registered
    }
}

impl CpalBackend {
    async fn register(&self, source: &SoundSource) -> Result<CpalSound, AudioError> {
        let buffer = sample_loader::load(source, &self.asset_root, self.sample_rate).await?;
        let id = next_sample_id();
        debug!(%source, frames = buffer.len(), ?id, "registering sound");
        send(&self.tx, AudioCommand::Register { id, buffer })?;
        Ok(CpalSound { id, tx: self.tx.clone(), live: self.live.clone() })
    }
}

// the engine's slot pool is fixed, so the cap is enforced out here
fn claim_slot(live: &Cell<usize>) -> Result<(), AudioError> {
    let n = live.get();
    if n >= MAX_SOUNDS {
        return Err(AudioError::TooManySounds(n));
    }
    live.set(n + 1);
    Ok(())
}

pub struct CpalSound {
    id: SampleId,
    tx: Sender<AudioCommand>,
    live: Rc<Cell<usize>>,
}

impl SoundHandle for CpalSound {
    async fn release(&self) -> Result<(), AudioError> {
        // the slot is gone either way; a dead engine holds nothing
        self.live.set(self.live.get().saturating_sub(1));
        send(&self.tx, AudioCommand::Release(self.id))
    }

    async fn replay(&self) -> Result<(), AudioError> {
        send(&self.tx, AudioCommand::Replay(self.id))
    }

    async fn halt(&self) -> Result<(), AudioError> {
        send(&self.tx, AudioCommand::Halt(self.id))
    }

    async fn set_volume(&self, volume: f32) -> Result<(), AudioError> {
        send(&self.tx, AudioCommand::SetVolume { id: self.id, volume })
    }
}
