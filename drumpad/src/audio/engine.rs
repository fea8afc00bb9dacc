use crossbeam_channel::Sender;

use crate::audio_api::AudioCommand;

use super::frame::StereoFrame;
use super::sample_buffer::SampleBuffer;
use super::sample_id::SampleId;
use super::voice::Voice;

pub const MAX_SOUNDS: usize = 64; // hard cap, the slot pool never grows in the callback
const SCRATCH_FRAMES: usize = 1024;

struct Sound {
    id: SampleId,
    buffer: SampleBuffer,
    voice: Voice,
}

// Lives inside the output callback. Everything reaches it as an AudioCommand.
// Nothing in here allocates or frees: buffers leaving the engine are handed to
// `retired` and dropped on another thread.
pub struct Engine {
    slots: Vec<Option<Sound>>, // fixed pool of MAX_SOUNDS
    scratch: Vec<StereoFrame>,
    retired: Sender<SampleBuffer>,
    parked: Vec<SampleBuffer>, // retired buffers the channel had no room for yet
}

impl Engine {
    pub fn new(retired: Sender<SampleBuffer>) -> Self {
        Self {
            slots: std::iter::repeat_with(|| None).take(MAX_SOUNDS).collect(),
            scratch: vec![StereoFrame::zero(); SCRATCH_FRAMES],
            retired,
            parked: Vec::with_capacity(MAX_SOUNDS),
        }
    }

    pub fn handle_cmd(&mut self, cmd: AudioCommand) {
        match cmd {
            AudioCommand::Register { id, buffer } => {
                match self.slots.iter_mut().find(|slot| slot.is_none()) {
                    Some(slot) => *slot = Some(Sound { id, buffer, voice: Voice::default() }),
                    // the backend caps live sounds, so this only happens if that count drifts
                    None => self.retire(buffer),
                }
            }
            AudioCommand::Replay(id) => {
                if let Some(sound) = self.sound_mut(id) {
                    sound.voice.restart();
                }
            }
            AudioCommand::Halt(id) => {
                if let Some(sound) = self.sound_mut(id) {
                    sound.voice.halt();
                }
            }
            AudioCommand::SetVolume { id, volume } => {
                if let Some(sound) = self.sound_mut(id) {
                    sound.voice.gain = volume;
                }
            }
            AudioCommand::Release(id) => {
                let slot = self.slots.iter_mut().find(|slot| matches!(slot, Some(s) if s.id == id));
                if let Some(sound) = slot.and_then(Option::take) {
                    self.retire(sound.buffer);
                }
            }
        }
    }

    fn sound_mut(&mut self, id: SampleId) -> Option<&mut Sound> {
        self.slots.iter_mut().flatten().find(|s| s.id == id)
    }

    fn retire(&mut self, buffer: SampleBuffer) {
        if let Err(e) = self.retired.try_send(buffer) {
            // past the reserve the buffer is freed right here; the reserve
            // covers every live sound, so that means the dropper thread is gone
            if self.parked.len() < self.parked.capacity() {
                self.parked.push(e.into_inner());
            }
        }
    }

    fn flush_parked(&mut self) {
        while let Some(buffer) = self.parked.pop() {
            if let Err(e) = self.retired.try_send(buffer) {
                self.parked.push(e.into_inner());
                break;
            }
        }
    }

    pub fn render_block(&mut self, out: &mut [StereoFrame]) {
        out.fill(StereoFrame::zero());
        for sound in self.slots.iter_mut().flatten() {
            sound.voice.render_into(&sound.buffer, out);
        }
    }

    // Render straight into the device's interleaved buffer, whatever its width.
    // Big device blocks are done scratch-sized piece by piece.
    pub fn render_interleaved(&mut self, data: &mut [f32], channels: usize) {
        self.flush_parked();
        let channels = channels.max(1);
        let mut scratch = std::mem::take(&mut self.scratch);

        for chunk in data.chunks_mut(SCRATCH_FRAMES * channels) {
            let n_frames = chunk.len() / channels;
            self.render_block(&mut scratch[..n_frames]);

            for (out, frame) in chunk.chunks_exact_mut(channels).zip(&scratch[..n_frames]) {
                match out {
                    [mono] => *mono = (frame.left + frame.right) * 0.5,
                    [l, r, rest @ ..] => {
                        *l = frame.left;
                        *r = frame.right;
                        rest.fill(0.0);
                    }
                    [] => {}
                }
            }
        }
        self.scratch = scratch;
    }

    #[cfg(test)]
    fn active_voices(&self) -> usize {
        self.slots.iter().flatten().filter(|s| s.voice.active).count()
    }
}
