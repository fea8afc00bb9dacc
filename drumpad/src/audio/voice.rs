use super::frame::StereoFrame;
use super::sample_buffer::SampleBuffer;

// The one playback position a registered sound has. Replaying rewinds it, so
// a pad hit while still ringing starts over instead of stacking.
#[derive(Clone, Debug)]
pub struct Voice {
    pub pos: usize,
    pub gain: f32,
    pub active: bool,
}

impl Default for Voice {
    fn default() -> Self {
        Self {
            pos: 0,
            gain: 1.0,
            active: false,
        }
    }
}

impl Voice {
    pub fn restart(&mut self) {
        self.pos = 0;
        self.active = true;
    }

    pub fn halt(&mut self) {
        self.active = false;
    }

    // mix this voice on top of whatever is already in `out`
    pub fn render_into(&mut self, buffer: &SampleBuffer, out: &mut [StereoFrame]) {
        if !self.active {
            return;
        }
        let remaining = buffer.data.get(self.pos..).unwrap_or(&[]);
        if remaining.is_empty() {
            self.active = false;
            return;
        }

        let n = remaining.len().min(out.len());
        for (frame, sample) in out.iter_mut().zip(&remaining[..n]) {
            frame.left += sample.left * self.gain;
            frame.right += sample.right * self.gain;
        }

        self.pos += n;
        if self.pos >= buffer.data.len() {
            self.active = false;
        }
    }
}
