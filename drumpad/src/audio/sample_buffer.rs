use std::io::Read;
use std::path::Path;

use super::backend::AudioError;
use super::frame::StereoFrame;

#[derive(Clone, Debug, Default)]
pub struct SampleBuffer {
    pub data: Vec<StereoFrame>, // decoded, resampled to the output rate
}

impl SampleBuffer {
    // Load a WAV file from disk into the sample buffer
    pub fn open_wav(path: &Path, target_rate: u32) -> Result<Self, AudioError> {
        let reader = hound::WavReader::open(path)?;
        Self::decode(reader, target_rate)
    }

    // Same as open_wav, for bytes that came from somewhere else (remote pads)
    pub fn read_wav<R: Read>(source: R, target_rate: u32) -> Result<Self, AudioError> {
        let reader = hound::WavReader::new(source)?;
        Self::decode(reader, target_rate)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn decode<R: Read>(mut reader: hound::WavReader<R>, target_rate: u32) -> Result<Self, AudioError> {
        let spec = reader.spec();
        let channels = spec.channels as usize;
        if channels == 0 {
            return Err(AudioError::Unsupported("WAV file with zero channels".into()));
        }

        let samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader // float, just pass it through
                .samples::<f32>()
                .collect::<Result<Vec<_>, _>>()?,
            hound::SampleFormat::Int => { // int, scale into -1.0..1.0
                let max = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|x| x as f32 / max))
                    .collect::<Result<Vec<_>, _>>()?
            }
        };

        // mono gets duplicated, anything wider keeps its first two channels
        let frames: Vec<StereoFrame> = samples
            .chunks_exact(channels)
            .map(|c| match c {
                [x] => StereoFrame::mono(*x),
                [l, r, ..] => StereoFrame { left: *l, right: *r },
                [] => StereoFrame::zero(),
            })
            .collect();

        Ok(Self {
            data: resample_linear(&frames, spec.sample_rate, target_rate),
        })
    }
}

fn resample_linear(frames: &[StereoFrame], source_rate: u32, target_rate: u32) -> Vec<StereoFrame> {
    if source_rate == target_rate || source_rate == 0 || frames.is_empty() {
        return frames.to_vec();
    }
    let ratio = target_rate as f64 / source_rate as f64;
    let out_len = (frames.len() as f64 * ratio).ceil() as usize;
    let last = frames.len() - 1;

    (0..out_len)
        .map(|i| {
            let src_pos = i as f64 / ratio; // ex. 3.7
            let idx = src_pos.floor() as usize; // ex. 3
            if idx >= last {
                frames[last]
            } else {
                let frac = (src_pos - idx as f64) as f32; // ex. 0.7
                frames[idx].lerp(frames[idx + 1], frac)
            }
        })
        .collect()
}
