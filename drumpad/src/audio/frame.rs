// One left/right pair. Every decoded sample is stored as these, whatever the
// file's channel count was.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StereoFrame {
    pub left: f32,
    pub right: f32,
}

impl StereoFrame {
    pub fn zero() -> Self {
        Self::default()
    }

    // same value on both sides, for mono files
    pub fn mono(x: f32) -> Self {
        Self { left: x, right: x }
    }

    // straight line between two frames, t in 0..=1
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            left: self.left * (1.0 - t) + other.left * t,
            right: self.right * (1.0 - t) + other.right * t,
        }
    }
}
