/// Audio backend ticked once per frame.
pub trait Audio {
    fn update(&mut self);
}

/// Audio backend that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl Audio for SilentAudio {
    fn update(&mut self) {}
}
