//! Audio-thread to UI-thread frame handoff.
//!
//! `push_sample` runs on the audio callback while `update` runs on the
//! render thread, so the FIFO-full → snapshot transition has to be safe
//! against concurrent pushes. The split here keeps each side single-
//! threaded: the [`SpectrumSink`] accumulates a window on the audio side
//! and ships completed frames through a bounded channel; the pipeline
//! drains them on the render side.
//!
//! The sink never blocks: when the channel is full the frame is dropped,
//! trading a stale display frame for a glitch-free audio callback.

use std::sync::mpsc::{Receiver, SyncSender, TrySendError, sync_channel};

/// Frames in flight between the audio and render threads.
///
/// Two is enough to ride out a late render tick without letting the
/// display fall far behind.
const CHANNEL_DEPTH: usize = 2;

/// Audio-side half of the spectrum handoff.
///
/// Lives on the audio thread; push every output sample into it.
pub struct SpectrumSink {
    window: Vec<f32>,
    fill: usize,
    sender: SyncSender<Vec<f32>>,
    dropped: u64,
}

impl SpectrumSink {
    /// Accumulate one mono sample; ships a frame when the window fills.
    #[inline]
    pub fn push_sample(&mut self, sample: f32) {
        self.window[self.fill] = sample;
        self.fill += 1;
        if self.fill == self.window.len() {
            self.fill = 0;
            match self.sender.try_send(self.window.clone()) {
                Ok(()) => {}
                Err(TrySendError::Full(_) | TrySendError::Disconnected(_)) => {
                    self.dropped += 1;
                }
            }
        }
    }

    /// Number of frames dropped because the render side fell behind.
    pub fn dropped_frames(&self) -> u64 {
        self.dropped
    }

    /// Window length in samples.
    pub fn window_len(&self) -> usize {
        self.window.len()
    }
}

/// Render-side half of the spectrum handoff.
pub struct FrameReceiver {
    receiver: Receiver<Vec<f32>>,
}

impl FrameReceiver {
    /// Take the newest available frame, discarding older ones.
    ///
    /// Returns `None` when no complete frame has arrived since the last
    /// call (or the sink was dropped).
    pub fn latest(&self) -> Option<Vec<f32>> {
        let mut newest = None;
        while let Ok(frame) = self.receiver.try_recv() {
            newest = Some(frame);
        }
        newest
    }
}

/// Create a connected sink/receiver pair for windows of `window_len`
/// samples.
///
/// # Panics
///
/// Panics if `window_len` is 0.
pub fn spectrum_channel(window_len: usize) -> (SpectrumSink, FrameReceiver) {
    assert!(window_len > 0, "window length must be > 0");
    let (sender, receiver) = sync_channel(CHANNEL_DEPTH);
    (
        SpectrumSink {
            window: vec![0.0; window_len],
            fill: 0,
            sender,
            dropped: 0,
        },
        FrameReceiver { receiver },
    )
}
