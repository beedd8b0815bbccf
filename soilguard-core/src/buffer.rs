//! Fixed-Capacity Sample Windows for Moving-Average Filtering
//!
//! ## Overview
//!
//! Every channel owns one ring buffer of its last `W` raw samples. The
//! filtered value of a channel is the arithmetic mean of the occupied slots:
//! all `W` once the window has wrapped, otherwise only the samples written so
//! far. Capacity is a const generic, so the buffers live inline in the
//! pipeline and a push never allocates.
//!
//! ### Memory Layout
//!
//! ```text
//! SampleWindow<5> after 7 pushes (values 1..=7):
//! ┌─────┬─────┬─────┬─────┬─────┐
//! │  6  │  7  │  3  │  4  │  5  │  ← slots
//! └─────┴─────┴─────┴─────┴─────┘
//!          ↑     ↑
//!          │     └── oldest sample, next write (write_pos = 2)
//!          └──────── newest sample
//! filled = true, mean = (3+4+5+6+7)/5 = 5
//! ```
//!
//! ### Warm-up
//!
//! Until the window has wrapped once the `filled` flag stays false and the
//! mean covers only `len` samples. Consumers can tell a true `W`-sample
//! average from a warm-up average through [`SampleWindow::is_filled`].
//!
//! ### Non-finite input
//!
//! [`SampleBuffer::push`] never lets NaN or infinity into a window: the sample
//! is replaced by the channel's previous filtered value and flagged so the
//! orchestrator can record a `NonFinite` error. A non-finite first sample
//! leaves the window empty and reports `0.0`.
//!
//! ## Usage Example
//!
//! ```rust
//! use soilguard_core::buffer::SampleWindow;
//!
//! let mut window: SampleWindow<5> = SampleWindow::new();
//! for v in [10.0, 20.0, 30.0, 40.0, 50.0] {
//!     window.push(v);
//! }
//! assert_eq!(window.mean(), Some(30.0));
//!
//! // Sixth push evicts the 10.0
//! assert_eq!(window.push(1000.0), 228.0);
//! ```

use crate::channel::{Channel, ChannelMap};

/// Ring buffer of the last `W` samples of one channel
///
/// ## Internal Invariants
///
/// - `write_pos < W`
/// - `len <= W`
/// - `filled` is true iff `W` samples have ever been written
/// - slots `0..len` are occupied while `!filled`, all slots afterwards
///
/// Not thread-safe; owned by the acquisition task.
#[derive(Debug, Clone)]
pub struct SampleWindow<const W: usize> {
    slots: [f32; W],
    write_pos: usize,
    len: usize,
    filled: bool,
}

impl<const W: usize> SampleWindow<W> {
    const NON_EMPTY: () = assert!(W > 0, "sample window needs at least one slot");

    /// Creates an empty window
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::NON_EMPTY;
        Self {
            slots: [0.0; W],
            write_pos: 0,
            len: 0,
            filled: false,
        }
    }

    /// Writes a sample at the cursor and returns the new mean
    ///
    /// Overwrites the oldest sample once the window is full.
    pub fn push(&mut self, value: f32) -> f32 {
        self.slots[self.write_pos] = value;
        self.write_pos = (self.write_pos + 1) % W;

        if self.len < W {
            self.len += 1;
        }
        if self.write_pos == 0 {
            self.filled = true;
        }

        self.occupied_mean()
    }

    /// Mean of the occupied slots, `None` before the first sample
    pub fn mean(&self) -> Option<f32> {
        if self.is_empty() {
            None
        } else {
            Some(self.occupied_mean())
        }
    }

    fn occupied_mean(&self) -> f32 {
        let sum: f32 = self.slots[..self.len].iter().sum();
        sum / self.len as f32
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.len
    }

    /// True before the first sample
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True once `W` samples have been written
    pub fn is_filled(&self) -> bool {
        self.filled
    }

    /// Window capacity `W`
    pub const fn capacity(&self) -> usize {
        W
    }

    /// Most recent sample
    pub fn last(&self) -> Option<f32> {
        if self.is_empty() {
            return None;
        }

        let idx = if self.write_pos == 0 { W - 1 } else { self.write_pos - 1 };
        Some(self.slots[idx])
    }

    /// Smallest and largest occupied sample
    pub fn bounds(&self) -> Option<(f32, f32)> {
        self.iter().fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }

    /// Samples from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        // Oldest sample sits at write_pos once the window has wrapped
        let start = if self.filled { self.write_pos } else { 0 };
        (0..self.len).map(move |i| self.slots[(start + i) % W])
    }

    /// Forget all samples
    pub fn clear(&mut self) {
        self.write_pos = 0;
        self.len = 0;
        self.filled = false;
    }
}

impl<const W: usize> Default for SampleWindow<W> {
    fn default() -> Self {
        Self::new()
    }
}

/// Output of one [`SampleBuffer::push`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilteredSample {
    /// Moving average after the push
    pub value: f32,
    /// The raw sample was NaN/infinite and was replaced
    pub non_finite: bool,
}

/// One [`SampleWindow`] per channel
#[derive(Debug, Clone)]
pub struct SampleBuffer<const W: usize> {
    windows: ChannelMap<SampleWindow<W>>,
    last_filtered: ChannelMap<Option<f32>>,
}

impl<const W: usize> SampleBuffer<W> {
    /// Empty windows for every channel
    pub fn new() -> Self {
        Self {
            windows: ChannelMap::from_fn(|_| SampleWindow::new()),
            last_filtered: ChannelMap::splat(None),
        }
    }

    /// Push a raw sample into the channel's window and return the filtered value
    pub fn push(&mut self, channel: Channel, raw: f32) -> FilteredSample {
        if !raw.is_finite() {
            let value = match self.last_filtered[channel] {
                Some(previous) => self.windows[channel].push(previous),
                None => 0.0,
            };
            if self.last_filtered[channel].is_some() {
                self.last_filtered[channel] = Some(value);
            }
            return FilteredSample { value, non_finite: true };
        }

        let value = self.windows[channel].push(raw);
        self.last_filtered[channel] = Some(value);
        FilteredSample { value, non_finite: false }
    }

    /// Window of one channel
    pub fn window(&self, channel: Channel) -> &SampleWindow<W> {
        &self.windows[channel]
    }

    /// Last filtered value of a channel
    pub fn last_filtered(&self, channel: Channel) -> Option<f32> {
        self.last_filtered[channel]
    }

    /// Reset every window (after a sensor swap, for instance)
    pub fn clear(&mut self) {
        for (_, window) in self.windows.iter_mut() {
            window.clear();
        }
        self.last_filtered = ChannelMap::splat(None);
    }
}

impl<const W: usize> Default for SampleBuffer<W> {
    fn default() -> Self {
        Self::new()
    }
}
