//! Dense frame sample storage

use std::ops::Index;

use crate::error::{Result, StreamError};
use crate::header::SAMPLE_WIDTH;

/// Row-major `frame_count x channel_count` buffer of decoded samples.
///
/// Built once by the decoder and read-only afterwards. Indexing with
/// `pool[frame]` yields that frame's row, so `pool[frame][column]` reads a
/// single sample.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize", serde(try_from = "RawFramePool"))]
pub struct FramePool {
    samples: Vec<f32>,
    frame_count: usize,
    channel_count: usize,
}

impl FramePool {
    /// Decode little-endian f32 samples. `data` must hold exactly
    /// `frame_count * channel_count` samples.
    pub(crate) fn from_le_bytes(data: &[u8], frame_count: usize, channel_count: usize) -> Self {
        debug_assert_eq!(data.len(), frame_count * channel_count * SAMPLE_WIDTH);

        let samples = data
            .chunks_exact(SAMPLE_WIDTH)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();

        Self {
            samples,
            frame_count,
            channel_count,
        }
    }

    /// Build a pool from decoded samples, checking the buffer has exactly
    /// `frame_count * channel_count` of them.
    pub fn from_samples(samples: Vec<f32>, frame_count: usize, channel_count: usize) -> Result<Self> {
        if frame_count.checked_mul(channel_count) != Some(samples.len()) {
            return Err(StreamError::PoolShape {
                samples: samples.len(),
                frame_count,
                channel_count,
            });
        }
        Ok(Self {
            samples,
            frame_count,
            channel_count,
        })
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Number of columns in every frame.
    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    pub fn is_empty(&self) -> bool {
        self.frame_count == 0
    }

    /// One frame's samples, or `None` past the last frame.
    pub fn frame(&self, index: usize) -> Option<&[f32]> {
        if index >= self.frame_count {
            return None;
        }
        let start = index * self.channel_count;
        Some(&self.samples[start..start + self.channel_count])
    }

    /// A single sample.
    pub fn get(&self, frame: usize, column: usize) -> Option<f32> {
        if column >= self.channel_count {
            return None;
        }
        self.frame(frame).map(|row| row[column])
    }

    /// Iterate over frames in order.
    pub fn frames(&self) -> impl ExactSizeIterator<Item = &[f32]> + '_ {
        let width = self.channel_count;
        (0..self.frame_count).map(move |i| &self.samples[i * width..(i + 1) * width])
    }

    /// Iterate over one column across all frames.
    pub fn column(&self, column: usize) -> impl Iterator<Item = f32> + '_ {
        let (start, count) = if column < self.channel_count {
            (column, self.frame_count)
        } else {
            (0, 0)
        };
        self.samples
            .iter()
            .skip(start)
            .step_by(self.channel_count.max(1))
            .take(count)
            .copied()
    }

    /// The whole buffer in row-major order.
    pub fn as_slice(&self) -> &[f32] {
        &self.samples
    }
}

/// Unchecked serde form of [`FramePool`].
#[cfg(feature = "serialize")]
#[derive(serde::Deserialize)]
struct RawFramePool {
    samples: Vec<f32>,
    frame_count: usize,
    channel_count: usize,
}

#[cfg(feature = "serialize")]
impl TryFrom<RawFramePool> for FramePool {
    type Error = StreamError;

    fn try_from(raw: RawFramePool) -> Result<Self> {
        Self::from_samples(raw.samples, raw.frame_count, raw.channel_count)
    }
}

impl Index<usize> for FramePool {
    type Output = [f32];

    fn index(&self, frame: usize) -> &[f32] {
        match self.frame(frame) {
            Some(row) => row,
            None => panic!(
                "frame index {} out of range for pool with {} frames",
                frame, self.frame_count
            ),
        }
    }
}
