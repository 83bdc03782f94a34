//! Error types for shadowtake-stream

/// Result type alias using [`StreamError`].
pub type Result<T> = std::result::Result<T, StreamError>;

/// Errors that can occur while decoding a take stream.
///
/// Every variant is fatal to the decode attempt. Offsets are byte positions
/// from the start of the stream buffer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StreamError {
    /// The buffer ended before a field could be read.
    #[error("truncated stream at byte {offset}: needed {needed} bytes, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// Counts or offsets in the stream disagree with each other.
    #[error("structural mismatch at byte {offset}: {message}")]
    StructuralMismatch { offset: usize, message: String },

    /// The frame data section does not divide into whole frames.
    #[error("unaligned frame data: {data_bytes} bytes is not a multiple of the {frame_bytes} byte frame record")]
    UnalignedFrameData { data_bytes: usize, frame_bytes: usize },

    /// The header does not start with the take stream signature.
    #[error("missing take stream signature (found {found0:#010x} {found1:#010x})")]
    InvalidSignature { found0: u32, found1: u32 },

    /// The header declares a format version this crate does not read.
    #[error("unsupported take stream version: {0}")]
    UnsupportedVersion(u32),

    /// A length-prefixed string is not valid UTF-8.
    #[error("invalid UTF-8 in string at byte {offset}")]
    InvalidUtf8 { offset: usize },

    /// A sample buffer does not hold `frame_count x channel_count` samples.
    #[error("frame pool of {frame_count} x {channel_count} needs {} samples, got {samples}", frame_count.saturating_mul(*channel_count))]
    PoolShape {
        samples: usize,
        frame_count: usize,
        channel_count: usize,
    },
}

impl StreamError {
    /// Create a structural mismatch error.
    pub fn mismatch(offset: usize, message: impl Into<String>) -> Self {
        Self::StructuralMismatch {
            offset,
            message: message.into(),
        }
    }

    /// Byte offset associated with the error, if it has one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::Truncated { offset, .. }
            | Self::StructuralMismatch { offset, .. }
            | Self::InvalidUtf8 { offset } => Some(*offset),
            Self::InvalidSignature { .. } => Some(0),
            Self::UnalignedFrameData { .. }
            | Self::UnsupportedVersion(_)
            | Self::PoolShape { .. } => None,
        }
    }
}
