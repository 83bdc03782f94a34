//! Fixed-size stream header

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::cursor::ByteCursor;
use crate::error::{Result, StreamError};

/// Size of the fixed header record in bytes.
pub const HEADER_SIZE: usize = 128;

/// Leading signature words of every take stream.
pub const SIGNATURE: [u32; 2] = [0xFF78_7878, 0x0539_7A69];

/// Stream version with a named node table.
pub const FORMAT_VERSION: u32 = 4;

/// Stream versions whose node table is key/mask pairs.
pub const KEYED_VERSIONS: [u32; 2] = [2, 3];

/// Width of one frame sample (`f32`) in bytes.
pub const SAMPLE_WIDTH: usize = 4;

/// Frame count value written by a recorder that is still streaming.
pub const FRAME_COUNT_UNKNOWN: u32 = 0;

/// Unused trailing words that pad the header to [`HEADER_SIZE`].
const RESERVED_BYTES: usize = 40;

/// How the node table after the header is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeLayout {
    /// `key:u32 mask:u32` per node; channels come from the mask
    Keyed,
    /// Length-prefixed node name and channel names per node
    Named,
}

/// The header at the front of an mStream buffer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct StreamHeader {
    /// Format version tag
    pub version: u32,
    /// Identifier of the recorded take
    pub uuid: Uuid,
    /// Number of node records in the node table
    pub node_count: u32,
    /// Size of one frame record in bytes
    pub frame_stride: u32,
    /// Number of frames, or [`FRAME_COUNT_UNKNOWN`]
    pub frame_count: u32,
    /// Channels active on at least one node, as a bitmask
    pub channel_mask: u32,
    /// Sample period in seconds
    pub h: f32,
    /// Capture location (latitude, longitude, elevation)
    pub location: [f32; 3],
    /// Geomagnetic reference field
    pub geomagnetic: [f32; 3],
    /// Capture start, seconds since the Unix epoch
    pub timestamp_secs: u64,
    /// Sub-second part of the capture start
    pub timestamp_micros: u32,
    pub flags: u32,
}

impl StreamHeader {
    /// Decode the header from the front of the cursor.
    ///
    /// Checks the signature and version; all other fields are taken as-is
    /// and cross-checked later against the node table.
    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let found0 = cursor.read_u32()?;
        let found1 = cursor.read_u32()?;
        if [found0, found1] != SIGNATURE {
            return Err(StreamError::InvalidSignature { found0, found1 });
        }

        let version = cursor.read_u32()?;
        if version != FORMAT_VERSION && !KEYED_VERSIONS.contains(&version) {
            return Err(StreamError::UnsupportedVersion(version));
        }

        let uuid = Uuid::from_bytes(cursor.read_array()?);
        let node_count = cursor.read_u32()?;
        let frame_stride = cursor.read_u32()?;
        let frame_count = cursor.read_u32()?;
        let channel_mask = cursor.read_u32()?;
        let h = cursor.read_f32()?;
        let location = read_vec3(cursor)?;
        let geomagnetic = read_vec3(cursor)?;
        let timestamp_secs = cursor.read_u64()?;
        let timestamp_micros = cursor.read_u32()?;
        let flags = cursor.read_u32()?;
        cursor.skip(RESERVED_BYTES)?;

        Ok(Self {
            version,
            uuid,
            node_count,
            frame_stride,
            frame_count,
            channel_mask,
            h,
            location,
            geomagnetic,
            timestamp_secs,
            timestamp_micros,
            flags,
        })
    }

    /// Node table layout implied by the version.
    pub fn node_layout(&self) -> NodeLayout {
        if KEYED_VERSIONS.contains(&self.version) {
            NodeLayout::Keyed
        } else {
            NodeLayout::Named
        }
    }

    /// Frame count declared by the recorder, `None` for a streaming take.
    pub fn declared_frame_count(&self) -> Option<usize> {
        (self.frame_count != FRAME_COUNT_UNKNOWN).then_some(self.frame_count as usize)
    }

    /// Channel count implied by the frame stride, `None` if the stride is not
    /// a whole number of samples.
    pub fn declared_channel_count(&self) -> Option<usize> {
        let stride = self.frame_stride as usize;
        (stride % SAMPLE_WIDTH == 0).then_some(stride / SAMPLE_WIDTH)
    }

    /// Frames per second, derived from the sample period.
    pub fn frame_rate(&self) -> Option<f64> {
        (self.h > 0.0).then(|| 1.0 / f64::from(self.h))
    }

    /// Capture start time, if the timestamp is representable.
    ///
    /// The microsecond part must be below one second.
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        if self.timestamp_micros >= 1_000_000 {
            return None;
        }
        let secs = i64::try_from(self.timestamp_secs).ok()?;
        DateTime::from_timestamp(secs, self.timestamp_micros * 1000)
    }
}

fn read_vec3(cursor: &mut ByteCursor<'_>) -> Result<[f32; 3]> {
    Ok([cursor.read_f32()?, cursor.read_f32()?, cursor.read_f32()?])
}
