//! Whole-buffer stream decoding

use crate::cursor::ByteCursor;
use crate::error::{Result, StreamError};
use crate::header::{NodeLayout, StreamHeader, SAMPLE_WIDTH};
use crate::node::{read_keyed_node_table, read_node_table, NodeDescriptor};
use crate::pool::FramePool;

/// A fully decoded take stream.
///
/// Only produced when every structural check passes, so the three parts are
/// always consistent with each other.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct DecodedStream {
    pub header: StreamHeader,
    pub nodes: Vec<NodeDescriptor>,
    pub frames: FramePool,
}

impl DecodedStream {
    /// Total number of channels across all nodes.
    pub fn channel_count(&self) -> usize {
        self.frames.channel_count()
    }

    /// Number of frames, resolved from the header or the data length.
    pub fn frame_count(&self) -> usize {
        self.frames.frame_count()
    }

    /// First node with the given name.
    pub fn node(&self, name: &str) -> Option<&NodeDescriptor> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn into_parts(self) -> (StreamHeader, Vec<NodeDescriptor>, FramePool) {
        (self.header, self.nodes, self.frames)
    }
}

/// Decode a complete mStream buffer.
///
/// Version 4 streams name their nodes and channels in the node table.
/// Versions 2 and 3 list `key:u32 mask:u32` per node instead; channel names
/// come from the channel table and node names are left empty for the take
/// definition to fill in (see [`NodeMap::build`]).
///
/// [`NodeMap::build`]: crate::NodeMap::build
///
/// # Errors
///
/// - [`StreamError::Truncated`] if the buffer ends inside the header, the
///   node table, or the declared frame data
/// - [`StreamError::StructuralMismatch`] if the node table disagrees with
///   the header's frame stride, or data follows the declared frames
/// - [`StreamError::UnalignedFrameData`] if the frame count must be derived
///   and the data is not a whole number of frames
/// - [`StreamError::InvalidSignature`], [`StreamError::UnsupportedVersion`]
///   and [`StreamError::InvalidUtf8`] for malformed headers and names
pub fn decode_stream(data: &[u8]) -> Result<DecodedStream> {
    let mut cursor = ByteCursor::new(data);

    let header = StreamHeader::read(&mut cursor)?;
    #[cfg(feature = "tracing")]
    tracing::debug!(
        version = header.version,
        uuid = %header.uuid,
        node_count = header.node_count,
        frame_stride = header.frame_stride,
        frame_count = header.frame_count,
        "Decoded take stream header"
    );

    let table_start = cursor.position();
    let node_count = header.node_count as usize;
    let (nodes, channel_count) = match header.node_layout() {
        NodeLayout::Named => read_node_table(&mut cursor, node_count)?,
        NodeLayout::Keyed => read_keyed_node_table(&mut cursor, node_count)?,
    };
    #[cfg(feature = "tracing")]
    tracing::debug!(
        nodes = nodes.len(),
        channels = channel_count,
        table_bytes = cursor.position() - table_start,
        "Decoded node table"
    );

    match header.declared_channel_count() {
        Some(declared) if declared == channel_count => {}
        _ => {
            return Err(StreamError::mismatch(
                table_start,
                format!(
                    "node table has {} channels ({} bytes per frame) but header frame stride is {} bytes",
                    channel_count,
                    channel_count * SAMPLE_WIDTH,
                    header.frame_stride
                ),
            ));
        }
    }

    let data_start = cursor.position();
    let frame_bytes = channel_count * SAMPLE_WIDTH;
    let frame_count = match header.declared_frame_count() {
        Some(count) => {
            let needed = count.checked_mul(frame_bytes).ok_or_else(|| {
                StreamError::mismatch(data_start, format!("frame count {} overflows", count))
            })?;
            if cursor.remaining() < needed {
                return Err(StreamError::Truncated {
                    offset: data_start,
                    needed,
                    available: cursor.remaining(),
                });
            }
            if cursor.remaining() > needed {
                return Err(StreamError::mismatch(
                    data_start + needed,
                    format!(
                        "{} trailing bytes after {} declared frames",
                        cursor.remaining() - needed,
                        count
                    ),
                ));
            }
            count
        }
        None => {
            let count = derive_frame_count(cursor.remaining(), frame_bytes)?;
            #[cfg(feature = "tracing")]
            tracing::debug!(frame_count = count, "Derived frame count from data length");
            count
        }
    };

    let frames = FramePool::from_le_bytes(cursor.read_rest(), frame_count, channel_count);

    Ok(DecodedStream {
        header,
        nodes,
        frames,
    })
}

fn derive_frame_count(data_bytes: usize, frame_bytes: usize) -> Result<usize> {
    if frame_bytes == 0 {
        return if data_bytes == 0 {
            Ok(0)
        } else {
            Err(StreamError::UnalignedFrameData {
                data_bytes,
                frame_bytes,
            })
        };
    }
    if data_bytes % frame_bytes != 0 {
        return Err(StreamError::UnalignedFrameData {
            data_bytes,
            frame_bytes,
        });
    }
    Ok(data_bytes / frame_bytes)
}
