//! Node table parsing

use std::ops::Range;

use crate::channel::{expand_mask, group_of};
use crate::cursor::ByteCursor;
use crate::error::{Result, StreamError};

/// One tracked entity in the stream and the columns its channels occupy.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeDescriptor {
    /// Node name (e.g. "Hips"); not guaranteed unique within a stream.
    /// Empty for keyed streams until a take definition names the node.
    pub name: String,
    /// Node key from a keyed stream's node table
    pub key: Option<u32>,
    /// Channel names in column order
    pub channels: Vec<String>,
    /// Column of the first channel within a frame record
    pub offset: usize,
}

impl NodeDescriptor {
    /// Whether the stream itself named this node.
    pub fn is_named(&self) -> bool {
        !self.name.is_empty()
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Columns this node occupies within a frame record.
    pub fn columns(&self) -> Range<usize> {
        self.offset..self.offset + self.channels.len()
    }

    /// Absolute column of a channel by name. First match wins.
    pub fn column_of(&self, channel: &str) -> Option<usize> {
        self.channels
            .iter()
            .position(|c| c == channel)
            .map(|i| self.offset + i)
    }

    /// Contiguous runs of channels sharing a group (`Gq` for `Gq.w..Gq.z`),
    /// with the absolute columns each run covers.
    pub fn groups(&self) -> Vec<(&str, Range<usize>)> {
        let mut groups: Vec<(&str, Range<usize>)> = Vec::new();
        for (i, channel) in self.channels.iter().enumerate() {
            let group = group_of(channel);
            let column = self.offset + i;
            if let Some((last, range)) = groups.last_mut() {
                if *last == group {
                    range.end = column + 1;
                    continue;
                }
            }
            groups.push((group, column..column + 1));
        }
        groups
    }

    /// Columns of the first channel group with this name.
    pub fn group(&self, name: &str) -> Option<Range<usize>> {
        self.groups()
            .into_iter()
            .find(|(group, _)| *group == name)
            .map(|(_, range)| range)
    }
}

/// Read `count` node records, assigning each the running channel offset.
///
/// Returns the descriptors and the total channel count.
pub fn read_node_table(
    cursor: &mut ByteCursor<'_>,
    count: usize,
) -> Result<(Vec<NodeDescriptor>, usize)> {
    // Every record needs at least a name length and a channel count.
    let mut nodes = Vec::with_capacity(count.min(cursor.remaining() / 8));
    let mut offset = 0usize;

    for _ in 0..count {
        let record_start = cursor.position();
        let name = cursor.read_string()?;
        if name.is_empty() {
            return Err(StreamError::mismatch(record_start, "empty node name"));
        }

        let channel_count = cursor.read_u32()? as usize;
        let mut channels = Vec::with_capacity(channel_count.min(cursor.remaining() / 4));
        for _ in 0..channel_count {
            channels.push(cursor.read_string()?);
        }

        nodes.push(NodeDescriptor {
            name,
            key: None,
            channels,
            offset,
        });
        offset += channel_count;
    }

    Ok((nodes, offset))
}

/// Read `count` keyed records (`key:u32 mask:u32`), expanding each mask
/// through the channel table.
///
/// Keyed nodes are unnamed; a take definition supplies their names.
/// Returns the descriptors and the total channel count.
pub fn read_keyed_node_table(
    cursor: &mut ByteCursor<'_>,
    count: usize,
) -> Result<(Vec<NodeDescriptor>, usize)> {
    let mut nodes = Vec::with_capacity(count.min(cursor.remaining() / 8));
    let mut offset = 0usize;

    for _ in 0..count {
        let key = cursor.read_u32()?;
        let mask = cursor.read_u32()?;
        let channels = expand_mask(mask);
        let channel_count = channels.len();

        nodes.push(NodeDescriptor {
            name: String::new(),
            key: Some(key),
            channels,
            offset,
        });
        offset += channel_count;
    }

    Ok((nodes, offset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn put_string(out: &mut Vec<u8>, s: &str) {
        out.extend_from_slice(&(s.len() as u32).to_le_bytes());
        out.extend_from_slice(s.as_bytes());
    }

    fn put_node(out: &mut Vec<u8>, name: &str, channels: &[&str]) {
        put_string(out, name);
        out.extend_from_slice(&(channels.len() as u32).to_le_bytes());
        for c in channels {
            put_string(out, c);
        }
    }

    #[test]
    fn test_offsets_accumulate() {
        let mut bytes = Vec::new();
        put_node(&mut bytes, "Hips", &["X", "Y", "Z"]);
        put_node(&mut bytes, "Chest", &[]);
        put_node(&mut bytes, "Head", &["W", "X"]);

        let mut cursor = ByteCursor::new(&bytes);
        let (nodes, total) = read_node_table(&mut cursor, 3).unwrap();

        assert!(cursor.is_empty());
        assert_eq!(total, 5);
        assert_eq!(nodes[0].columns(), 0..3);
        assert_eq!(nodes[1].columns(), 3..3);
        assert_eq!(nodes[2].columns(), 3..5);
        assert_eq!(nodes[2].column_of("X"), Some(4));
        assert_eq!(nodes[2].column_of("Z"), None);
    }

    #[test]
    fn test_duplicate_names_kept_in_order() {
        let mut bytes = Vec::new();
        put_node(&mut bytes, "Sensor", &["a"]);
        put_node(&mut bytes, "Sensor", &["a", "b"]);

        let (nodes, total) = read_node_table(&mut ByteCursor::new(&bytes), 2).unwrap();
        assert_eq!(total, 3);
        assert_eq!(nodes[0].name, nodes[1].name);
        assert_eq!(nodes[1].offset, 1);
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut bytes = Vec::new();
        put_node(&mut bytes, "Hips", &["X"]);
        let second = bytes.len();
        put_node(&mut bytes, "", &["X"]);

        let err = read_node_table(&mut ByteCursor::new(&bytes), 2).unwrap_err();
        assert_eq!(err.offset(), Some(second));
        assert_matches!(err, StreamError::StructuralMismatch { .. });
    }

    #[test]
    fn test_more_nodes_than_bytes_is_truncated() {
        let mut bytes = Vec::new();
        put_node(&mut bytes, "Hips", &["X"]);

        let err = read_node_table(&mut ByteCursor::new(&bytes), 2).unwrap_err();
        assert_matches!(err, StreamError::Truncated { .. });
    }

    #[test]
    fn test_huge_channel_count_is_truncated() {
        let mut bytes = Vec::new();
        put_string(&mut bytes, "Hips");
        bytes.extend_from_slice(&u32::MAX.to_le_bytes());

        let err = read_node_table(&mut ByteCursor::new(&bytes), 1).unwrap_err();
        assert_matches!(err, StreamError::Truncated { .. });
    }

    fn put_keyed(out: &mut Vec<u8>, key: u32, mask: u32) {
        out.extend_from_slice(&key.to_le_bytes());
        out.extend_from_slice(&mask.to_le_bytes());
    }

    #[test]
    fn test_keyed_table_expands_masks() {
        let mut bytes = Vec::new();
        put_keyed(&mut bytes, 1, 0x81); // Gq, c
        put_keyed(&mut bytes, 2, 0x181); // Gq, c, a

        let mut cursor = ByteCursor::new(&bytes);
        let (nodes, total) = read_keyed_node_table(&mut cursor, 2).unwrap();

        assert!(cursor.is_empty());
        assert_eq!(total, 19);
        assert!(!nodes[0].is_named());
        assert_eq!(nodes[0].key, Some(1));
        assert_eq!(nodes[1].key, Some(2));
        assert_eq!(nodes[0].group("Gq"), Some(0..4));
        assert_eq!(nodes[0].group("c"), Some(4..8));
        assert_eq!(nodes[1].group("Gq"), Some(8..12));
        assert_eq!(nodes[1].group("c"), Some(12..16));
        assert_eq!(nodes[1].group("a"), Some(16..19));
        assert_eq!(nodes[1].column_of("a.y"), Some(17));
    }

    #[test]
    fn test_keyed_table_truncated() {
        let mut bytes = Vec::new();
        put_keyed(&mut bytes, 1, 0x1);
        bytes.extend_from_slice(&7u32.to_le_bytes());

        let err = read_keyed_node_table(&mut ByteCursor::new(&bytes), 2).unwrap_err();
        assert_matches!(err, StreamError::Truncated { .. });
    }

    #[test]
    fn test_groups_of_named_channels() {
        let node = NodeDescriptor {
            name: "Hips".to_string(),
            key: None,
            channels: ["Gq.w", "Gq.x", "X", "temp"].iter().map(|c| c.to_string()).collect(),
            offset: 3,
        };
        let groups = node.groups();
        assert_eq!(groups, vec![("Gq", 3..5), ("X", 5..6), ("temp", 6..7)]);
        assert_eq!(node.group("Y"), None);
    }
}
