//! Test fixtures: builds take stream buffers byte by byte.

#![allow(dead_code)]

use shadowtake_stream::header::SIGNATURE;
use shadowtake_stream::{CHANNEL_TABLE, FORMAT_VERSION, HEADER_SIZE, SAMPLE_WIDTH};

/// Builder for mStream buffers.
pub struct StreamBuilder {
    pub version: u32,
    pub nodes: Vec<(String, Vec<String>)>,
    pub frames: Vec<Vec<f32>>,
    /// Overrides the frame count written to the header
    pub frame_count: Option<u32>,
    /// Overrides the frame stride written to the header
    pub frame_stride: Option<u32>,
    pub h: f32,
}

impl StreamBuilder {
    pub fn new() -> Self {
        Self {
            version: FORMAT_VERSION,
            nodes: Vec::new(),
            frames: Vec::new(),
            frame_count: None,
            frame_stride: None,
            h: 0.01,
        }
    }

    pub fn node(mut self, name: &str, channels: &[&str]) -> Self {
        self.nodes.push((
            name.to_string(),
            channels.iter().map(|c| c.to_string()).collect(),
        ));
        self
    }

    pub fn frame(mut self, samples: &[f32]) -> Self {
        self.frames.push(samples.to_vec());
        self
    }

    pub fn frame_count(mut self, count: u32) -> Self {
        self.frame_count = Some(count);
        self
    }

    pub fn frame_stride(mut self, stride: u32) -> Self {
        self.frame_stride = Some(stride);
        self
    }

    pub fn channel_count(&self) -> usize {
        self.nodes.iter().map(|(_, c)| c.len()).sum()
    }

    /// Encoded length of the header plus node table.
    pub fn preamble_len(&self) -> usize {
        self.build().len() - self.frames.iter().map(|f| f.len() * SAMPLE_WIDTH).sum::<usize>()
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();
        put_u32(&mut out, SIGNATURE[0]);
        put_u32(&mut out, SIGNATURE[1]);
        put_u32(&mut out, self.version);
        out.extend_from_slice(&[0x11; 16]);
        put_u32(&mut out, self.nodes.len() as u32);
        put_u32(
            &mut out,
            self.frame_stride
                .unwrap_or((self.channel_count() * SAMPLE_WIDTH) as u32),
        );
        put_u32(&mut out, self.frame_count.unwrap_or(self.frames.len() as u32));
        put_u32(&mut out, 0);
        for v in [self.h, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0] {
            out.extend_from_slice(&v.to_le_bytes());
        }
        out.extend_from_slice(&1_561_507_200u64.to_le_bytes());
        put_u32(&mut out, 0);
        put_u32(&mut out, 0);
        out.resize(HEADER_SIZE, 0);

        for (name, channels) in &self.nodes {
            put_string(&mut out, name);
            put_u32(&mut out, channels.len() as u32);
            for c in channels {
                put_string(&mut out, c);
            }
        }

        for frame in &self.frames {
            for v in frame {
                out.extend_from_slice(&v.to_le_bytes());
            }
        }
        out
    }
}

fn put_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn put_string(out: &mut Vec<u8>, s: &str) {
    put_u32(out, s.len() as u32);
    out.extend_from_slice(s.as_bytes());
}

/// Single "Hips" node with X/Y/Z and two frames: [[1,2,3],[4,5,6]].
pub fn hips_stream() -> StreamBuilder {
    StreamBuilder::new()
        .node("Hips", &["X", "Y", "Z"])
        .frame(&[1.0, 2.0, 3.0])
        .frame(&[4.0, 5.0, 6.0])
}

/// A small skeleton with a duplicate node name.
pub fn skeleton_stream() -> StreamBuilder {
    StreamBuilder::new()
        .node("Hips", &["Gq.w", "Gq.x", "Gq.y", "Gq.z"])
        .node("LeftLeg", &["Gq.w", "Gq.x", "Gq.y", "Gq.z", "c.x", "c.y"])
        .node("Sensor", &["a.x", "a.y", "a.z"])
        .node("Sensor", &["a.x"])
        .frame(&(0..14).map(|i| i as f32).collect::<Vec<_>>())
        .frame(&(100..114).map(|i| i as f32).collect::<Vec<_>>())
        .frame(&(200..214).map(|i| i as f32).collect::<Vec<_>>())
}

/// Encode a keyed (version 2 or 3) stream: the 128 byte header, one
/// `key:u32 mask:u32` pair per node, then the frames. The stride is computed
/// from the masks unless overridden.
pub fn keyed_stream(
    version: u32,
    nodes: &[(u32, u32)],
    frames: &[&[f32]],
    frame_count: u32,
    frame_stride: Option<u32>,
) -> Vec<u8> {
    let channels: usize = nodes
        .iter()
        .map(|(_, mask)| {
            CHANNEL_TABLE
                .iter()
                .enumerate()
                .filter(|(bit, _)| mask & (1 << bit) != 0)
                .map(|(_, kind)| kind.stride())
                .sum::<usize>()
        })
        .sum();
    let stride = frame_stride.unwrap_or((channels * SAMPLE_WIDTH) as u32);

    let mut out = Vec::new();
    put_u32(&mut out, SIGNATURE[0]);
    put_u32(&mut out, SIGNATURE[1]);
    put_u32(&mut out, version);
    out.extend_from_slice(&[0x22; 16]);
    put_u32(&mut out, nodes.len() as u32);
    put_u32(&mut out, stride);
    put_u32(&mut out, frame_count);
    let channel_mask = nodes.iter().fold(0, |acc, (_, mask)| acc | mask);
    put_u32(&mut out, channel_mask);
    for v in [0.01f32, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0] {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out.extend_from_slice(&1_561_507_200u64.to_le_bytes());
    put_u32(&mut out, 0);
    put_u32(&mut out, 0);
    out.resize(HEADER_SIZE, 0);

    for (key, mask) in nodes {
        put_u32(&mut out, *key);
        put_u32(&mut out, *mask);
    }
    for frame in frames {
        for v in *frame {
            out.extend_from_slice(&v.to_le_bytes());
        }
    }
    out
}
