//! Shared fixtures for take-level tests.
//!
//! [`TakeTree`] lays out a temporary `YYYY-MM-DD/NNNN` take root with a
//! stream and definition in each take folder.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use shadowtake_stream::header::SIGNATURE;
use shadowtake_stream::{FORMAT_VERSION, HEADER_SIZE, SAMPLE_WIDTH};
use tempfile::TempDir;

/// Encode a version 4 stream with the given node table and frames.
pub fn encode_stream(nodes: &[(&str, &[&str])], frames: &[&[f32]], h: f32) -> Vec<u8> {
    let channels: usize = nodes.iter().map(|(_, c)| c.len()).sum();

    let mut out = Vec::new();
    put_u32(&mut out, SIGNATURE[0]);
    put_u32(&mut out, SIGNATURE[1]);
    put_u32(&mut out, FORMAT_VERSION);
    out.extend_from_slice(&[0x42; 16]);
    put_u32(&mut out, nodes.len() as u32);
    put_u32(&mut out, (channels * SAMPLE_WIDTH) as u32);
    put_u32(&mut out, frames.len() as u32);
    put_u32(&mut out, 0);
    out.extend_from_slice(&h.to_le_bytes());
    out.extend_from_slice(&[0; 24]);
    out.extend_from_slice(&1_561_507_200u64.to_le_bytes());
    put_u32(&mut out, 250_000);
    put_u32(&mut out, 0);
    out.resize(HEADER_SIZE, 0);

    for (name, node_channels) in nodes {
        put_string(&mut out, name);
        put_u32(&mut out, node_channels.len() as u32);
        for c in *node_channels {
            put_string(&mut out, c);
        }
    }
    for frame in frames {
        for v in *frame {
            out.extend_from_slice(&v.to_le_bytes());
        }
    }
    out
}

fn put_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn put_string(out: &mut Vec<u8>, s: &str) {
    put_u32(out, s.len() as u32);
    out.extend_from_slice(s.as_bytes());
}

/// Encode a version 3 stream with `key:u32 mask:u32` node records.
pub fn encode_keyed_stream(nodes: &[(u32, u32)], channels: usize, frames: &[&[f32]]) -> Vec<u8> {
    let mut out = Vec::new();
    put_u32(&mut out, SIGNATURE[0]);
    put_u32(&mut out, SIGNATURE[1]);
    put_u32(&mut out, 3);
    out.extend_from_slice(&[0x42; 16]);
    put_u32(&mut out, nodes.len() as u32);
    put_u32(&mut out, (channels * SAMPLE_WIDTH) as u32);
    put_u32(&mut out, frames.len() as u32);
    put_u32(&mut out, nodes.iter().fold(0, |acc, (_, mask)| acc | mask));
    out.extend_from_slice(&0.01f32.to_le_bytes());
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

/// The "Hips" take: X/Y/Z over two frames at 100 Hz.
pub fn hips_stream() -> Vec<u8> {
    encode_stream(
        &[("Hips", &["X", "Y", "Z"])],
        &[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]],
        0.01,
    )
}

/// Definition naming Hips X and Z, plus a node the stream lacks.
pub const HIPS_DEFINITION: &str = r#"{
    "items": [
        { "id": "Hips", "channel": ["X", "Z"] },
        { "id": "Head", "channel": ["X"] }
    ]
}"#;

/// Temporary take root.
pub struct TakeTree {
    pub dir: TempDir,
}

impl TakeTree {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create take root"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Create `date/number` with the given stream and optional definition.
    pub fn add_take(
        &self,
        date: &str,
        number: &str,
        stream: &[u8],
        definition: Option<&str>,
    ) -> PathBuf {
        let take = self.root().join(date).join(number);
        std::fs::create_dir_all(&take).expect("failed to create take folder");
        std::fs::write(take.join("data.mStream"), stream).expect("failed to write stream");
        if let Some(definition) = definition {
            std::fs::write(take.join("take.mTake"), definition)
                .expect("failed to write definition");
        }
        take
    }

    /// Write a config file pointing at this root.
    pub fn write_config(&self, extra: &str) -> PathBuf {
        let path = self.root().join("shadowtake.toml");
        let root = self.root().display().to_string().replace('\\', "/");
        std::fs::write(&path, format!("[takes]\nroot = \"{}\"\n{}", root, extra))
            .expect("failed to write config");
        path
    }
}
