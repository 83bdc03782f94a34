//! Loading a take folder and reading samples by name.

use anyhow::{Context, Result};
use shadowtake_stream::{
    decode_stream, name_nodes, DecodedStream, FramePool, NodeDescriptor, NodeMap, StreamHeader,
    TakeDefinition,
};
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::definition::load_definition;
use crate::locator::TakeFiles;

/// A decoded take: stream data plus the name lookup built from its
/// definition.
#[derive(Debug, Clone)]
pub struct Take {
    dir: PathBuf,
    stream: DecodedStream,
    definition: TakeDefinition,
    node_map: NodeMap,
}

impl Take {
    /// Open the take in `dir` using the standard file names.
    pub fn open(dir: &Path) -> Result<Self> {
        Self::open_files(&TakeFiles::new(dir))
    }

    /// Open a take from explicit file paths.
    ///
    /// A missing definition file is not an error: the take still decodes,
    /// but its node map is empty and only raw columns are addressable.
    pub fn open_files(files: &TakeFiles) -> Result<Self> {
        tracing::info!("Opening take {}", files.dir.display());

        let bytes = std::fs::read(&files.stream)
            .with_context(|| format!("Failed to read take stream: {:?}", files.stream))?;
        let stream = decode_stream(&bytes)
            .with_context(|| format!("Failed to decode take stream: {:?}", files.stream))?;

        let definition = if files.definition.exists() {
            load_definition(&files.definition)
                .with_context(|| format!("Failed to load take definition: {:?}", files.definition))?
        } else {
            tracing::warn!(
                "Take definition not found at {:?}, channels are only addressable by column",
                files.definition
            );
            TakeDefinition::default()
        };

        Ok(Self::from_parts(files.dir.clone(), stream, definition))
    }

    /// Assemble a take from an already decoded stream and definition.
    ///
    /// Nodes of keyed streams are named from the definition.
    pub fn from_parts(dir: PathBuf, mut stream: DecodedStream, definition: TakeDefinition) -> Self {
        let node_map = NodeMap::build(&stream.nodes, &definition);
        name_nodes(&mut stream.nodes, &definition);
        tracing::debug!(
            frames = stream.frame_count(),
            channels = stream.channel_count(),
            mapped = node_map.len(),
            "Loaded take"
        );

        Self {
            dir,
            stream,
            definition,
            node_map,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn header(&self) -> &StreamHeader {
        &self.stream.header
    }

    pub fn nodes(&self) -> &[NodeDescriptor] {
        &self.stream.nodes
    }

    pub fn frames(&self) -> &FramePool {
        &self.stream.frames
    }

    pub fn definition(&self) -> &TakeDefinition {
        &self.definition
    }

    pub fn node_map(&self) -> &NodeMap {
        &self.node_map
    }

    pub fn stream(&self) -> &DecodedStream {
        &self.stream
    }

    /// Column of a named channel.
    pub fn column(&self, node: &str, channel: &str) -> Option<usize> {
        self.node_map.get(node, channel)
    }

    /// Columns of a channel group, e.g. `range("Hips", "Gq")`.
    pub fn range(&self, node: &str, group: &str) -> Option<Range<usize>> {
        self.node_map.range(node, group)
    }

    /// One sample by frame index and channel name.
    pub fn sample(&self, frame: usize, node: &str, channel: &str) -> Option<f32> {
        self.frames().get(frame, self.column(node, channel)?)
    }

    /// One channel across every frame.
    pub fn series(&self, node: &str, channel: &str) -> Option<Vec<f32>> {
        let column = self.column(node, channel)?;
        Some(self.frames().column(column).collect())
    }

    /// Recording length, if the header carries a sample period.
    pub fn duration(&self) -> Option<Duration> {
        let rate = self.header().frame_rate()?;
        Duration::try_from_secs_f64(self.frames().frame_count() as f64 / rate).ok()
    }
}
