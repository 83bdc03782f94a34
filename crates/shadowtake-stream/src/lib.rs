//! # shadowtake-stream
//!
//! Decoder for Shadow motion capture take streams (`data.mStream`).
//!
//! A take stream is a fixed 128 byte header, a node table describing every
//! tracked node and its channels, and a dense pool of `f32` frame samples.
//! Version 4 names nodes and channels in the node table. Versions 2 and 3
//! store a key and a channel bitmask per node, expanded through
//! [`CHANNEL_TABLE`].
//!
//! This crate decodes all three from an in-memory buffer and joins the node
//! table against a take definition so samples can be addressed by name.
//!
//! ## Features
//!
//! - `serialize` - `serde` support for the decoded types
//! - `tracing` - debug events while decoding
//!
//! ## Example
//!
//! ```no_run
//! use shadowtake_stream::{decode_stream, DefinitionNode, NodeMap, TakeDefinition};
//!
//! let bytes = std::fs::read("take/2019-06-26/0001/data.mStream").unwrap();
//! let stream = decode_stream(&bytes).unwrap();
//!
//! let definition = TakeDefinition::new(vec![DefinitionNode::new("Hips", ["Gq.w"])]);
//! let map = NodeMap::build(&stream.nodes, &definition);
//!
//! if let Some(column) = map.get("Hips", "Gq.w") {
//!     for (t, frame) in stream.frames.frames().enumerate() {
//!         println!("{} {}", t, frame[column]);
//!     }
//! }
//! ```

pub mod channel;
pub mod cursor;
pub mod decode;
pub mod error;
pub mod header;
pub mod map;
pub mod node;
pub mod pool;

pub use cursor::ByteCursor;
pub use decode::{decode_stream, DecodedStream};
pub use error::{Result, StreamError};
pub use channel::{ChannelKind, CHANNEL_TABLE};
pub use header::{
    NodeLayout, StreamHeader, FORMAT_VERSION, FRAME_COUNT_UNKNOWN, HEADER_SIZE, KEYED_VERSIONS,
    SAMPLE_WIDTH,
};
pub use map::{name_nodes, resolve_node_names, ChannelEntry, DefinitionNode, NodeMap, TakeDefinition};
pub use node::NodeDescriptor;
pub use pool::FramePool;
