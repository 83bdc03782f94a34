//! Name-based addressing of frame columns
//!
//! The stream only knows nodes and channels by their position in the node
//! table. A take definition lists the nodes and channels a consumer cares
//! about by name; [`NodeMap::build`] joins the two into a lookup from
//! `(node, channel)` to an absolute column of the [`FramePool`].
//!
//! Keyed streams (versions 2 and 3) carry no node names at all. Their nodes
//! take the name of the definition entry with the same key, or failing that
//! the entry at the same position in the definition.
//!
//! [`FramePool`]: crate::FramePool

use std::collections::HashMap;
use std::ops::Range;

use crate::node::NodeDescriptor;

/// One node entry of a take definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct DefinitionNode {
    pub name: String,
    /// Node key, matched against keyed stream nodes
    pub key: Option<u32>,
    /// Channel identifiers in definition order
    pub channels: Vec<String>,
}

impl DefinitionNode {
    pub fn new<N, I, C>(name: N, channels: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        Self {
            name: name.into(),
            key: None,
            channels: channels.into_iter().map(Into::into).collect(),
        }
    }

    pub fn with_key(mut self, key: u32) -> Self {
        self.key = Some(key);
        self
    }
}

/// The part of a take definition the node map depends on: an ordered list
/// of nodes, each with an ordered list of channel names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct TakeDefinition {
    pub nodes: Vec<DefinitionNode>,
}

impl TakeDefinition {
    pub fn new(nodes: Vec<DefinitionNode>) -> Self {
        Self { nodes }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl FromIterator<DefinitionNode> for TakeDefinition {
    fn from_iter<T: IntoIterator<Item = DefinitionNode>>(iter: T) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

/// A resolved `(node, channel) -> column` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelEntry {
    pub node: String,
    pub channel: String,
    pub column: usize,
}

/// Lookup from node and channel name to a frame column.
///
/// Entries keep definition order for enumeration. Definition entries with no
/// counterpart in the stream are left out, so the map covers at most the
/// intersection of the definition and the stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeMap {
    entries: Vec<ChannelEntry>,
    index: HashMap<String, HashMap<String, usize>>,
    groups: HashMap<String, HashMap<String, Range<usize>>>,
}

impl NodeMap {
    /// Join a take definition against the stream's node table.
    ///
    /// Rules:
    /// - a definition node matches the first stream node with the same name
    ///   (keyed nodes are named by [`resolve_node_names`] first)
    /// - a definition channel matches the first channel of that node with the
    ///   same name
    /// - a keyed node also accepts a channel group name (`Gq`) for all of the
    ///   group's columns, and maps every channel when the definition lists none
    /// - unmatched nodes and channels are skipped
    /// - a `(node, channel)` pair listed twice keeps its first entry
    pub fn build(nodes: &[NodeDescriptor], definition: &TakeDefinition) -> Self {
        let names = resolve_node_names(nodes, definition);
        let mut map = Self::default();

        for def in &definition.nodes {
            let Some(position) = names.iter().position(|n| *n == Some(def.name.as_str())) else {
                #[cfg(feature = "tracing")]
                tracing::trace!(node = %def.name, "Definition node not present in stream");
                continue;
            };
            let node = &nodes[position];
            map.insert_groups(&def.name, node);

            if !node.is_named() && def.channels.is_empty() {
                for (i, channel) in node.channels.iter().enumerate() {
                    map.insert(&def.name, channel, node.offset + i);
                }
                continue;
            }

            for channel in &def.channels {
                if let Some(column) = node.column_of(channel) {
                    map.insert(&def.name, channel, column);
                    continue;
                }

                let group = if node.is_named() { None } else { node.group(channel) };
                match group {
                    Some(columns) => {
                        for column in columns {
                            map.insert(&def.name, &node.channels[column - node.offset], column);
                        }
                    }
                    None => {
                        #[cfg(feature = "tracing")]
                        tracing::trace!(
                            node = %def.name,
                            channel = %channel,
                            "Definition channel not present in stream"
                        );
                    }
                }
            }
        }

        map
    }

    fn insert_groups(&mut self, node: &str, descriptor: &NodeDescriptor) {
        if self.groups.contains_key(node) {
            return;
        }
        let mut groups = HashMap::new();
        for (group, columns) in descriptor.groups() {
            groups.entry(group.to_owned()).or_insert(columns);
        }
        self.groups.insert(node.to_owned(), groups);
    }

    fn insert(&mut self, node: &str, channel: &str, column: usize) {
        let channels = self.index.entry(node.to_owned()).or_default();
        if channels.contains_key(channel) {
            return;
        }
        channels.insert(channel.to_owned(), column);
        self.entries.push(ChannelEntry {
            node: node.to_owned(),
            channel: channel.to_owned(),
            column,
        });
    }

    /// Column of a channel, if the map has it.
    pub fn get(&self, node: &str, channel: &str) -> Option<usize> {
        self.index.get(node)?.get(channel).copied()
    }

    /// Columns of a channel group of a mapped node, e.g. `("Hips", "Gq")`
    /// gives the four quaternion columns.
    pub fn range(&self, node: &str, group: &str) -> Option<Range<usize>> {
        self.groups.get(node)?.get(group).cloned()
    }

    pub fn contains(&self, node: &str, channel: &str) -> bool {
        self.get(node, channel).is_some()
    }

    /// All entries in definition order.
    pub fn iter(&self) -> std::slice::Iter<'_, ChannelEntry> {
        self.entries.iter()
    }

    /// Entries belonging to one node.
    pub fn channels_of<'a>(&'a self, node: &'a str) -> impl Iterator<Item = &'a ChannelEntry> + 'a {
        self.entries.iter().filter(move |e| e.node == node)
    }

    /// Distinct node names in definition order.
    pub fn node_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !names.contains(&entry.node.as_str()) {
                names.push(&entry.node);
            }
        }
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The name of every stream node, in stream order.
///
/// Named nodes keep their own name. A keyed node takes the name of the first
/// definition entry with its key, else the entry at its position provided
/// that entry has no conflicting key. Nodes with neither are `None`.
pub fn resolve_node_names<'a>(
    nodes: &'a [NodeDescriptor],
    definition: &'a TakeDefinition,
) -> Vec<Option<&'a str>> {
    nodes
        .iter()
        .enumerate()
        .map(|(position, node)| {
            if node.is_named() {
                return Some(node.name.as_str());
            }
            let by_key = node
                .key
                .and_then(|key| definition.nodes.iter().find(|d| d.key == Some(key)));
            let by_position = || {
                definition
                    .nodes
                    .get(position)
                    .filter(|d| d.key.is_none() || d.key == node.key)
            };
            by_key
                .or_else(by_position)
                .map(|d| d.name.as_str())
                .filter(|name| !name.is_empty())
        })
        .collect()
}

/// Fill in the names of keyed nodes from a take definition.
pub fn name_nodes(nodes: &mut [NodeDescriptor], definition: &TakeDefinition) {
    let names: Vec<Option<String>> = resolve_node_names(nodes, definition)
        .into_iter()
        .map(|n| n.map(str::to_owned))
        .collect();
    for (node, name) in nodes.iter_mut().zip(names) {
        if node.is_named() {
            continue;
        }
        if let Some(name) = name {
            node.name = name;
        }
    }
}

impl<'a> IntoIterator for &'a NodeMap {
    type Item = &'a ChannelEntry;
    type IntoIter = std::slice::Iter<'a, ChannelEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(feature = "serialize")]
impl serde::Serialize for NodeMap {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.entries)
    }
}
