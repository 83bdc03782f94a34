//! Fixed channel table of keyed (version 2 and 3) streams
//!
//! Keyed streams do not name their channels. Each node record carries a
//! bitmask instead, where bit `j` enables entry `j` of [`CHANNEL_TABLE`].
//! Active channels are laid out in bit order, each taking as many columns as
//! it has components.

/// One entry of the channel table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelKind {
    /// Channel group name as used by the Shadow software (e.g. "Gq")
    pub name: &'static str,
    /// Component suffixes, one per column. Scalars have a single empty suffix.
    pub components: &'static [&'static str],
}

impl ChannelKind {
    /// Number of columns the channel occupies.
    pub fn stride(&self) -> usize {
        self.components.len()
    }

    /// Column names, `group.component` or just `group` for scalars.
    pub fn column_names(&self) -> impl Iterator<Item = String> + '_ {
        self.components.iter().map(move |c| {
            if c.is_empty() {
                self.name.to_string()
            } else {
                format!("{}.{}", self.name, c)
            }
        })
    }
}

const SCALAR: &[&str] = &[""];
const VEC3: &[&str] = &["x", "y", "z"];
const VEC4: &[&str] = &["x", "y", "z", "w"];
const QUAT: &[&str] = &["w", "x", "y", "z"];

const fn kind(name: &'static str, components: &'static [&'static str]) -> ChannelKind {
    ChannelKind { name, components }
}

/// Channel kinds indexed by mask bit.
pub const CHANNEL_TABLE: [ChannelKind; 28] = [
    kind("Gq", QUAT),
    kind("Gdq", QUAT),
    kind("Lq", QUAT),
    kind("r", VEC3),
    kind("la", VEC3),
    kind("lv", VEC3),
    kind("lt", VEC3),
    kind("c", VEC4),
    kind("a", VEC3),
    kind("m", VEC3),
    kind("g", VEC3),
    kind("temp", SCALAR),
    kind("A", VEC3),
    kind("M", VEC3),
    kind("G", VEC3),
    kind("Temp", SCALAR),
    kind("dt", SCALAR),
    kind("timestamp", SCALAR),
    kind("systemtime", SCALAR),
    kind("ea", SCALAR),
    kind("em", SCALAR),
    kind("eg", SCALAR),
    kind("eq", SCALAR),
    kind("ec", SCALAR),
    kind("p", VEC4),
    kind("atm", SCALAR),
    kind("elev", SCALAR),
    kind("Bq", QUAT),
];

/// Bits of a node mask that name a channel in [`CHANNEL_TABLE`].
pub const KNOWN_MASK: u32 = (1 << CHANNEL_TABLE.len()) - 1;

/// Active channel kinds of a node mask, in column order.
pub fn active_channels(mask: u32) -> impl Iterator<Item = &'static ChannelKind> {
    CHANNEL_TABLE
        .iter()
        .enumerate()
        .filter(move |(bit, _)| mask & (1 << bit) != 0)
        .map(|(_, kind)| kind)
}

/// Column names of every active channel of a node mask, in column order.
pub fn expand_mask(mask: u32) -> Vec<String> {
    active_channels(mask)
        .flat_map(ChannelKind::column_names)
        .collect()
}

/// Channel group of a column name: the part before the first `.`.
pub fn group_of(column: &str) -> &str {
    column.split_once('.').map_or(column, |(group, _)| group)
}
