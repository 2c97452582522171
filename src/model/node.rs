//! Tree node type for annotated Newick trees.

use crate::model::lookup_table::TaxonRecord;

/// Index of a node in a tree (arena).
pub type NodeIndex = usize;

// =#========================================================================#=
// NODE STATS
// =#========================================================================#=
/// Statistics copied onto a node from its matching [TaxonRecord].
///
/// Either all four values are present on a node or none is: a record that
/// lacks a value yields `0.0` for it, while a node without matching record
/// has no [NodeStats] at all.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NodeStats {
    pub estimate: f64,
    pub scaled_estimate: f64,
    pub lwr_95: f64,
    pub upr_95: f64,
}

impl NodeStats {
    /// Copies the statistics of `record`, with missing (or NaN) values set to `0.0`.
    pub fn from_record(record: &TaxonRecord) -> Self {
        NodeStats {
            estimate: or_zero(record.estimate),
            scaled_estimate: or_zero(record.scaled_estimate),
            lwr_95: or_zero(record.lwr_95),
            upr_95: or_zero(record.upr_95),
        }
    }
}

fn or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| !v.is_nan()).unwrap_or(0.0)
}

// =#========================================================================#=
// NODE
// =#========================================================================#=
/// A node of an [AnnotatedTree](crate::model::AnnotatedTree).
///
/// Nodes with `children` set are internal (or the root), all others leaves.
/// All other fields are optional and filled in while parsing:
/// * `name` - decoded taxon name, without common name and OTT suffix
/// * `common` - common name, set whenever a label was parsed
/// * `ott` - Open Tree Taxonomy id digits
/// * `length` - branch length to the parent; `NaN` if unparsable
/// * `stats` - statistics from a matching lookup table record
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    index: NodeIndex,
    children: Option<Vec<NodeIndex>>,
    name: Option<String>,
    common: Option<String>,
    ott: Option<String>,
    length: Option<f64>,
    stats: Option<NodeStats>,
}

impl Node {
    /// Creates a new node without children or data.
    pub(crate) fn new(index: NodeIndex) -> Self {
        Node {
            index,
            children: None,
            name: None,
            common: None,
            ott: None,
            length: None,
            stats: None,
        }
    }

    pub fn index(&self) -> NodeIndex {
        self.index
    }

    /// Returns the indices of the children in document order,
    /// or `None` for a leaf.
    pub fn children(&self) -> Option<&[NodeIndex]> {
        self.children.as_deref()
    }

    /// Returns the number of children (`0` for a leaf).
    pub fn num_children(&self) -> usize {
        self.children.as_ref().map_or(0, |c| c.len())
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    pub fn is_internal(&self) -> bool {
        self.children.is_some()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn common(&self) -> Option<&str> {
        self.common.as_deref()
    }

    pub fn ott(&self) -> Option<&str> {
        self.ott.as_deref()
    }

    /// Returns the branch length, which is `NaN` if the literal in the
    /// Newick string was not a number.
    pub fn length(&self) -> Option<f64> {
        self.length
    }

    /// Returns whether a branch length is set and is a number.
    pub fn has_valid_length(&self) -> bool {
        self.length.is_some_and(|l| !l.is_nan())
    }

    /// Returns the annotated statistics, or `None` if the name of this node
    /// had no entry in the lookup table.
    pub fn stats(&self) -> Option<&NodeStats> {
        self.stats.as_ref()
    }

    pub fn estimate(&self) -> Option<f64> {
        self.stats.map(|s| s.estimate)
    }

    pub fn scaled_estimate(&self) -> Option<f64> {
        self.stats.map(|s| s.scaled_estimate)
    }

    pub fn lwr_95(&self) -> Option<f64> {
        self.stats.map(|s| s.lwr_95)
    }

    pub fn upr_95(&self) -> Option<f64> {
        self.stats.map(|s| s.upr_95)
    }

    /// Appends a child index.
    pub(crate) fn push_child(&mut self, child: NodeIndex) {
        self.children.get_or_insert_with(Vec::new).push(child);
    }

    /// Replaces all children with the single given child.
    ///
    /// # Returns
    /// Whether children were replaced (and not just set).
    pub(crate) fn set_only_child(&mut self, child: NodeIndex) -> bool {
        self.children.replace(vec![child]).is_some()
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = Some(name);
    }

    pub(crate) fn set_common(&mut self, common: String) {
        self.common = Some(common);
    }

    pub(crate) fn set_ott(&mut self, ott: String) {
        self.ott = Some(ott);
    }

    pub(crate) fn set_length(&mut self, length: f64) {
        self.length = Some(length);
    }

    pub(crate) fn set_stats(&mut self, stats: NodeStats) {
        self.stats = Some(stats);
    }
}
