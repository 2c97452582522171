//! Provides the annotated tree representation.
//!
//! * [AnnotatedTree] - Rooted, ordered tree of [Node]s using the arena pattern
//! * [PreOrderIter], [PostOrderIter] - Traversals from the root
//! * Serialization into the nested form consumed by rendering code

use crate::model::node::{Node, NodeIndex};
use serde::ser::{Error as _, Serialize, SerializeMap, Serializer};
use serde_json::ser::{CompactFormatter, Formatter, PrettyFormatter};
use std::{fmt, io};

// =#========================================================================#=
// TREE
// =#========================================================================#=
/// A rooted, ordered tree of arbitrary arity represented using the arena
/// pattern on [Node].
///
/// Nodes are stored in a contiguous vector and referenced by [NodeIndex];
/// each node stores the indices of its children, and there are no back
/// references. The root is always the first node of the arena.
///
/// # Structure
/// - Children are ordered as they appear in the Newick string.
/// - Nodes without `children` are leaves.
/// - The arena may contain nodes that are no longer reachable from the root
///   (when a malformed string re-opened a group on a node with children).
///   All queries below only consider nodes reachable from the root.
///
/// # Example
/// ```
/// use taxatree::model::LookupTable;
/// use taxatree::newick::parse_str;
///
/// let tree = parse_str("(A,(B,C)D);", &LookupTable::new()).unwrap();
/// assert_eq!(tree.num_leaves(), 3);
/// let names: Vec<_> = tree.leaves().filter_map(|n| n.name()).collect();
/// assert_eq!(names, vec!["A", "B", "C"]);
/// ```
#[derive(Debug, Clone)]
pub struct AnnotatedTree {
    /// Nodes of this tree (arena pattern)
    nodes: Vec<Node>,
}

/// Index of the root in the arena.
const ROOT_INDEX: NodeIndex = 0;

// ============================================================================
// New, Construction (pub(crate)), Getters / Accessors (pub)
// ============================================================================
impl AnnotatedTree {
    /// Creates a new tree consisting only of an empty root node.
    ///
    /// # Arguments
    /// * `capacity` - Expected number of nodes, used to pre-allocate the arena
    pub fn new(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(1));
        nodes.push(Node::new(ROOT_INDEX));
        AnnotatedTree { nodes }
    }

    /// Adds a new node as last child of `parent` and returns its index.
    pub(crate) fn add_child(&mut self, parent: NodeIndex) -> NodeIndex {
        let index = self.push_node();
        self.nodes[parent].push_child(index);
        index
    }

    /// Adds a new node as the only child of `parent`, replacing any
    /// existing children, and returns its index together with whether
    /// children got replaced.
    pub(crate) fn add_only_child(&mut self, parent: NodeIndex) -> (NodeIndex, bool) {
        let index = self.push_node();
        let replaced = self.nodes[parent].set_only_child(index);
        (index, replaced)
    }

    fn push_node(&mut self) -> NodeIndex {
        let index = self.nodes.len();
        self.nodes.push(Node::new(index));
        index
    }

    pub(crate) fn node_mut(&mut self, index: NodeIndex) -> &mut Node {
        &mut self.nodes[index]
    }

    /// Returns a reference to the root node.
    pub fn root(&self) -> &Node {
        &self.nodes[ROOT_INDEX]
    }

    /// Returns the index of the root.
    pub fn root_index(&self) -> NodeIndex {
        ROOT_INDEX
    }

    /// Returns a reference to the node at the given index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn node(&self, index: NodeIndex) -> &Node {
        &self[index]
    }

    /// Returns the node at the given index, or `None` if out of bounds.
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        self.nodes.get(index)
    }

    /// Returns the children of the node at `index` as node references.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn children_of(&self, index: NodeIndex) -> impl Iterator<Item = &Node> {
        self[index]
            .children()
            .unwrap_or(&[])
            .iter()
            .map(move |&child| &self.nodes[child])
    }

    /// Returns the number of nodes reachable from the root.
    pub fn num_nodes(&self) -> usize {
        self.pre_order_iter().count()
    }

    /// Returns the number of leaves reachable from the root.
    pub fn num_leaves(&self) -> usize {
        self.leaves().count()
    }

    /// Returns the number of internal nodes (including the root, if it has children).
    pub fn num_internal(&self) -> usize {
        self.pre_order_iter().filter(|n| n.is_internal()).count()
    }

    /// Returns the leaves in left-to-right document order.
    pub fn leaves(&self) -> impl Iterator<Item = &Node> {
        self.pre_order_iter().filter(|n| n.is_leaf())
    }

    /// Returns all nodes that received statistics from the lookup table.
    pub fn annotated_nodes(&self) -> impl Iterator<Item = &Node> {
        self.pre_order_iter().filter(|n| n.stats().is_some())
    }

    /// Returns the first node in pre-order whose name equals `name`.
    pub fn find_by_name(&self, name: &str) -> Option<&Node> {
        self.pre_order_iter().find(|n| n.name() == Some(name))
    }

    /// Returns the maximum number of edges on a path from the root to a leaf.
    pub fn depth(&self) -> usize {
        let mut depths = vec![0usize; self.nodes.len()];
        for node in self.post_order_iter() {
            if let Some(children) = node.children() {
                depths[node.index()] = 1 + children.iter().map(|&c| depths[c]).max().unwrap_or(0);
            }
        }
        depths[ROOT_INDEX]
    }

    /// Returns the sum of all valid branch lengths reachable from the root.
    pub fn total_branch_length(&self) -> f64 {
        self.pre_order_iter()
            .filter(|n| n.has_valid_length())
            .filter_map(|n| n.length())
            .sum::<f64>()
    }

    /// Serializes the tree into its nested JSON form.
    ///
    /// Writes without recursion, so arbitrarily deep trees are fine.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        JsonWriter {
            out: Vec::new(),
            formatter: CompactFormatter,
        }
        .write_tree(self)
    }

    /// Serializes the tree into its nested JSON form, pretty printed.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        JsonWriter {
            out: Vec::new(),
            formatter: PrettyFormatter::new(),
        }
        .write_tree(self)
    }
}

impl std::ops::Index<NodeIndex> for AnnotatedTree {
    type Output = Node;

    fn index(&self, index: NodeIndex) -> &Self::Output {
        &self.nodes[index]
    }
}

// =#========================================================================#=
// SERIALIZATION
// =#========================================================================#=
/// Value of a scalar node entry in the nested form.
enum Field<'a> {
    Text(&'a str),
    Number(f64),
}

impl Serialize for Field<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Field::Text(text) => serializer.serialize_str(text),
            Field::Number(value) => serializer.serialize_f64(*value),
        }
    }
}

/// Returns the set scalar entries of `node` in output order (after `children`).
fn node_fields(node: &Node) -> Vec<(&'static str, Field<'_>)> {
    let mut fields = Vec::with_capacity(8);
    if let Some(name) = node.name() {
        fields.push(("name", Field::Text(name)));
    }
    if let Some(common) = node.common() {
        fields.push(("common", Field::Text(common)));
    }
    if let Some(ott) = node.ott() {
        fields.push(("ott", Field::Text(ott)));
    }
    if let Some(length) = node.length() {
        fields.push(("length", Field::Number(length)));
    }
    if let Some(stats) = node.stats() {
        fields.push(("lwr_95", Field::Number(stats.lwr_95)));
        fields.push(("estimate", Field::Number(stats.estimate)));
        fields.push(("scaled_estimate", Field::Number(stats.scaled_estimate)));
        fields.push(("upr_95", Field::Number(stats.upr_95)));
    }
    fields
}

/// Nests one level per tree level, so the serializer's stack bounds the
/// depth. [AnnotatedTree::to_json] and [AnnotatedTree::to_json_pretty]
/// produce the same text for trees of any depth.
impl Serialize for AnnotatedTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        NestedNode {
            tree: self,
            index: ROOT_INDEX,
        }
        .serialize(serializer)
    }
}

/// View of a subtree that serializes as nested object with only set keys.
struct NestedNode<'a> {
    tree: &'a AnnotatedTree,
    index: NodeIndex,
}

impl Serialize for NestedNode<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let node = &self.tree[self.index];
        let mut map = serializer.serialize_map(None)?;

        if let Some(children) = node.children() {
            let nested: Vec<NestedNode> = children
                .iter()
                .map(|&index| NestedNode {
                    tree: self.tree,
                    index,
                })
                .collect();
            map.serialize_entry("children", &nested)?;
        }
        for (key, value) in node_fields(node) {
            map.serialize_entry(key, &value)?;
        }

        map.end()
    }
}

/// Pending work of the iterative JSON writer.
enum JsonStep {
    /// Open the object of a node; `first` if it is the first of its siblings.
    Enter { index: NodeIndex, first: bool },
    /// Close the `children` array of a node and write its remaining entries.
    Exit(NodeIndex),
}

/// Drives a [Formatter] through the nested form without recursion,
/// issuing the same calls as `serde_json`'s own serializer.
struct JsonWriter<F> {
    out: Vec<u8>,
    formatter: F,
}

fn io_err(err: io::Error) -> serde_json::Error {
    serde_json::Error::custom(err)
}

impl<F: Formatter> JsonWriter<F> {
    fn key(&mut self, key: &str, first: bool) -> Result<(), serde_json::Error> {
        self.formatter
            .begin_object_key(&mut self.out, first)
            .map_err(io_err)?;
        serde_json::to_writer(&mut self.out, key)?;
        self.formatter.end_object_key(&mut self.out).map_err(io_err)?;
        self.formatter.begin_object_value(&mut self.out).map_err(io_err)
    }

    fn fields(&mut self, node: &Node, mut first: bool) -> Result<(), serde_json::Error> {
        for (key, value) in node_fields(node) {
            self.key(key, first)?;
            serde_json::to_writer(&mut self.out, &value)?;
            self.formatter.end_object_value(&mut self.out).map_err(io_err)?;
            first = false;
        }
        Ok(())
    }

    /// Ends the object of `index`, and its array slot unless it is the root.
    fn end_node(&mut self, index: NodeIndex) -> Result<(), serde_json::Error> {
        self.formatter.end_object(&mut self.out).map_err(io_err)?;
        if index != ROOT_INDEX {
            self.formatter.end_array_value(&mut self.out).map_err(io_err)?;
        }
        Ok(())
    }

    fn write_tree(mut self, tree: &AnnotatedTree) -> Result<String, serde_json::Error> {
        let mut stack = vec![JsonStep::Enter {
            index: ROOT_INDEX,
            first: true,
        }];

        while let Some(step) = stack.pop() {
            match step {
                JsonStep::Enter { index, first } => {
                    let node = &tree[index];
                    if index != ROOT_INDEX {
                        self.formatter
                            .begin_array_value(&mut self.out, first)
                            .map_err(io_err)?;
                    }
                    self.formatter.begin_object(&mut self.out).map_err(io_err)?;

                    match node.children() {
                        Some(children) => {
                            self.key("children", true)?;
                            self.formatter.begin_array(&mut self.out).map_err(io_err)?;
                            stack.push(JsonStep::Exit(index));
                            for (i, &child) in children.iter().enumerate().rev() {
                                stack.push(JsonStep::Enter {
                                    index: child,
                                    first: i == 0,
                                });
                            }
                        }
                        None => {
                            self.fields(node, true)?;
                            self.end_node(index)?;
                        }
                    }
                }
                JsonStep::Exit(index) => {
                    self.formatter.end_array(&mut self.out).map_err(io_err)?;
                    self.formatter.end_object_value(&mut self.out).map_err(io_err)?;
                    self.fields(&tree[index], false)?;
                    self.end_node(index)?;
                }
            }
        }

        String::from_utf8(self.out).map_err(serde_json::Error::custom)
    }
}

// =#========================================================================#=
// PRINTING
// =#========================================================================#=
impl fmt::Display for AnnotatedTree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // (index, prefix, is_last); is_last is None for the root
        let mut stack: Vec<(NodeIndex, String, Option<bool>)> =
            vec![(ROOT_INDEX, String::new(), None)];

        while let Some((index, prefix, is_last)) = stack.pop() {
            let node = &self[index];
            let connector = match is_last {
                None => "",
                Some(true) => "└─ ",
                Some(false) => "├─ ",
            };

            write!(f, "{}{}{}", prefix, connector, node.name().unwrap_or("*"))?;
            if let Some(ott) = node.ott() {
                write!(f, " [ott{}]", ott)?;
            }
            if let Some(length) = node.length() {
                write!(f, " (branch: {:.3})", length)?;
            }
            if let Some(stats) = node.stats() {
                write!(
                    f,
                    " estimate={} 95%=[{}, {}]",
                    stats.estimate, stats.lwr_95, stats.upr_95
                )?;
            }
            writeln!(f)?;

            if let Some(children) = node.children() {
                let child_prefix = match is_last {
                    None => String::new(),
                    Some(true) => format!("{}   ", prefix),
                    Some(false) => format!("{}│  ", prefix),
                };
                for (i, &child) in children.iter().enumerate().rev() {
                    stack.push((child, child_prefix.clone(), Some(i + 1 == children.len())));
                }
            }
        }

        Ok(())
    }
}

// =#========================================================================#=
// ITERATORS
// =#========================================================================#=
impl AnnotatedTree {
    /// Returns an iterator over the tree in post-order (children before parents).
    ///
    /// Children are visited left to right, so leaves appear in document order.
    pub fn post_order_iter(&self) -> PostOrderIter<'_> {
        PostOrderIter::new(self)
    }

    /// Returns an iterator over the tree in pre-order (parents before children).
    ///
    /// Children are visited left to right, so leaves appear in document order.
    pub fn pre_order_iter(&self) -> PreOrderIter<'_> {
        PreOrderIter::new(self)
    }
}

/// Iterator for post-order traversal (children before parents).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
pub struct PostOrderIter<'a> {
    tree: &'a AnnotatedTree,
    stack: Vec<(NodeIndex, bool)>, // (index, children_visited)
}

impl<'a> PostOrderIter<'a> {
    fn new(tree: &'a AnnotatedTree) -> Self {
        PostOrderIter {
            tree,
            stack: vec![(ROOT_INDEX, false)],
        }
    }
}

impl<'a> Iterator for PostOrderIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((index, children_visited)) = self.stack.pop() {
            let node = &self.tree[index];

            match node.children() {
                Some(children) if !children_visited => {
                    self.stack.push((index, true));
                    // Push children in reverse, so leftmost is processed first
                    for &child in children.iter().rev() {
                        self.stack.push((child, false));
                    }
                }
                _ => return Some(node),
            }
        }
        None
    }
}

/// Iterator for pre-order traversal (parents before children).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
pub struct PreOrderIter<'a> {
    tree: &'a AnnotatedTree,
    stack: Vec<NodeIndex>,
}

impl<'a> PreOrderIter<'a> {
    fn new(tree: &'a AnnotatedTree) -> Self {
        PreOrderIter {
            tree,
            stack: vec![ROOT_INDEX],
        }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        let node = &self.tree[index];

        if let Some(children) = node.children() {
            self.stack.extend(children.iter().rev());
        }

        Some(node)
    }
}
