//! Data model for annotated phylogenetic trees.
//!
//! # Tree representation
//! Trees are represented by [AnnotatedTree], which uses the arena pattern to
//! store [Node]s referenced by [NodeIndex]. Trees are rooted, ordered, and of
//! arbitrary arity; each node owns the list of its children's indices.
//!
//! # Annotation
//! Named nodes are enriched with [NodeStats] taken from a [LookupTable],
//! which maps family names to the [TaxonRecord]s of an external taxonomy
//! dataset. The table is built once and passed to every parse call.

pub mod lookup_table;
pub mod node;
pub mod tree;

pub use lookup_table::LookupTable;
pub use lookup_table::TaxonRecord;
pub use node::Node;
pub use node::NodeIndex;
pub use node::NodeStats;
pub use tree::AnnotatedTree;
