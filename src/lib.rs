//! Taxatree is a library to parse phylogenetic trees from Newick strings
//! while annotating their nodes with taxonomic family statistics.
//!
//! Core functionality provided:
//! - Lookup table: Build a [LookupTable] from the records of a taxonomy
//!   dataset (family name with estimate, scaled estimate and 95% bounds).
//!   Later records win over earlier ones with the same family.
//! - Newick: Parse a Newick string into an [AnnotatedTree]. Labels are decoded
//!   (underscores, common names, OTT ids) and named nodes matching a family of
//!   the lookup table get its statistics.
//! - Tree model: [AnnotatedTree] uses the arena pattern, so no direct node
//!   references are stored, only node indices. It serializes to the nested
//!   JSON form expected by rendering code.
//!
//! Limitations:
//! - No quoted labels, comments or bracket annotations
//! - Only a single tree per string
//!
//! # Usage patterns
//! 1. Quick functions with default settings: [parse_newick_str],
//!    [parse_newick_file], [load_lookup_table].
//! 2. Configure a [NewickParser](crate::newick::NewickParser) for full control.
//!
//! ## Example
//! ```
//! use taxatree::model::{LookupTable, TaxonRecord};
//! use taxatree::parse_newick_str;
//!
//! let table = LookupTable::from_json_str(r#"[
//!     {"fam": "Hominidae", "estimate": 5.0, "lwr_95": 4.1, "upr_95": 6.3},
//!     {"fam": "Cercopithecidae", "estimate": 2.5}
//! ]"#)?;
//!
//! let tree = parse_newick_str("((Hominidae:0.2,Hylobatidae:0.3):0.1,Cercopithecidae:0.4);", &table)?;
//! assert_eq!(tree.num_leaves(), 3);
//! assert_eq!(tree.annotated_nodes().count(), 2);
//! println!("{}", tree.to_json().unwrap());
//! # Ok::<(), taxatree::parser::ParsingError>(())
//! ```

pub mod model;
pub mod newick;
pub mod parser;

use crate::model::{AnnotatedTree, LookupTable};
use crate::parser::parsing_error::ParsingError;
use std::path::Path;

// ============================================================================
// Quick Lookup Table API
// ============================================================================
/// Loads a [LookupTable] from a JSON file containing an array of records.
///
/// See [`LookupTable::from_file`] for details.
pub fn load_lookup_table<P: AsRef<Path>>(path: P) -> Result<LookupTable, ParsingError> {
    LookupTable::from_file(path)
}

// ============================================================================
// Quick Newick API
// ============================================================================
/// Parses a Newick string using default settings, annotating from `table`.
///
/// See [`newick::parse_str`] for full documentation of this convenience function.
pub fn parse_newick_str<S: AsRef<str>>(
    newick: S,
    table: &LookupTable,
) -> Result<AnnotatedTree, ParsingError> {
    newick::parse_str(newick, table)
}

/// Parses the Newick string in a file using default settings, annotating from `table`.
///
/// See [`newick::parse_file`] for full documentation of this convenience function.
pub fn parse_newick_file<P: AsRef<Path>>(
    path: P,
    table: &LookupTable,
) -> Result<AnnotatedTree, ParsingError> {
    newick::parse_file(path, table)
}
