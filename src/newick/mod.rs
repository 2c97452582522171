//! Newick format parser for phylogenetic trees with taxon annotation.
//!
//! This module provides [NewickParser] to parse Newick strings into
//! [AnnotatedTree]s. While parsing, each named node is looked up by name in a
//! [LookupTable] and, if found, annotated with its statistics.
//!
//! # Quick API
//! For simple use cases with default settings:
//! * [`parse_str`] - parses a single string, returns an [AnnotatedTree]
//! * [`parse_file`] - parses the Newick string in a file
//!
//! # Full API
//! For more control, configure a [NewickParser]:
//! * [`NewickParser::parse_str`] - parse a single tree
//!
//! # Format
//! The Newick format has the following simple grammar:
//! * `tree ::= subtree ';'`
//! * `subtree ::= [ '(' subtree { ',' subtree } ')' ] [label] [branch_length]`
//! * `branch_length ::= ':' number`
//!
//! Furthermore:
//! * Whitespace around `(`, `)`, `,`, `:` and `;` is insignificant
//! * Underscores in labels stand for spaces
//! * A label may carry a common name after a hyphen (`Hominidae-Great_apes`)
//!   and an Open Tree Taxonomy id (`Homo_sapiens_ott770315`)
//! * Quoting, comments and annotations in square brackets are not supported;
//!   brackets simply become part of labels

mod defs;
pub mod label;
mod parser;
pub mod tokenizer;

pub use self::parser::{NewickParser, ParserState};

use crate::model::{AnnotatedTree, LookupTable};
use crate::parser::ParsingError;
use std::fs;
use std::path::Path;

// ============================================================================
// QUICK PARSING API (pub)
// ============================================================================
/// Parses a single Newick string to obtain an [AnnotatedTree].
///
/// This is a convenience function for quick parsing of a single Newick string
/// using default settings and thus not requiring configuration of a parser.
///
/// # Arguments
/// * `newick` - The Newick format string to parse
/// * `table` - Lookup table used to annotate named nodes
///
/// # Returns
/// * [AnnotatedTree] - Tree parsed from the string
/// * [ParsingError] - If parentheses or commas are unbalanced
///
/// # Example
/// ```
/// use taxatree::model::LookupTable;
/// use taxatree::newick::parse_str;
///
/// let tree = parse_str("(Fratercula_cirrhata,(Fratercula_arctica,Fratercula_corniculata));", &LookupTable::new())?;
/// assert_eq!(tree.num_leaves(), 3);
/// # Ok::<(), taxatree::parser::ParsingError>(())
/// ```
pub fn parse_str<S: AsRef<str>>(newick: S, table: &LookupTable) -> Result<AnnotatedTree, ParsingError> {
    NewickParser::new(table).parse_str(newick.as_ref())
}

/// Parses the Newick string contained in a file to obtain an [AnnotatedTree].
///
/// # Arguments
/// * `path` - Path to the file (accepting `&str`, `String`, `Path`, or `PathBuf`)
/// * `table` - Lookup table used to annotate named nodes
///
/// # Returns
/// * [AnnotatedTree] - Tree parsed from the file content
/// * [ParsingError] - If file reading fails or parentheses/commas are unbalanced
pub fn parse_file<P: AsRef<Path>>(path: P, table: &LookupTable) -> Result<AnnotatedTree, ParsingError> {
    let contents = fs::read_to_string(path)?;
    parse_str(contents, table)
}
