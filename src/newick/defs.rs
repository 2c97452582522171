//! Constants and definitions for the Newick parser.

/// Replacement for underscores in labels
pub(crate) const UNDERSCORE_REPLACEMENT: &str = " ";

/// Separator between scientific and common name in a label
pub(crate) const COMMON_NAME_SEPARATOR: char = '-';

/// Marker preceding the digits of an Open Tree Taxonomy id at the end of a name
pub(crate) const OTT_MARKER: &str = " ott";

/// Default guess for number of nodes, when unknown
pub(crate) const DEFAULT_NUM_NODES_GUESS: usize = 16;
