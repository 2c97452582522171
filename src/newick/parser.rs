//! Structs and logic to parse Newick strings into annotated trees.
//!
//! This module provides the [NewickParser] struct, which turns the token
//! stream of a Newick string into an [AnnotatedTree] in a single pass,
//! annotating named nodes from a [LookupTable].

use crate::model::{AnnotatedTree, LookupTable, Node, NodeIndex, NodeStats};
use crate::newick::defs::DEFAULT_NUM_NODES_GUESS;
use crate::newick::label::ParsedLabel;
use crate::newick::tokenizer::{Token, TokenKind, tokenize};
use crate::parser::parsing_error::ParsingError;
use crate::parser::utils::parse_float_prefix;
use log::{debug, trace, warn};

// =#========================================================================#=
// PARSER STATE
// =#========================================================================#=
/// What the parser expects the next literal token to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    /// Next literal carries no information and is ignored
    Neutral,
    /// Next literal is the label of the current node (after `(`, `,` or `)`)
    ExpectName,
    /// Next literal is the branch length of the current node (after `:`)
    ExpectLength,
}

// =#========================================================================#=
// NEWICK PARSER
// =#========================================================================#=
/// Parser (configuration) for Newick strings annotated from a [LookupTable].
///
/// # Construction
/// * [`new(table)`](Self::new) - annotate named nodes from `table`
/// * [`without_lookup()`](Self::without_lookup) - parse without annotation
///
/// # Configuration
/// * [`with_capacity_hint(num_nodes)`](Self::with_capacity_hint)
///     - Pre-allocates the node arena for the expected number of nodes.
/// * [`with_strict_termination(strict)`](Self::with_strict_termination)
///     - Report input after the terminating `;` as error instead of ignoring it.
///
/// # Format
/// * `(` opens a group: the current node gets a new first child
/// * `,` adds a sibling to the innermost open group
/// * `)` closes the innermost open group; its node may get a label next
/// * `label` after `(`, `,` or `)` names the current node
/// * `:length` sets the branch length of the current node
/// * `;` ends the tree
///
/// Labels are decoded by [ParsedLabel]. If the decoded name is a family of
/// the lookup table, the node gets [NodeStats] from that record.
///
/// # Example
/// ```
/// use taxatree::model::{LookupTable, TaxonRecord};
/// use taxatree::newick::NewickParser;
///
/// let table = LookupTable::build(vec![TaxonRecord::new("Hominidae").with_estimate(5.0)]);
/// let tree = NewickParser::new(&table)
///     .parse_str("(Hylobatidae:0.3,Hominidae:0.2)Hominoidea;")
///     .unwrap();
///
/// let hominidae = tree.find_by_name("Hominidae").unwrap();
/// assert_eq!(hominidae.estimate(), Some(5.0));
/// assert_eq!(hominidae.lwr_95(), Some(0.0));
/// assert_eq!(tree.find_by_name("Hylobatidae").unwrap().estimate(), None);
/// assert_eq!(tree.root().name(), Some("Hominoidea"));
/// ```
#[derive(Debug, Clone)]
pub struct NewickParser<'t> {
    lookup: Option<&'t LookupTable>,
    capacity_hint: usize,
    strict_termination: bool,
}

// ============================================================================
// Construction & Configuration (pub)
// ============================================================================
impl<'t> NewickParser<'t> {
    /// Creates a new [NewickParser] annotating nodes from `table`.
    pub fn new(table: &'t LookupTable) -> Self {
        Self {
            lookup: Some(table),
            capacity_hint: DEFAULT_NUM_NODES_GUESS,
            strict_termination: false,
        }
    }

    /// Creates a new [NewickParser] that does not annotate nodes.
    pub fn without_lookup() -> Self {
        Self {
            lookup: None,
            capacity_hint: DEFAULT_NUM_NODES_GUESS,
            strict_termination: false,
        }
    }

    /// Sets the expected number of nodes per tree for pre-allocation.
    pub fn with_capacity_hint(mut self, num_nodes: usize) -> Self {
        self.capacity_hint = num_nodes;
        self
    }

    /// Configures whether non-whitespace input after the terminating `;`
    /// is an error (`true`) or ignored with a warning (`false`, default).
    pub fn with_strict_termination(mut self, strict: bool) -> Self {
        self.strict_termination = strict;
        self
    }
}

// ============================================================================
// Parsing (pub)
// ============================================================================
impl NewickParser<'_> {
    /// Parses a single Newick string into an [AnnotatedTree].
    ///
    /// Parsing is best effort: empty labels are skipped, a missing `;` or
    /// unclosed groups are tolerated, and an unparsable branch length becomes
    /// `NaN`. The returned tree is always rooted at the outermost node.
    ///
    /// # Returns
    /// * [AnnotatedTree] - The parsed tree
    /// * [ParsingError] - If a `)` or `,` appears outside of any open group,
    ///   or (with strict termination) if input follows the `;`
    pub fn parse_str(&self, newick: &str) -> Result<AnnotatedTree, ParsingError> {
        let tokens = tokenize(newick);
        let mut tree = AnnotatedTree::new(self.capacity_hint);
        let mut ancestors: Vec<NodeIndex> = Vec::new();
        let mut current = tree.root_index();
        let mut state = ParserState::Neutral;

        for (i, token) in tokens.iter().enumerate() {
            // Empty literals carry no information
            if token.kind.is_empty_literal() {
                continue;
            }

            match token.kind {
                TokenKind::Open => {
                    let (child, replaced) = tree.add_only_child(current);
                    if replaced {
                        warn!(
                            "Group at position {} replaces earlier children of node {}",
                            token.position, current
                        );
                    }
                    ancestors.push(current);
                    current = child;
                    state = ParserState::ExpectName;
                }
                TokenKind::Comma => {
                    let parent = *ancestors.last().ok_or_else(|| {
                        ParsingError::sibling_outside_group(newick, token.position)
                    })?;
                    current = tree.add_child(parent);
                    state = ParserState::ExpectName;
                }
                TokenKind::Close => {
                    current = ancestors.pop().ok_or_else(|| {
                        ParsingError::unmatched_closing_parenthesis(newick, token.position)
                    })?;
                    state = ParserState::ExpectName;
                }
                TokenKind::Colon => {
                    state = ParserState::ExpectLength;
                }
                TokenKind::Semicolon => {
                    self.check_trailing(newick, &tokens[i + 1..])?;
                    break;
                }
                TokenKind::Literal(text) => {
                    let node = tree.node_mut(current);
                    match state {
                        ParserState::ExpectName => self.apply_label(node, text),
                        ParserState::ExpectLength => node.set_length(parse_float_prefix(text)),
                        ParserState::Neutral => {
                            trace!("Ignoring literal '{}' at position {}", text, token.position)
                        }
                    }
                    state = ParserState::Neutral;
                }
            }
        }

        if !ancestors.is_empty() {
            debug!("Newick string ended with {} unclosed groups", ancestors.len());
        }
        debug!(
            "Parsed Newick string: {} tokens, {} nodes, {} leaves",
            tokens.len(),
            tree.num_nodes(),
            tree.num_leaves()
        );

        Ok(tree)
    }

    /// Decodes `raw` and assigns name, OTT id, statistics and common name to `node`.
    fn apply_label(&self, node: &mut Node, raw: &str) {
        let ParsedLabel { name, common, ott } = ParsedLabel::parse(raw);

        if let Some(ott) = ott {
            node.set_ott(ott);
        }

        match self.lookup.and_then(|table| table.get(&name)) {
            Some(record) => {
                trace!("Annotating '{}' from lookup table", name);
                node.set_stats(NodeStats::from_record(record));
            }
            None => trace!("No lookup table entry for '{}'", name),
        }

        node.set_name(name);
        node.set_common(common);
    }

    /// Handles the tokens after the terminating `;`.
    fn check_trailing(&self, newick: &str, rest: &[Token]) -> Result<(), ParsingError> {
        let trailing = rest.iter().find(|t| match t.kind {
            TokenKind::Literal(text) => !text.trim().is_empty(),
            _ => true,
        });

        if let Some(token) = trailing {
            if self.strict_termination {
                return Err(ParsingError::trailing_input(newick, token.position));
            }
            warn!(
                "Ignoring input after terminating ';' at position {}",
                token.position
            );
        }

        Ok(())
    }
}
