//! Error types for the Newick parser and the dataset loader.
//!
//! This module provides [ParsingError] and [ParsingErrorType] for representing
//! and reporting errors that occur while tokenizing Newick strings or
//! reading a taxonomy dataset.

use std::error::Error;
use std::fmt;

/// Default length of context provided by error from parser
const DEFAULT_CONTEXT_LENGTH: usize = 50;

// =#========================================================================#=
// PARSING ERROR TYPE
// =#========================================================================#=
/// Error types that can occur while parsing Newick strings or loading a dataset.
#[derive(PartialEq, Debug, Clone)]
pub enum ParsingErrorType {
    IoError(String),
    InvalidDataset(String),
    UnmatchedClosingParenthesis,
    SiblingOutsideGroup,
    TrailingInput,
}

// =#========================================================================#=
// PARSING ERROR
// =#========================================================================#=
/// Parsing error with contextual information (position and following source text).
#[derive(Debug)]
pub struct ParsingError {
    kind: ParsingErrorType,
    position: usize,
    context: String,
}

impl ParsingError {
    /// Create a ParsingError from an error type and the position of the
    /// offending token within `source`.
    pub fn from_source(kind: ParsingErrorType, source: &str, position: usize) -> Self {
        Self {
            kind,
            position,
            context: context_at(source, position, DEFAULT_CONTEXT_LENGTH),
        }
    }

    /// Convenience constructor for UnmatchedClosingParenthesis
    pub fn unmatched_closing_parenthesis(source: &str, position: usize) -> Self {
        Self::from_source(ParsingErrorType::UnmatchedClosingParenthesis, source, position)
    }

    /// Convenience constructor for SiblingOutsideGroup
    pub fn sibling_outside_group(source: &str, position: usize) -> Self {
        Self::from_source(ParsingErrorType::SiblingOutsideGroup, source, position)
    }

    /// Convenience constructor for TrailingInput
    pub fn trailing_input(source: &str, position: usize) -> Self {
        Self::from_source(ParsingErrorType::TrailingInput, source, position)
    }

    /// Create a ParsingError without source context (for dataset and IO errors)
    pub fn without_context(kind: ParsingErrorType) -> Self {
        Self {
            kind,
            position: 0,
            context: String::new(),
        }
    }

    /// Get the error kind
    pub fn kind(&self) -> &ParsingErrorType {
        &self.kind
    }

    /// Get the byte position where the error occurred
    pub fn position(&self) -> usize {
        self.position
    }

    /// Get the source text following the error position
    pub fn context(&self) -> &str {
        &self.context
    }
}

/// Returns up to `max_len` bytes of `source` starting at `position`,
/// shortened as needed to stay on char boundaries.
fn context_at(source: &str, position: usize, max_len: usize) -> String {
    if position >= source.len() {
        return String::new();
    }
    let mut end = (position + max_len).min(source.len());
    while !source.is_char_boundary(end) {
        end -= 1;
    }
    let mut start = position;
    while !source.is_char_boundary(start) {
        start -= 1;
    }
    source[start..end].to_string()
}

impl fmt::Display for ParsingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // Main error message
        match &self.kind {
            ParsingErrorType::IoError(msg) => return write!(f, "IO error - {msg}"),
            ParsingErrorType::InvalidDataset(msg) => {
                return write!(f, "Invalid taxonomy dataset - {msg}");
            }
            ParsingErrorType::UnmatchedClosingParenthesis => {
                write!(f, "Closing parenthesis without matching opening parenthesis")?
            }
            ParsingErrorType::SiblingOutsideGroup => {
                write!(f, "Sibling separator ',' outside of any parenthesized group")?
            }
            ParsingErrorType::TrailingInput => write!(f, "Unexpected input after terminating ';'")?,
        }

        // Additional position information
        write!(f, " at position {}", self.position)?;

        // Additional context if available
        if !self.context.is_empty() {
            write!(
                f,
                "\n  Context (next {} bytes): {}",
                self.context.len(),
                self.context
            )?;
        }

        Ok(())
    }
}

impl Error for ParsingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}

impl From<std::io::Error> for ParsingError {
    fn from(err: std::io::Error) -> Self {
        ParsingError::without_context(ParsingErrorType::IoError(err.to_string()))
    }
}

impl From<serde_json::Error> for ParsingError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            return ParsingError::without_context(ParsingErrorType::IoError(err.to_string()));
        }
        ParsingError::without_context(ParsingErrorType::InvalidDataset(err.to_string()))
    }
}
