//! Low-level parsing infrastructure shared by the Newick parser and the
//! dataset loader: error handling and literal conversion.

pub mod parsing_error;
pub mod utils;

pub use parsing_error::{ParsingError, ParsingErrorType};
