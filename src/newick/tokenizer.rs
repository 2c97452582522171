//! Splits Newick strings into delimiter and literal tokens.

/// Kind of a Newick token, borrowing literals from the source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenKind<'a> {
    /// `(` opens a group of children
    Open,
    /// `)` closes a group of children
    Close,
    /// `,` separates siblings
    Comma,
    /// `:` precedes a branch length
    Colon,
    /// `;` terminates the tree
    Semicolon,
    /// Text between delimiters (possibly empty)
    Literal(&'a str),
}

impl TokenKind<'_> {
    fn delimiter(c: char) -> Option<Self> {
        match c {
            '(' => Some(TokenKind::Open),
            ')' => Some(TokenKind::Close),
            ',' => Some(TokenKind::Comma),
            ':' => Some(TokenKind::Colon),
            ';' => Some(TokenKind::Semicolon),
            _ => None,
        }
    }

    /// Returns whether this is a literal without any content.
    pub fn is_empty_literal(&self) -> bool {
        matches!(self, TokenKind::Literal(text) if text.is_empty())
    }
}

/// A token together with its byte position in the source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind<'a>,
    pub position: usize,
}

/// Splits `source` at the Newick delimiters `;`, `(`, `)`, `,` and `:`.
///
/// Whitespace directly before or after a delimiter is dropped; whitespace
/// inside a literal is kept. Delimiters become their own tokens and the text
/// between them becomes a literal token, so the result always alternates
/// literal and delimiter tokens, starting and ending with a (possibly empty)
/// literal.
///
/// # Example
/// ```
/// use taxatree::newick::tokenizer::{TokenKind, tokenize};
///
/// let kinds: Vec<_> = tokenize("(A, B c):1;").into_iter().map(|t| t.kind).collect();
/// assert_eq!(kinds, vec![
///     TokenKind::Literal(""), TokenKind::Open,
///     TokenKind::Literal("A"), TokenKind::Comma,
///     TokenKind::Literal("B c"), TokenKind::Close,
///     TokenKind::Literal(""), TokenKind::Colon,
///     TokenKind::Literal("1"), TokenKind::Semicolon,
///     TokenKind::Literal(""),
/// ]);
/// ```
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut literal_start = 0;
    let mut chars = source.char_indices().peekable();

    while let Some((position, c)) = chars.next() {
        let Some(kind) = TokenKind::delimiter(c) else {
            continue;
        };

        let literal = source[literal_start..position].trim_end();
        tokens.push(Token {
            kind: TokenKind::Literal(literal),
            position: literal_start,
        });
        tokens.push(Token { kind, position });

        // Whitespace after a delimiter is insignificant
        literal_start = position + c.len_utf8();
        while let Some(&(next_position, next)) = chars.peek() {
            if !next.is_whitespace() {
                break;
            }
            chars.next();
            literal_start = next_position + next.len_utf8();
        }
    }

    tokens.push(Token {
        kind: TokenKind::Literal(&source[literal_start..]),
        position: literal_start,
    });

    tokens
}
