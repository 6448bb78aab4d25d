//! Logos tokenizer for HTML fragments.
//!
//! Tokens are coarse: a whole start tag (name and attributes) is a single
//! token and is picked apart later by [`crate::html::tag`]. Text between tags
//! is grouped into runs.
//!
//! Anything that fails to form a construct degrades to text. A lone `<` that
//! does not open a tag becomes [`TokenKind::StrayLt`] and the bytes after it
//! lex as ordinary text.

use logos::{Lexer, Logos};

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `<!-- ... -->`. An unterminated comment runs to the end of input.
    #[token("<!--", comment_body)]
    Comment,

    /// `<!DOCTYPE html>` and `<?xml ... ?>` style declarations
    #[regex(r"<![A-Za-z][^>]*>")]
    #[regex(r"<\?[^>]*>")]
    Declaration,

    /// `</name>`
    #[regex(r"</[A-Za-z][^>]*>")]
    EndTag,

    /// `<name attr="value">` or `<name />`
    #[regex(r"<[A-Za-z][^>]*>")]
    StartTag,

    /// `<` that does not start any construct
    #[token("<")]
    StrayLt,

    /// Character data between tags
    #[regex(r"[^<]+")]
    Text,
}

fn comment_body(lex: &mut Lexer<'_, TokenKind>) -> bool {
    let rest = lex.remainder();
    let consumed = rest.find("-->").map_or(rest.len(), |end| end + "-->".len());
    lex.bump(consumed);
    true
}

/// A lexed token with its kind, source slice and byte offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub offset: usize,
}

/// Lex the input into a sequence of tokens.
///
/// Concatenating the token texts reproduces the input exactly.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        let kind = match result {
            Ok(kind) => kind,
            // Every byte is covered by `Text` or `StrayLt`; keep going regardless
            Err(()) => TokenKind::Text,
        };
        tokens.push(Token {
            kind,
            text: lexer.slice(),
            offset: lexer.span().start,
        });
    }

    tokens
}
