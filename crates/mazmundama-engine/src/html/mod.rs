//! # HTML Structure
//!
//! Best-effort parsing of converted document markup into an owned node tree.
//!
//! ## Parsing Phases
//!
//! 1. **Lexing** (`lexer`): a Logos tokenizer splits the input into tags,
//!    comments, declarations and text. Every byte lands in some token.
//! 2. **Tree construction** (`parser`): a `TreeBuilder` keeps a stack of open
//!    elements and applies the handful of implicit-close rules converted
//!    documents rely on (`<p>` closed by a block, `<li>` closed by a sibling).
//!
//! ## Modules
//!
//! - **`cursor`**: byte cursor used to pick apart tag internals
//! - **`tag`**: tag name and attribute parsing
//! - **`elements`**: element classification (block, inline, void, opaque)
//! - **`node`**: `Node`/`Element` tree, serialization and visible text
//! - **`parser`**: `parse_html()` entry point and `Diagnostic`s
//!
//! ## Key Invariants
//!
//! - Parsing never fails: malformed input yields a tree plus diagnostics
//! - Text nodes keep their source form (entities included), so serializing an
//!   untouched tree reproduces its text verbatim
//! - Loose inline content at the document root is wrapped in a synthesized `<p>`

pub mod cursor;
pub mod elements;
pub mod lexer;
pub mod node;
pub mod parser;
pub mod tag;

pub use node::{Attribute, Element, Node, to_html, top_level};
pub use parser::{Diagnostic, DiagnosticKind, ParsedHtml, TreeBuilder, parse_html};
