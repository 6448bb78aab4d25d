use std::fmt;

use serde::Serialize;

use super::{
    elements,
    lexer::{Token, TokenKind, lex},
    node::{Element, Node},
    tag::{parse_end_tag, parse_start_tag},
};

/// A recoverable anomaly found while building the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Byte offset in the input where the anomaly was noticed.
    pub offset: usize,
    pub kind: DiagnosticKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// An element was still open when its parent closed or input ended.
    UnclosedElement { name: String },
    /// An end tag with no matching open element; it was ignored.
    StrayEndTag { name: String },
    /// A comment without `-->`; it swallowed the rest of the input.
    UnterminatedComment,
    /// A `<` that does not start a tag; kept as text.
    StrayAngleBracket,
    /// Inline content directly at the document root; wrapped in a `<p>`.
    LooseRootContent,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::UnclosedElement { name } => {
                write!(f, "unclosed <{name}> at byte {}", self.offset)
            }
            DiagnosticKind::StrayEndTag { name } => {
                write!(f, "stray </{name}> at byte {} ignored", self.offset)
            }
            DiagnosticKind::UnterminatedComment => {
                write!(f, "unterminated comment at byte {}", self.offset)
            }
            DiagnosticKind::StrayAngleBracket => {
                write!(f, "stray '<' at byte {} kept as text", self.offset)
            }
            DiagnosticKind::LooseRootContent => write!(
                f,
                "loose inline content at byte {} wrapped in a paragraph",
                self.offset
            ),
        }
    }
}

/// Parser output: the tree and everything that had to be repaired to build it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedHtml {
    pub nodes: Vec<Node>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parses markup into a node tree. Never fails.
pub fn parse_html(input: &str) -> ParsedHtml {
    let mut builder = TreeBuilder::new();
    for token in lex(input) {
        builder.push(&token);
    }
    builder.finish(input.len())
}

#[derive(Debug)]
struct OpenElement {
    element: Element,
    offset: usize,
}

/// Stack machine turning tokens into a tree.
pub struct TreeBuilder {
    roots: Vec<Node>,
    stack: Vec<OpenElement>,
    diagnostics: Vec<Diagnostic>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            roots: vec![],
            stack: vec![],
            diagnostics: vec![],
        }
    }

    pub fn push(&mut self, token: &Token<'_>) {
        if let Some(raw) = self.raw_text_element()
            && !(token.kind == TokenKind::EndTag && parse_end_tag(token.text) == raw)
        {
            self.append(Node::text(token.text));
            return;
        }

        match token.kind {
            TokenKind::Text => {
                if !token.text.trim().is_empty() {
                    self.open_paragraph_for_loose_content(token.offset);
                }
                self.append(Node::text(token.text));
            }
            TokenKind::StrayLt => {
                self.report(token.offset, DiagnosticKind::StrayAngleBracket);
                self.open_paragraph_for_loose_content(token.offset);
                self.append(Node::text("&lt;"));
            }
            TokenKind::Comment => {
                let body = &token.text["<!--".len()..];
                let body = match body.strip_suffix("-->") {
                    Some(body) => body,
                    None => {
                        self.report(token.offset, DiagnosticKind::UnterminatedComment);
                        body
                    }
                };
                self.append(Node::Comment(body.to_string()));
            }
            TokenKind::Declaration => {
                let body = &token.text[1..token.text.len() - 1];
                self.append(Node::Declaration(body.to_string()));
            }
            TokenKind::StartTag => self.start_tag(token),
            TokenKind::EndTag => self.end_tag(token),
        }
    }

    pub fn finish(mut self, end_offset: usize) -> ParsedHtml {
        // EOF flush
        while let Some(open) = self.stack.last() {
            if !elements::has_optional_end(&open.element.name) {
                let name = open.element.name.clone();
                self.report(end_offset, DiagnosticKind::UnclosedElement { name });
            }
            self.pop_and_attach();
        }
        ParsedHtml {
            nodes: self.roots,
            diagnostics: self.diagnostics,
        }
    }

    fn start_tag(&mut self, token: &Token<'_>) {
        let tag = parse_start_tag(token.text);

        if elements::closes_paragraph(&tag.name) {
            self.close_nearest(&["p"], elements::is_block, token.offset);
        }
        if let Some((targets, scope)) = elements::closes_siblings(&tag.name) {
            self.close_nearest(targets, |name| scope.contains(&name), token.offset);
        }
        if !elements::is_block(&tag.name) && !elements::is_opaque(&tag.name) {
            self.open_paragraph_for_loose_content(token.offset);
        }

        let element = Element {
            name: tag.name,
            attrs: tag.attrs,
            children: vec![],
        };
        if tag.self_closing || elements::is_void(&element.name) {
            self.append(Node::Element(element));
        } else {
            self.stack.push(OpenElement {
                element,
                offset: token.offset,
            });
        }
    }

    fn end_tag(&mut self, token: &Token<'_>) {
        let name = parse_end_tag(token.text);
        let open = self
            .stack
            .iter()
            .rposition(|open| open.element.name == name);

        match open {
            Some(index) => self.close_to(index, token.offset),
            None => self.report(token.offset, DiagnosticKind::StrayEndTag { name }),
        }
    }

    /// Closes the innermost open element named in `targets`, unless an
    /// element matching `is_boundary` is reached first.
    fn close_nearest(&mut self, targets: &[&str], is_boundary: impl Fn(&str) -> bool, offset: usize) {
        let found = self
            .stack
            .iter()
            .enumerate()
            .rev()
            .find(|(_, open)| {
                let name = open.element.name.as_str();
                targets.contains(&name) || is_boundary(name)
            })
            .filter(|(_, open)| targets.contains(&open.element.name.as_str()))
            .map(|(index, _)| index);

        if let Some(index) = found {
            self.close_to(index, offset);
        }
    }

    /// Pops every element above `index`, then the element at `index` itself.
    fn close_to(&mut self, index: usize, offset: usize) {
        while self.stack.len() > index + 1 {
            if let Some(open) = self.stack.last()
                && !elements::has_optional_end(&open.element.name)
            {
                let name = open.element.name.clone();
                self.report(offset, DiagnosticKind::UnclosedElement { name });
            }
            self.pop_and_attach();
        }
        self.pop_and_attach();
    }

    fn pop_and_attach(&mut self) {
        if let Some(open) = self.stack.pop() {
            log::trace!("closing <{}> opened at byte {}", open.element.name, open.offset);
            self.append(Node::Element(open.element));
        }
    }

    fn append(&mut self, node: Node) {
        let siblings = match self.stack.last_mut() {
            Some(open) => &mut open.element.children,
            None => &mut self.roots,
        };
        if let (Node::Text(new), Some(Node::Text(prev))) = (&node, siblings.last_mut()) {
            prev.push_str(new);
            return;
        }
        siblings.push(node);
    }

    fn raw_text_element(&self) -> Option<String> {
        self.stack
            .last()
            .filter(|open| elements::is_raw_text(&open.element.name))
            .map(|open| open.element.name.clone())
    }

    fn at_document_root(&self) -> bool {
        self.stack
            .last()
            .is_none_or(|open| matches!(open.element.name.as_str(), "html" | "body"))
    }

    fn open_paragraph_for_loose_content(&mut self, offset: usize) {
        if !self.at_document_root() {
            return;
        }
        self.report(offset, DiagnosticKind::LooseRootContent);
        self.stack.push(OpenElement {
            element: Element::new("p"),
            offset,
        });
    }

    fn report(&mut self, offset: usize, kind: DiagnosticKind) {
        self.diagnostics.push(Diagnostic { offset, kind });
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
