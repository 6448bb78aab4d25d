use super::{cursor::Cursor, node::Attribute};

/// A parsed start tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag {
    /// Lowercased tag name.
    pub name: String,
    pub attrs: Vec<Attribute>,
    /// Whether the tag ended with `/>`.
    pub self_closing: bool,
}

fn is_name_byte(b: u8) -> bool {
    !b.is_ascii_whitespace() && b != b'/' && b != b'>' && b != b'='
}

/// Parses the source text of a start tag token (`<name attr=...>`).
///
/// Attribute values have their character references decoded. Duplicate
/// attributes keep the first occurrence, as browsers do.
pub fn parse_start_tag(text: &str) -> StartTag {
    let inner = text.strip_prefix('<').unwrap_or(text);
    let inner = inner.strip_suffix('>').unwrap_or(inner);
    let self_closing = inner.trim_end().ends_with('/');

    let mut cur = Cursor::new(inner);
    let name = cur.eat_while(is_name_byte).to_ascii_lowercase();

    let mut attrs: Vec<Attribute> = Vec::new();
    loop {
        cur.eat_while(|b| b.is_ascii_whitespace() || b == b'/');
        if cur.eof() {
            break;
        }

        let attr_name = cur.eat_while(is_name_byte).to_ascii_lowercase();
        if attr_name.is_empty() {
            // A stray `=`; skip it so the loop always advances
            cur.bump();
            continue;
        }

        cur.skip_whitespace();
        let value = if cur.peek() == Some(b'=') {
            cur.bump();
            cur.skip_whitespace();
            Some(read_attr_value(&mut cur))
        } else {
            None
        };

        if !attrs.iter().any(|a| a.name == attr_name) {
            attrs.push(Attribute {
                name: attr_name,
                value,
            });
        }
    }

    StartTag {
        name,
        attrs,
        self_closing,
    }
}

fn read_attr_value(cur: &mut Cursor<'_>) -> String {
    let raw = match cur.peek() {
        Some(quote @ (b'"' | b'\'')) => {
            cur.bump();
            let raw = cur.eat_until(quote);
            cur.bump(); // closing quote, if any
            raw
        }
        _ => cur.eat_while(|b| !b.is_ascii_whitespace()),
    };
    html_escape::decode_html_entities(raw).into_owned()
}

/// Parses the lowercased name out of an end tag token (`</name>`).
pub fn parse_end_tag(text: &str) -> String {
    let inner = text.strip_prefix("</").unwrap_or(text);
    let inner = inner.strip_suffix('>').unwrap_or(inner);
    let mut cur = Cursor::new(inner);
    cur.eat_while(is_name_byte).to_ascii_lowercase()
}
