//! Minimal reader for the integrator's response documents.
//!
//! The wire format carries data exclusively in attributes, so element text
//! content is skipped rather than modeled. A document that does not parse
//! is reported as absent: callers must treat "no parseable document" as a
//! valid, checkable outcome.

use std::fmt;

use tracing::warn;

use crate::xml::Element;

/// Parses a response body into an [`Element`] tree, or `None` when the
/// body is not well-formed XML.
#[must_use]
pub fn parse(input: &str) -> Option<Element> {
    match Parser::new(input).parse_document() {
        Ok(root) => Some(root),
        Err(err) => {
            warn!(error = %err, "discarding unparseable response document");
            None
        }
    }
}

struct ParseError {
    message: String,
    offset: usize,
}

impl ParseError {
    fn new(message: impl Into<String>, offset: usize) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at byte {}", self.message, self.offset)
    }
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
}

type ParseResult<T> = Result<T, ParseError>;

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
        }
    }

    fn parse_document(&mut self) -> ParseResult<Element> {
        self.skip_misc()?;
        if self.peek() != Some(b'<') {
            return Err(self.error("expected document root"));
        }
        let root = self.parse_element()?;
        self.skip_misc()?;
        if self.pos < self.input.len() {
            return Err(self.error("trailing content after document root"));
        }
        Ok(root)
    }

    /// Skips whitespace, declarations/processing instructions, comments and
    /// doctype between markup.
    fn skip_misc(&mut self) -> ParseResult<()> {
        loop {
            self.skip_whitespace();
            if self.starts_with(b"<?") {
                self.skip_until(b"?>", "unterminated processing instruction")?;
            } else if self.starts_with(b"<!--") {
                self.skip_until(b"-->", "unterminated comment")?;
            } else if self.starts_with(b"<!") {
                self.skip_until(b">", "unterminated doctype")?;
            } else {
                return Ok(());
            }
        }
    }

    fn parse_element(&mut self) -> ParseResult<Element> {
        self.expect(b'<')?;
        let tag = self.read_name()?;
        let mut element = Element::new(tag.clone());

        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(b'/') => {
                    self.pos += 1;
                    self.expect(b'>')?;
                    return Ok(element);
                }
                Some(b'>') => {
                    self.pos += 1;
                    self.parse_children(&tag, &mut element)?;
                    return Ok(element);
                }
                Some(_) => {
                    let name = self.read_name()?;
                    self.skip_whitespace();
                    self.expect(b'=')?;
                    self.skip_whitespace();
                    let value = self.read_quoted_value()?;
                    element.set_attr(name, value);
                }
                None => return Err(self.error("unterminated start tag")),
            }
        }
    }

    fn parse_children(&mut self, tag: &str, element: &mut Element) -> ParseResult<()> {
        loop {
            // Text content is not part of the data model; drop it.
            while self.peek().is_some_and(|b| b != b'<') {
                self.pos += 1;
            }
            if self.starts_with(b"</") {
                self.pos += 2;
                let close = self.read_name()?;
                if close != tag {
                    return Err(self.error(format!(
                        "mismatched closing tag </{close}> for <{tag}>"
                    )));
                }
                self.skip_whitespace();
                self.expect(b'>')?;
                return Ok(());
            } else if self.starts_with(b"<!--") {
                self.skip_until(b"-->", "unterminated comment")?;
            } else if self.starts_with(b"<![CDATA[") {
                self.skip_until(b"]]>", "unterminated CDATA section")?;
            } else if self.peek() == Some(b'<') {
                let child = self.parse_element()?;
                element.push_child(child);
            } else {
                return Err(self.error(format!("missing closing tag for <{tag}>")));
            }
        }
    }

    fn read_name(&mut self) -> ParseResult<String> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.' | b':'))
        {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.error("expected a name"));
        }
        String::from_utf8(self.input[start..self.pos].to_vec())
            .map_err(|_| self.error("name is not valid UTF-8"))
    }

    fn read_quoted_value(&mut self) -> ParseResult<String> {
        let quote = match self.peek() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => return Err(self.error("expected a quoted attribute value")),
        };
        self.pos += 1;
        let start = self.pos;
        while self.peek().is_some_and(|b| b != quote) {
            self.pos += 1;
        }
        if self.peek() != Some(quote) {
            return Err(self.error("unterminated attribute value"));
        }
        let raw = String::from_utf8(self.input[start..self.pos].to_vec())
            .map_err(|_| self.error("attribute value is not valid UTF-8"))?;
        self.pos += 1;
        unescape(&raw).ok_or_else(|| self.error("bad character reference"))
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn skip_until(&mut self, terminator: &[u8], message: &str) -> ParseResult<()> {
        while self.pos < self.input.len() {
            if self.input[self.pos..].starts_with(terminator) {
                self.pos += terminator.len();
                return Ok(());
            }
            self.pos += 1;
        }
        Err(self.error(message))
    }

    fn starts_with(&self, prefix: &[u8]) -> bool {
        self.input[self.pos..].starts_with(prefix)
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn expect(&mut self, byte: u8) -> ParseResult<()> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(format!("expected `{}`", char::from(byte))))
        }
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(message, self.pos)
    }
}

fn unescape(raw: &str) -> Option<String> {
    if !raw.contains('&') {
        return Some(raw.to_owned());
    }
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp + 1..];
        let end = tail.find(';')?;
        let entity = &tail[..end];
        match entity {
            "amp" => out.push('&'),
            "lt" => out.push('<'),
            "gt" => out.push('>'),
            "quot" => out.push('"'),
            "apos" => out.push('\''),
            _ => {
                let code = entity.strip_prefix('#')?;
                let value = match code.strip_prefix(['x', 'X']) {
                    Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                    None => code.parse::<u32>().ok()?,
                };
                out.push(char::from_u32(value)?);
            }
        }
        rest = &tail[end + 1..];
    }
    out.push_str(rest);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::parse;
    use crate::xml::Element;

    #[test]
    fn round_trips_a_serialized_tree() {
        let tree = Element::new("StatusReport")
            .with_attr("ShowHistory", "1")
            .with_child(Element::new("Order").with_attr("DispatchNumber", "100"))
            .with_child(Element::new("Order").with_attr("DispatchNumber", "200"));

        let parsed = parse(&tree.to_xml()).expect("document should parse");
        assert_eq!(parsed, tree);
    }

    #[test]
    fn reads_declaration_comments_and_both_quote_kinds() {
        let body = concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
            "<!-- integrator response -->\n",
            "<response><Order DispatchNumber='100' Msg=\"ok\"/></response>",
        );
        let parsed = parse(body).expect("document should parse");

        assert_eq!(parsed.tag(), "response");
        assert_eq!(parsed.children()[0].attr("DispatchNumber"), Some("100"));
        assert_eq!(parsed.children()[0].attr("Msg"), Some("ok"));
    }

    #[test]
    fn unescapes_character_references() {
        let parsed = parse(r#"<Order Comment="a &amp; b &lt; &#233; &#x41;" />"#)
            .expect("document should parse");

        assert_eq!(parsed.attr("Comment"), Some("a & b < é A"));
    }

    #[test]
    fn skips_text_content() {
        let parsed = parse("<response>plain text<Order Number=\"1\"></Order>more</response>")
            .expect("document should parse");

        assert_eq!(parsed.children().len(), 1);
        assert_eq!(parsed.children()[0].attr("Number"), Some("1"));
    }

    #[test]
    fn empty_and_malformed_documents_are_absent() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("   "), None);
        assert_eq!(parse("not xml at all"), None);
        assert_eq!(parse("<Order><Item></Order>"), None);
        assert_eq!(parse("<Order Number=\"1\">"), None);
    }
}
