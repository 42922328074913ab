//! Hand-rolled XML parser producing the domain node model.
//!
//! Covers the configuration subset: elements, attributes, comments,
//! processing instructions, text, and the predefined entities plus numeric
//! character references. DTDs, CDATA, and namespace handling are out of scope.

use crate::domain::error::ParseError;
use crate::domain::node::{XmlContent, XmlDocument, XmlElement};

impl XmlDocument {
    /// Parse a complete document: optional leading comments/declaration,
    /// exactly one root element, optional trailing comments.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let mut reader = Reader::new(input);

        let leading = reader.parse_misc()?;
        if reader.peek().is_none() {
            return Err(ParseError::MissingRoot);
        }
        let root = reader.parse_element()?;
        let trailing = reader.parse_misc()?;

        if reader.peek().is_some() {
            let (line, column) = reader.position();
            return Err(ParseError::TrailingContent { line, column });
        }

        Ok(Self {
            leading,
            root,
            trailing,
        })
    }
}

struct Reader<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consume `literal` if the input continues with it.
    fn eat(&mut self, literal: &str) -> bool {
        if self.rest().starts_with(literal) {
            self.pos += literal.len();
            true
        } else {
            false
        }
    }

    /// 1-based line and column of the current offset.
    fn position(&self) -> (usize, usize) {
        let consumed = &self.input[..self.pos];
        let line = consumed.matches('\n').count() + 1;
        let column = consumed
            .rsplit_once('\n')
            .map_or(consumed.chars().count(), |(_, tail)| tail.chars().count())
            + 1;
        (line, column)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|c| c.is_whitespace()) {
            self.bump();
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match self.peek() {
            Some(found) => {
                let (line, column) = self.position();
                ParseError::UnexpectedChar {
                    found,
                    expected: expected.to_string(),
                    line,
                    column,
                }
            }
            None => ParseError::UnexpectedEof {
                expected: expected.to_string(),
            },
        }
    }

    /// Consume up to (and including) `terminator`, returning the content
    /// before it.
    fn take_until(&mut self, terminator: &str, expected: &str) -> Result<&'a str, ParseError> {
        match self.rest().find(terminator) {
            Some(offset) => {
                let content = &self.rest()[..offset];
                self.pos += offset + terminator.len();
                Ok(content)
            }
            None => Err(ParseError::UnexpectedEof {
                expected: expected.to_string(),
            }),
        }
    }

    /// Comments, processing instructions, and insignificant whitespace
    /// outside the root element.
    fn parse_misc(&mut self) -> Result<Vec<XmlContent>, ParseError> {
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            if self.rest().starts_with("<!--") {
                items.push(self.parse_comment()?);
            } else if self.rest().starts_with("<?") {
                items.push(self.parse_processing_instruction()?);
            } else {
                return Ok(items);
            }
        }
    }

    fn parse_comment(&mut self) -> Result<XmlContent, ParseError> {
        debug_assert!(self.rest().starts_with("<!--"));
        self.pos += "<!--".len();
        let text = self.take_until("-->", "comment")?;
        Ok(XmlContent::Comment(text.to_string()))
    }

    fn parse_processing_instruction(&mut self) -> Result<XmlContent, ParseError> {
        debug_assert!(self.rest().starts_with("<?"));
        self.pos += "<?".len();
        let body = self.take_until("?>", "processing instruction")?;
        let (target, data) = match body.find(char::is_whitespace) {
            Some(split) => (&body[..split], body[split..].trim_start()),
            None => (body, ""),
        };
        Ok(XmlContent::ProcessingInstruction {
            target: target.to_string(),
            data: data.to_string(),
        })
    }

    fn parse_name(&mut self) -> Result<String, ParseError> {
        let start = self.pos;
        match self.peek() {
            Some(c) if c.is_alphabetic() || c == '_' => {
                self.bump();
            }
            _ => return Err(self.unexpected("name")),
        }
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'))
        {
            self.bump();
        }
        Ok(self.input[start..self.pos].to_string())
    }

    fn parse_element(&mut self) -> Result<XmlElement, ParseError> {
        if !self.eat("<") {
            return Err(self.unexpected("'<'"));
        }
        let tag = self.parse_name()?;
        let mut element = XmlElement::new(&tag);

        loop {
            self.skip_whitespace();
            if self.eat("/>") {
                return Ok(element);
            }
            if self.eat(">") {
                break;
            }
            let (line, column) = self.position();
            let name = self.parse_name()?;
            if element.has_attribute(&name) {
                return Err(ParseError::DuplicateAttribute { name, line, column });
            }
            self.skip_whitespace();
            if !self.eat("=") {
                return Err(self.unexpected("'='"));
            }
            self.skip_whitespace();
            let value = self.parse_attribute_value()?;
            element.set_attribute(name, value);
        }

        element.children = self.parse_children(&tag)?;
        Ok(element)
    }

    fn parse_attribute_value(&mut self) -> Result<String, ParseError> {
        let quote = match self.peek() {
            Some(c @ ('"' | '\'')) => {
                self.bump();
                c
            }
            _ => return Err(self.unexpected("quoted attribute value")),
        };
        let raw = self.take_until(&quote.to_string(), "attribute value")?;
        self.decode_entities(raw)
    }

    /// Child content up to and including the matching close tag.
    fn parse_children(&mut self, open_tag: &str) -> Result<Vec<XmlContent>, ParseError> {
        let mut children = Vec::new();
        loop {
            if self.rest().starts_with("<!--") {
                children.push(self.parse_comment()?);
            } else if self.rest().starts_with("</") {
                let (line, column) = self.position();
                self.pos += "</".len();
                let found = self.parse_name()?;
                self.skip_whitespace();
                if !self.eat(">") {
                    return Err(self.unexpected("'>'"));
                }
                if found != open_tag {
                    return Err(ParseError::MismatchedTag {
                        expected: open_tag.to_string(),
                        found,
                        line,
                        column,
                    });
                }
                return Ok(children);
            } else if self.rest().starts_with("<?") {
                children.push(self.parse_processing_instruction()?);
            } else if self.rest().starts_with('<') {
                children.push(XmlContent::Element(self.parse_element()?));
            } else if self.peek().is_some() {
                let raw = match self.rest().find('<') {
                    Some(offset) => {
                        let text = &self.rest()[..offset];
                        self.pos += offset;
                        text
                    }
                    None => {
                        return Err(ParseError::UnexpectedEof {
                            expected: format!("</{}>", open_tag),
                        })
                    }
                };
                // Whitespace-only runs are formatting, not content
                if !raw.trim().is_empty() {
                    children.push(XmlContent::Text(self.decode_entities(raw)?));
                }
            } else {
                return Err(ParseError::UnexpectedEof {
                    expected: format!("</{}>", open_tag),
                });
            }
        }
    }

    /// Resolve the predefined entities and numeric character references.
    fn decode_entities(&self, raw: &str) -> Result<String, ParseError> {
        if !raw.contains('&') {
            return Ok(raw.to_string());
        }
        let mut out = String::with_capacity(raw.len());
        let mut chars = raw.char_indices();
        while let Some((offset, c)) = chars.next() {
            if c != '&' {
                out.push(c);
                continue;
            }
            let rest = &raw[offset + 1..];
            let end = rest.find(';').ok_or_else(|| {
                self.reference_error(rest.chars().take(8).collect::<String>())
            })?;
            let reference = &rest[..end];
            let decoded = match reference {
                "amp" => '&',
                "lt" => '<',
                "gt" => '>',
                "quot" => '"',
                "apos" => '\'',
                _ => {
                    let code = reference
                        .strip_prefix("#x")
                        .map(|hex| u32::from_str_radix(hex, 16))
                        .or_else(|| reference.strip_prefix('#').map(|dec| dec.parse::<u32>()))
                        .ok_or_else(|| self.reference_error(reference.to_string()))?
                        .map_err(|_| self.reference_error(reference.to_string()))?;
                    char::from_u32(code)
                        .ok_or_else(|| self.reference_error(reference.to_string()))?
                }
            };
            out.push(decoded);
            // Skip past the reference body and the ';'
            for _ in 0..reference.chars().count() + 1 {
                chars.next();
            }
        }
        Ok(out)
    }

    fn reference_error(&self, reference: String) -> ParseError {
        let (line, column) = self.position();
        ParseError::InvalidCharacterReference {
            reference,
            line,
            column,
        }
    }
}
