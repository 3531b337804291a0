//! Minimal CSS selector engine
//!
//! Covers what the editor's markup conventions need: type, `#id`,
//! `.class`, `[attr]` and `[attr="value"]` compounds, the descendant
//! combinator, and comma-separated lists.

use super::host::DragHost;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("unexpected '{found}' at offset {position} in selector")]
    Unexpected { found: char, position: usize },
    #[error("unterminated attribute selector")]
    Unterminated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrTest {
    Present,
    Equals(String),
}

/// One compound selector such as `iframe#frame.drop-zone[data-droppable]`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, AttrTest)>,
}

impl Compound {
    fn matches<H: DragHost>(&self, host: &H, node: &H::Node) -> bool {
        if let Some(tag) = &self.tag {
            if !host.tag_name(node).eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if host.attribute(node, "id").as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|class| host.has_class(node, class)) {
            return false;
        }
        self.attrs.iter().all(|(name, test)| {
            let value = host.attribute(node, name);
            match test {
                AttrTest::Present => value.is_some(),
                AttrTest::Equals(expected) => value.as_deref() == Some(expected.as_str()),
            }
        })
    }
}

/// Compounds joined by descendant combinators, left to right
#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    parts: Vec<Compound>,
}

impl Complex {
    fn matches<H: DragHost>(&self, host: &H, node: &H::Node) -> bool {
        let Some((subject, ancestors)) = self.parts.split_last() else {
            return false;
        };
        if !subject.matches(host, node) {
            return false;
        }

        // Greedy ancestor walk is exact when every combinator is a descendant one
        let mut current = host.parent(node);
        for part in ancestors.iter().rev() {
            loop {
                let Some(candidate) = current else {
                    return false;
                };
                current = host.parent(&candidate);
                if part.matches(host, &candidate) {
                    break;
                }
            }
        }
        true
    }
}

/// Comma-separated selector list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    source: String,
    selectors: Vec<Complex>,
}

impl SelectorList {
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        let selectors = Parser::new(source).parse_list()?;
        Ok(Self {
            source: source.trim().to_string(),
            selectors,
        })
    }

    /// Selector text as given, for hosts with a native matcher
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches<H: DragHost>(&self, host: &H, node: &H::Node) -> bool {
        self.selectors.iter().any(|s| s.matches(host, node))
    }

    /// Nearest inclusive ancestor matching the list, like `Element.closest`
    pub fn closest<H: DragHost>(&self, host: &H, node: &H::Node) -> Option<H::Node> {
        let mut current = Some(node.clone());
        while let Some(candidate) = current {
            if self.matches(host, &candidate) {
                return Some(candidate);
            }
            current = host.parent(&candidate);
        }
        None
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    /// Returns whether any whitespace was consumed
    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn unexpected(&self) -> SelectorError {
        self.peek().map_or(SelectorError::Empty, |found| SelectorError::Unexpected {
            found,
            position: self.pos,
        })
    }

    fn parse_list(&mut self) -> Result<Vec<Complex>, SelectorError> {
        let mut selectors = Vec::new();
        loop {
            self.skip_ws();
            selectors.push(self.parse_complex()?);
            self.skip_ws();
            match self.peek() {
                None => break,
                Some(',') => self.pos += 1,
                Some(_) => return Err(self.unexpected()),
            }
        }
        Ok(selectors)
    }

    fn parse_complex(&mut self) -> Result<Complex, SelectorError> {
        let mut parts = vec![self.parse_compound()?];
        loop {
            let had_ws = self.skip_ws();
            match self.peek() {
                Some(c) if had_ws && c != ',' => parts.push(self.parse_compound()?),
                _ => break,
            }
        }
        Ok(Complex { parts })
    }

    fn parse_compound(&mut self) -> Result<Compound, SelectorError> {
        let start = self.pos;
        let mut compound = Compound::default();

        if self.peek() == Some('*') {
            self.pos += 1;
        } else {
            let tag = self.ident();
            if !tag.is_empty() {
                compound.tag = Some(tag.to_ascii_lowercase());
            }
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    compound.id = Some(self.required_ident()?);
                }
                Some('.') => {
                    self.pos += 1;
                    compound.classes.push(self.required_ident()?);
                }
                Some('[') => {
                    self.pos += 1;
                    compound.attrs.push(self.parse_attribute()?);
                }
                _ => break,
            }
        }

        if self.pos == start {
            return Err(self.unexpected());
        }
        Ok(compound)
    }

    fn parse_attribute(&mut self) -> Result<(String, AttrTest), SelectorError> {
        self.skip_ws();
        let name = self.required_ident()?;
        self.skip_ws();
        let test = match self.peek() {
            Some(']') => AttrTest::Present,
            Some('=') => {
                self.pos += 1;
                self.skip_ws();
                AttrTest::Equals(self.parse_value()?)
            }
            None => return Err(SelectorError::Unterminated),
            Some(_) => return Err(self.unexpected()),
        };
        self.skip_ws();
        match self.peek() {
            Some(']') => {
                self.pos += 1;
                Ok((name, test))
            }
            None => Err(SelectorError::Unterminated),
            Some(_) => Err(self.unexpected()),
        }
    }

    fn parse_value(&mut self) -> Result<String, SelectorError> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let start = self.pos;
                while self.peek().is_some_and(|c| c != quote) {
                    self.pos += 1;
                }
                if self.peek().is_none() {
                    return Err(SelectorError::Unterminated);
                }
                let value: String = self.chars[start..self.pos].iter().collect();
                self.pos += 1;
                Ok(value)
            }
            _ => self.required_ident(),
        }
    }

    fn ident(&mut self) -> String {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn required_ident(&mut self) -> Result<String, SelectorError> {
        let ident = self.ident();
        if ident.is_empty() {
            return Err(match self.peek() {
                None => SelectorError::Unterminated,
                Some(_) => self.unexpected(),
            });
        }
        Ok(ident)
    }
}
