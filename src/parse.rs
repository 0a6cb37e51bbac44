//! Text parser: brace-delimited pair notation and the rule `->` split.
//!
//! Graph text is an ordered sequence of (source, destination) pairs:
//! `{1,2},{2,3}`. Rule text is two pair lists joined by an arrow:
//! `{x,y} -> {x,y},{y,z}`. Host UIs historically wrap whole pair lists in an
//! extra brace layer (`{{x, y}} -> {{x, y}, {y, z}}`); the scanner strips at
//! most one enclosing layer so both forms parse identically.
//!
//! Every identifier is coerced to its string form here, numeric or not, so
//! the rest of the engine never has to reconcile numeric and string keys.

use crate::error::{ParseError, ParseResult};
use crate::graph::Graph;

/// An ordered (source, destination) pair list, as written in the input text.
pub type PairList = Vec<(String, String)>;

/// Parse a pair list such as `{1,2},{2,3}` (or `{{1,2},{2,3}}`).
///
/// Whitespace is tolerated anywhere between tokens. Identifiers are any
/// non-empty run of characters other than `{`, `}`, and `,`, trimmed.
pub fn parse_pairs(text: &str) -> ParseResult<PairList> {
    let text = strip_outer_braces(text.trim())?;
    let mut scanner = Scanner::new(text);
    let mut pairs = PairList::new();

    scanner.skip_whitespace();
    if scanner.at_end() {
        return Err(ParseError::Empty);
    }

    loop {
        pairs.push(scanner.pair()?);
        scanner.skip_whitespace();
        if scanner.at_end() {
            break;
        }
        scanner.expect(',')?;
        scanner.skip_whitespace();
    }

    Ok(pairs)
}

/// Parse graph text into a [`Graph`].
///
/// For every pair (n1, n2): append n2 to n1's sequence (creating it if
/// absent) and ensure n2 exists as a key. Single-root validation is a
/// separate stage; call [`Graph::root`] on the result.
pub fn parse_graph(text: &str) -> ParseResult<Graph> {
    let mut graph = Graph::new();
    for (src, dst) in parse_pairs(text)? {
        graph.append_edge(src, dst.clone());
        graph.ensure_node(dst);
    }
    Ok(graph)
}

/// Split rule text on its single `->` and parse both halves as pair lists.
///
/// Returns (pattern pairs, body pairs). The body stays a raw pair list
/// because body symbols may introduce nodes absent from the pattern.
pub fn parse_rule(text: &str) -> ParseResult<(PairList, PairList)> {
    let Some((pattern_text, body_text)) = text.split_once("->") else {
        return Err(ParseError::RuleArrow { count: 0 });
    };
    if body_text.contains("->") {
        return Err(ParseError::RuleArrow {
            count: 1 + body_text.matches("->").count(),
        });
    }
    Ok((parse_pairs(pattern_text)?, parse_pairs(body_text)?))
}

/// Strip one enclosing brace layer if it wraps the entire text.
///
/// `{{x,y},{y,z}}` becomes `{x,y},{y,z}`; `{x,y},{y,z}` is returned as-is.
/// The outer layer is only stripped when the brace opened at byte 0 closes
/// at the final byte, so `{a,b},{c,d}` (whose first brace closes early) is
/// left untouched.
fn strip_outer_braces(text: &str) -> ParseResult<&str> {
    if !text.starts_with('{') {
        return Ok(text);
    }
    let mut depth = 0usize;
    for (offset, ch) in text.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or(ParseError::UnbalancedBraces { offset })?;
                if depth == 0 {
                    // First top-level brace closes here. Strip only if it
                    // spans the whole text AND contains a nested pair.
                    return if offset == text.len() - 1 && text[1..offset].contains('{') {
                        Ok(text[1..offset].trim())
                    } else {
                        Ok(text)
                    };
                }
            }
            _ => {}
        }
    }
    Err(ParseError::UnbalancedBraces { offset: text.len() })
}

/// Character-level scanner over one pair list.
struct Scanner<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn expect(&mut self, wanted: char) -> ParseResult<()> {
        match self.peek() {
            Some(ch) if ch == wanted => {
                self.bump();
                Ok(())
            }
            Some(ch) => Err(ParseError::ExpectedPair {
                offset: self.pos,
                found: ch,
            }),
            None => Err(ParseError::UnbalancedBraces { offset: self.pos }),
        }
    }

    /// Parse one `{a,b}` pair.
    fn pair(&mut self) -> ParseResult<(String, String)> {
        match self.peek() {
            Some('{') => {
                self.bump();
            }
            Some(ch) => {
                return Err(ParseError::ExpectedPair {
                    offset: self.pos,
                    found: ch,
                });
            }
            None => return Err(ParseError::UnbalancedBraces { offset: self.pos }),
        }

        let mut elements: Vec<String> = Vec::new();
        loop {
            elements.push(self.identifier()?);
            match self.bump() {
                Some(',') => continue,
                Some('}') => break,
                // identifier() stops only at `{`, `}`, `,`, or end of input;
                // a stray `{` inside a pair is an unbalanced brace.
                _ => return Err(ParseError::UnbalancedBraces { offset: self.pos }),
            }
        }

        match <[String; 2]>::try_from(elements) {
            Ok([src, dst]) => Ok((src, dst)),
            Err(elements) => Err(ParseError::PairArity {
                count: elements.len(),
            }),
        }
    }

    /// Read one identifier: characters up to `{`, `}`, or `,`, trimmed.
    fn identifier(&mut self) -> ParseResult<String> {
        let start = self.pos;
        while self.peek().is_some_and(|ch| !matches!(ch, '{' | '}' | ',')) {
            self.bump();
        }
        let ident = self.text[start..self.pos].trim();
        if ident.is_empty() {
            return Err(ParseError::EmptyIdentifier { offset: start });
        }
        Ok(ident.to_string())
    }
}
