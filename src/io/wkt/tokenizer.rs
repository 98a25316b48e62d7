use std::fmt::Display;

use crate::error::{GeoCodecError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WktTokenKind {
    /// A signed decimal number with optional exponent.
    Number,
    /// A bare identifier: a keyword, a dimension suffix or `NaN`.
    String,
    LeftParenthesis,
    RightParenthesis,
    Comma,
}

impl Display for WktTokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WktTokenKind::Number => f.write_str("number"),
            WktTokenKind::String => f.write_str("identifier"),
            WktTokenKind::LeftParenthesis => f.write_str("'('"),
            WktTokenKind::RightParenthesis => f.write_str("')'"),
            WktTokenKind::Comma => f.write_str("','"),
        }
    }
}

/// A token borrowing its text from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WktToken<'a> {
    pub kind: WktTokenKind,
    pub text: &'a str,
    /// Byte offset of the token in the input.
    pub position: usize,
}

impl<'a> WktToken<'a> {
    /// Whether the token text equals `literal`, ignoring ASCII case.
    pub fn is(&self, literal: &str) -> bool {
        self.text.eq_ignore_ascii_case(literal)
    }

    /// Parse a [`WktTokenKind::Number`] token.
    pub fn to_f64(&self) -> Result<f64> {
        lexical_core::parse::<f64>(self.text.as_bytes()).map_err(|_| GeoCodecError::Lexical {
            position: self.position,
            found: self.text.to_string(),
        })
    }
}

impl Display for WktToken<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}' at position {}", self.text, self.position)
    }
}

/// Lexes WKT text in a single forward pass.
///
/// Yields each token once; after the first error the iterator is exhausted.
pub struct WktTokenizer<'a> {
    input: &'a str,
    pos: usize,
    failed: bool,
}

impl<'a> WktTokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            failed: false,
        }
    }

    fn bytes(&self) -> &'a [u8] {
        self.input.as_bytes()
    }

    fn peek_byte(&self) -> Option<u8> {
        self.bytes().get(self.pos).copied()
    }

    fn skip_while(&mut self, pred: impl Fn(u8) -> bool) {
        while self.peek_byte().is_some_and(&pred) {
            self.pos += 1;
        }
    }

    fn token(&self, kind: WktTokenKind, start: usize) -> WktToken<'a> {
        WktToken {
            kind,
            text: &self.input[start..self.pos],
            position: start,
        }
    }

    fn lexical_error(&self, start: usize) -> GeoCodecError {
        // Nothing consumed yet: report the whole offending character, which may be multi-byte.
        let end = if self.pos > start {
            self.pos
        } else {
            self.input[start..]
                .chars()
                .next()
                .map_or(start, |c| start + c.len_utf8())
        };
        GeoCodecError::Lexical {
            position: start,
            found: self.input[start..end].to_string(),
        }
    }

    fn read_number(&mut self, start: usize) -> Result<WktToken<'a>> {
        if matches!(self.peek_byte(), Some(b'+' | b'-')) {
            self.pos += 1;
        }

        let int_start = self.pos;
        self.skip_while(|b| b.is_ascii_digit());
        let mut digits = self.pos - int_start;

        if self.peek_byte() == Some(b'.') {
            self.pos += 1;
            let frac_start = self.pos;
            self.skip_while(|b| b.is_ascii_digit());
            digits += self.pos - frac_start;
        }

        if digits == 0 {
            return Err(self.lexical_error(start));
        }

        if matches!(self.peek_byte(), Some(b'e' | b'E')) {
            self.pos += 1;
            if matches!(self.peek_byte(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            let exp_start = self.pos;
            self.skip_while(|b| b.is_ascii_digit());
            if self.pos == exp_start {
                return Err(self.lexical_error(start));
            }
        }

        Ok(self.token(WktTokenKind::Number, start))
    }

    fn next_token(&mut self) -> Option<Result<WktToken<'a>>> {
        self.skip_while(|b| b.is_ascii_whitespace());

        let start = self.pos;
        let byte = self.peek_byte()?;

        let token = match byte {
            b'(' => {
                self.pos += 1;
                Ok(self.token(WktTokenKind::LeftParenthesis, start))
            }
            b')' => {
                self.pos += 1;
                Ok(self.token(WktTokenKind::RightParenthesis, start))
            }
            b',' => {
                self.pos += 1;
                Ok(self.token(WktTokenKind::Comma, start))
            }
            b'+' | b'-' | b'.' | b'0'..=b'9' => self.read_number(start),
            b if b.is_ascii_alphabetic() || b == b'_' => {
                self.skip_while(|b| b.is_ascii_alphanumeric() || b == b'_');
                Ok(self.token(WktTokenKind::String, start))
            }
            _ => Err(self.lexical_error(start)),
        };
        Some(token)
    }
}

impl<'a> Iterator for WktTokenizer<'a> {
    type Item = Result<WktToken<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let item = self.next_token()?;
        self.failed = item.is_err();
        Some(item)
    }
}

/// Lex all of `input`, failing on the first unrecognized character.
pub fn tokenize(input: &str) -> Result<Vec<WktToken<'_>>> {
    WktTokenizer::new(input).collect()
}

#[cfg(test)]
mod test {
    use super::*;

    fn kinds(input: &str) -> Vec<WktTokenKind> {
        tokenize(input).unwrap().iter().map(|t| t.kind).collect()
    }

    #[test]
    fn point_tokens() {
        use WktTokenKind::*;

        let tokens = tokenize("POINT (56.543 -32.657)").unwrap();
        assert_eq!(
            tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![String, LeftParenthesis, Number, Number, RightParenthesis]
        );
        assert_eq!(tokens[0].text, "POINT");
        assert_eq!(tokens[2].text, "56.543");
        assert_eq!(tokens[3].text, "-32.657");
        assert_eq!(tokens[3].position, 14);
    }

    #[test]
    fn numbers_with_exponents_and_signs() {
        let tokens = tokenize("1e10 +2.5E-3 0.5 -7.25").unwrap();
        let values: Vec<f64> = tokens.iter().map(|t| t.to_f64().unwrap()).collect();
        assert_eq!(values, vec![1e10, 2.5e-3, 0.5, -7.25]);
    }

    #[test]
    fn keywords_keep_their_case() {
        let tokens = tokenize("multiPoint ZM EMPTY").unwrap();
        assert_eq!(tokens[0].text, "multiPoint");
        assert!(tokens[0].is("MULTIPOINT"));
        assert!(tokens[1].is("zm"));
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn structural_tokens_need_no_whitespace() {
        use WktTokenKind::*;

        assert_eq!(
            kinds("((1 2,3 4))"),
            vec![
                LeftParenthesis,
                LeftParenthesis,
                Number,
                Number,
                Comma,
                Number,
                Number,
                RightParenthesis,
                RightParenthesis
            ]
        );
    }

    #[test]
    fn nan_is_an_identifier() {
        assert_eq!(kinds("NaN"), vec![WktTokenKind::String]);
    }

    #[test]
    fn unrecognized_character_fails() {
        let err = tokenize("POINT (1 2) ;").unwrap_err();
        assert!(matches!(
            err,
            GeoCodecError::Lexical { position: 12, ref found } if found == ";"
        ));
    }

    #[test]
    fn malformed_numbers_fail() {
        assert!(matches!(
            tokenize("POINT (- 2)"),
            Err(GeoCodecError::Lexical { position: 7, .. })
        ));
        assert!(matches!(
            tokenize("POINT (1e 2)"),
            Err(GeoCodecError::Lexical { position: 7, .. })
        ));
    }

    #[test]
    fn iteration_stops_after_error() {
        let mut tokenizer = WktTokenizer::new("a # b");
        assert!(tokenizer.next().unwrap().is_ok());
        assert!(tokenizer.next().unwrap().is_err());
        assert!(tokenizer.next().is_none());
    }

    #[test]
    fn non_ascii_input_is_reported_whole() {
        let err = tokenize("POINT (1 2°)").unwrap_err();
        assert!(matches!(err, GeoCodecError::Lexical { ref found, .. } if found == "°"));
    }
}
