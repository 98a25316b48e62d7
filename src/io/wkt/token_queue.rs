use std::collections::VecDeque;

use crate::error::{GeoCodecError, Result};
use crate::io::wkt::tokenizer::{WktToken, WktTokenKind};

/// Lookahead over a token sequence.
///
/// Every grammar violation the WKT reader reports comes from one of the `dequeue_*` methods.
#[derive(Debug)]
pub struct TokenQueue<'a> {
    tokens: VecDeque<WktToken<'a>>,
}

impl<'a> TokenQueue<'a> {
    pub fn new(tokens: Vec<WktToken<'a>>) -> Self {
        Self {
            tokens: tokens.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn peek(&self) -> Option<&WktToken<'a>> {
        self.tokens.front()
    }

    /// Take the next token whatever it is.
    pub fn dequeue(&mut self) -> Result<WktToken<'a>> {
        self.tokens
            .pop_front()
            .ok_or_else(|| GeoCodecError::Syntax("unexpected end of input".to_string()))
    }

    /// Take the next token, which must be of `kind`.
    pub fn dequeue_kind(&mut self, kind: WktTokenKind) -> Result<WktToken<'a>> {
        if self.next_is_kind(kind) {
            self.dequeue()
        } else {
            Err(mismatch(kind, self.peek()))
        }
    }

    /// Take the next token, whose text must equal `literal` ignoring ASCII case.
    pub fn dequeue_literal(&mut self, literal: &str) -> Result<WktToken<'a>> {
        if self.next_is_literal(literal) {
            self.dequeue()
        } else {
            Err(mismatch(format!("'{literal}'"), self.peek()))
        }
    }

    pub fn next_is_kind(&self, kind: WktTokenKind) -> bool {
        self.peek().is_some_and(|token| token.kind == kind)
    }

    pub fn next_is_literal(&self, literal: &str) -> bool {
        self.peek().is_some_and(|token| token.is(literal))
    }
}

fn mismatch(expected: impl std::fmt::Display, found: Option<&WktToken>) -> GeoCodecError {
    match found {
        Some(token) => GeoCodecError::Syntax(format!("expected {expected} but found {token}")),
        None => GeoCodecError::Syntax(format!("expected {expected} but found end of input")),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::io::wkt::tokenizer::tokenize;

    #[test]
    fn typed_and_literal_dequeue() {
        let mut queue = TokenQueue::new(tokenize("point ( 1").unwrap());
        assert_eq!(queue.len(), 3);
        assert!(queue.next_is_literal("POINT"));
        assert_eq!(queue.dequeue_literal("POINT").unwrap().text, "point");
        assert!(queue.next_is_kind(WktTokenKind::LeftParenthesis));
        queue.dequeue_kind(WktTokenKind::LeftParenthesis).unwrap();
        assert_eq!(queue.dequeue_kind(WktTokenKind::Number).unwrap().text, "1");
        assert!(queue.is_empty());
        assert!(queue.peek().is_none());
    }

    #[test]
    fn mismatch_names_expected_and_actual() {
        let mut queue = TokenQueue::new(tokenize("POINT )").unwrap());
        let err = queue.dequeue_kind(WktTokenKind::Number).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Syntax error: expected number but found 'POINT' at position 0"
        );
        // A failed dequeue leaves the token in place.
        assert!(queue.next_is_literal("point"));
    }

    #[test]
    fn end_of_input_is_a_syntax_error() {
        let mut queue = TokenQueue::new(vec![]);
        assert!(matches!(
            queue.dequeue_kind(WktTokenKind::RightParenthesis),
            Err(GeoCodecError::Syntax(msg)) if msg.ends_with("end of input")
        ));
        assert!(matches!(queue.dequeue(), Err(GeoCodecError::Syntax(_))));
    }
}
