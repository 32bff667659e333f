//! A permissive JSON-literal reader.
//!
//! Models frequently emit single-quoted strings and trailing commas, neither
//! of which strict JSON accepts. This module reproduces the effect of a
//! permissive literal evaluator (as the original Python implementation
//! achieved via `ast.literal_eval`) without depending on Python-literal
//! syntax: single and double quoted strings, trailing commas in objects and
//! arrays, and bareword `true`/`false`/`null`.
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Initial recursive-descent reader.

struct Reader<'a> {
    chars: std::vec::Vec<char>,
    pos: usize,
    _src: &'a str,
}

impl<'a> Reader<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            chars: src.chars().collect(),
            pos: 0,
            _src: src,
        }
    }

    fn peek(&self) -> std::option::Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn advance(&mut self) -> std::option::Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), std::option::Option::Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, expected: char) -> std::option::Option<()> {
        if self.peek() == std::option::Option::Some(expected) {
            self.pos += 1;
            std::option::Option::Some(())
        } else {
            std::option::Option::None
        }
    }

    fn parse_value(&mut self) -> std::option::Option<serde_json::Value> {
        self.skip_ws();
        match self.peek()? {
            '{' => self.parse_object(),
            '[' => self.parse_array(),
            '"' | '\'' => self.parse_string().map(serde_json::Value::String),
            't' | 'f' => self.parse_bool(),
            'n' => self.parse_null(),
            c if c == '-' || c.is_ascii_digit() => self.parse_number(),
            _ => std::option::Option::None,
        }
    }

    fn parse_object(&mut self) -> std::option::Option<serde_json::Value> {
        self.expect('{')?;
        let mut map = serde_json::Map::new();
        self.skip_ws();
        if self.peek() == std::option::Option::Some('}') {
            self.pos += 1;
            return std::option::Option::Some(serde_json::Value::Object(map));
        }
        loop {
            self.skip_ws();
            let key = self.parse_string()?;
            self.skip_ws();
            self.expect(':')?;
            let value = self.parse_value()?;
            map.insert(key, value);
            self.skip_ws();
            match self.peek() {
                std::option::Option::Some(',') => {
                    self.pos += 1;
                    self.skip_ws();
                    if self.peek() == std::option::Option::Some('}') {
                        self.pos += 1;
                        break;
                    }
                }
                std::option::Option::Some('}') => {
                    self.pos += 1;
                    break;
                }
                _ => return std::option::Option::None,
            }
        }
        std::option::Option::Some(serde_json::Value::Object(map))
    }

    fn parse_array(&mut self) -> std::option::Option<serde_json::Value> {
        self.expect('[')?;
        let mut values = std::vec::Vec::new();
        self.skip_ws();
        if self.peek() == std::option::Option::Some(']') {
            self.pos += 1;
            return std::option::Option::Some(serde_json::Value::Array(values));
        }
        loop {
            let value = self.parse_value()?;
            values.push(value);
            self.skip_ws();
            match self.peek() {
                std::option::Option::Some(',') => {
                    self.pos += 1;
                    self.skip_ws();
                    if self.peek() == std::option::Option::Some(']') {
                        self.pos += 1;
                        break;
                    }
                }
                std::option::Option::Some(']') => {
                    self.pos += 1;
                    break;
                }
                _ => return std::option::Option::None,
            }
        }
        std::option::Option::Some(serde_json::Value::Array(values))
    }

    fn parse_string(&mut self) -> std::option::Option<std::string::String> {
        let quote = self.advance()?;
        if quote != '"' && quote != '\'' {
            return std::option::Option::None;
        }
        let mut out = std::string::String::new();
        loop {
            let c = self.advance()?;
            if c == quote {
                break;
            }
            if c == '\\' {
                let escaped = self.advance()?;
                match escaped {
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    'r' => out.push('\r'),
                    other => out.push(other),
                }
            } else {
                out.push(c);
            }
        }
        std::option::Option::Some(out)
    }

    fn parse_bool(&mut self) -> std::option::Option<serde_json::Value> {
        if self.consume_literal("true") {
            std::option::Option::Some(serde_json::Value::Bool(true))
        } else if self.consume_literal("false") {
            std::option::Option::Some(serde_json::Value::Bool(false))
        } else {
            std::option::Option::None
        }
    }

    fn parse_null(&mut self) -> std::option::Option<serde_json::Value> {
        if self.consume_literal("null") {
            std::option::Option::Some(serde_json::Value::Null)
        } else {
            std::option::Option::None
        }
    }

    fn consume_literal(&mut self, literal: &str) -> bool {
        let start = self.pos;
        for expected in literal.chars() {
            if self.advance() != std::option::Option::Some(expected) {
                self.pos = start;
                return false;
            }
        }
        true
    }

    fn parse_number(&mut self) -> std::option::Option<serde_json::Value> {
        let start = self.pos;
        if self.peek() == std::option::Option::Some('-') {
            self.pos += 1;
        }
        while matches!(self.peek(), std::option::Option::Some(c) if c.is_ascii_digit() || c == '.' || c == 'e' || c == 'E' || c == '+' || c == '-')
        {
            self.pos += 1;
        }
        let slice: std::string::String = self.chars[start..self.pos].iter().collect();
        serde_json::Number::from_str(&slice)
            .ok()
            .map(serde_json::Value::Number)
    }
}

use std::str::FromStr;

/// Parses `text` as a JSON-like value, tolerating single-quoted strings and
/// trailing commas. Returns `None` when the text cannot be read as a value
/// at all (the caller falls back to an empty object).
pub fn parse(text: &str) -> std::option::Option<serde_json::Value> {
    if let std::result::Result::Ok(value) = serde_json::from_str(text) {
        return std::option::Option::Some(value);
    }
    let mut reader = Reader::new(text);
    let value = reader.parse_value()?;
    reader.skip_ws();
    std::option::Option::Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_strict_json_directly() {
        let value = parse(r#"{"a": 1, "b": [1, 2]}"#).unwrap();
        assert_eq!(value, serde_json::json!({"a": 1, "b": [1, 2]}));
    }

    #[test]
    fn test_parses_single_quoted_strings() {
        let value = parse("{'a': 'x', 'b': 2}").unwrap();
        assert_eq!(value, serde_json::json!({"a": "x", "b": 2}));
    }

    #[test]
    fn test_tolerates_trailing_comma_in_object_and_array() {
        let value = parse("{'a': [1, 2,], 'b': 3,}").unwrap();
        assert_eq!(value, serde_json::json!({"a": [1, 2], "b": 3}));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse("not json at all").is_none());
    }
}
