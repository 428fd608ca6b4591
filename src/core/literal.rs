// logtools - core/literal.rs
//
// Typed literal values and their textual representation.
//
// The values payload of a line is written as literal syntax and read back
// with `parse_literal`. The parser accepts literal syntax only: containers,
// numbers, strings, booleans and None. Names, calls, operators and anything
// else are rejected, nothing is ever evaluated.
//
// `Display` renders the canonical form, and for every finite literal
// `parse_literal(&value.to_string()) == Ok(value)`.

use crate::util::constants;
use crate::util::error::LiteralError;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt::{self, Write as _};

// =============================================================================
// Value model
// =============================================================================

/// A literal value recovered from (or destined for) a log line.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    None,
    Bool(bool),
    Int(i64),
    /// Integer outside the `i64` range, kept as its decimal digits.
    BigInt(String),
    Float(f64),
    Str(String),
    List(Vec<Literal>),
    Tuple(Vec<Literal>),
    /// Mapping in insertion order. Keys are literals themselves.
    Dict(Vec<(Literal, Literal)>),
}

impl Literal {
    /// Build a mapping from key/value pairs, preserving their order.
    pub fn dict<K, V, I>(pairs: I) -> Self
    where
        K: Into<Literal>,
        V: Into<Literal>,
        I: IntoIterator<Item = (K, V)>,
    {
        Literal::Dict(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Literal::None)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&[(Literal, Literal)]> {
        match self {
            Literal::Dict(pairs) => Some(pairs),
            _ => None,
        }
    }

    /// Text used when this literal is a mapping key inside a flattened path.
    ///
    /// String keys contribute their content, any other key its
    /// literal representation (`1`, `True`, `(1, 2)`).
    pub fn key_text(&self) -> String {
        match self {
            Literal::Str(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Text used for a tabular cell: raw content for strings, empty for
    /// None, literal representation otherwise.
    pub fn cell_text(&self) -> String {
        match self {
            Literal::None => String::new(),
            Literal::Str(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::Str(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::Str(s)
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Bool(b)
    }
}

impl From<i64> for Literal {
    fn from(i: i64) -> Self {
        Literal::Int(i)
    }
}

impl From<i32> for Literal {
    fn from(i: i32) -> Self {
        Literal::Int(i64::from(i))
    }
}

impl From<f64> for Literal {
    fn from(f: f64) -> Self {
        Literal::Float(f)
    }
}

impl<T: Into<Literal>> From<Vec<T>> for Literal {
    fn from(items: Vec<T>) -> Self {
        Literal::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Literal>> From<Option<T>> for Literal {
    fn from(value: Option<T>) -> Self {
        value.map_or(Literal::None, Into::into)
    }
}

impl From<serde_json::Value> for Literal {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Literal::None,
            Value::Bool(b) => Literal::Bool(b),
            Value::Number(n) => match (n.as_i64(), n.as_u64()) {
                (Some(i), _) => Literal::Int(i),
                (None, Some(u)) => Literal::BigInt(u.to_string()),
                _ => Literal::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Literal::Str(s),
            Value::Array(items) => Literal::List(items.into_iter().map(Literal::from).collect()),
            Value::Object(map) => Literal::Dict(
                map.into_iter()
                    .map(|(k, v)| (Literal::Str(k), Literal::from(v)))
                    .collect(),
            ),
        }
    }
}

// =============================================================================
// Representation
// =============================================================================

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::None => f.write_str("None"),
            Literal::Bool(true) => f.write_str("True"),
            Literal::Bool(false) => f.write_str("False"),
            Literal::Int(i) => write!(f, "{i}"),
            Literal::BigInt(digits) => f.write_str(digits),
            Literal::Float(x) => write_float(f, *x),
            Literal::Str(s) => write_quoted(f, s),
            Literal::List(items) => {
                f.write_char('[')?;
                write_items(f, items)?;
                f.write_char(']')
            }
            Literal::Tuple(items) => {
                f.write_char('(')?;
                write_items(f, items)?;
                if items.len() == 1 {
                    f.write_char(',')?;
                }
                f.write_char(')')
            }
            Literal::Dict(pairs) => {
                f.write_char('{')?;
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_char('}')
            }
        }
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, items: &[Literal]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn write_float(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    if x.is_nan() {
        return f.write_str("nan");
    }
    if x.is_infinite() {
        return f.write_str(if x > 0.0 { "inf" } else { "-inf" });
    }
    let text = format!("{x:?}");
    f.write_str(&text)?;
    // A float must never read back as an int.
    if !text.contains(['.', 'e', 'E']) {
        f.write_str(".0")?;
    }
    Ok(())
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };
    f.write_char(quote)?;
    for c in s.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c == quote => {
                f.write_char('\\')?;
                f.write_char(c)?;
            }
            c if (c as u32) < 0x20 || c as u32 == 0x7f => write!(f, "\\x{:02x}", c as u32)?,
            c => f.write_char(c)?,
        }
    }
    f.write_char(quote)
}

impl Serialize for Literal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Literal::None => serializer.serialize_none(),
            Literal::Bool(b) => serializer.serialize_bool(*b),
            Literal::Int(i) => serializer.serialize_i64(*i),
            Literal::BigInt(digits) => match digits.parse::<i128>() {
                Ok(i) => serializer.serialize_i128(i),
                Err(_) => serializer.serialize_str(digits),
            },
            Literal::Float(x) => serializer.serialize_f64(*x),
            Literal::Str(s) => serializer.serialize_str(s),
            Literal::List(items) | Literal::Tuple(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Literal::Dict(pairs) => {
                let mut map = serializer.serialize_map(Some(pairs.len()))?;
                for (k, v) in pairs {
                    map.serialize_entry(&k.key_text(), v)?;
                }
                map.end()
            }
        }
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parse `text` as a single literal.
///
/// Surrounding whitespace is ignored. Comma separated values without
/// brackets form a tuple (`1, 2` and `1,` are tuples). Anything that is not
/// literal syntax (names, calls, operators, sets, complex numbers) is an
/// error.
pub fn parse_literal(text: &str) -> Result<Literal, LiteralError> {
    let mut parser = Parser {
        src: text,
        pos: 0,
        depth: 0,
    };
    parser.skip_ws();
    let first = parser.value()?;
    parser.skip_ws();
    if parser.peek() != Some(',') {
        if parser.pos != text.len() {
            return Err(LiteralError::new(parser.pos, "unexpected trailing input"));
        }
        return Ok(first);
    }

    let mut items = vec![first];
    while parser.peek() == Some(',') {
        parser.bump();
        parser.skip_ws();
        if parser.pos == text.len() {
            break;
        }
        items.push(parser.value()?);
        parser.skip_ws();
    }
    if parser.pos != text.len() {
        return Err(LiteralError::new(parser.pos, "unexpected trailing input"));
    }
    Ok(Literal::Tuple(items))
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
    }

    fn error<T>(&self, reason: impl Into<String>) -> Result<T, LiteralError> {
        Err(LiteralError::new(self.pos, reason))
    }

    fn value(&mut self) -> Result<Literal, LiteralError> {
        match self.peek() {
            None => self.error("unexpected end of input"),
            Some('[') => self.nested(Self::list),
            Some('(') => self.nested(Self::tuple),
            Some('{') => self.nested(Self::dict),
            Some('\'') | Some('"') => self.strings(),
            Some('-') | Some('+') => self.signed_number(),
            Some(c) if c.is_ascii_digit() => self.number(false),
            Some('.') if self.peek_second().is_some_and(|c| c.is_ascii_digit()) => {
                self.number(false)
            }
            Some(c) if c.is_alphabetic() || c == '_' => self.name(),
            Some(c) => self.error(format!("unexpected character {c:?}")),
        }
    }

    fn nested(
        &mut self,
        body: fn(&mut Self) -> Result<Literal, LiteralError>,
    ) -> Result<Literal, LiteralError> {
        if self.depth >= constants::MAX_LITERAL_DEPTH {
            return self.error("nesting too deep");
        }
        self.depth += 1;
        let result = body(self);
        self.depth -= 1;
        result
    }

    /// Comma separated items up to `close`, opening bracket already consumed.
    fn items(&mut self, close: char, mut items: Vec<Literal>) -> Result<Vec<Literal>, LiteralError> {
        loop {
            self.skip_ws();
            if self.peek() == Some(close) {
                self.bump();
                return Ok(items);
            }
            items.push(self.value()?);
            self.skip_ws();
            match self.bump() {
                Some(',') => {}
                Some(c) if c == close => return Ok(items),
                Some(c) => return self.error(format!("expected ',' or {close:?}, found {c:?}")),
                None => return self.error(format!("missing closing {close:?}")),
            }
        }
    }

    fn list(&mut self) -> Result<Literal, LiteralError> {
        self.bump();
        Ok(Literal::List(self.items(']', Vec::new())?))
    }

    fn tuple(&mut self) -> Result<Literal, LiteralError> {
        self.bump();
        self.skip_ws();
        if self.peek() == Some(')') {
            self.bump();
            return Ok(Literal::Tuple(Vec::new()));
        }
        let first = self.value()?;
        self.skip_ws();
        match self.bump() {
            // Parenthesised single value, not a tuple.
            Some(')') => Ok(first),
            Some(',') => Ok(Literal::Tuple(self.items(')', vec![first])?)),
            Some(c) => self.error(format!("expected ',' or ')', found {c:?}")),
            None => self.error("missing closing ')'"),
        }
    }

    fn dict(&mut self) -> Result<Literal, LiteralError> {
        self.bump();
        let mut pairs = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some('}') {
                self.bump();
                return Ok(Literal::Dict(pairs));
            }
            let key_pos = self.pos;
            let key = self.value()?;
            if matches!(key, Literal::List(_) | Literal::Dict(_)) {
                return Err(LiteralError::new(key_pos, "unhashable mapping key"));
            }
            self.skip_ws();
            match self.bump() {
                Some(':') => {}
                Some(',') | Some('}') => return self.error("sets are not supported"),
                Some(c) => return self.error(format!("expected ':', found {c:?}")),
                None => return self.error("missing closing '}'"),
            }
            self.skip_ws();
            let value = self.value()?;
            // Later duplicates win, the way a mapping display behaves.
            if let Some(slot) = pairs.iter_mut().find(|(k, _)| *k == key) {
                slot.1 = value;
            } else {
                pairs.push((key, value));
            }
            self.skip_ws();
            match self.bump() {
                Some(',') => {}
                Some('}') => return Ok(Literal::Dict(pairs)),
                Some(c) => return self.error(format!("expected ',' or '}}', found {c:?}")),
                None => return self.error("missing closing '}'"),
            }
        }
    }

    fn name(&mut self) -> Result<Literal, LiteralError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        match &self.src[start..self.pos] {
            "None" => Ok(Literal::None),
            "True" => Ok(Literal::Bool(true)),
            "False" => Ok(Literal::Bool(false)),
            other => Err(LiteralError::new(start, format!("name '{other}' is not a literal"))),
        }
    }

    fn signed_number(&mut self) -> Result<Literal, LiteralError> {
        let negative = self.bump() == Some('-');
        self.skip_ws();
        match self.peek() {
            Some(c) if c.is_ascii_digit() || c == '.' => self.number(negative),
            _ => self.error("sign must be followed by a number"),
        }
    }

    fn number(&mut self, negative: bool) -> Result<Literal, LiteralError> {
        let start = self.pos;
        let rest = self.rest();

        // Prefixed integers: 0x.., 0o.., 0b..
        if rest.len() > 1 && rest.starts_with('0') {
            let radix = match rest.as_bytes()[1] {
                b'x' | b'X' => Some(16),
                b'o' | b'O' => Some(8),
                b'b' | b'B' => Some(2),
                _ => None,
            };
            if let Some(radix) = radix {
                self.pos += 2;
                let digits = self.take_digits(|c| c.is_digit(radix));
                if digits.is_empty() {
                    return self.error("missing digits after radix prefix");
                }
                self.reject_suffix()?;
                let signed = if negative { format!("-{digits}") } else { digits };
                if let Ok(i) = i64::from_str_radix(&signed, radix) {
                    return Ok(Literal::Int(i));
                }
                return i128::from_str_radix(&signed, radix)
                    .map(|i| Literal::BigInt(i.to_string()))
                    .map_err(|_| LiteralError::new(start, "integer out of range"));
            }
        }

        let mut text = self.take_digits(|c| c.is_ascii_digit());
        let int_part_len = text.len();
        let mut is_float = false;

        if self.peek() == Some('.') {
            is_float = true;
            self.bump();
            text.push('.');
            text.push_str(&self.take_digits(|c| c.is_ascii_digit()));
        }
        if matches!(self.peek(), Some('e') | Some('E')) {
            is_float = true;
            self.bump();
            text.push('e');
            if let Some(sign @ ('+' | '-')) = self.peek() {
                self.bump();
                text.push(sign);
            }
            let exponent = self.take_digits(|c| c.is_ascii_digit());
            if exponent.is_empty() {
                return self.error("missing exponent digits");
            }
            text.push_str(&exponent);
        }
        self.reject_suffix()?;

        if is_float {
            let value: f64 = text
                .parse()
                .map_err(|_| LiteralError::new(start, "invalid float"))?;
            return Ok(Literal::Float(if negative { -value } else { value }));
        }

        // Decimal integers may not carry leading zeros ("007" is not a literal).
        if int_part_len > 1 && text.starts_with('0') && text.chars().any(|c| c != '0') {
            return Err(LiteralError::new(start, "leading zeros in decimal integer"));
        }
        let signed = if negative { format!("-{text}") } else { text };
        Ok(match signed.parse::<i64>() {
            Ok(i) => Literal::Int(i),
            Err(_) => Literal::BigInt(signed),
        })
    }

    /// Digits accepted by `accept`, with single underscores between digits.
    fn take_digits(&mut self, accept: impl Fn(char) -> bool) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if accept(c) {
                out.push(c);
                self.bump();
            } else if c == '_'
                && !out.is_empty()
                && self.peek_second().is_some_and(&accept)
            {
                self.bump();
            } else {
                break;
            }
        }
        out
    }

    fn reject_suffix(&self) -> Result<(), LiteralError> {
        match self.peek() {
            Some(c) if c.is_alphanumeric() || c == '_' || c == '.' => {
                self.error(format!("unexpected {c:?} after number"))
            }
            _ => Ok(()),
        }
    }

    /// One or more adjacent string literals, concatenated.
    fn strings(&mut self) -> Result<Literal, LiteralError> {
        let mut out = self.string()?;
        loop {
            let save = self.pos;
            self.skip_ws();
            if matches!(self.peek(), Some('\'') | Some('"')) {
                out.push_str(&self.string()?);
            } else {
                self.pos = save;
                return Ok(Literal::Str(out));
            }
        }
    }

    fn string(&mut self) -> Result<String, LiteralError> {
        let start = self.pos;
        let quote = self.bump().unwrap_or('\'');
        let mut out = String::new();
        loop {
            match self.bump() {
                None | Some('\n') => {
                    return Err(LiteralError::new(start, "unterminated string"));
                }
                Some(c) if c == quote => return Ok(out),
                Some('\\') => self.escape(&mut out)?,
                Some(c) => out.push(c),
            }
        }
    }

    fn escape(&mut self, out: &mut String) -> Result<(), LiteralError> {
        let Some(c) = self.bump() else {
            return self.error("unterminated escape");
        };
        match c {
            '\n' => {}
            '\\' | '\'' | '"' => out.push(c),
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'a' => out.push('\x07'),
            'b' => out.push('\x08'),
            'f' => out.push('\x0c'),
            'v' => out.push('\x0b'),
            'x' => out.push(self.code_point(2)?),
            'u' => out.push(self.code_point(4)?),
            'U' => out.push(self.code_point(8)?),
            '0'..='7' => {
                let mut value = c.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match self.peek().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            value = value * 8 + d;
                            self.bump();
                        }
                        None => break,
                    }
                }
                out.push(char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            // Unknown escapes keep their backslash.
            other => {
                out.push('\\');
                out.push(other);
            }
        }
        Ok(())
    }

    fn code_point(&mut self, len: usize) -> Result<char, LiteralError> {
        let start = self.pos;
        let rest = self.rest();
        let hex = rest.get(..len).filter(|h| h.chars().all(|c| c.is_ascii_hexdigit()));
        let Some(hex) = hex else {
            return Err(LiteralError::new(start, "truncated escape sequence"));
        };
        self.pos += len;
        u32::from_str_radix(hex, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| LiteralError::new(start, "invalid code point"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Literal {
        parse_literal(s).unwrap_or_else(|e| panic!("{s:?} should parse: {e}"))
    }

    #[test]
    fn test_parse_scalars() {
        assert_eq!(parse("None"), Literal::None);
        assert_eq!(parse("True"), Literal::Bool(true));
        assert_eq!(parse("False"), Literal::Bool(false));
        assert_eq!(parse("3"), Literal::Int(3));
        assert_eq!(parse("-17"), Literal::Int(-17));
        assert_eq!(parse("1_000"), Literal::Int(1000));
        assert_eq!(parse("0x1F"), Literal::Int(31));
        assert_eq!(parse("3.25"), Literal::Float(3.25));
        assert_eq!(parse(".5"), Literal::Float(0.5));
        assert_eq!(parse("1."), Literal::Float(1.0));
        assert_eq!(parse("1e3"), Literal::Float(1000.0));
        assert_eq!(parse("  7  "), Literal::Int(7));
    }

    #[test]
    fn test_parse_strings() {
        assert_eq!(parse("'AAA'"), Literal::from("AAA"));
        assert_eq!(parse("\"it's\""), Literal::from("it's"));
        assert_eq!(parse(r"'a\nb\tc'"), Literal::from("a\nb\tc"));
        assert_eq!(parse(r"'\x41é'"), Literal::from("Aé"));
        assert_eq!(parse("'ab' 'cd'"), Literal::from("abcd"));
        assert_eq!(parse(r"'\d'"), Literal::from("\\d"));
    }

    #[test]
    fn test_parse_containers() {
        assert_eq!(parse("[1, 2, 3]"), Literal::from(vec![1, 2, 3]));
        assert_eq!(parse("[]"), Literal::List(vec![]));
        assert_eq!(parse("()"), Literal::Tuple(vec![]));
        assert_eq!(parse("(1,)"), Literal::Tuple(vec![Literal::Int(1)]));
        assert_eq!(parse("(1)"), Literal::Int(1));
        assert_eq!(
            parse("(1, 2,)"),
            Literal::Tuple(vec![Literal::Int(1), Literal::Int(2)])
        );
        assert_eq!(
            parse("{'A': 'AAA', 'int': 3}"),
            Literal::dict([("A", Literal::from("AAA")), ("int", Literal::Int(3))])
        );
        assert_eq!(parse("{}"), Literal::Dict(vec![]));
        assert_eq!(
            parse("[[1, 2], [3, 4]]"),
            Literal::List(vec![Literal::from(vec![1, 2]), Literal::from(vec![3, 4])])
        );
    }

    #[test]
    fn test_parse_bare_tuple() {
        assert_eq!(
            parse("1, 2"),
            Literal::Tuple(vec![Literal::Int(1), Literal::Int(2)])
        );
        assert_eq!(parse("'a',"), Literal::Tuple(vec![Literal::from("a")]));
        assert_eq!(
            parse(" (1, 2), [3] , "),
            Literal::Tuple(vec![
                Literal::Tuple(vec![Literal::Int(1), Literal::Int(2)]),
                Literal::from(vec![3]),
            ])
        );
        for text in [",", "1,,", "1, 2 3", "1, name"] {
            assert!(parse_literal(text).is_err(), "{text:?} should be rejected");
        }
    }

    #[test]
    fn test_parse_integers_beyond_i64() {
        assert_eq!(
            parse("12345678901234567890"),
            Literal::BigInt("12345678901234567890".to_string())
        );
        assert_eq!(
            parse("-9_223_372_036_854_775_809"),
            Literal::BigInt("-9223372036854775809".to_string())
        );
        assert_eq!(
            parse("0xFFFFFFFFFFFFFFFF"),
            Literal::BigInt("18446744073709551615".to_string())
        );
        assert_eq!(parse("9223372036854775807"), Literal::Int(i64::MAX));

        let big = parse("123456789012345678901234567890");
        assert_eq!(big.to_string(), "123456789012345678901234567890");
        assert_eq!(parse(&big.to_string()), big);
        assert_eq!(
            serde_json::to_value(parse("18446744073709551615")).unwrap(),
            serde_json::json!(18446744073709551615u64)
        );
    }

    #[test]
    fn test_parse_duplicate_key_keeps_last() {
        assert_eq!(parse("{'a': 1, 'a': 2}"), Literal::dict([("a", 2)]));
    }

    #[test]
    fn test_parse_rejects_non_literals() {
        for text in [
            "",
            "INFO",
            "run",
            "2021-05-09 16:30:12,093",
            "err: [-1]",
            "{'int': 3, 'ndarray': array([[1, 2, 3],",
            "__import__('os')",
            "1 + 2",
            "{1, 2}",
            "{[1]: 2}",
            "007",
            "1j",
            "'unterminated",
            "[1, 2",
        ] {
            assert!(parse_literal(text).is_err(), "{text:?} should be rejected");
        }
    }

    #[test]
    fn test_depth_is_bounded() {
        let deep = "[".repeat(constants::MAX_LITERAL_DEPTH + 1)
            + &"]".repeat(constants::MAX_LITERAL_DEPTH + 1);
        let err = parse_literal(&deep).unwrap_err();
        assert_eq!(err.reason, "nesting too deep");
    }

    #[test]
    fn test_display_matches_literal_syntax() {
        let value = Literal::dict([
            ("A", Literal::from("AAA")),
            ("int", Literal::Int(3)),
            (
                "nest",
                Literal::dict([
                    ("t", Literal::Tuple(vec![Literal::Int(1)])),
                    ("f", Literal::Float(2.0)),
                    ("n", Literal::None),
                ]),
            ),
        ]);
        assert_eq!(
            value.to_string(),
            "{'A': 'AAA', 'int': 3, 'nest': {'t': (1,), 'f': 2.0, 'n': None}}"
        );
        assert_eq!(Literal::from("it's").to_string(), "\"it's\"");
        assert_eq!(Literal::from("a'b\"c").to_string(), r#"'a\'b"c'"#);
    }

    #[test]
    fn test_display_reads_back() {
        let samples = [
            Literal::None,
            Literal::Bool(true),
            Literal::Int(-42),
            Literal::Float(3.25),
            Literal::Float(1e20),
            Literal::from("tab\there 'q' \"dq\" \\ \u{1}"),
            Literal::Tuple(vec![Literal::from("x"), Literal::Float(0.5)]),
            Literal::dict([(Literal::Int(1), Literal::from(vec![true, false]))]),
        ];
        for value in samples {
            assert_eq!(parse(&value.to_string()), value, "via {value}");
        }
    }

    #[test]
    fn test_key_and_cell_text() {
        assert_eq!(Literal::from("k").key_text(), "k");
        assert_eq!(Literal::Int(1).key_text(), "1");
        assert_eq!(Literal::None.cell_text(), "");
        assert_eq!(Literal::from(vec![1, 2]).cell_text(), "[1, 2]");
    }

    #[test]
    fn test_json_view() {
        let value = parse("{'a': (1, 2), 'b': None, 3: 'x'}");
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json, serde_json::json!({"a": [1, 2], "b": null, "3": "x"}));

        let back = Literal::from(serde_json::json!({"k": [1, 2.5]}));
        assert_eq!(
            back,
            Literal::dict([(
                "k",
                Literal::List(vec![Literal::Int(1), Literal::Float(2.5)])
            )])
        );
    }
}
