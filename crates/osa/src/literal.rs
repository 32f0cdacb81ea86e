//! 🐍 The permissive literal parser — for when someone pastes `{'a': True}` and calls it JSON.
//!
//! 🎬 COLD OPEN — INT. WORKFLOW EDITOR — 4:12 PM
//!
//! A user copies a dict out of a script, pastes it into the "body" field, and hits run.
//! Single quotes. Capitalized booleans. A trailing comma, lovingly placed. Strict JSON
//! takes one look and leaves the room. This module stays.
//!
//! 🧠 Knowledge graph:
//! - Stage two of body parsing (stage one: strict `serde_json`, stage three: give up, keep raw text).
//! - Accepts: `'single'` / `"double"` strings with backslash escapes, `True/False/None`
//!   (and the JSON spellings), ints, floats, trailing commas, `( … )` tuples read as arrays.
//! - Must consume the WHOLE input. A second ndjson line after the first object is a failure,
//!   which is exactly what keeps bulk payloads flowing through as raw text. 🦆
//! - Returns `Option`: `None` means "not a literal", never a panic.

use serde_json::{Map, Number, Value};

/// 🚀 Parse `text` as a literal structure, or return `None` if it isn't one.
pub fn parse_literal(text: &str) -> Option<Value> {
    let mut parser = LiteralParser { text, pos: 0 };
    let value = parser.value()?;
    parser.skip_ws();
    // -- 🎯 leftovers mean this was never one literal. ndjson lands here, on purpose.
    if parser.pos == text.len() {
        Some(value)
    } else {
        None
    }
}

struct LiteralParser<'a> {
    text: &'a str,
    pos: usize,
}

impl LiteralParser<'_> {
    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
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

    fn value(&mut self) -> Option<Value> {
        self.skip_ws();
        match self.peek()? {
            '{' => self.dict(),
            '[' => self.sequence('[', ']').map(Value::Array),
            '(' => self.tuple(),
            '\'' | '"' => self.string().map(Value::String),
            c if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => self.number(),
            c if c.is_ascii_alphabetic() => self.keyword(),
            _ => None,
        }
    }

    fn dict(&mut self) -> Option<Value> {
        self.bump(); // '{'
        let mut map = Map::new();
        loop {
            self.skip_ws();
            if self.eat('}') {
                return Some(Value::Object(map));
            }
            let key = match self.value()? {
                Value::String(s) => s,
                // -- 🔧 non-string keys get the json.dumps treatment: 1 -> "1", True -> "true"
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null => "null".to_string(),
                _ => return None,
            };
            self.skip_ws();
            if !self.eat(':') {
                // -- 💀 `{1, 2}` is a set. sets don't serialize. not our department.
                return None;
            }
            let value = self.value()?;
            map.insert(key, value);
            self.skip_ws();
            if self.eat(',') {
                continue;
            }
            self.skip_ws();
            return if self.eat('}') {
                Some(Value::Object(map))
            } else {
                None
            };
        }
    }

    fn sequence(&mut self, open: char, close: char) -> Option<Vec<Value>> {
        if !self.eat(open) {
            return None;
        }
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.eat(close) {
                return Some(items);
            }
            items.push(self.value()?);
            self.skip_ws();
            if self.eat(',') {
                continue;
            }
            self.skip_ws();
            return if self.eat(close) { Some(items) } else { None };
        }
    }

    fn tuple(&mut self) -> Option<Value> {
        // -- 🎭 `(1)` is just 1 wearing parentheses. `(1,)` and `(1, 2)` are tuples -> arrays.
        let start = self.pos;
        self.bump(); // '('
        self.skip_ws();
        if self.eat(')') {
            return Some(Value::Array(Vec::new()));
        }
        let first = self.value()?;
        self.skip_ws();
        if self.eat(')') {
            return Some(first);
        }
        self.pos = start;
        self.sequence('(', ')').map(Value::Array)
    }

    fn keyword(&mut self) -> Option<Value> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        match &self.text[start..self.pos] {
            "True" => Some(Value::Bool(true)),
            "False" => Some(Value::Bool(false)),
            "None" => Some(Value::Null),
            // -- 🐍 `true` and `null` are JSON words. a body that mixes them with single quotes stays raw.
            _ => None,
        }
    }

    fn number(&mut self) -> Option<Value> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '+' | '.' | '_') {
                self.pos += 1;
            } else {
                break;
            }
        }
        let raw: String = self.text[start..self.pos]
            .chars()
            .filter(|c| *c != '_')
            .collect();
        let raw = raw.strip_prefix('+').unwrap_or(&raw);
        if let Ok(int) = raw.parse::<i64>() {
            return Some(Value::Number(int.into()));
        }
        if let Ok(uint) = raw.parse::<u64>() {
            return Some(Value::Number(uint.into()));
        }
        // -- ⚠️ f64 parse happily eats "inf" and "NaN"; Number::from_f64 spits those back out
        let float = raw.parse::<f64>().ok()?;
        if raw.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
            return None;
        }
        Number::from_f64(float).map(Value::Number)
    }

    fn string(&mut self) -> Option<String> {
        let quote = self.bump()?;
        let mut out = String::new();
        loop {
            match self.bump()? {
                c if c == quote => return Some(out),
                '\n' => return None,
                '\\' => {
                    let escaped = self.bump()?;
                    match escaped {
                        'n' => out.push('\n'),
                        't' => out.push('\t'),
                        'r' => out.push('\r'),
                        '0' => out.push('\0'),
                        '\\' | '\'' | '"' => out.push(escaped),
                        'x' => out.push(self.hex_char(2)?),
                        'u' => out.push(self.hex_char(4)?),
                        'U' => out.push(self.hex_char(8)?),
                        '\n' => {}
                        // -- 🐍 unknown escapes keep their backslash. that's the house rule.
                        other => {
                            out.push('\\');
                            out.push(other);
                        }
                    }
                }
                c => out.push(c),
            }
        }
    }

    fn hex_char(&mut self, digits: usize) -> Option<char> {
        let end = self.pos.checked_add(digits)?;
        let hex = self.text.get(self.pos..end)?;
        // -- ⚠️ from_str_radix would let a leading '+' slide. escapes are digits only.
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let code = u32::from_str_radix(hex, 16).ok()?;
        self.pos = end;
        char::from_u32(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn the_one_where_a_pasted_dict_finally_gets_understood() {
        let parsed = parse_literal("{'name': 'kevin', 'active': True, 'manager': None}");
        assert_eq!(
            parsed,
            Some(json!({"name": "kevin", "active": true, "manager": null}))
        );
    }

    #[test]
    fn the_one_where_trailing_commas_are_forgiven() {
        assert_eq!(
            parse_literal("[1, 2.5, -3, 'x',]"),
            Some(json!([1, 2.5, -3, "x"]))
        );
        assert_eq!(parse_literal("{'a': [1,],}"), Some(json!({"a": [1]})));
    }

    #[test]
    fn the_one_where_tuples_cosplay_as_arrays() {
        assert_eq!(parse_literal("{'t': (1, 2)}"), Some(json!({"t": [1, 2]})));
        assert_eq!(parse_literal("[(7)]"), Some(json!([7])));
        assert_eq!(parse_literal("[()]"), Some(json!([[]])));
    }

    #[test]
    fn the_one_where_non_string_keys_get_stringified() {
        assert_eq!(
            parse_literal("{1: 'one', True: 'yes'}"),
            Some(json!({"1": "one", "true": "yes"}))
        );
    }

    #[test]
    fn the_one_where_escapes_behave() {
        assert_eq!(
            parse_literal(r#"['it\'s', "tab\there", '\x41é', '\q']"#),
            Some(json!(["it's", "tab\there", "Aé", "\\q"]))
        );
    }

    #[test]
    fn the_one_where_ndjson_is_not_a_literal() {
        // 🧪 two objects back to back: one literal and then some leftovers. rejected.
        assert_eq!(parse_literal("{'index': {}}\n{'x': 1}\n"), None);
    }

    #[test]
    fn the_one_where_garbage_stays_garbage() {
        assert_eq!(parse_literal("{'a': }"), None);
        assert_eq!(parse_literal("{1, 2}"), None);
        assert_eq!(parse_literal("[nope]"), None);
        assert_eq!(parse_literal("['unterminated]"), None);
        assert_eq!(parse_literal("[inf]"), None);
    }

    #[test]
    fn the_one_where_json_spellings_do_not_pass_as_python() {
        assert_eq!(parse_literal("{'a': true}"), None);
        assert_eq!(parse_literal("['x', null]"), None);
        assert_eq!(parse_literal("(false,)"), None);
        assert_eq!(parse_literal("{'a': True, 'b': None}"), Some(json!({"a": true, "b": null})));
    }

    #[test]
    fn the_one_where_hex_escapes_are_strictly_hex() {
        assert_eq!(parse_literal(r"'\x41'"), Some(json!("A")));
        assert_eq!(parse_literal(r"'\x+1'"), None);
        assert_eq!(parse_literal(r"'\u+041'"), None);
    }
}
