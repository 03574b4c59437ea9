//! Tolerant reader for the loose JSON dialect the game writes: `#` and `//`
//! line comments, bare object keys and trailing commas.
//!
//! The input is normalized to strict JSON first and then handed to
//! `serde_json`. String literals are copied verbatim, so comment markers,
//! colons and commas inside them are left alone.

use serde::de::DeserializeOwned;

use crate::error::CommonError;

/// Rewrite relaxed JSON into strict JSON.
pub fn clean(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '"' => i = copy_string(&chars, i, &mut out),
            '#' => i = skip_line(&chars, i),
            '/' if chars.get(i + 1) == Some(&'/') => i = skip_line(&chars, i),
            ',' if closes_next(&chars, i + 1) => i += 1,
            c if c.is_ascii_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                if chars.get(skip_whitespace(&chars, i)) == Some(&':') {
                    out.push('"');
                    out.push_str(&word);
                    out.push('"');
                } else {
                    out.push_str(&word);
                }
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }

    out
}

/// Clean and deserialize relaxed JSON.
pub fn parse<T: DeserializeOwned>(input: &str) -> Result<T, CommonError> {
    Ok(serde_json::from_str(&clean(input))?)
}

/// Read a string field from a relaxed JSON object.
pub fn string_field(input: &str, field: &str) -> Result<Option<String>, CommonError> {
    let value: serde_json::Value = parse(input)?;
    let object = value
        .as_object()
        .ok_or_else(|| CommonError::NotAnObject(value.to_string()))?;
    Ok(object
        .get(field)
        .and_then(|v| v.as_str())
        .map(str::to_string))
}

// Copies a string literal starting at the opening quote; returns the index
// just past the closing quote.
fn copy_string(chars: &[char], start: usize, out: &mut String) -> usize {
    out.push('"');
    let mut i = start + 1;
    while i < chars.len() {
        let c = chars[i];
        out.push(c);
        i += 1;
        match c {
            '\\' => {
                if let Some(&escaped) = chars.get(i) {
                    out.push(escaped);
                    i += 1;
                }
            }
            '"' => break,
            _ => {}
        }
    }
    i
}

// The newline itself is kept so line structure survives.
fn skip_line(chars: &[char], start: usize) -> usize {
    let mut i = start;
    while i < chars.len() && chars[i] != '\n' {
        i += 1;
    }
    i
}

fn skip_whitespace(chars: &[char], start: usize) -> usize {
    let mut i = start;
    while i < chars.len() && chars[i].is_whitespace() {
        i += 1;
    }
    i
}

// True when only whitespace and comments separate `start` from a closing
// bracket or the end of input.
fn closes_next(chars: &[char], start: usize) -> bool {
    let mut i = start;
    loop {
        i = skip_whitespace(chars, i);
        match chars.get(i) {
            None | Some('}') | Some(']') => return true,
            Some('#') => i = skip_line(chars, i),
            Some('/') if chars.get(i + 1) == Some(&'/') => i = skip_line(chars, i),
            _ => return false,
        }
    }
}
