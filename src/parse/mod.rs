//! Lenient reader for JavaScript-flavoured object literals.
//!
//! Event data is hand-authored as `const EVENT_DATA = { ... };` in a plain
//! JS file. The syntax is almost JSON but allows everything JSON forbids:
//! `//` and `/* */` comments, unquoted keys, single-quoted strings, and
//! trailing commas. This module extracts the literal bound to a given name
//! and rewrites it into strict JSON before handing it to [`serde_json`].
//!
//! The rewrite is a single character scan that tracks string literals, so
//! comment markers, braces, and commas inside string values are inert.

use std::iter::Peekable;
use std::str::CharIndices;

use serde_json::Value;

use crate::error::{Result, ToolError};

/// Characters of context shown on either side of a decode failure.
const CONTEXT_WINDOW: usize = 80;

/// Extracts the object literal bound to `name` from `source` and decodes it
/// into a generic JSON value.
pub fn parse_object(source: &str, name: &str) -> Result<Value> {
    let literal = extract_literal(source, name)?;
    let normalized = normalize(literal);
    decode(&normalized)
}

/// Locates `name = {` and returns the source slice spanning the literal from
/// its opening brace to the matching close.
fn extract_literal<'a>(source: &'a str, name: &str) -> Result<&'a str> {
    let open = find_declaration(source, name)
        .ok_or_else(|| ToolError::DeclarationNotFound(name.to_string()))?;

    let tail = &source[open..];
    let mut depth = 0usize;
    let mut iter = tail.char_indices().peekable();
    while let Some((idx, ch)) = iter.next() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(&tail[..idx + ch.len_utf8()]);
                }
            }
            '"' | '\'' => skip_string(&mut iter, ch),
            '/' => skip_comment(&mut iter),
            _ => {}
        }
    }

    Err(ToolError::UnterminatedObject(name.to_string()))
}

/// Finds the byte offset of the opening brace in the first `name = {`
/// declaration. The name must stand alone as an identifier, so a search for
/// `EVENT_DATA` does not match inside `MY_EVENT_DATA`.
fn find_declaration(source: &str, name: &str) -> Option<usize> {
    let mut search = 0;
    while let Some(found) = source[search..].find(name) {
        let start = search + found;
        let end = start + name.len();
        let standalone = source[..start]
            .chars()
            .next_back()
            .is_none_or(|ch| !is_ident_char(ch))
            && source[end..].chars().next().is_none_or(|ch| !is_ident_char(ch));
        if standalone {
            let mut rest = source[end..].trim_start();
            if let Some(stripped) = rest.strip_prefix('=') {
                rest = stripped.trim_start();
                if rest.starts_with('{') {
                    return Some(source.len() - rest.len());
                }
            }
        }
        search = end;
    }
    None
}

fn skip_string(iter: &mut Peekable<CharIndices<'_>>, quote: char) {
    while let Some((_, ch)) = iter.next() {
        match ch {
            '\\' => {
                iter.next();
            }
            ch if ch == quote => return,
            _ => {}
        }
    }
}

fn skip_comment(iter: &mut Peekable<CharIndices<'_>>) {
    match iter.peek() {
        Some(&(_, '/')) => {
            for (_, ch) in iter.by_ref() {
                if ch == '\n' {
                    return;
                }
            }
        }
        Some(&(_, '*')) => {
            iter.next();
            let mut prev = ' ';
            for (_, ch) in iter.by_ref() {
                if prev == '*' && ch == '/' {
                    return;
                }
                prev = ch;
            }
        }
        _ => {}
    }
}

/// Rewrites the extracted literal into strict JSON: comments are dropped,
/// bare keys gain double quotes, single-quoted strings become double-quoted,
/// and trailing commas before `}` or `]` are removed.
fn normalize(literal: &str) -> String {
    let chars: Vec<char> = literal.chars().collect();
    let mut out = String::with_capacity(literal.len());
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '/' if chars.get(i + 1) == Some(&'/') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                i = skip_block_comment(&chars, i);
            }
            '"' => i = copy_double_quoted(&chars, i, &mut out),
            '\'' => i = rewrite_single_quoted(&chars, i, &mut out),
            ',' => {
                // A comma whose next significant character closes a scope is
                // a trailing comma and gets dropped.
                if !closes_scope(&chars, i + 1) {
                    out.push(',');
                }
                i += 1;
            }
            ch if is_ident_start(ch) => {
                let start = i;
                while i < chars.len() && is_ident_char(chars[i]) {
                    i += 1;
                }
                // Only a key position puts an identifier in front of a colon;
                // bare value words (true, false, null) pass through as-is.
                if next_significant(&chars, i) == Some(':') {
                    out.push('"');
                    out.extend(&chars[start..i]);
                    out.push('"');
                } else {
                    out.extend(&chars[start..i]);
                }
            }
            ch => {
                out.push(ch);
                i += 1;
            }
        }
    }
    out
}

fn copy_double_quoted(chars: &[char], mut i: usize, out: &mut String) -> usize {
    out.push('"');
    i += 1;
    while i < chars.len() {
        let ch = chars[i];
        out.push(ch);
        i += 1;
        match ch {
            '\\' => {
                if let Some(&next) = chars.get(i) {
                    out.push(next);
                    i += 1;
                }
            }
            '"' => break,
            _ => {}
        }
    }
    i
}

fn rewrite_single_quoted(chars: &[char], mut i: usize, out: &mut String) -> usize {
    out.push('"');
    i += 1;
    while i < chars.len() {
        let ch = chars[i];
        i += 1;
        match ch {
            '\'' => break,
            '\\' => match chars.get(i) {
                // An escaped apostrophe needs no escape once double-quoted.
                Some('\'') => {
                    out.push('\'');
                    i += 1;
                }
                Some(&next) => {
                    out.push('\\');
                    out.push(next);
                    i += 1;
                }
                None => {}
            },
            '"' => out.push_str("\\\""),
            _ => out.push(ch),
        }
    }
    out.push('"');
    i
}

fn skip_block_comment(chars: &[char], mut i: usize) -> usize {
    i += 2;
    while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
        i += 1;
    }
    (i + 2).min(chars.len())
}

/// Advances past whitespace and comments, returning the next index holding a
/// significant character.
fn skip_insignificant(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() {
        match chars[i] {
            ch if ch.is_whitespace() => i += 1,
            '/' if chars.get(i + 1) == Some(&'/') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                i = skip_block_comment(chars, i);
            }
            _ => break,
        }
    }
    i
}

fn closes_scope(chars: &[char], from: usize) -> bool {
    matches!(chars.get(skip_insignificant(chars, from)), Some('}') | Some(']'))
}

fn next_significant(chars: &[char], from: usize) -> Option<char> {
    chars.get(skip_insignificant(chars, from)).copied()
}

fn is_ident_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_' || ch == '$'
}

fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}

fn decode(normalized: &str) -> Result<Value> {
    serde_json::from_str(normalized).map_err(|err| decode_failure(normalized, &err))
}

fn decode_failure(text: &str, err: &serde_json::Error) -> ToolError {
    let offset = byte_offset(text, err.line(), err.column());
    ToolError::Decode {
        offset,
        message: err.to_string(),
        context: context_window(text, offset),
    }
}

/// Converts serde_json's one-based line/column pair into a byte offset into
/// the decoded text.
fn byte_offset(text: &str, line: usize, column: usize) -> usize {
    let mut offset = 0;
    for (index, text_line) in text.split('\n').enumerate() {
        if index + 1 == line {
            return offset + column.saturating_sub(1).min(text_line.len());
        }
        offset += text_line.len() + 1;
    }
    text.len()
}

fn context_window(text: &str, offset: usize) -> String {
    let mut start = offset.saturating_sub(CONTEXT_WINDOW);
    while start > 0 && !text.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = (offset + CONTEXT_WINDOW).min(text.len());
    while end < text.len() && !text.is_char_boundary(end) {
        end += 1;
    }
    text[start..end].to_string()
}
