//! Pieces shared by parsers for the common/combined log formats.

use crate::parser::ParseError;
use chrono::{DateTime, Utc};

const CLF_TIME_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

/// Parses `10/Oct/2000:13:55:36 -0700`.
pub fn parse_clf_time(raw: &str) -> Result<DateTime<Utc>, ParseError> {
    DateTime::parse_from_str(raw, CLF_TIME_FORMAT)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| ParseError::Timestamp(raw.to_string()))
}

/// Index of the first unescaped `"` in `data`.
///
/// nginx writes `"` as `\x22`, Apache as `\"`; both are skipped.
pub fn find_closing_quote(data: &[u8]) -> Option<usize> {
    let mut escaped = false;
    for (i, &b) in data.iter().enumerate() {
        if escaped {
            escaped = false;
        } else if b == b'\\' {
            escaped = true;
        } else if b == b'"' {
            return Some(i);
        }
    }
    None
}

/// Path part of `METHOD /path HTTP/x.y`.
///
/// Garbage requests (TLS handshakes on a plain port, for instance) may lack
/// either the method or the version; whatever is present is kept.
pub fn request_path(request: &[u8]) -> &[u8] {
    let after_method = match request.iter().position(|&b| b == b' ') {
        Some(i) => &request[i + 1..],
        None => request,
    };
    match after_method.iter().position(|&b| b == b' ') {
        Some(i) => &after_method[..i],
        None => after_method,
    }
}

/// Splits on single spaces. A field opening with `"` runs to its closing
/// quote and comes back without the quotes.
pub fn split_fields(line: &[u8]) -> Result<Vec<&[u8]>, ParseError> {
    let mut fields = Vec::with_capacity(16);
    let mut rest = line;
    while !rest.is_empty() {
        if let Some(body) = rest.strip_prefix(b"\"") {
            let end = find_closing_quote(body).ok_or(ParseError::Format("unbalanced quotes"))?;
            fields.push(&body[..end]);
            rest = &body[end + 1..];
            rest = rest.strip_prefix(b" ").unwrap_or(rest);
        } else {
            match rest.iter().position(|&b| b == b' ') {
                Some(i) => {
                    fields.push(&rest[..i]);
                    rest = &rest[i + 1..];
                }
                None => {
                    fields.push(rest);
                    break;
                }
            }
        }
    }
    Ok(fields)
}

/// Walks a log line field by field.
pub struct Fields<'a> {
    rest: &'a [u8],
}

impl<'a> Fields<'a> {
    pub fn new(line: &'a [u8]) -> Self {
        Self { rest: line }
    }

    fn skip_spaces(&mut self) {
        let start = self
            .rest
            .iter()
            .position(|&b| b != b' ')
            .unwrap_or(self.rest.len());
        self.rest = &self.rest[start..];
    }

    /// Next space-delimited token.
    pub fn word(&mut self, what: &'static str) -> Result<&'a [u8], ParseError> {
        self.skip_spaces();
        if self.rest.is_empty() {
            return Err(ParseError::Format(what));
        }
        let end = self
            .rest
            .iter()
            .position(|&b| b == b' ')
            .unwrap_or(self.rest.len());
        let (word, rest) = self.rest.split_at(end);
        self.rest = rest;
        Ok(word)
    }

    /// Contents of the next `open ... close` group, delimiters excluded.
    pub fn bracketed(&mut self, what: &'static str) -> Result<&'a [u8], ParseError> {
        self.skip_spaces();
        let body = self
            .rest
            .strip_prefix(b"[")
            .ok_or(ParseError::Format(what))?;
        let end = body
            .iter()
            .position(|&b| b == b']')
            .ok_or(ParseError::Format(what))?;
        self.rest = &body[end + 1..];
        Ok(&body[..end])
    }

    /// Contents of the next double-quoted field, escapes left as written.
    pub fn quoted(&mut self, what: &'static str) -> Result<&'a [u8], ParseError> {
        self.skip_spaces();
        let body = self
            .rest
            .strip_prefix(b"\"")
            .ok_or(ParseError::Format(what))?;
        let end = find_closing_quote(body).ok_or(ParseError::Format(what))?;
        self.rest = &body[end + 1..];
        Ok(&body[..end])
    }
}
