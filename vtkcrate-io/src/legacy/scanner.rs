//! Byte-level tokenizer for legacy VTK files
//!
//! Legacy files mix whitespace-separated ASCII keywords with raw binary
//! blocks, so the scanner works on bytes and keeps track of line numbers
//! for error reporting.

use vtkcrate_core::{Error, Result};

use super::ScalarType;

/// Tokenizer over the raw bytes of a legacy file
pub struct Scanner<'a> {
    data: &'a [u8],
    pos: usize,
    line: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0, line: 1 }
    }

    /// Current 1-based line number
    pub fn line(&self) -> usize {
        self.line
    }

    /// Build a parse error at the current line
    pub fn error(&self, message: impl Into<String>) -> Error {
        Error::parse(self.line, message)
    }

    fn skip_whitespace(&mut self) {
        while let Some(&b) = self.data.get(self.pos) {
            if !b.is_ascii_whitespace() {
                break;
            }
            if b == b'\n' {
                self.line += 1;
            }
            self.pos += 1;
        }
    }

    fn token_end(&self, start: usize) -> usize {
        self.data[start..]
            .iter()
            .position(|b| b.is_ascii_whitespace())
            .map_or(self.data.len(), |n| start + n)
    }

    /// Number of unread bytes
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Multiply two counts from the file, failing on overflow
    pub fn product(&self, a: usize, b: usize, what: &str) -> Result<usize> {
        a.checked_mul(b)
            .ok_or_else(|| self.error(format!("{} of {} x {} is too large", what, a, b)))
    }

    /// Check if only whitespace remains
    pub fn is_at_end(&mut self) -> bool {
        self.skip_whitespace();
        self.pos >= self.data.len()
    }

    /// Next whitespace-delimited token, `None` at end of input
    pub fn next_token(&mut self) -> Result<Option<&'a str>> {
        self.skip_whitespace();
        if self.pos >= self.data.len() {
            return Ok(None);
        }
        let start = self.pos;
        let end = self.token_end(start);
        self.pos = end;
        std::str::from_utf8(&self.data[start..end])
            .map(Some)
            .map_err(|_| self.error("token is not valid UTF-8"))
    }

    /// Next token, failing with a message naming `what` at end of input
    pub fn expect_token(&mut self, what: &str) -> Result<&'a str> {
        self.next_token()?
            .ok_or_else(|| self.error(format!("unexpected end of file, expected {}", what)))
    }

    /// Look at the next token without consuming it.
    ///
    /// Returns `None` at end of input or when the bytes are not text.
    pub fn peek_token(&self) -> Option<&'a str> {
        let start = self.pos
            + self.data[self.pos..]
                .iter()
                .position(|b| !b.is_ascii_whitespace())?;
        let end = self.token_end(start);
        std::str::from_utf8(&self.data[start..end]).ok()
    }

    /// Next token only if it is on the current line
    pub fn next_token_on_line(&mut self) -> Result<Option<&'a str>> {
        while let Some(&b) = self.data.get(self.pos) {
            if b == b'\n' || !b.is_ascii_whitespace() {
                break;
            }
            self.pos += 1;
        }
        match self.data.get(self.pos) {
            None | Some(b'\n') => Ok(None),
            Some(_) => self.next_token(),
        }
    }

    /// Rest of the current line without the line terminator
    pub fn read_line(&mut self) -> Result<&'a str> {
        let start = self.pos;
        let end = self.data[start..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(self.data.len(), |n| start + n);
        self.pos = end;
        if self.pos < self.data.len() {
            self.pos += 1;
            self.line += 1;
        }
        let text = std::str::from_utf8(&self.data[start..end])
            .map_err(|_| Error::parse(self.line, "line is not valid UTF-8"))?;
        Ok(text.trim_end_matches('\r'))
    }

    /// Consume everything up to and including the next newline
    pub fn skip_line(&mut self) {
        match self.data[self.pos..].iter().position(|&b| b == b'\n') {
            Some(n) => {
                self.pos += n + 1;
                self.line += 1;
            }
            None => self.pos = self.data.len(),
        }
    }

    /// Parse the next token as a count
    pub fn next_usize(&mut self, what: &str) -> Result<usize> {
        let token = self.expect_token(what)?;
        token
            .parse()
            .map_err(|_| self.error(format!("invalid {} '{}'", what, token)))
    }

    /// Parse the next token as a float
    pub fn next_f64(&mut self, what: &str) -> Result<f64> {
        let token = self.expect_token(what)?;
        token
            .parse()
            .map_err(|_| self.error(format!("invalid {} '{}'", what, token)))
    }

    /// Parse the next token as a data type keyword
    pub fn next_scalar_type(&mut self) -> Result<ScalarType> {
        let token = self.expect_token("data type")?;
        ScalarType::from_keyword(token)
            .ok_or_else(|| self.error(format!("unsupported data type '{}'", token)))
    }

    /// Read three ASCII floats (`ORIGIN`, `SPACING`)
    pub fn next_triple(&mut self, what: &str) -> Result<[f64; 3]> {
        Ok([self.next_f64(what)?, self.next_f64(what)?, self.next_f64(what)?])
    }

    /// Read `count` ASCII values
    pub fn read_ascii(&mut self, count: usize) -> Result<Vec<f64>> {
        // every value takes at least one digit and one separator
        let mut values = Vec::with_capacity(count.min(self.remaining() / 2 + 1));
        for _ in 0..count {
            values.push(self.next_f64("value")?);
        }
        Ok(values)
    }

    /// Read a raw binary block.
    ///
    /// The block starts right after the newline ending the current line.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.skip_line();
        if len > self.remaining() {
            return Err(self.error(format!(
                "binary block needs {} bytes but only {} remain",
                len,
                self.remaining()
            )));
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    /// Read `count` values of type `ty`, ASCII or binary
    pub fn read_values(&mut self, ty: ScalarType, count: usize, binary: bool) -> Result<Vec<f64>> {
        if binary {
            let len = ty
                .binary_len(count)
                .ok_or_else(|| self.error(format!("{} {} values do not fit in memory", count, ty)))?;
            let bytes = self.read_bytes(len)?;
            ty.decode(bytes, count)
        } else {
            self.read_ascii(count)
        }
    }

    /// Skip a `METADATA` block, which ends at the first empty line
    pub fn skip_metadata(&mut self) -> Result<()> {
        self.skip_line();
        while self.pos < self.data.len() {
            if self.read_line()?.trim().is_empty() {
                break;
            }
        }
        Ok(())
    }
}

/// Convert a value read from a cell list to an index.
///
/// Fails unless the value is a finite, non-negative whole number.
pub fn to_index(value: f64, what: &str) -> std::result::Result<usize, String> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value < usize::MAX as f64 {
        Ok(value as usize)
    } else {
        Err(format!("invalid {} '{}'", what, value))
    }
}

/// Decode `%xx` escapes used in array names
pub fn decode_name(name: &str) -> String {
    let bytes = name.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let escaped = std::str::from_utf8(&bytes[i + 1..i + 3])
                .ok()
                .and_then(|hex| u8::from_str_radix(hex, 16).ok());
            if let Some(byte) = escaped {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Escape characters that cannot appear in a whitespace-delimited name
pub fn encode_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c == '%' || c.is_whitespace() || c.is_control() {
            let mut buf = [0u8; 4];
            for b in c.encode_utf8(&mut buf).bytes() {
                out.push_str(&format!("%{:02X}", b));
            }
        } else {
            out.push(c);
        }
    }
    out
}
