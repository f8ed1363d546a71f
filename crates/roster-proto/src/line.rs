//! Raw IRC line parsing.
//!
//! Decomposes one wire line (already stripped of line endings by the
//! transport) into an optional prefix, a command, and ordered arguments.
//!
//! The scan is byte-oriented and zero-copy: the returned [`ParsedLine`]
//! borrows slices of the input.

use smallvec::SmallVec;

use crate::error::LineParseError;

/// A parsed IRC line with borrowed byte slices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine<'a> {
    /// Prefix bytes (without the leading `:`), if present.
    pub prefix: Option<&'a [u8]>,
    /// The command token: an alphabetic command or a numeric code.
    pub command: &'a [u8],
    /// Arguments in wire order. A trailing `:`-argument, when present,
    /// is always the last element and may contain spaces.
    pub params: SmallVec<[&'a [u8]; 15]>,
}

/// Byte cursor over a single line.
struct Cursor<'a> {
    line: &'a [u8],
    index: usize,
}

impl<'a> Cursor<'a> {
    fn new(line: &'a [u8]) -> Self {
        Self { line, index: 0 }
    }

    fn eol(&self) -> bool {
        self.index >= self.line.len()
    }

    fn peek(&self) -> Option<u8> {
        self.line.get(self.index).copied()
    }

    fn advance(&mut self) {
        self.index += 1;
    }

    fn skip_spaces(&mut self) {
        while self.peek() == Some(b' ') {
            self.advance();
        }
    }

    /// Read up to the next space (exclusive) or end of line.
    ///
    /// Returns `None` when already at end of line. The returned slice is
    /// empty when the cursor sits on a space.
    fn read_until_space(&mut self) -> Option<&'a [u8]> {
        if self.eol() {
            return None;
        }
        let rest = &self.line[self.index..];
        let len = rest
            .iter()
            .position(|&b| b == b' ')
            .unwrap_or(rest.len());
        self.index += len;
        Some(&rest[..len])
    }

    /// Read the entire remainder of the line.
    ///
    /// Returns `None` when already at end of line.
    fn read_to_end(&mut self) -> Option<&'a [u8]> {
        if self.eol() {
            return None;
        }
        let rest = &self.line[self.index..];
        self.index = self.line.len();
        Some(rest)
    }
}

/// Parse a raw IRC line into its component parts.
///
/// Line format:
/// ```text
/// [:prefix] <command> [params...] [:trailing]
/// ```
///
/// Runs of spaces between tokens act as a single separator, so extra
/// spaces never produce empty arguments. A `:` after the command starts
/// the trailing argument, which takes the rest of the line verbatim.
///
/// Errors whenever a required token is cut off by the end of the line:
/// an empty line, a lone `:prefix` with no command, or a `:` trailing
/// marker with nothing after it.
pub fn parse_line(line: &[u8]) -> Result<ParsedLine<'_>, LineParseError> {
    let mut cur = Cursor::new(line);

    let first = cur.peek().ok_or(LineParseError::EmptyLine)?;
    let prefix = if first == b':' {
        cur.advance();
        Some(cur.read_until_space().ok_or(LineParseError::EmptyPrefix)?)
    } else {
        None
    };

    cur.skip_spaces();
    let command = cur
        .read_until_space()
        .ok_or(LineParseError::MissingCommand)?;
    cur.skip_spaces();

    let mut params: SmallVec<[&[u8]; 15]> = SmallVec::new();
    while let Some(byte) = cur.peek() {
        if byte == b':' {
            cur.advance();
            let trailing = cur.read_to_end().ok_or(LineParseError::EmptyTrailing)?;
            params.push(trailing);
            break;
        }

        // Not at end of line and not on a space, so the token is non-empty.
        if let Some(param) = cur.read_until_space() {
            params.push(param);
        }
        cur.skip_spaces();
    }

    Ok(ParsedLine {
        prefix,
        command,
        params,
    })
}
