//! Home to the [`Scanner`] cursor and to the diagnostics it produces.
//!
//! The scanner walks a borrowed `&str` one byte at a time. It never copies the input: everything it
//! hands out is a sub-slice of the buffer it was given.

use std::{error::Error, fmt};

use crate::char_traits::is_breakz;

/// A location in a YAML document.
#[derive(Clone, Copy, PartialEq, Debug, Eq, Default)]
pub struct Marker {
    /// The index (in bytes) in the input string.
    index: usize,
    /// The line (1-indexed).
    line: usize,
    /// The column (1-indexed, in bytes).
    col: usize,
}

impl Marker {
    /// Create a new [`Marker`] at the given position.
    #[must_use]
    pub fn new(index: usize, line: usize, col: usize) -> Marker {
        Marker { index, line, col }
    }

    /// Return the index (in bytes) of the marker in the source.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Return the line of the marker in the source.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// Return the column of the marker in the source.
    ///
    /// The first byte of every line is in column 1.
    #[must_use]
    pub fn col(&self) -> usize {
        self.col
    }
}

/// The category of a [`ScanError`].
///
/// Every kind is fatal. Parsing stops at the first error and no recovery is attempted.
#[derive(Clone, Copy, PartialEq, Debug, Eq)]
pub enum ErrorKind {
    /// A tab character, or an indicator for a YAML feature that is not implemented.
    Unsupported,
    /// The input ended inside a quoted scalar.
    UnterminatedScalar,
    /// A collection was closed more often than it was opened, closed with the wrong bracket, or
    /// left open at the end of the input.
    UnbalancedClosure,
    /// A `--` that is not followed by the third dash of a `---` marker.
    MalformedDocumentMarker,
    /// Collections are nested deeper than the parser allows.
    NestingTooDeep,
}

/// An error that occurred while scanning.
#[derive(Clone, PartialEq, Debug, Eq)]
pub struct ScanError {
    /// What kind of error this is.
    kind: ErrorKind,
    /// The position at which the error happened in the source.
    mark: Marker,
    /// Human-readable details about the error.
    info: String,
}

impl ScanError {
    /// Create a new error from a location and an error string.
    #[must_use]
    pub fn new(kind: ErrorKind, loc: Marker, info: &str) -> ScanError {
        ScanError {
            kind,
            mark: loc,
            info: info.to_owned(),
        }
    }

    /// Convenience alias for string slices.
    #[must_use]
    pub fn new_string(kind: ErrorKind, loc: Marker, info: String) -> ScanError {
        ScanError {
            kind,
            mark: loc,
            info,
        }
    }

    /// Return the kind of the error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Return the marker pointing to the error in the source.
    #[must_use]
    pub fn marker(&self) -> &Marker {
        &self.mark
    }

    /// Return the information string describing the error that happened.
    #[must_use]
    pub fn info(&self) -> &str {
        self.info.as_ref()
    }
}

impl Error for ScanError {}

impl fmt::Display for ScanError {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(
            formatter,
            "{} at byte {} line {} column {}",
            self.info, self.mark.index, self.mark.line, self.mark.col,
        )
    }
}

/// A read cursor over a borrowed YAML buffer.
///
/// A `\0` in the input ends it: the cursor behaves as if the buffer stopped right before the first
/// nil byte. Past the end, [`Self::peek`] returns `\0`.
pub(crate) struct Scanner<'input> {
    /// The whole input buffer.
    buffer: &'input str,
    /// One past the last byte we are allowed to read.
    end: usize,
    /// Index of the next byte to read.
    pos: usize,
    /// Current line, 1-indexed.
    line: usize,
    /// Index of the first byte of the current line.
    line_start: usize,
}

impl<'input> Scanner<'input> {
    /// Create a new cursor at the beginning of `buffer`.
    pub fn new(buffer: &'input str) -> Self {
        let end = buffer.bytes().position(|c| c == b'\0').unwrap_or(buffer.len());
        Self {
            buffer,
            end,
            pos: 0,
            line: 1,
            line_start: 0,
        }
    }

    /// Return whether all the input has been consumed.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.end
    }

    /// Return the next byte, without consuming it, or `\0` at the end of the input.
    #[inline]
    pub fn peek(&self) -> u8 {
        self.peek_nth(0)
    }

    /// Return the `n`-th byte after the cursor, or `\0` if that is past the end of the input.
    #[inline]
    pub fn peek_nth(&self, n: usize) -> u8 {
        let idx = self.pos + n;
        if idx < self.end {
            self.buffer.as_bytes()[idx]
        } else {
            b'\0'
        }
    }

    /// Consume the next byte, keeping track of lines.
    #[inline]
    pub fn skip(&mut self) {
        if self.is_eof() {
            return;
        }
        if self.peek() == b'\n' {
            self.line += 1;
            self.line_start = self.pos + 1;
        }
        self.pos += 1;
    }

    /// Consume bytes as long as `f` returns `true` for them, stopping at the end of the input.
    #[inline]
    pub fn skip_while<F: Fn(u8) -> bool>(&mut self, f: F) {
        while !self.is_eof() && f(self.peek()) {
            self.skip();
        }
    }

    /// Consume spaces (not tabs).
    #[inline]
    pub fn skip_spaces(&mut self) {
        self.skip_while(|c| c == b' ');
    }

    /// Consume everything up to the end of the line, leaving the line break in the input.
    ///
    /// Tabs are not consumed, so that they can be reported even in comments.
    pub fn skip_to_eol(&mut self) {
        self.skip_while(|c| !is_breakz(c) && c != b'\t');
    }

    /// Return the index of the next byte to read.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Return how many bytes of the current line have been consumed.
    #[inline]
    pub fn line_offset(&self) -> usize {
        self.pos - self.line_start
    }

    /// Return a [`Marker`] for the current position.
    #[inline]
    pub fn mark(&self) -> Marker {
        Marker::new(self.pos, self.line, self.line_offset() + 1)
    }

    /// Return the input between `start` and `end`.
    ///
    /// Both indices must be on character boundaries. The scanner only ever stops on ASCII bytes or
    /// at the end of the input, which guarantees it for indices it returned through [`Self::pos`].
    #[inline]
    pub fn slice(&self, start: usize, end: usize) -> &'input str {
        &self.buffer[start..end]
    }

    /// Return at most `max_len` bytes of input starting at `start`, cut back to a character
    /// boundary and to the end of the readable input.
    pub fn preview(&self, start: usize, max_len: usize) -> &'input str {
        let mut end = self.end.min(start.saturating_add(max_len));
        while !self.buffer.is_char_boundary(end) {
            end -= 1;
        }
        self.slice(start, end)
    }
}
