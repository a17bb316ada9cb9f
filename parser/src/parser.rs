//! Home to the YAML [`Parser`].
//!
//! The parser walks the input once, tracking block nesting through indentation, and reports what
//! it finds to an [`EventReceiver`]. It builds no tree itself.

use std::fmt;

use crate::{
    char_traits::{
        ends_plain_scalar, is_blank_or_breakz, is_important, is_space_or_breakz,
        is_unsupported_indicator,
    },
    scanner::{ErrorKind, ScanError, Scanner},
};

/// The maximum number of nested collections a [`Parser`] accepts unless told otherwise.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// How many bytes of an unterminated quoted scalar are quoted back in the error message.
const MAX_PREVIEW_LEN: usize = 12;

/// The value reported for a key that has none.
const MISSING_VALUE: &str = "null";

/// A YAML event, as reported to an [`EventReceiver`].
///
/// Texts borrow from the input.
#[derive(Clone, PartialEq, Debug, Eq)]
pub enum Event<'input> {
    /// Parsing started.
    DocumentStart,
    /// Parsing successfully reached the end of the input.
    DocumentEnd,
    /// Start of a block or flow sequence.
    SequenceStart,
    /// End of a sequence.
    SequenceEnd,
    /// Start of a block or flow mapping.
    MappingStart,
    /// End of a mapping.
    MappingEnd,
    /// A mapping key.
    Key(&'input str),
    /// A scalar value.
    Scalar(&'input str),
}

impl fmt::Display for Event<'_> {
    /// Format the event in the notation of the YAML test suite's event trees.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::DocumentStart => f.write_str("+DOC"),
            Event::DocumentEnd => f.write_str("-DOC"),
            Event::SequenceStart => f.write_str("+SEQ"),
            Event::SequenceEnd => f.write_str("-SEQ"),
            Event::MappingStart => f.write_str("+MAP"),
            Event::MappingEnd => f.write_str("-MAP"),
            Event::Key(text) => write!(f, "=KEY {}", escape_text(text)),
            Event::Scalar(text) => write!(f, "=VAL :{}", escape_text(text)),
        }
    }
}

/// Make line breaks, tabs and backslashes visible.
fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => escaped.push_str(r"\\"),
            '\n' => escaped.push_str(r"\n"),
            '\r' => escaped.push_str(r"\r"),
            '\t' => escaped.push_str(r"\t"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Trait to be implemented in order to use the low-level parsing API.
///
/// Every method has a default implementation that ignores the event, so implementers only write
/// the callbacks they care about. Callbacks are invoked synchronously and in document order.
///
/// ```
/// # use yamlet_parser::{parse_str, EventReceiver};
/// #[derive(Default)]
/// struct KeyCounter(usize);
///
/// impl<'input> EventReceiver<'input> for KeyCounter {
///     fn on_key(&mut self, _key: &'input str) -> bool {
///         self.0 += 1;
///         true
///     }
/// }
///
/// let mut counter = KeyCounter::default();
/// parse_str("a: 1\nb: {c: 2}\n", &mut counter).unwrap();
/// assert_eq!(counter.0, 3);
/// ```
pub trait EventReceiver<'input> {
    /// Parsing started.
    fn on_document_start(&mut self) {}

    /// The whole input was parsed successfully.
    fn on_document_end(&mut self) {}

    /// A block or flow sequence starts.
    fn on_sequence_start(&mut self) {}

    /// The innermost sequence ends.
    fn on_sequence_end(&mut self) {}

    /// A block or flow mapping starts.
    fn on_mapping_start(&mut self) {}

    /// The innermost mapping ends.
    fn on_mapping_end(&mut self) {}

    /// A mapping key was found.
    ///
    /// Return `false` to stop parsing.
    fn on_key(&mut self, _key: &'input str) -> bool {
        true
    }

    /// A scalar value was found.
    ///
    /// Keys left without a value are given the literal `null` through this method.
    /// Return `false` to stop parsing.
    fn on_scalar(&mut self, _value: &'input str) -> bool {
        true
    }

    /// Parsing failed. No event follows.
    fn on_error(&mut self, _error: &ScanError) {}
}

impl<'input> EventReceiver<'input> for Vec<Event<'input>> {
    fn on_document_start(&mut self) {
        self.push(Event::DocumentStart);
    }

    fn on_document_end(&mut self) {
        self.push(Event::DocumentEnd);
    }

    fn on_sequence_start(&mut self) {
        self.push(Event::SequenceStart);
    }

    fn on_sequence_end(&mut self) {
        self.push(Event::SequenceEnd);
    }

    fn on_mapping_start(&mut self) {
        self.push(Event::MappingStart);
    }

    fn on_mapping_end(&mut self) {
        self.push(Event::MappingEnd);
    }

    fn on_key(&mut self, key: &'input str) -> bool {
        self.push(Event::Key(key));
        true
    }

    fn on_scalar(&mut self, value: &'input str) -> bool {
        self.push(Event::Scalar(value));
        true
    }
}

/// How a successful call to [`Parser::parse`] ended.
#[derive(Clone, Copy, PartialEq, Debug, Eq)]
pub enum ParseStatus {
    /// The whole input was parsed and [`EventReceiver::on_document_end`] was called.
    Complete,
    /// The receiver asked to stop by returning `false` from [`EventReceiver::on_key`] or
    /// [`EventReceiver::on_scalar`]. No event was emitted after that.
    Stopped,
}

/// The kind of a collection.
#[derive(Clone, Copy, PartialEq, Debug, Eq)]
enum CollectionKind {
    Sequence,
    Mapping,
}

impl CollectionKind {
    fn closing_char(self) -> char {
        match self {
            CollectionKind::Sequence => ']',
            CollectionKind::Mapping => '}',
        }
    }
}

/// One open block collection.
#[derive(Clone, Copy, Debug, Default)]
struct Indent {
    /// Number of leading spaces and sequence dashes of the lines of this collection.
    level: usize,
    is_sequence: bool,
    /// Whether keys found directly in this frame opened a mapping that has not been closed yet.
    ///
    /// Only the root frame and sequence frames open such mappings.
    implicit_mapping: bool,
}

impl Indent {
    fn new(level: usize, is_sequence: bool) -> Self {
        Self {
            level,
            is_sequence,
            implicit_mapping: false,
        }
    }
}

/// The stack of open block collections.
///
/// It always holds the root frame, at level 0, which can never be popped. Levels are strictly
/// increasing from the bottom to the top.
#[derive(Debug)]
struct IndentStack {
    frames: Vec<Indent>,
}

impl IndentStack {
    fn new() -> Self {
        Self {
            frames: vec![Indent::default()],
        }
    }

    /// The number of frames above the root frame.
    fn depth(&self) -> usize {
        self.frames.len() - 1
    }

    /// The number of open collections, implicit mappings included.
    fn nesting(&self) -> usize {
        self.depth() + self.frames.iter().filter(|f| f.implicit_mapping).count()
    }

    fn top(&self) -> &Indent {
        // The root frame is never popped.
        &self.frames[self.frames.len() - 1]
    }

    fn top_mut(&mut self) -> &mut Indent {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    fn push(&mut self, indent: Indent) {
        debug_assert!(indent.level > self.top().level);
        self.frames.push(indent);
    }

    /// Pop the top frame, unless it is the root frame.
    fn pop(&mut self) -> Option<Indent> {
        if self.depth() == 0 {
            None
        } else {
            self.frames.pop()
        }
    }
}

/// Why parsing halted before the end of the input.
enum Halt {
    /// The receiver asked to stop.
    Stopped,
    /// A syntax error was found.
    Failed(ScanError),
}

impl From<ScanError> for Halt {
    fn from(err: ScanError) -> Self {
        Halt::Failed(err)
    }
}

type Step = Result<(), Halt>;

/// An event-driven YAML parser.
///
/// A parser is built for a single input and a single receiver, and is consumed by
/// [`Parser::parse`].
///
/// ```
/// # use yamlet_parser::{Event, Parser, ParseStatus};
/// let mut events = vec![];
/// let status = Parser::new("[1, two]", &mut events).parse().unwrap();
/// assert_eq!(status, ParseStatus::Complete);
/// assert_eq!(
///     events,
///     [
///         Event::DocumentStart,
///         Event::SequenceStart,
///         Event::Scalar("1"),
///         Event::Scalar("two"),
///         Event::SequenceEnd,
///         Event::DocumentEnd,
///     ]
/// );
/// ```
pub struct Parser<'input, 'r, R: ?Sized> {
    scanner: Scanner<'input>,
    receiver: &'r mut R,
    indents: IndentStack,
    /// Open flow collections, innermost last.
    flows: Vec<CollectionKind>,
    /// Whether the last key that was reported still awaits its value.
    key_pending: bool,
    max_depth: usize,
}

impl<'input, 'r, R: EventReceiver<'input> + ?Sized> Parser<'input, 'r, R> {
    /// Create a new parser reporting the events of `input` to `receiver`.
    pub fn new(input: &'input str, receiver: &'r mut R) -> Self {
        Self {
            scanner: Scanner::new(input),
            receiver,
            indents: IndentStack::new(),
            flows: Vec::new(),
            key_pending: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Set how many collections may be nested inside one another.
    ///
    /// Block collections, flow collections and the mappings opened by keys at the root or in
    /// sequence entries all count, as they are reported to the receiver. Going deeper fails with
    /// [`ErrorKind::NestingTooDeep`]. Defaults to [`DEFAULT_MAX_DEPTH`].
    #[must_use]
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parse the whole input, reporting events to the receiver.
    ///
    /// # Errors
    /// Returns the first syntax error found. It has already been passed to
    /// [`EventReceiver::on_error`] when this function returns.
    pub fn parse(mut self) -> Result<ParseStatus, ScanError> {
        let result = self.run();
        match result {
            Ok(()) => {
                debug_print!("parse complete");
                Ok(ParseStatus::Complete)
            }
            Err(Halt::Stopped) => {
                debug_print!("parse stopped by receiver at {:?}", self.scanner.mark());
                Ok(ParseStatus::Stopped)
            }
            Err(Halt::Failed(err)) => {
                debug_print!("parse failed: {err}");
                self.receiver.on_error(&err);
                Err(err)
            }
        }
    }

    fn run(&mut self) -> Step {
        self.receiver.on_document_start();
        self.check_indentation()?;
        while !self.scanner.is_eof() {
            self.dispatch(self.scanner.peek())?;
        }
        self.unwind()?;
        self.receiver.on_document_end();
        Ok(())
    }

    /// Handle the construct starting with `c`.
    fn dispatch(&mut self, c: u8) -> Step {
        match c {
            b'-' => match self.scanner.peek_nth(1) {
                b' ' => self.block_entry(),
                b'-' => self.skip_document_start(),
                // `-1234`
                _ => self.parse_node(),
            },
            b':' | b',' => {
                self.scanner.skip();
                self.scanner.skip_spaces();
                Ok(())
            }
            b'[' => self.open_flow(CollectionKind::Sequence),
            b'{' => self.open_flow(CollectionKind::Mapping),
            b']' => self.close_flow(CollectionKind::Sequence),
            b'}' => self.close_flow(CollectionKind::Mapping),
            // Comments and directives.
            b'#' | b'%' => {
                self.scanner.skip_to_eol();
                Ok(())
            }
            b'\n' => {
                self.scanner.skip();
                self.check_indentation()
            }
            b'\r' | b' ' => {
                self.scanner.skip();
                Ok(())
            }
            b'\t' => Err(self.error(ErrorKind::Unsupported, "avoid tabs in YAML text")),
            c if is_unsupported_indicator(c) => Err(self.error_string(
                ErrorKind::Unsupported,
                format!("`{}` directive not supported", char::from(c)),
            )),
            _ => self.parse_node(),
        }
    }

    fn error(&self, kind: ErrorKind, info: &str) -> Halt {
        Halt::Failed(ScanError::new(kind, self.scanner.mark(), info))
    }

    fn error_string(&self, kind: ErrorKind, info: String) -> Halt {
        Halt::Failed(ScanError::new_string(kind, self.scanner.mark(), info))
    }

    /// Read the indentation of the line starting at the cursor and open or close block
    /// collections accordingly.
    fn check_indentation(&mut self) -> Step {
        if !self.flows.is_empty() {
            // Indentation carries no meaning inside flow collections.
            self.scanner.skip_spaces();
            return Ok(());
        }

        let start = self.scanner.pos();
        let mut last_dash = None;
        loop {
            match self.scanner.peek() {
                b' ' => self.scanner.skip(),
                b'-' if is_blank_or_breakz(self.scanner.peek_nth(1)) => {
                    last_dash = Some(self.scanner.mark());
                    self.scanner.skip();
                }
                _ => break,
            }
        }

        // Blank and comment-only lines do not change the nesting, unless a `-` promised an entry.
        if matches!(self.scanner.peek(), b'\0' | b'\r' | b'\n' | b'#') {
            return match last_dash {
                Some(mark) => Err(Halt::Failed(ScanError::new(
                    ErrorKind::Unsupported,
                    mark,
                    "empty sequence entries are not supported",
                ))),
                None => Ok(()),
            };
        }
        let level = self.scanner.pos() - start;
        self.enter_level(Indent::new(level, last_dash.is_some()))
    }

    /// Move to the nesting level of `indent`, opening or closing block collections.
    fn enter_level(&mut self, indent: Indent) -> Step {
        while indent.level < self.indents.top().level {
            self.pop_indent()?;
        }
        let top = self.indents.top();
        if indent.level > top.level {
            // Either deeper than the current collection, or a dedent to a level that matches no
            // open collection.
            return self.push_indent(indent);
        }
        if indent.is_sequence && top.is_sequence && indent.level == top.level {
            // A new entry of the same sequence.
            self.close_implicit_mapping()?;
        }
        Ok(())
    }

    fn push_indent(&mut self, indent: Indent) -> Step {
        self.check_depth()?;
        debug_print!(
            "push {} at level {}",
            if indent.is_sequence { "sequence" } else { "mapping" },
            indent.level
        );
        // A new collection never starts in the middle of a pair: it is the value.
        self.key_pending = false;
        self.indents.push(indent);
        if indent.is_sequence {
            self.receiver.on_sequence_start();
        } else {
            self.receiver.on_mapping_start();
        }
        Ok(())
    }

    fn pop_indent(&mut self) -> Step {
        if self.indents.depth() == 0 {
            return Err(self.error(
                ErrorKind::UnbalancedClosure,
                "too many closing braces or brackets",
            ));
        }
        self.close_implicit_mapping()?;
        self.flush_missing_value()?;
        if let Some(indent) = self.indents.pop() {
            debug_print!("pop level {}", indent.level);
            if indent.is_sequence {
                self.receiver.on_sequence_end();
            } else {
                self.receiver.on_mapping_end();
            }
        }
        Ok(())
    }

    /// Open a mapping for a key found directly in the root frame or in a sequence entry.
    fn open_implicit_mapping(&mut self) -> Step {
        if !self.flows.is_empty() {
            return Ok(());
        }
        let in_root = self.indents.depth() == 0;
        let top = self.indents.top();
        if (in_root || top.is_sequence) && !top.implicit_mapping {
            self.check_depth()?;
            self.indents.top_mut().implicit_mapping = true;
            self.receiver.on_mapping_start();
        }
        Ok(())
    }

    fn close_implicit_mapping(&mut self) -> Step {
        if self.indents.top().implicit_mapping {
            self.flush_missing_value()?;
            self.indents.top_mut().implicit_mapping = false;
            self.receiver.on_mapping_end();
        }
        Ok(())
    }

    /// Fail if opening one more collection would go past the depth limit.
    fn check_depth(&self) -> Step {
        let depth = self.indents.nesting() + self.flows.len();
        if depth >= self.max_depth {
            Err(self.error_string(
                ErrorKind::NestingTooDeep,
                format!("collections nested deeper than {}", self.max_depth),
            ))
        } else {
            Ok(())
        }
    }

    /// Close everything that is still open at the end of the input.
    fn unwind(&mut self) -> Step {
        if let Some(kind) = self.flows.last() {
            return Err(self.error_string(
                ErrorKind::UnbalancedClosure,
                format!(
                    "unexpected end of input, expected `{}`",
                    kind.closing_char()
                ),
            ));
        }
        while self.indents.depth() > 0 {
            self.pop_indent()?;
        }
        self.close_implicit_mapping()?;
        self.flush_missing_value()
    }

    /// Report a `null` value for a key that did not get one.
    fn flush_missing_value(&mut self) -> Step {
        if self.key_pending {
            self.key_pending = false;
            if !self.receiver.on_scalar(MISSING_VALUE) {
                return Err(Halt::Stopped);
            }
        }
        Ok(())
    }

    /// Handle a `- ` that does not start a line.
    ///
    /// The entry opens a block sequence whose level is the column of the entry's content, so that
    /// the following entries, aligned under the first one, belong to it.
    fn block_entry(&mut self) -> Step {
        if !self.flows.is_empty() {
            return Err(self.error(
                ErrorKind::Unsupported,
                "block sequence entries are not allowed in flow collections",
            ));
        }
        self.scanner.skip();
        self.scanner.skip_spaces();
        let level = self.scanner.line_offset();
        self.enter_level(Indent::new(level, true))
    }

    /// Skip a `---` document start marker.
    fn skip_document_start(&mut self) -> Step {
        let mark = self.scanner.mark();
        let mut dashes = 0;
        while dashes < 3 && self.scanner.peek() == b'-' {
            self.scanner.skip();
            dashes += 1;
        }
        if dashes < 3 {
            return Err(Halt::Failed(ScanError::new(
                ErrorKind::MalformedDocumentMarker,
                mark,
                "expected a `---` document marker",
            )));
        }
        Ok(())
    }

    fn open_flow(&mut self, kind: CollectionKind) -> Step {
        self.check_depth()?;
        debug_print!("open flow {kind:?}");
        self.scanner.skip();
        self.key_pending = false;
        self.flows.push(kind);
        match kind {
            CollectionKind::Sequence => self.receiver.on_sequence_start(),
            CollectionKind::Mapping => self.receiver.on_mapping_start(),
        }
        self.scanner.skip_spaces();
        Ok(())
    }

    fn close_flow(&mut self, kind: CollectionKind) -> Step {
        match self.flows.last() {
            None => {
                return Err(self.error(
                    ErrorKind::UnbalancedClosure,
                    "too many closing braces or brackets",
                ))
            }
            Some(&open) if open != kind => {
                return Err(self.error_string(
                    ErrorKind::UnbalancedClosure,
                    format!(
                        "found `{}` while expecting `{}`",
                        kind.closing_char(),
                        open.closing_char()
                    ),
                ))
            }
            Some(_) => {}
        }
        self.flush_missing_value()?;
        self.flows.pop();
        debug_print!("close flow {kind:?}");
        match kind {
            CollectionKind::Sequence => self.receiver.on_sequence_end(),
            CollectionKind::Mapping => self.receiver.on_mapping_end(),
        }
        self.scanner.skip();
        self.scanner.skip_spaces();
        Ok(())
    }

    fn parse_node(&mut self) -> Step {
        match self.scanner.peek() {
            quote @ (b'\'' | b'"') => self.parse_quoted(quote),
            _ => self.parse_plain(),
        }
    }

    /// Scan an unquoted scalar.
    fn parse_plain(&mut self) -> Step {
        let start = self.scanner.pos();
        while !self.scanner.is_eof() {
            let c = self.scanner.peek();
            if ends_plain_scalar(c) {
                // `12:30` and `1,000` are scalars.
                let in_scalar =
                    matches!(c, b':' | b',') && !is_space_or_breakz(self.scanner.peek_nth(1));
                if !in_scalar {
                    break;
                }
            }
            self.scanner.skip();
        }
        let text = self
            .scanner
            .slice(start, self.scanner.pos())
            .trim_end_matches(' ');
        self.emit_node(text)
    }

    /// Scan a scalar between `quote`s. The content is taken verbatim.
    fn parse_quoted(&mut self, quote: u8) -> Step {
        let mark = self.scanner.mark();
        let open = self.scanner.pos();
        self.scanner.skip();
        let start = self.scanner.pos();
        while !self.scanner.is_eof() {
            if self.scanner.peek() == quote {
                let text = self.scanner.slice(start, self.scanner.pos());
                self.scanner.skip();
                // What follows tells whether the scalar is a key.
                self.scanner.skip_while(|c| !is_important(c));
                return self.emit_node(text);
            }
            self.scanner.skip();
        }

        let preview = self.scanner.preview(open, MAX_PREVIEW_LEN + 1);
        Err(Halt::Failed(ScanError::new_string(
            ErrorKind::UnterminatedScalar,
            mark,
            format!("unterminated quoted scalar <{preview}...>"),
        )))
    }

    /// Report a scalar that was just scanned, as a key if a `:` follows it.
    fn emit_node(&mut self, text: &'input str) -> Step {
        let accepted = if self.scanner.peek() == b':' {
            self.flush_missing_value()?;
            self.open_implicit_mapping()?;
            self.key_pending = true;
            self.receiver.on_key(text)
        } else {
            self.key_pending = false;
            self.receiver.on_scalar(text)
        };
        if accepted {
            Ok(())
        } else {
            Err(Halt::Stopped)
        }
    }
}

/// Parse `input`, reporting its events to `receiver`.
///
/// This is a shorthand for `Parser::new(input, receiver).parse()`.
///
/// # Errors
/// Returns the first syntax error found. See [`Parser::parse`].
pub fn parse_str<'input, R: EventReceiver<'input> + ?Sized>(
    input: &'input str,
    receiver: &mut R,
) -> Result<ParseStatus, ScanError> {
    Parser::new(input, receiver).parse()
}
