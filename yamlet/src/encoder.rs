//! Turn strings and flat collections into YAML text.
//!
//! Scalars are left bare when they can be, and wrapped in quotes otherwise. No escaping is ever
//! performed: the quote character is chosen so that it does not appear in the scalar. A scalar
//! that contains both quote characters cannot be written and is rejected.
//!
//! ```
//! use yamlet::{make_key_value_line, make_key_value_sequence_line};
//!
//! assert_eq!(make_key_value_line("name", "yamlet").unwrap(), "name: yamlet\n");
//! assert_eq!(make_key_value_line("time", "12:30").unwrap(), "time: '12:30'\n");
//! assert_eq!(
//!     make_key_value_sequence_line("sizes", [1, 2, 3]).unwrap(),
//!     "sizes: [1, 2, 3]\n"
//! );
//! ```

use std::{borrow::Cow, fmt::Write};

use thiserror::Error;

use crate::char_traits::{is_quote, needs_quotes};

/// An error when encoding YAML.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    /// The scalar contains both a single and a double quote, and quoted scalars are not escaped.
    #[error(
        "cannot quote a scalar containing both `'` (at byte {single}) and `\"` (at byte {double})"
    )]
    MixedQuotes {
        /// Index of the first single quote.
        single: usize,
        /// Index of the first double quote.
        double: usize,
    },
    /// The writer given to [`write_sequence`] failed.
    #[error(transparent)]
    Format(#[from] std::fmt::Error),
}

/// What [`analyze_special_chars`] found in a scalar.
#[derive(Clone, Copy, PartialEq, Debug, Eq, Default)]
pub struct SpecialChars {
    /// The earliest byte that forces quoting, with its index.
    pub first_special: Option<(usize, u8)>,
    /// Index of the first `'`.
    pub first_single_quote: Option<usize>,
    /// Index of the first `"`.
    pub first_double_quote: Option<usize>,
}

impl SpecialChars {
    /// Return whether the scalar needs to be quoted.
    #[must_use]
    pub fn has_special_chars(&self) -> bool {
        self.first_special.is_some()
    }
}

/// Find the bytes of `scalar` that force it to be quoted.
///
/// The empty string and strings already wrapped in a pair of matching quotes (and longer than the
/// pair itself) are reported as needing nothing.
///
/// A byte needs quoting if it is outside of `[0x20, 0x7A]` or is one of
/// ``! " # $ % & ' * , - / : < = > ? @ [ \ ] ` ``.
#[must_use]
pub fn analyze_special_chars(scalar: &str) -> SpecialChars {
    let bytes = scalar.as_bytes();
    if bytes.is_empty() || is_pre_quoted(bytes) {
        return SpecialChars::default();
    }

    // First index of every byte value present in the scalar.
    let mut first_seen = [None::<usize>; 256];
    for (idx, &c) in bytes.iter().enumerate() {
        first_seen[usize::from(c)].get_or_insert(idx);
    }

    let first_special = (0u8..=255)
        .filter(|&c| needs_quotes(c))
        .filter_map(|c| first_seen[usize::from(c)].map(|idx| (idx, c)))
        .min_by_key(|&(idx, _)| idx);

    SpecialChars {
        first_special,
        first_single_quote: first_seen[usize::from(b'\'')],
        first_double_quote: first_seen[usize::from(b'"')],
    }
}

fn is_pre_quoted(bytes: &[u8]) -> bool {
    match (bytes.first(), bytes.last()) {
        (Some(&first), Some(&last)) => bytes.len() > 2 && is_quote(first) && first == last,
        _ => false,
    }
}

/// Return `scalar` quoted if it needs to be, as is otherwise.
///
/// The scalar is wrapped in `'`, or in `"` if it contains a `'`.
///
/// ```
/// # use yamlet::make_safe_scalar;
/// assert_eq!(make_safe_scalar("plain text").unwrap(), "plain text");
/// assert_eq!(make_safe_scalar("a: b").unwrap(), "'a: b'");
/// assert_eq!(make_safe_scalar("it's").unwrap(), "\"it's\"");
/// ```
///
/// # Errors
/// Returns [`EncodeError::MixedQuotes`] if the scalar needs quoting and contains both quote
/// characters.
pub fn make_safe_scalar(scalar: &str) -> Result<Cow<'_, str>, EncodeError> {
    let analysis = analyze_special_chars(scalar);
    if !analysis.has_special_chars() {
        return Ok(Cow::Borrowed(scalar));
    }

    let quote = match (analysis.first_single_quote, analysis.first_double_quote) {
        (Some(single), Some(double)) => return Err(EncodeError::MixedQuotes { single, double }),
        (Some(_), None) => '"',
        (None, _) => '\'',
    };
    let mut quoted = String::with_capacity(scalar.len() + 2);
    quoted.push(quote);
    quoted.push_str(scalar);
    quoted.push(quote);
    Ok(Cow::Owned(quoted))
}

/// Return a `key: value` line, with a trailing line break.
///
/// The key is written as is. The value goes through [`make_safe_scalar`].
///
/// # Errors
/// See [`make_safe_scalar`].
pub fn make_key_value_line(key: &str, scalar: &str) -> Result<String, EncodeError> {
    let value = make_safe_scalar(scalar)?;
    Ok(format!("{key}: {value}\n"))
}

/// An element of a sequence written by [`make_sequence`].
///
/// Numbers are written as they are formatted by Rust and never quoted. Strings go through
/// [`make_safe_scalar`].
pub trait SequenceItem {
    /// Write the YAML representation of `self` to `out`.
    ///
    /// # Errors
    /// Returns an error if the item cannot be represented or if `out` fails.
    fn write_item(&self, out: &mut dyn Write) -> Result<(), EncodeError>;
}

macro_rules! impl_numeric_sequence_item {
    ($($ty:ty),+ $(,)?) => {$(
        impl SequenceItem for $ty {
            fn write_item(&self, out: &mut dyn Write) -> Result<(), EncodeError> {
                write!(out, "{self}")?;
                Ok(())
            }
        }
    )+};
}

impl_numeric_sequence_item!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

impl SequenceItem for str {
    fn write_item(&self, out: &mut dyn Write) -> Result<(), EncodeError> {
        out.write_str(&make_safe_scalar(self)?)?;
        Ok(())
    }
}

impl SequenceItem for String {
    fn write_item(&self, out: &mut dyn Write) -> Result<(), EncodeError> {
        self.as_str().write_item(out)
    }
}

impl SequenceItem for Cow<'_, str> {
    fn write_item(&self, out: &mut dyn Write) -> Result<(), EncodeError> {
        self.as_ref().write_item(out)
    }
}

impl<T: SequenceItem + ?Sized> SequenceItem for &T {
    fn write_item(&self, out: &mut dyn Write) -> Result<(), EncodeError> {
        (**self).write_item(out)
    }
}

/// Write the items as a flow sequence to `out`.
///
/// # Errors
/// Returns the first error an item returns, or [`EncodeError::Format`] if `out` fails.
pub fn write_sequence<I>(out: &mut dyn Write, items: I) -> Result<(), EncodeError>
where
    I: IntoIterator,
    I::Item: SequenceItem,
{
    out.write_char('[')?;
    for (idx, item) in items.into_iter().enumerate() {
        if idx > 0 {
            out.write_str(", ")?;
        }
        item.write_item(out)?;
    }
    out.write_char(']')?;
    Ok(())
}

/// Return the items as a flow sequence: `[a, b, c]`.
///
/// ```
/// # use yamlet::make_sequence;
/// assert_eq!(make_sequence(Vec::<i32>::new()).unwrap(), "[]");
/// assert_eq!(make_sequence(["a", "b c", "d,e"]).unwrap(), "[a, b c, 'd,e']");
/// assert_eq!(make_sequence(&[1.5, -2.0]).unwrap(), "[1.5, -2]");
/// ```
///
/// # Errors
/// Returns the first error an item returns.
pub fn make_sequence<I>(items: I) -> Result<String, EncodeError>
where
    I: IntoIterator,
    I::Item: SequenceItem,
{
    let mut out = String::new();
    write_sequence(&mut out, items)?;
    Ok(out)
}

/// Return a `key: [a, b, c]` line, with a trailing line break.
///
/// # Errors
/// See [`make_sequence`].
pub fn make_key_value_sequence_line<I>(key: &str, items: I) -> Result<String, EncodeError>
where
    I: IntoIterator,
    I::Item: SequenceItem,
{
    let value = make_sequence(items)?;
    Ok(format!("{key}: {value}\n"))
}
