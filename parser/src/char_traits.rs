//! Holds functions to determine if a byte belongs to a specific character set.
//!
//! The scanner classifies raw 8-bit code units. The end of the input is represented by `\0`, which
//! is why most sets include it.

/// Check whether the byte is nil (`\0`).
#[inline]
#[must_use]
pub fn is_z(c: u8) -> bool {
    c == b'\0'
}

/// Check whether the byte is a line break (`\r` or `\n`).
#[inline]
#[must_use]
pub fn is_break(c: u8) -> bool {
    c == b'\n' || c == b'\r'
}

/// Check whether the byte is nil or a line break (`\0`, `\r`, `\n`).
#[inline]
#[must_use]
pub fn is_breakz(c: u8) -> bool {
    is_break(c) || is_z(c)
}

/// Check whether the byte is a whitespace (` ` or `\t`).
#[inline]
#[must_use]
pub fn is_blank(c: u8) -> bool {
    c == b' ' || c == b'\t'
}

/// Check whether the byte is nil, a linebreak or a whitespace.
///
/// `\0`, ` `, `\t`, `\n`, `\r`
#[inline]
#[must_use]
pub fn is_blank_or_breakz(c: u8) -> bool {
    is_blank(c) || is_breakz(c)
}

/// Check whether the byte may follow a `:` or `,` that ends a token.
///
/// Tabs are left out on purpose: `a:\tb` keeps the `:` inside the scalar and the tab is then
/// reported on its own.
#[inline]
#[must_use]
pub fn is_space_or_breakz(c: u8) -> bool {
    c == b' ' || is_breakz(c)
}

/// Check whether the byte may end a plain scalar.
///
/// `:` and `,` only end it when followed by a [space or a break](is_space_or_breakz).
#[inline]
#[must_use]
pub fn ends_plain_scalar(c: u8) -> bool {
    matches!(c, b',' | b':' | b'\t' | b'\r' | b'\n' | b']' | b'}' | b'#')
}

/// Check whether the byte gives context to a quoted scalar that precedes it.
///
/// Anything between a closing quote and the next such byte is ignored.
#[inline]
#[must_use]
pub fn is_important(c: u8) -> bool {
    matches!(c, b':' | b'\t' | b'\r' | b'\n' | b',' | b']' | b'}' | b'#')
}

/// Check whether the byte is a YAML indicator for a feature we do not implement.
///
/// Literal (`|`) and folded (`>`) scalars, explicit keys (`?`), anchors (`&`), aliases (`*`), tags
/// (`!`) and the reserved `@` and `` ` ``.
#[inline]
#[must_use]
pub fn is_unsupported_indicator(c: u8) -> bool {
    matches!(c, b'|' | b'>' | b'?' | b'&' | b'*' | b'!' | b'@' | b'`')
}
