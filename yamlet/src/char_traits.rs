//! Holds functions to determine if a byte forces a scalar to be quoted.

/// Check whether the byte is inside the printable range `[0x20, 0x7A]`.
///
/// `{`, `|`, `}`, `~`, `DEL` and every non-ASCII byte are outside of it.
#[inline]
pub(crate) fn is_printable(c: u8) -> bool {
    (0x20..=0x7A).contains(&c)
}

/// Check whether the byte is punctuation that YAML gives a meaning to.
///
/// ```no_compile
/// ! " # $ % & ' * , - / : < = > ? @ [ \ ] `
/// ```
#[inline]
pub(crate) fn is_special_punctuation(c: u8) -> bool {
    matches!(
        c,
        b'!' | b'"'
            | b'#'
            | b'$'
            | b'%'
            | b'&'
            | b'\''
            | b'*'
            | b','
            | b'-'
            | b'/'
            | b':'
            | b'<'
            | b'='
            | b'>'
            | b'?'
            | b'@'
            | b'['
            | b'\\'
            | b']'
            | b'`'
    )
}

/// Check whether a scalar containing this byte must be quoted.
#[inline]
pub(crate) fn needs_quotes(c: u8) -> bool {
    !is_printable(c) || is_special_punctuation(c)
}

/// Check whether the byte is a quote character.
#[inline]
pub(crate) fn is_quote(c: u8) -> bool {
    c == b'\'' || c == b'"'
}
