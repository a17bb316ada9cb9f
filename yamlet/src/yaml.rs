//! YAML objects manipulation utilities.

#![allow(clippy::module_name_repetitions)]

use std::ops::Index;

use hashlink::LinkedHashMap;
use yamlet_parser::{parse_str, ScanError};

use crate::YamlLoader;

/// A YAML node is stored as this `Yaml` enumeration, which provides an easy way to
/// access your YAML document.
///
/// Scalars are not interpreted: `1`, `true` and `null` are all [`Yaml::Scalar`]s and borrow from
/// the input.
///
/// # Examples
///
/// ```
/// use yamlet::Yaml;
///
/// let docs = Yaml::load_from_str("fruits: [apple, pear]\ncount: 2").unwrap();
/// let doc = &docs[0];
/// assert_eq!(doc["fruits"][1].as_str(), Some("pear"));
/// assert_eq!(doc["count"].as_str(), Some("2"));
/// assert!(doc["missing"].is_badvalue());
/// ```
#[derive(Clone, PartialEq, Debug, Eq)]
pub enum Yaml<'input> {
    /// A scalar, exactly as it appears in the input, without its quotes.
    Scalar(&'input str),
    /// YAML sequence, can be accessed as a `Vec`.
    Sequence(Sequence<'input>),
    /// YAML mapping, can be accessed as a `LinkedHashMap`.
    ///
    /// Iteration order will match the order of insertion into the map.
    Mapping(Mapping<'input>),
    /// Accessing a nonexistent node via the Index trait returns `BadValue`. This
    /// simplifies error handling in the calling code.
    BadValue,
}

/// The type contained in the `Yaml::Sequence` variant.
pub type Sequence<'input> = Vec<Yaml<'input>>;

/// The type contained in the `Yaml::Mapping` variant.
pub type Mapping<'input> = LinkedHashMap<&'input str, Yaml<'input>>;

impl<'input> Yaml<'input> {
    /// Load the given string as a set of YAML nodes.
    ///
    /// The input holds a single document, but it may hold more than one node at its top level
    /// (`a\nb` is two scalars). Every top-level node is returned, in order.
    ///
    /// # Errors
    /// Returns `ScanError` when loading fails.
    pub fn load_from_str(source: &'input str) -> Result<Vec<Yaml<'input>>, ScanError> {
        let mut loader = YamlLoader::default();
        parse_str(source, &mut loader)?;
        Ok(loader.into_documents())
    }

    /// Return the text of the node if it is a scalar.
    #[must_use]
    pub fn as_str(&self) -> Option<&'input str> {
        match *self {
            Yaml::Scalar(text) => Some(text),
            _ => None,
        }
    }

    /// Return the elements of the node if it is a sequence.
    #[must_use]
    pub fn as_sequence(&self) -> Option<&Sequence<'input>> {
        match self {
            Yaml::Sequence(sequence) => Some(sequence),
            _ => None,
        }
    }

    /// Return the pairs of the node if it is a mapping.
    #[must_use]
    pub fn as_mapping(&self) -> Option<&Mapping<'input>> {
        match self {
            Yaml::Mapping(mapping) => Some(mapping),
            _ => None,
        }
    }

    /// Return whether the node is a scalar.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        matches!(self, Yaml::Scalar(_))
    }

    /// Return whether the node is a sequence.
    #[must_use]
    pub fn is_sequence(&self) -> bool {
        matches!(self, Yaml::Sequence(_))
    }

    /// Return whether the node is a mapping.
    #[must_use]
    pub fn is_mapping(&self) -> bool {
        matches!(self, Yaml::Mapping(_))
    }

    /// Return whether the node is a `null` or `~` scalar.
    ///
    /// Keys left without a value in the input hold a `null` scalar.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Yaml::Scalar("null" | "~"))
    }

    /// Return whether the node is a [`Yaml::BadValue`].
    #[must_use]
    pub fn is_badvalue(&self) -> bool {
        matches!(self, Yaml::BadValue)
    }
}

static BAD_VALUE: Yaml = Yaml::BadValue;

impl<'input> Index<&str> for Yaml<'input> {
    type Output = Yaml<'input>;

    /// Perform indexing if `self` is a mapping, return [`Yaml::BadValue`] otherwise.
    fn index(&self, key: &str) -> &Yaml<'input> {
        match self {
            Yaml::Mapping(mapping) => mapping.get(key).unwrap_or(&BAD_VALUE),
            _ => &BAD_VALUE,
        }
    }
}

impl<'input> Index<usize> for Yaml<'input> {
    type Output = Yaml<'input>;

    /// Perform indexing if `self` is a sequence, return [`Yaml::BadValue`] otherwise.
    fn index(&self, idx: usize) -> &Yaml<'input> {
        match self {
            Yaml::Sequence(sequence) => sequence.get(idx).unwrap_or(&BAD_VALUE),
            _ => &BAD_VALUE,
        }
    }
}
