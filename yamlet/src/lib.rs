// Copyright 2015, Yuheng Chen.
// Copyright 2023, Ethiraric.
// See the LICENSE file at the top-level directory of this distribution.

//! A small, safe subset of YAML, in both directions.
//!
//! # Usage
//!
//! Add `yamlet` to the dependencies in your project's `Cargo.toml`:
//! ```sh
//! cargo add yamlet
//! ```
//!
//! # Examples
//! Write a few lines of YAML, then load them back.
//!
//! ```
//! use yamlet::{make_key_value_line, make_key_value_sequence_line, Yaml};
//!
//! let mut text = make_key_value_line("title", "Ogres & Dragons").unwrap();
//! text += &make_key_value_sequence_line("scores", [3, 14, 15]).unwrap();
//! assert_eq!(text, "title: 'Ogres & Dragons'\nscores: [3, 14, 15]\n");
//!
//! let docs = Yaml::load_from_str(&text).unwrap();
//! assert_eq!(docs[0]["title"].as_str(), Some("Ogres & Dragons"));
//! assert_eq!(docs[0]["scores"][2].as_str(), Some("15"));
//! ```
//!
//! # Encoding
//! The functions of the [`encoder`] module quote a scalar only when it contains a byte YAML could
//! misread, and never escape anything. See [`make_safe_scalar`] for the exact rules.
//!
//! # Loading
//! Parsing is done by `yamlet-parser`, whose API is re-exported here. [`Yaml`] is a reference
//! consumer of its events: a borrowed tree whose scalars are left uninterpreted. Implement
//! [`EventReceiver`] to build something else.
//!
//! # Features
//! #### `debug_prints`
//! Enables debug prints in the parser. See the `yamlet-parser` documentation.

#![warn(missing_docs, clippy::pedantic)]

mod char_traits;
pub mod encoder;
mod loader;
mod yaml;

// Re-export main components.
pub use crate::encoder::{
    analyze_special_chars, make_key_value_line, make_key_value_sequence_line, make_safe_scalar,
    make_sequence, write_sequence, EncodeError, SequenceItem, SpecialChars,
};
pub use crate::loader::YamlLoader;
pub use crate::yaml::{Mapping, Sequence, Yaml};

// Re-export the parser API so that consumers of `yamlet` need not depend on `yamlet-parser`.
pub use yamlet_parser::{
    parse_str, ErrorKind, Event, EventReceiver, Marker, ParseStatus, Parser, ScanError,
    DEFAULT_MAX_DEPTH,
};
