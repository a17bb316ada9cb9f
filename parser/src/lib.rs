// Copyright 2015, Yuheng Chen.
// Copyright 2023, Ethiraric.
// See the LICENSE file at the top-level directory of this distribution.

//! Event-driven parser for a small, safe subset of YAML.
//!
//! **If you want to load YAML into a tree or produce YAML text, use `yamlet` instead of
//! `yamlet-parser`. This crate contains only the parser.**
//!
//! The parser scans a borrowed `&str` once and reports document, sequence and mapping boundaries,
//! keys and scalars to an [`EventReceiver`]. Keys and scalars are sub-slices of the input: nothing
//! is copied.
//!
//! # Accepted subset
//! Block and flow mappings and sequences, plain and quoted scalars, comments and a leading `---`
//! marker. Quoted scalars are taken verbatim, without escape processing.
//!
//! Anchors, aliases, tags, literal and folded block scalars, explicit keys and tabs outside of
//! quoted scalars are rejected with a [`ScanError`] rather than guessed at. Every error is fatal.
//!
//! # Usage
//! ```
//! use yamlet_parser::{parse_str, Event};
//!
//! let mut events = vec![];
//! parse_str("name: yamlet\ntags: [yaml, events]\n", &mut events).unwrap();
//! assert_eq!(events[2], Event::Key("name"));
//! assert_eq!(events[3], Event::Scalar("yamlet"));
//! ```
//!
//! # Features
//! #### `debug_prints`
//! Enables the `debug` module and usage of debug prints in the parser. Prints only happen when
//! the `YAMLET_DEBUG` environment variable is set. Do not enable if you are consuming the crate
//! rather than working on it as this can significantly decrease performance.
//!
//! The MSRV for this feature is `1.70.0`.

#![warn(missing_docs, clippy::pedantic)]

mod char_traits;
#[macro_use]
mod debug;
mod parser;
mod scanner;

pub use crate::parser::{
    parse_str, Event, EventReceiver, ParseStatus, Parser, DEFAULT_MAX_DEPTH,
};
pub use crate::scanner::{ErrorKind, Marker, ScanError};
