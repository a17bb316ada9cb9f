//! The default loader.

use yamlet_parser::EventReceiver;

use crate::{Mapping, Yaml};

/// Scalar stored for a mapping entry that has no value.
const NULL: &str = "null";

/// Main structure for loading YAML into [`Yaml`] nodes.
///
/// The loader is an [`EventReceiver`]: hand it to [`yamlet_parser::parse_str`] or to a
/// [`yamlet_parser::Parser`], then collect the nodes with [`Self::into_documents`].
///
/// Some event streams do not map directly to a tree. The loader settles them this way:
///  - A key inside a sequence (`[a: 1]`) starts a mapping element that holds only that pair.
///  - A scalar inside a mapping with no key awaiting a value becomes a key with a `null` value.
///  - Collections inside a mapping with no key awaiting a value are appended to a sequence stored
///    under the empty key.
#[allow(clippy::module_name_repetitions)]
#[derive(Default)]
pub struct YamlLoader<'input> {
    /// The top-level nodes that are loaded.
    docs: Vec<Yaml<'input>>,
    // states
    // (current node, whether it is a single-pair mapping) tuple
    doc_stack: Vec<(Yaml<'input>, bool)>,
    /// For every mapping in `doc_stack`, the key awaiting a value, if any.
    key_stack: Vec<Option<&'input str>>,
}

impl<'input> EventReceiver<'input> for YamlLoader<'input> {
    fn on_sequence_start(&mut self) {
        self.doc_stack.push((Yaml::Sequence(Vec::new()), false));
    }

    fn on_sequence_end(&mut self) {
        self.close_node();
    }

    fn on_mapping_start(&mut self) {
        self.doc_stack.push((Yaml::Mapping(Mapping::new()), false));
        self.key_stack.push(None);
    }

    fn on_mapping_end(&mut self) {
        self.close_node();
    }

    fn on_key(&mut self, key: &'input str) -> bool {
        match self.doc_stack.last() {
            Some((Yaml::Mapping(_), _)) => {
                if let Some(cur_key) = self.key_stack.last_mut() {
                    *cur_key = Some(key);
                }
            }
            // A key outside of a mapping opens one for this pair only.
            _ => {
                self.doc_stack.push((Yaml::Mapping(Mapping::new()), true));
                self.key_stack.push(Some(key));
            }
        }
        true
    }

    fn on_scalar(&mut self, value: &'input str) -> bool {
        self.insert_new_node(Yaml::Scalar(value));
        true
    }
}

impl<'input> YamlLoader<'input> {
    /// Return the top-level nodes from `self`, consuming it in the process.
    #[must_use]
    pub fn into_documents(self) -> Vec<Yaml<'input>> {
        self.docs
    }

    /// Pop the innermost collection and store it in its parent.
    fn close_node(&mut self) {
        if let Some((node, _)) = self.doc_stack.pop() {
            if node.is_mapping() {
                self.key_stack.pop();
            }
            self.insert_new_node(node);
        }
    }

    fn insert_new_node(&mut self, node: Yaml<'input>) {
        let Some((parent, single_pair)) = self.doc_stack.last_mut() else {
            self.docs.push(node);
            return;
        };
        match parent {
            Yaml::Sequence(sequence) => sequence.push(node),
            Yaml::Mapping(mapping) => {
                let cur_key = self.key_stack.last_mut().and_then(Option::take);
                match (cur_key, node) {
                    // current node is a value
                    (Some(key), node) => {
                        mapping.insert(key, node);
                    }
                    // current node is a key without a value
                    (None, Yaml::Scalar(key)) => {
                        mapping.insert(key, Yaml::Scalar(NULL));
                    }
                    // a collection without a key, kept with the others under the empty key
                    (None, node) => match mapping.get_mut("") {
                        Some(Yaml::Sequence(orphans)) => orphans.push(node),
                        Some(existing) => {
                            let previous = std::mem::replace(existing, Yaml::BadValue);
                            *existing = Yaml::Sequence(vec![previous, node]);
                        }
                        None => {
                            mapping.insert("", Yaml::Sequence(vec![node]));
                        }
                    },
                }
                if *single_pair {
                    self.close_node();
                }
            }
            Yaml::Scalar(_) | Yaml::BadValue => {}
        }
    }
}
