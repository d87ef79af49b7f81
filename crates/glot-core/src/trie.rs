//! Prefix trie over dotted key segments.
//!
//! The hierarchical half of the dual index: answers "all keys under prefix
//! P" and "all immediate child segments under prefix P", which the flat
//! table cannot. Built once per region load from the same entry list as
//! the table and used only for enumeration, never on the hot resolve path.
//!
//! # Invariants
//!
//! 1. **Arena addressing**: nodes live in a flat `Vec` and refer to their
//!    children by index; the root is index 0 and always exists. No node is
//!    ever removed (the trie is rebuilt wholesale, not patched).
//!
//! 2. **Terminal equivalence**: a root-to-node path, joined with `.`,
//!    equals an inserted key iff that node is terminal. A terminal node
//!    with children is legal: the key is both a leaf and a namespace.
//!
//! 3. **Deterministic enumeration**: children keep per-node insertion
//!    order, so every enumeration is stable for a given entry list.

use crate::key;

#[derive(Debug, Clone, Default)]
struct Node {
    /// `(segment, child index)` pairs in insertion order. Fan-out per node
    /// is small in practice, so a linear scan beats hashing here.
    children: Vec<(String, usize)>,
    /// Terminal value when a key ends at this node.
    value: Option<String>,
}

/// Prefix tree over dot-delimited key segments.
#[derive(Debug, Clone)]
pub struct KeyTrie {
    nodes: Vec<Node>,
}

impl Default for KeyTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyTrie {
    /// Create an empty trie (root only).
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
        }
    }

    /// Build a trie from an entry list.
    ///
    /// O(total segment count) over all keys.
    pub fn build<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut trie = Self::new();
        let mut keys = 0usize;
        for (k, v) in entries {
            trie.insert(k, v);
            keys += 1;
        }
        tracing::debug!(keys, nodes = trie.nodes.len(), "key trie built");
        trie
    }

    /// Insert a key, creating or reusing one node per segment. A repeated
    /// key replaces the terminal value.
    pub fn insert(&mut self, k: &str, value: &str) {
        let mut node = 0;
        for segment in key::segments(k) {
            node = match self.child(node, segment) {
                Some(idx) => idx,
                None => {
                    let idx = self.nodes.len();
                    self.nodes.push(Node::default());
                    self.nodes[node].children.push((segment.to_string(), idx));
                    idx
                }
            };
        }
        self.nodes[node].value = Some(value.to_string());
    }

    /// Terminal value stored at exactly `k`, if any.
    #[must_use]
    pub fn get(&self, k: &str) -> Option<&str> {
        let mut node = 0;
        for segment in key::segments(k) {
            node = self.child(node, segment)?;
        }
        self.nodes[node].value.as_deref()
    }

    /// Walk from the root consuming each segment of `prefix`.
    ///
    /// Returns `None` if any segment is absent. The empty prefix yields
    /// the whole trie.
    #[must_use]
    pub fn subtrie(&self, prefix: &str) -> Option<SubTrie<'_>> {
        let mut node = 0;
        if !prefix.is_empty() {
            for segment in key::segments(prefix) {
                node = self.child(node, segment)?;
            }
        }
        Some(SubTrie {
            trie: self,
            node,
            prefix: prefix.to_string(),
        })
    }

    /// Every inserted key, in deterministic (depth-first insertion) order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut out = Vec::new();
        let mut path = String::new();
        self.collect(0, &mut path, &mut out);
        out
    }

    fn child(&self, node: usize, segment: &str) -> Option<usize> {
        self.nodes[node]
            .children
            .iter()
            .find(|(s, _)| s == segment)
            .map(|&(_, idx)| idx)
    }

    fn collect(&self, node: usize, path: &mut String, out: &mut Vec<String>) {
        if self.nodes[node].value.is_some() {
            out.push(path.clone());
        }
        for (segment, child) in &self.nodes[node].children {
            let saved = path.len();
            if !path.is_empty() {
                path.push('.');
            }
            path.push_str(segment);
            self.collect(*child, path, out);
            path.truncate(saved);
        }
    }
}

/// A position inside a [`KeyTrie`], reached via [`KeyTrie::subtrie`].
///
/// Enumeration from a subtrie yields full dotted paths relative to the
/// original root, not paths relative to the subtrie.
#[derive(Debug, Clone)]
pub struct SubTrie<'a> {
    trie: &'a KeyTrie,
    node: usize,
    prefix: String,
}

impl SubTrie<'_> {
    /// Full dotted paths of every terminal node reachable from here,
    /// including this node itself when it is terminal.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut out = Vec::new();
        let mut path = self.prefix.clone();
        self.trie.collect(self.node, &mut path, &mut out);
        out
    }

    /// Immediate child segments under this position.
    ///
    /// Every child leads to content by construction (it is terminal itself
    /// or has a terminal descendant), so no reachability filter is needed.
    #[must_use]
    pub fn first_level(&self) -> Vec<String> {
        self.trie.nodes[self.node]
            .children
            .iter()
            .map(|(segment, _)| segment.clone())
            .collect()
    }

    /// Whether the prefix itself is an inserted key.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.trie.nodes[self.node].value.is_some()
    }

    /// Terminal value at this position, if any.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.trie.nodes[self.node].value.as_deref()
    }
}
