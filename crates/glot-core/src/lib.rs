#![forbid(unsafe_code)]

//! Core data structures for the glot localization runtime.
//!
//! # Role in glot
//! `glot-core` is the pure layer: key helpers, the flat lookup table, the
//! hierarchical key trie, and the escape markup tokenizer. It performs no
//! I/O and holds no session state; the runtime crate (`glot-runtime`)
//! orchestrates these pieces into a resolver.
//!
//! # Primary responsibilities
//! - **key**: dotted-key segment helpers and display-name rendering.
//! - **table**: exact-match `key -> value` lookup with runtime overrides.
//! - **trie**: prefix tree over key segments for hierarchical enumeration
//!   and autocomplete.
//! - **markup**: the escape mini-language (parameters, key references,
//!   context properties, color tags) and load-time color baking.
//! - **color**: color tag payloads and their SGR encoding.

/// Color tag payloads and SGR emission.
pub mod color;
/// Dotted-key segment helpers.
pub mod key;
/// Escape markup tokenizer and color baking.
pub mod markup;
/// Flat key -> value lookup table.
pub mod table;
/// Prefix trie over dotted key segments.
pub mod trie;

pub use color::{Ansi16, Rgb, SGR_RESET, TagColor};
pub use markup::{Token, bake_colors, tokenize};
pub use table::LookupTable;
pub use trie::{KeyTrie, SubTrie};
